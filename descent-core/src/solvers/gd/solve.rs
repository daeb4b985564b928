use crate::error::Result;
use crate::line_search::ScalarMinimizer;
use crate::numerics::linalg::distance;
use crate::problems::objective::Objective;
use crate::solvers::common::controller::{
    check_start, search_along, Advance, IterationController, Step,
};
use crate::solvers::common::iterate::{IteratePoint, RunResult};
use crate::solvers::common::step_policy::LineSearchPolicy;
use crate::solvers::common::trace::SolverTracer;

use super::types::GradientDescent;

impl<M: ScalarMinimizer + Clone> GradientDescent<M> {
    fn controller(&self) -> Result<IterationController> {
        IterationController::new(SolverTracer::new("gd", self.verbose), self.max_iters, self.tol)
    }

    /// Minimize `obj` from `x0` with the configured exact line search.
    pub fn minimize<O>(&self, obj: &O, x0: Vec<f64>) -> Result<RunResult>
    where
        O: Objective + ?Sized,
    {
        let mut line_search = self.line_search.clone();
        self.minimize_with_line_search(obj, x0, &mut line_search)
    }

    /// Minimize using an explicit line-search policy along `-grad`.
    pub fn minimize_with_line_search<O, LS>(
        &self,
        obj: &O,
        x0: Vec<f64>,
        line_search: &mut LS,
    ) -> Result<RunResult>
    where
        O: Objective + ?Sized,
        LS: LineSearchPolicy + ?Sized,
    {
        check_start(obj, &x0)?;
        let controller = self.controller()?;
        let tol = controller.tol();
        let start = IteratePoint::evaluate(obj, x0)?;

        controller.run(start, |k, point| {
            let direction: Vec<f64> = point.gradient.iter().map(|g| -g).collect();
            let grad_norm = point.grad_norm();
            let (x_next, ls, dphi0) = search_along(obj, point, &direction, line_search, k)?;

            let moved = distance(&point.x, &x_next);
            let next = IteratePoint::evaluate(obj, x_next)?;
            let stop = next.grad_norm() <= tol || moved <= tol;
            let step = Step::new(next, ls.alpha, grad_norm).with_search(dphi0, ls.evaluations);
            Ok(if stop {
                Advance::Finish {
                    step,
                    converged: true,
                }
            } else {
                Advance::Continue(step)
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problems::test_functions::Sphere;

    #[test]
    fn one_exact_step_solves_the_sphere() {
        let res = GradientDescent::new().minimize(&Sphere, vec![3.0, -1.0]).unwrap();
        assert!(res.converged);
        assert_eq!(res.iterations, 1);
        assert!(res.solution.iter().all(|v| v.abs() < 1e-6));
    }
}
