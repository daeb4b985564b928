use crate::error::{OptimizeError, Result};
use crate::numerics::linalg::{axpy_into, dot, norm2};
use crate::problems::objective::TwiceDifferentiable;
use crate::solvers::common::controller::{check_start, Advance, IterationController, Step};
use crate::solvers::common::iterate::{IteratePoint, RunResult};
use crate::solvers::common::trace::SolverTracer;

use super::types::ConjugateGradient;

impl ConjugateGradient {
    fn controller(&self) -> Result<IterationController> {
        IterationController::new(SolverTracer::new("cg", self.verbose), self.max_iters, self.tol)
    }

    /// Minimize `obj` from `x0` with `n` conjugate steps.
    ///
    /// Each step length is the exact minimizer of the local quadratic model,
    /// `a = -g.d / d^T H d`. A zero direction is recorded as a null step.
    pub fn minimize<O>(&self, obj: &O, x0: Vec<f64>) -> Result<RunResult>
    where
        O: TwiceDifferentiable + ?Sized,
    {
        check_start(obj, &x0)?;
        let controller = self.controller()?;
        let tol = controller.tol();
        let start = IteratePoint::evaluate_with_hessian(obj, x0)?;
        let n = start.dim();
        let mut direction: Vec<f64> = start.gradient.iter().map(|g| -g).collect();

        controller.run(start, |k, point| {
            let direction_norm = norm2(&direction);
            let slope = dot(&point.gradient, &direction);

            let (next, alpha) = if direction_norm == 0.0 || slope == 0.0 {
                (point.clone(), 0.0)
            } else {
                let hessian = point.hessian_or_eval(obj)?;
                let curvature = hessian.quadratic_form(&direction)?;
                if !(curvature > 0.0) {
                    return Err(OptimizeError::degenerate("cg d^T H d", curvature));
                }
                let alpha = -slope / curvature;
                let mut x = vec![0.0; n];
                axpy_into(&mut x, &point.x, &direction, alpha);
                (IteratePoint::evaluate_with_hessian(obj, x)?, alpha)
            };
            let null_step = alpha == 0.0;

            let last = k + 1 == n;
            if !last && !null_step {
                let hessian = next.hessian_or_eval(obj)?;
                let hd = hessian.mul_vec(&direction)?;
                let curvature = dot(&direction, &hd);
                if !(curvature > 0.0) {
                    return Err(OptimizeError::degenerate("cg d^T H d", curvature));
                }
                let beta = dot(&next.gradient, &hd) / curvature;
                for (d, g) in direction.iter_mut().zip(&next.gradient) {
                    *d = -g + beta * *d;
                }
            }

            let mut step = Step::new(next, alpha, direction_norm).with_search(slope, 0);
            if null_step {
                step = step.note("null step");
            }
            Ok(if last {
                let converged = step.next.grad_norm() <= tol;
                Advance::Finish { step, converged }
            } else {
                Advance::Continue(step)
            })
        })
    }
}
