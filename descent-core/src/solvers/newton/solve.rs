use crate::error::{OptimizeError, Result};
use crate::line_search::ScalarMinimizer;
use crate::numerics::linalg::norm2;
use crate::numerics::{is_positive_definite, symmetric_eigenvalues, LinearSolver, Matrix};
use crate::problems::objective::TwiceDifferentiable;
use crate::solvers::common::controller::{
    check_start, search_along, Advance, IterationController, Step,
};
use crate::solvers::common::iterate::{IteratePoint, RunResult};
use crate::solvers::common::step_policy::LineSearchPolicy;
use crate::solvers::common::trace::{SolverTracer, TraceRow};

use super::types::Newton;

/// Symmetry tolerance applied to supplied Hessians before they are averaged.
const HESSIAN_SYMMETRY_TOL: f64 = 1e-8;

/// Newton direction `-H^{-1} g`, repairing `H` when it is not positive definite.
///
/// Returns the direction and, when a repair was needed, the diagonal shift used.
pub(crate) fn newton_direction<L: LinearSolver + ?Sized>(
    linalg: &L,
    hessian: &Matrix,
    gradient: &[f64],
    shift_delta: f64,
) -> Result<(Vec<f64>, Option<f64>)> {
    if hessian.dim() != gradient.len() {
        return Err(OptimizeError::dimension("newton hessian", gradient.len(), hessian.dim()));
    }
    hessian.check_symmetric(HESSIAN_SYMMETRY_TOL)?;
    let mut h = hessian.clone();
    h.symmetrize();
    let rhs: Vec<f64> = gradient.iter().map(|g| -g).collect();

    if is_positive_definite(&h) {
        match linalg.cholesky_solve(&h, &rhs) {
            Ok(d) => return Ok((d, None)),
            // minors passed but the factorization lost definiteness to rounding
            Err(OptimizeError::NotPositiveDefinite { .. }) => {}
            Err(e) => return Err(e),
        }
    }

    let eigenvalues = symmetric_eigenvalues(&h)?;
    let lambda_min = eigenvalues.first().copied().unwrap_or(0.0);
    let shift = lambda_min.abs() + shift_delta;
    let d = linalg.cholesky_solve(&h.shifted(shift), &rhs)?;
    Ok((d, Some(shift)))
}

impl<M, L> Newton<M, L>
where
    M: ScalarMinimizer + Clone,
    L: LinearSolver,
{
    fn controller(&self) -> Result<IterationController> {
        IterationController::new(
            SolverTracer::new("newton", self.verbose),
            self.max_iters,
            self.tol,
        )
    }

    pub fn minimize<O>(&self, obj: &O, x0: Vec<f64>) -> Result<RunResult>
    where
        O: TwiceDifferentiable + ?Sized,
    {
        let mut line_search = self.line_search.clone();
        self.minimize_with_line_search(obj, x0, &mut line_search)
    }

    /// Minimize with an explicit step policy along the (repaired) Newton direction.
    pub fn minimize_with_line_search<O, LS>(
        &self,
        obj: &O,
        x0: Vec<f64>,
        line_search: &mut LS,
    ) -> Result<RunResult>
    where
        O: TwiceDifferentiable + ?Sized,
        LS: LineSearchPolicy + ?Sized,
    {
        if !(self.shift_delta > 0.0 && self.shift_delta.is_finite()) {
            return Err(OptimizeError::InvalidConfig(format!(
                "newton shift_delta must be positive, got {}",
                self.shift_delta
            )));
        }
        check_start(obj, &x0)?;
        let controller = self.controller()?;
        let tracer = *controller.tracer();
        let tol = controller.tol();
        let start = IteratePoint::evaluate_with_hessian(obj, x0)?;

        controller.run(start, |k, point| {
            let hessian = point.hessian_or_eval(obj)?;
            let (direction, shift) =
                newton_direction(&self.linalg, &hessian, &point.gradient, self.shift_delta)?;
            if let Some(shift) = shift {
                tracer.warn(
                    TraceRow::iter(k)
                        .f(point.f)
                        .shift(shift)
                        .note("hessian not positive definite"),
                );
            }

            let direction_norm = norm2(&direction);
            if direction_norm <= tol {
                return Ok(Advance::Converged);
            }

            let (x_next, ls, dphi0) = search_along(obj, point, &direction, line_search, k)?;
            let next = IteratePoint::evaluate_with_hessian(obj, x_next)?;
            let mut step =
                Step::new(next, ls.alpha, direction_norm).with_search(dphi0, ls.evaluations);
            if shift.is_some() {
                step = step.note("shifted");
            }
            Ok(Advance::Continue(step))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numerics::DenseLinalg;

    #[test]
    fn spd_hessian_gives_plain_newton_direction() {
        let h = Matrix::from_rows(&[[2.0, 0.0], [0.0, 4.0]]).unwrap();
        let (d, shift) = newton_direction(&DenseLinalg::new(), &h, &[2.0, 4.0], 1e-6).unwrap();
        assert!(shift.is_none());
        assert!((d[0] + 1.0).abs() < 1e-12 && (d[1] + 1.0).abs() < 1e-12);
    }

    #[test]
    fn indefinite_hessian_is_shifted_into_a_descent_direction() {
        let h = Matrix::from_rows(&[[1.0, 0.0], [0.0, -2.0]]).unwrap();
        let g = [1.0, 1.0];
        let (d, shift) = newton_direction(&DenseLinalg::new(), &h, &g, 1e-6).unwrap();
        let shift = shift.unwrap();
        assert!((shift - (2.0 + 1e-6)).abs() < 1e-9);
        assert!(d[0] * g[0] + d[1] * g[1] < 0.0);
    }
}
