use crate::error::{OptimizeError, Result};
use crate::numerics::linalg::{difference_into, dot, norm2};
use crate::problems::objective::Objective;
use crate::solvers::common::controller::{
    check_start, search_along, Advance, IterationController, Step,
};
use crate::solvers::common::iterate::{IteratePoint, RunResult};
use crate::solvers::common::step_policy::LineSearchPolicy;
use crate::solvers::common::trace::{SolverTracer, TraceRow};

use super::dfp::DfpUpdate;
use super::types::{CurvaturePolicy, QuasiNewton};

impl QuasiNewton {
    fn controller(&self) -> Result<IterationController> {
        IterationController::new(SolverTracer::new("dfp", self.verbose), self.max_iters, self.tol)
    }

    /// Minimize `obj` from `x0` using DFP directions and the configured Armijo search.
    pub fn minimize<O>(&self, obj: &O, x0: Vec<f64>) -> Result<RunResult>
    where
        O: Objective + ?Sized,
    {
        let mut armijo = self.armijo;
        armijo.validate()?;
        self.minimize_with_line_search(obj, x0, &mut armijo)
    }

    /// Minimize with an explicit step policy in place of Armijo.
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
        let tracer = *controller.tracer();
        let tol = controller.tol();
        let start = IteratePoint::evaluate(obj, x0)?;
        let mut dfp = DfpUpdate::new(start.dim());
        let mut y = vec![0.0; start.dim()];

        controller.run(start, |k, point| {
            let mut direction = dfp.direction(&point.gradient)?;
            let mut note = None;
            let slope = dot(&direction, &point.gradient);
            if !(slope < 0.0) {
                if self.curvature_policy == CurvaturePolicy::Fail {
                    return Err(OptimizeError::NotADescentDirection { slope });
                }
                tracer.warn(TraceRow::iter(k).dphi0(slope).note("H lost definiteness, reset"));
                dfp.reset();
                direction = dfp.direction(&point.gradient)?;
                note = Some("reset");
            }

            let (x_next, ls, dphi0) = search_along(obj, point, &direction, line_search, k)?;
            let next = IteratePoint::evaluate(obj, x_next)?;

            difference_into(&mut y, &point.gradient, &next.gradient);
            if let Err(err) = dfp.update(&direction, &y, ls.alpha) {
                match self.curvature_policy {
                    CurvaturePolicy::Fail => return Err(err),
                    CurvaturePolicy::SkipUpdate => {
                        tracer.warn(TraceRow::iter(k + 1).note("curvature update skipped"));
                        note = Some("skip");
                    }
                    CurvaturePolicy::ResetToIdentity => {
                        tracer.warn(TraceRow::iter(k + 1).note("curvature update failed, reset"));
                        dfp.reset();
                        note = Some("reset");
                    }
                }
            }

            let converged = next.grad_norm() <= tol;
            let mut step = Step::new(next, ls.alpha, norm2(&direction))
                .with_search(dphi0, ls.evaluations);
            if let Some(note) = note {
                step = step.note(note);
            }
            Ok(if converged {
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
