//! Shared looping policy: the pre-check, the iteration cap and trajectory bookkeeping.

use crate::error::{OptimizeError, Result};
use crate::numerics::linalg::{axpy_into, dot, norm2};
use crate::problems::objective::Objective;

use super::iterate::{IteratePoint, RunResult, Trajectory};
use super::step_policy::{LineSearchContext, LineSearchPolicy, LineSearchResult};
use super::trace::{SolverTracer, TraceRow};

/// One accepted move, produced by a method for the controller to record.
#[derive(Clone, Debug)]
pub(crate) struct Step {
    pub(crate) next: IteratePoint,
    pub(crate) alpha: f64,
    pub(crate) direction_norm: f64,
    pub(crate) dphi0: Option<f64>,
    pub(crate) evaluations: usize,
    pub(crate) note: Option<&'static str>,
}

impl Step {
    pub(crate) fn new(next: IteratePoint, alpha: f64, direction_norm: f64) -> Self {
        Self {
            next,
            alpha,
            direction_norm,
            dphi0: None,
            evaluations: 0,
            note: None,
        }
    }

    pub(crate) fn with_search(mut self, dphi0: f64, evaluations: usize) -> Self {
        self.dphi0 = Some(dphi0);
        self.evaluations = evaluations;
        self
    }

    pub(crate) fn note(mut self, note: &'static str) -> Self {
        self.note = Some(note);
        self
    }
}

/// What a method wants the controller to do after one iteration.
#[derive(Clone, Debug)]
pub(crate) enum Advance {
    /// The current iterate satisfies the method's stopping test; nothing is recorded.
    Converged,
    /// Record the step and keep going.
    Continue(Step),
    /// Record the step and stop.
    Finish { step: Step, converged: bool },
}

/// Drives a method until it stops or the iteration cap is reached.
#[derive(Clone, Copy, Debug)]
pub(crate) struct IterationController {
    tracer: SolverTracer,
    max_iters: usize,
    tol: f64,
}

impl IterationController {
    pub(crate) fn new(tracer: SolverTracer, max_iters: usize, tol: f64) -> Result<Self> {
        if !(tol > 0.0 && tol.is_finite()) {
            return Err(OptimizeError::InvalidConfig(format!(
                "tolerance must be positive and finite, got {tol}"
            )));
        }
        Ok(Self {
            tracer,
            max_iters,
            tol,
        })
    }

    pub(crate) fn tracer(&self) -> &SolverTracer {
        &self.tracer
    }

    pub(crate) fn tol(&self) -> f64 {
        self.tol
    }

    /// Run `advance(k, current)` until it stops.
    ///
    /// A start whose gradient norm is already within tolerance is returned
    /// untouched with zero iterations. At the cap the run is reported as not
    /// converged and the best iterate becomes the solution. An error raised
    /// after at least one recorded step comes back as
    /// [`OptimizeError::Interrupted`] carrying the trajectory.
    pub(crate) fn run<F>(&self, start: IteratePoint, mut advance: F) -> Result<RunResult>
    where
        F: FnMut(usize, &IteratePoint) -> Result<Advance>,
    {
        let mut trajectory = Trajectory::starting_at(start);
        let g0 = trajectory.latest().grad_norm();
        self.tracer
            .emit(TraceRow::iter(0).f(trajectory.latest().f).grad_norm(g0));
        if g0 <= self.tol {
            self.tracer.emit(TraceRow::iter(0).note("start already stationary"));
            return Ok(self.finish(trajectory, 0, true));
        }

        for k in 0..self.max_iters {
            let outcome = match advance(k, trajectory.latest()) {
                Ok(outcome) => outcome,
                Err(err) if trajectory.len() > 1 => {
                    self.tracer
                        .warn(TraceRow::iter(k).note("run interrupted, history kept"));
                    return Err(OptimizeError::Interrupted {
                        iterations: k,
                        trajectory,
                        source: Box::new(err),
                    });
                }
                Err(err) => return Err(err),
            };
            match outcome {
                Advance::Converged => {
                    self.tracer.emit(TraceRow::iter(k).note("converged"));
                    return Ok(self.finish(trajectory, k, true));
                }
                Advance::Continue(step) => self.record(&mut trajectory, k, step),
                Advance::Finish { step, converged } => {
                    self.record(&mut trajectory, k, step);
                    if converged {
                        self.tracer.emit(TraceRow::iter(k + 1).note("converged"));
                    }
                    return Ok(self.finish(trajectory, k + 1, converged));
                }
            }
        }

        let last = trajectory.latest();
        self.tracer.warn(
            TraceRow::iter(self.max_iters)
                .f(last.f)
                .grad_norm(last.grad_norm())
                .note("iteration cap reached"),
        );
        Ok(self.finish(trajectory, self.max_iters, false))
    }

    fn record(&self, trajectory: &mut Trajectory, k: usize, step: Step) {
        let mut row = TraceRow::iter(k + 1)
            .f(step.next.f)
            .grad_norm(step.next.grad_norm())
            .dx_norm((step.alpha * step.direction_norm).abs())
            .alpha(step.alpha)
            .evals(step.evaluations);
        if let Some(dphi0) = step.dphi0 {
            row = row.dphi0(dphi0);
        }
        if let Some(note) = step.note {
            row = row.note(note);
        }
        self.tracer.emit(row);
        trajectory.push(step.next);
    }

    fn finish(&self, trajectory: Trajectory, iterations: usize, converged: bool) -> RunResult {
        let point = if converged {
            trajectory.latest()
        } else {
            trajectory.best()
        };
        RunResult {
            method: self.tracer.solver(),
            solution: point.x.clone(),
            f: point.f,
            grad_norm: point.grad_norm(),
            iterations,
            converged,
            trajectory,
        }
    }
}

/// Validate the starting point against the objective's declared dimension.
pub(crate) fn check_start<O: Objective + ?Sized>(obj: &O, x0: &[f64]) -> Result<()> {
    if x0.is_empty() {
        return Err(OptimizeError::InvalidConfig(
            "starting point must not be empty".into(),
        ));
    }
    if let Some(n) = obj.dim() {
        if n != x0.len() {
            return Err(OptimizeError::dimension("starting point", n, x0.len()));
        }
    }
    Ok(())
}

/// Run `line_search` along `direction` from `point` and return the accepted step.
///
/// The returned position is `point.x + alpha * direction`.
pub(crate) fn search_along<O, LS>(
    obj: &O,
    point: &IteratePoint,
    direction: &[f64],
    line_search: &mut LS,
    k: usize,
) -> Result<(Vec<f64>, LineSearchResult, f64)>
where
    O: Objective + ?Sized,
    LS: LineSearchPolicy + ?Sized,
{
    let dphi0 = dot(direction, &point.gradient);
    let ctx = LineSearchContext {
        iter: k,
        cost0: point.f,
        dphi0,
        direction_norm: norm2(direction),
    };
    let mut trial = vec![0.0; point.dim()];
    let mut eval_cost = |alpha: f64| {
        axpy_into(&mut trial, &point.x, direction, alpha);
        let f = obj.value(&trial);
        f.is_finite().then_some(f)
    };
    let ls = line_search.search(&ctx, &mut eval_cost)?;

    let mut x_next = vec![0.0; point.dim()];
    axpy_into(&mut x_next, &point.x, direction, ls.alpha);
    Ok((x_next, ls, dphi0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problems::test_functions::Sphere;

    fn controller(max_iters: usize) -> IterationController {
        IterationController::new(SolverTracer::new("test", false), max_iters, 1e-3).unwrap()
    }

    #[test]
    fn stationary_start_takes_zero_iterations() {
        let start = IteratePoint::evaluate(&Sphere, vec![0.0, 0.0]).unwrap();
        let res = controller(10)
            .run(start, |_, _| panic!("no iteration expected"))
            .unwrap();
        assert!(res.converged);
        assert_eq!(res.iterations, 0);
        assert_eq!(res.trajectory.len(), 1);
    }

    #[test]
    fn cap_reports_best_iterate() {
        let start = IteratePoint::evaluate(&Sphere, vec![4.0]).unwrap();
        // alternates between 1 and 2; never converges
        let res = controller(4)
            .run(start, |k, _| {
                let x = if k % 2 == 0 { 1.0 } else { 2.0 };
                let next = IteratePoint::evaluate(&Sphere, vec![x])?;
                Ok(Advance::Continue(Step::new(next, 1.0, 1.0)))
            })
            .unwrap();
        assert!(!res.converged);
        assert_eq!(res.iterations, 4);
        assert_eq!(res.solution, vec![1.0]);
        assert_eq!(res.trajectory.len(), 5);
        assert!(res.into_converged().is_err());
    }

    #[test]
    fn late_failure_keeps_the_history() {
        let start = IteratePoint::evaluate(&Sphere, vec![4.0]).unwrap();
        let res = controller(10).run(start, |k, _| {
            if k == 2 {
                return Err(OptimizeError::NonFiniteValue { what: "gradient" });
            }
            let next = IteratePoint::evaluate(&Sphere, vec![3.0 - k as f64])?;
            Ok(Advance::Continue(Step::new(next, 1.0, 1.0)))
        });
        match res {
            Err(OptimizeError::Interrupted {
                iterations,
                trajectory,
                source,
            }) => {
                assert_eq!(iterations, 2);
                assert_eq!(trajectory.len(), 3);
                assert!(matches!(*source, OptimizeError::NonFiniteValue { .. }));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn first_step_failure_is_returned_as_is() {
        let start = IteratePoint::evaluate(&Sphere, vec![4.0]).unwrap();
        let err = controller(10)
            .run(start, |_, _| Err(OptimizeError::degenerate("test", 0.0)))
            .unwrap_err();
        assert!(matches!(err, OptimizeError::SingularOrDegenerateCurvature { .. }));
    }

    #[test]
    fn rejects_non_positive_tolerance() {
        let err = IterationController::new(SolverTracer::new("test", false), 10, 0.0).unwrap_err();
        assert!(matches!(err, OptimizeError::InvalidConfig(_)));
    }

    #[test]
    fn start_dimension_is_checked() {
        let q = crate::problems::Quadratic::new(crate::numerics::Matrix::identity(3));
        assert!(matches!(
            check_start(&q, &[1.0, 2.0]),
            Err(OptimizeError::DimensionMismatch { expected: 3, found: 2, .. })
        ));
        assert!(check_start(&Sphere, &[]).is_err());
    }
}
