use serde::{Deserialize, Serialize};

use crate::error::{OptimizeError, Result};
use crate::line_search::{ScalarMinimizer, ScalarSearch, SearchStart};

/// Accepted step of a line-search policy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineSearchResult {
    pub alpha: f64,
    /// Objective value at the accepted step.
    pub value: f64,
    pub evaluations: usize,
}

/// Per-iteration context passed to a step policy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineSearchContext {
    pub iter: usize,
    /// phi(0) = f(x)
    pub cost0: f64,
    /// phi'(0) = d . grad
    pub dphi0: f64,
    pub direction_norm: f64,
}

/// Policy interface for selecting a step length along a descent direction.
///
/// `eval_cost(alpha)` returns `f(x + alpha d)`, or `None` when the trial value
/// is not finite.
pub trait LineSearchPolicy {
    fn name(&self) -> &'static str;

    fn search(
        &mut self,
        ctx: &LineSearchContext,
        eval_cost: &mut dyn FnMut(f64) -> Option<f64>,
    ) -> Result<LineSearchResult>;
}

fn require_descent(ctx: &LineSearchContext) -> Result<()> {
    if ctx.dphi0 < 0.0 {
        Ok(())
    } else {
        Err(OptimizeError::NotADescentDirection { slope: ctx.dphi0 })
    }
}

/// One-sided Armijo search.
///
/// With `approx(alpha) = phi(0) + epsilon * alpha * phi'(0)`: if `alpha0` already
/// gives sufficient decrease, alpha is multiplied by `ita` while the condition keeps
/// holding and the last passing alpha is returned; otherwise alpha is divided by `ita`
/// until the condition first holds. No curvature condition is checked.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArmijoBacktracking {
    pub alpha0: f64,
    /// Expansion/contraction factor, > 1.
    pub ita: f64,
    /// Sufficient-decrease parameter in (0, 1).
    pub epsilon: f64,
    /// Cap on expansions or contractions.
    pub max_steps: usize,
}

impl ArmijoBacktracking {
    pub fn new(alpha0: f64, ita: f64, epsilon: f64, max_steps: usize) -> Self {
        Self {
            alpha0,
            ita,
            epsilon,
            max_steps,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.alpha0 > 0.0 && self.alpha0.is_finite()) {
            return Err(OptimizeError::InvalidConfig(format!(
                "armijo alpha0 must be positive, got {}",
                self.alpha0
            )));
        }
        if !(self.ita > 1.0 && self.ita.is_finite()) {
            return Err(OptimizeError::InvalidConfig(format!(
                "armijo ita must exceed 1, got {}",
                self.ita
            )));
        }
        if !(self.epsilon > 0.0 && self.epsilon < 1.0) {
            return Err(OptimizeError::InvalidConfig(format!(
                "armijo epsilon must lie in (0, 1), got {}",
                self.epsilon
            )));
        }
        if self.max_steps == 0 {
            return Err(OptimizeError::InvalidConfig(
                "armijo max_steps must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

impl Default for ArmijoBacktracking {
    fn default() -> Self {
        Self {
            alpha0: 1e-3,
            ita: 2.0,
            epsilon: 1e-3,
            max_steps: 60,
        }
    }
}

impl LineSearchPolicy for ArmijoBacktracking {
    fn name(&self) -> &'static str {
        "armijo"
    }

    fn search(
        &mut self,
        ctx: &LineSearchContext,
        eval_cost: &mut dyn FnMut(f64) -> Option<f64>,
    ) -> Result<LineSearchResult> {
        self.validate()?;
        require_descent(ctx)?;

        let mut evaluations = 0;
        let mut sufficient = |alpha: f64| {
            evaluations += 1;
            let approx = ctx.cost0 + self.epsilon * ctx.dphi0 * alpha;
            eval_cost(alpha).filter(|cost| *cost < approx)
        };

        let mut alpha = self.alpha0;
        if let Some(mut value) = sufficient(alpha) {
            for _ in 0..self.max_steps {
                let trial = alpha * self.ita;
                match sufficient(trial) {
                    Some(v) => {
                        alpha = trial;
                        value = v;
                    }
                    None => break,
                }
            }
            return Ok(LineSearchResult {
                alpha,
                value,
                evaluations,
            });
        }

        for _ in 0..self.max_steps {
            alpha /= self.ita;
            if let Some(value) = sufficient(alpha) {
                return Ok(LineSearchResult {
                    alpha,
                    value,
                    evaluations,
                });
            }
        }

        Err(OptimizeError::LineSearchExhausted {
            method: "armijo",
            evaluations,
        })
    }
}

/// Exact line search: minimizes `phi(alpha) = f(x + alpha d)` from `alpha = 0`
/// with a scalar minimizer.
///
/// `tol` is applied to `phi` rescaled by `|phi'(0)|`, so for slope-based
/// minimizers it is relative to the initial slope.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExactLineSearch<M = ScalarSearch> {
    pub minimizer: M,
    /// Tolerance handed to the scalar minimizer.
    pub tol: f64,
}

impl<M: Default> Default for ExactLineSearch<M> {
    fn default() -> Self {
        Self {
            minimizer: M::default(),
            tol: 1e-6,
        }
    }
}

impl<M: ScalarMinimizer> ExactLineSearch<M> {
    pub fn new(minimizer: M, tol: f64) -> Self {
        Self { minimizer, tol }
    }
}

impl<M: ScalarMinimizer> LineSearchPolicy for ExactLineSearch<M> {
    fn name(&self) -> &'static str {
        self.minimizer.name()
    }

    fn search(
        &mut self,
        ctx: &LineSearchContext,
        eval_cost: &mut dyn FnMut(f64) -> Option<f64>,
    ) -> Result<LineSearchResult> {
        require_descent(ctx)?;

        // normalized so that phi(0) = 0 and phi'(0) = -1; the argmin is unchanged
        let scale = -ctx.dphi0;
        let cost0 = ctx.cost0;
        let mut phi = |alpha: f64| match eval_cost(alpha) {
            Some(cost) => (cost - cost0) / scale,
            None => f64::INFINITY,
        };
        let min = self
            .minimizer
            .minimize(&mut phi, SearchStart::Point(0.0), self.tol)?;
        if !min.value.is_finite() || !min.alpha.is_finite() {
            return Err(OptimizeError::NonFiniteValue {
                what: "line-search minimum",
            });
        }
        Ok(LineSearchResult {
            alpha: min.alpha,
            value: cost0 + min.value * scale,
            evaluations: min.evaluations,
        })
    }
}
