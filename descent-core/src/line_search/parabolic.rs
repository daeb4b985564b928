use serde::{Deserialize, Serialize};

use crate::error::{OptimizeError, Result};

use super::{resolve_bracket, Budget, ScalarMinimizer, ScalarMinimum, SearchStart};

/// Newton's method on `phi` with central finite-difference derivatives,
/// safeguarded by a bracket.
///
/// A point start is first expanded into a bracket. Each iteration samples
/// `phi(a - w)`, `phi(a)`, `phi(a + w)` with `w = h * (hi - lo)`, shrinks the
/// bracket on the uphill side, and jumps to the vertex of the interpolating
/// parabola when that vertex is a minimizer inside the bracket; otherwise it
/// bisects. Stops once `|phi'(a)| <= tol` or the bracket has collapsed.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParabolicNewton {
    /// Sampling half-width relative to the bracket; also the first expansion step.
    pub h: f64,
    pub max_evaluations: usize,
}

impl Default for ParabolicNewton {
    fn default() -> Self {
        Self {
            h: 1e-2,
            max_evaluations: 300,
        }
    }
}

/// Relative bracket width below which the search stops refining.
const COLLAPSED: f64 = 1e-8;

impl ScalarMinimizer for ParabolicNewton {
    fn name(&self) -> &'static str {
        "parabolic_newton"
    }

    fn minimize(
        &mut self,
        phi: &mut dyn FnMut(f64) -> f64,
        start: SearchStart,
        tol: f64,
    ) -> Result<ScalarMinimum> {
        let mut budget = Budget::new(phi, self.name(), self.max_evaluations);
        let (mut lo, mut hi) = resolve_bracket(&mut budget, start, self.h)?;
        let mut a = 0.5 * (lo + hi);

        loop {
            if hi - lo <= COLLAPSED * (1.0 + a.abs()) {
                let value = budget.eval(a)?;
                return Ok(ScalarMinimum {
                    alpha: a,
                    value,
                    evaluations: budget.used(),
                });
            }

            let w = self.h * (hi - lo);
            let f0 = budget.eval(a)?;
            let f_minus = budget.eval(a - w)?;
            let f_plus = budget.eval(a + w)?;
            if !(f0.is_finite() && f_minus.is_finite() && f_plus.is_finite()) {
                return Err(OptimizeError::NonFiniteValue {
                    what: "line-search trial point",
                });
            }

            let slope = (f_plus - f_minus) / (2.0 * w);
            if slope.abs() <= tol {
                return Ok(ScalarMinimum {
                    alpha: a,
                    value: f0,
                    evaluations: budget.used(),
                });
            }
            if slope > 0.0 {
                hi = a;
            } else {
                lo = a;
            }

            let curvature = (f_plus - 2.0 * f0 + f_minus) / (w * w);
            let vertex = a - slope / curvature;
            a = if curvature > 0.0 && vertex > lo && vertex < hi {
                vertex
            } else {
                0.5 * (lo + hi)
            };
        }
    }
}
