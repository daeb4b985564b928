use serde::{Deserialize, Serialize};

use crate::error::{OptimizeError, Result};

use super::{resolve_bracket, Budget, ScalarMinimizer, ScalarMinimum, SearchStart};

/// Dichotomous search: compare a pair of points straddling the midpoint and
/// keep the half (plus the gap) that holds the smaller value.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dichotomous {
    /// Gap between the paired points as a fraction of the tolerance, in `(0, 1)`.
    pub separation: f64,
    pub initial_step: f64,
    pub max_evaluations: usize,
}

impl Default for Dichotomous {
    fn default() -> Self {
        Self {
            separation: 0.25,
            initial_step: 1e-2,
            max_evaluations: 500,
        }
    }
}

impl ScalarMinimizer for Dichotomous {
    fn name(&self) -> &'static str {
        "dichotomous"
    }

    fn minimize(
        &mut self,
        phi: &mut dyn FnMut(f64) -> f64,
        start: SearchStart,
        tol: f64,
    ) -> Result<ScalarMinimum> {
        // the bracket cannot shrink below the pair gap
        if !(self.separation > 0.0 && self.separation < 1.0) {
            return Err(OptimizeError::InvalidConfig(format!(
                "dichotomous separation must lie in (0, 1), got {}",
                self.separation
            )));
        }
        let gap = self.separation * tol;
        let mut budget = Budget::new(phi, self.name(), self.max_evaluations);
        let (mut a, mut b) = resolve_bracket(&mut budget, start, self.initial_step)?;

        while b - a > tol {
            let m = 0.5 * (a + b);
            let left = m - 0.5 * gap;
            let right = m + 0.5 * gap;
            if budget.eval(left)? < budget.eval(right)? {
                b = right;
            } else {
                a = left;
            }
        }

        let alpha = 0.5 * (a + b);
        let value = budget.eval(alpha)?;
        Ok(ScalarMinimum {
            alpha,
            value,
            evaluations: budget.used(),
        })
    }
}
