use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::{resolve_bracket, Budget, ScalarMinimizer, ScalarMinimum, SearchStart};

/// Interval halving: evaluate the quarter points of the bracket and keep the
/// half centred on the best of the three interior points.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntervalHalving {
    pub initial_step: f64,
    pub max_evaluations: usize,
}

impl Default for IntervalHalving {
    fn default() -> Self {
        Self {
            initial_step: 1e-2,
            max_evaluations: 500,
        }
    }
}

impl ScalarMinimizer for IntervalHalving {
    fn name(&self) -> &'static str {
        "interval_halving"
    }

    fn minimize(
        &mut self,
        phi: &mut dyn FnMut(f64) -> f64,
        start: SearchStart,
        tol: f64,
    ) -> Result<ScalarMinimum> {
        let mut budget = Budget::new(phi, self.name(), self.max_evaluations);
        let (mut a, mut b) = resolve_bracket(&mut budget, start, self.initial_step)?;

        let mut m = 0.5 * (a + b);
        let mut f_m = budget.eval(m)?;
        while b - a > tol {
            let quarter = 0.25 * (b - a);
            let x1 = a + quarter;
            let x2 = b - quarter;
            let f1 = budget.eval(x1)?;
            if f1 < f_m {
                b = m;
                m = x1;
                f_m = f1;
                continue;
            }
            let f2 = budget.eval(x2)?;
            if f2 < f_m {
                a = m;
                m = x2;
                f_m = f2;
            } else {
                a = x1;
                b = x2;
            }
        }

        Ok(ScalarMinimum {
            alpha: m,
            value: f_m,
            evaluations: budget.used(),
        })
    }
}
