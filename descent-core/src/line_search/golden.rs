use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::{resolve_bracket, Budget, ScalarMinimizer, ScalarMinimum, SearchStart};

const INV_GOLDEN: f64 = 0.618_033_988_749_894_9;

/// Golden-section bracket reduction.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoldenSection {
    /// First step of the bracket expansion when started from a point.
    pub initial_step: f64,
    pub max_evaluations: usize,
}

impl Default for GoldenSection {
    fn default() -> Self {
        Self {
            initial_step: 1e-2,
            max_evaluations: 500,
        }
    }
}

impl ScalarMinimizer for GoldenSection {
    fn name(&self) -> &'static str {
        "golden_section"
    }

    fn minimize(
        &mut self,
        phi: &mut dyn FnMut(f64) -> f64,
        start: SearchStart,
        tol: f64,
    ) -> Result<ScalarMinimum> {
        let mut budget = Budget::new(phi, self.name(), self.max_evaluations);
        let (mut a, mut b) = resolve_bracket(&mut budget, start, self.initial_step)?;

        let mut x1 = b - INV_GOLDEN * (b - a);
        let mut x2 = a + INV_GOLDEN * (b - a);
        let mut f1 = budget.eval(x1)?;
        let mut f2 = budget.eval(x2)?;

        while b - a > tol {
            if f2 > f1 {
                b = x2;
                x2 = x1;
                f2 = f1;
                x1 = b - INV_GOLDEN * (b - a);
                f1 = budget.eval(x1)?;
            } else {
                a = x1;
                x1 = x2;
                f1 = f2;
                x2 = a + INV_GOLDEN * (b - a);
                f2 = budget.eval(x2)?;
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shrinks_bracket_below_tolerance() {
        let mut phi = |a: f64| (a - 2.0).powi(2);
        let min = GoldenSection::default()
            .minimize(&mut phi, SearchStart::Bracket(0.0, 5.0), 1e-6)
            .unwrap();
        assert!((min.alpha - 2.0).abs() < 1e-6);
    }
}
