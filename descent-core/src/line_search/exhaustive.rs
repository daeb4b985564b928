use serde::{Deserialize, Serialize};

use crate::error::{OptimizeError, Result};

use super::{resolve_bracket, Budget, ScalarMinimizer, ScalarMinimum, SearchStart};

/// Exhaustive search on a uniform grid over the bracket.
///
/// The first grid point no worse than both neighbours becomes the centre of
/// the next, finer grid; refinement stops once a grid cell is below `tol`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Exhaustive {
    /// Grid cells per pass; at least 3 so each pass narrows the bracket.
    pub points: usize,
    pub initial_step: f64,
    pub max_evaluations: usize,
}

impl Default for Exhaustive {
    fn default() -> Self {
        Self {
            points: 20,
            initial_step: 1e-2,
            max_evaluations: 500,
        }
    }
}

impl ScalarMinimizer for Exhaustive {
    fn name(&self) -> &'static str {
        "exhaustive"
    }

    fn minimize(
        &mut self,
        phi: &mut dyn FnMut(f64) -> f64,
        start: SearchStart,
        tol: f64,
    ) -> Result<ScalarMinimum> {
        if self.points < 3 {
            return Err(OptimizeError::InvalidConfig(format!(
                "exhaustive search needs at least 3 grid cells, got {}",
                self.points
            )));
        }
        let mut budget = Budget::new(phi, self.name(), self.max_evaluations);
        let (mut a, mut b) = resolve_bracket(&mut budget, start, self.initial_step)?;

        loop {
            let h = (b - a) / self.points as f64;
            let mut x2 = a + h;
            let (mut f1, mut f2) = (budget.eval(a)?, budget.eval(x2)?);
            let mut best = if f2 < f1 { (x2, f2) } else { (a, f1) };
            let mut centre = None;
            for i in 2..=self.points {
                let x3 = a + h * i as f64;
                let f3 = budget.eval(x3)?;
                if f3 < best.1 {
                    best = (x3, f3);
                }
                if f2 <= f1 && f2 <= f3 {
                    centre = Some((x2, f2));
                    break;
                }
                f1 = f2;
                (x2, f2) = (x3, f3);
            }

            // no interior dip: keep the best grid point
            let (alpha, value) = centre.unwrap_or(best);
            if h <= tol {
                return Ok(ScalarMinimum {
                    alpha,
                    value,
                    evaluations: budget.used(),
                });
            }
            a = (alpha - h).max(a);
            b = (alpha + h).min(b);
        }
    }
}
