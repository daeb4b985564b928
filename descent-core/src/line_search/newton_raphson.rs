use serde::{Deserialize, Serialize};

use crate::error::{OptimizeError, Result};

use super::StationaryPoint;

/// Newton–Raphson on analytic derivatives: `a <- a - phi'(a) / phi''(a)`
/// until `|phi'(a)| <= tol`.
///
/// For a value-only `phi` use [`super::ParabolicNewton`], which runs the same
/// iteration on difference quotients inside a bracket.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewtonRaphson {
    pub max_iterations: usize,
}

impl Default for NewtonRaphson {
    fn default() -> Self {
        Self { max_iterations: 100 }
    }
}

impl NewtonRaphson {
    pub fn minimize_with_derivatives(
        &mut self,
        dphi: &mut dyn FnMut(f64) -> f64,
        d2phi: &mut dyn FnMut(f64) -> f64,
        x0: f64,
        tol: f64,
    ) -> Result<StationaryPoint> {
        let mut a = x0;
        for evaluations in 1..=self.max_iterations {
            let slope = dphi(a);
            if !slope.is_finite() {
                return Err(OptimizeError::NonFiniteValue { what: "derivative" });
            }
            if slope.abs() <= tol {
                return Ok(StationaryPoint {
                    alpha: a,
                    slope,
                    evaluations,
                });
            }
            let curvature = d2phi(a);
            // a non-positive second derivative would head for a maximizer
            if !(curvature > 0.0 && curvature.is_finite()) {
                return Err(OptimizeError::degenerate("newton-raphson curvature", curvature));
            }
            a -= slope / curvature;
        }
        Err(OptimizeError::LineSearchExhausted {
            method: "newton_raphson",
            evaluations: self.max_iterations,
        })
    }
}
