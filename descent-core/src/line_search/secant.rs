use serde::{Deserialize, Serialize};

use crate::error::{OptimizeError, Result};

use super::{Budget, ScalarMinimizer, ScalarMinimum, SearchStart, StationaryPoint};

/// Relative bracket width below which the search stops refining.
const COLLAPSED: f64 = 1e-8;

/// Secant search on the derivative: bracket a sign change of `phi'`, then
/// take false-position steps (Illinois variant) until `|phi'| <= tol`.
///
/// With an analytic derivative use [`Secant::minimize_with_derivative`]; as a
/// [`ScalarMinimizer`] the slope is a central difference whose width follows
/// the bracket.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Secant {
    /// First step of the slope bracketing when started from a point.
    pub initial_step: f64,
    /// Difference width relative to the bracket.
    pub h: f64,
    pub max_evaluations: usize,
}

impl Default for Secant {
    fn default() -> Self {
        Self {
            initial_step: 1e-2,
            h: 1e-2,
            max_evaluations: 300,
        }
    }
}

impl Secant {
    /// Find a zero of `dphi` where it crosses from negative to positive.
    pub fn minimize_with_derivative(
        &mut self,
        dphi: &mut dyn FnMut(f64) -> f64,
        start: SearchStart,
        tol: f64,
    ) -> Result<StationaryPoint> {
        let mut budget = Budget::new(dphi, self.name(), self.max_evaluations);
        let (alpha, slope) = false_position(
            &mut |a: f64, _: f64| {
                let s = budget.eval(a)?;
                if s.is_finite() {
                    Ok(s)
                } else {
                    Err(OptimizeError::NonFiniteValue { what: "derivative" })
                }
            },
            start,
            self.initial_step,
            tol,
        )?;
        Ok(StationaryPoint {
            alpha,
            slope,
            evaluations: budget.used(),
        })
    }
}

impl ScalarMinimizer for Secant {
    fn name(&self) -> &'static str {
        "secant"
    }

    fn minimize(
        &mut self,
        phi: &mut dyn FnMut(f64) -> f64,
        start: SearchStart,
        tol: f64,
    ) -> Result<ScalarMinimum> {
        let h = self.h;
        let mut budget = Budget::new(phi, self.name(), self.max_evaluations);
        let (alpha, _) = false_position(
            &mut |a: f64, width: f64| {
                let w = h * width;
                let f_plus = budget.eval(a + w)?;
                let f_minus = budget.eval(a - w)?;
                if !(f_plus.is_finite() && f_minus.is_finite()) {
                    return Err(OptimizeError::NonFiniteValue {
                        what: "line-search trial point",
                    });
                }
                Ok((f_plus - f_minus) / (2.0 * w))
            },
            start,
            self.initial_step,
            tol,
        )?;
        let value = budget.eval(alpha)?;
        Ok(ScalarMinimum {
            alpha,
            value,
            evaluations: budget.used(),
        })
    }
}

/// `slope(a, width)` evaluates `phi'(a)`; `width` is the current scale of the
/// search, for callers that difference `phi`.
fn false_position(
    slope: &mut dyn FnMut(f64, f64) -> Result<f64>,
    start: SearchStart,
    step: f64,
    tol: f64,
) -> Result<(f64, f64)> {
    if !(step > 0.0) || !step.is_finite() {
        return Err(OptimizeError::InvalidConfig(format!(
            "secant step must be positive, got {step}"
        )));
    }

    let (mut lo, mut hi, mut s_lo, mut s_hi) = match start {
        SearchStart::Bracket(a, b) => {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let width = hi - lo;
            (lo, hi, slope(lo, width)?, slope(hi, width)?)
        }
        SearchStart::Point(a) => {
            let s0 = slope(a, step)?;
            if s0.abs() <= tol {
                return Ok((a, s0));
            }
            // walk downhill, doubling the step, until the slope changes sign
            let dir = if s0 < 0.0 { 1.0 } else { -1.0 };
            let (mut near, mut s_near, mut k) = (a, s0, step);
            let (far, s_far) = loop {
                let far = near + dir * k;
                let s_far = slope(far, k)?;
                if dir * s_far >= 0.0 {
                    break (far, s_far);
                }
                near = far;
                s_near = s_far;
                k *= 2.0;
            };
            if dir > 0.0 {
                (near, far, s_near, s_far)
            } else {
                (far, near, s_far, s_near)
            }
        }
    };

    // a given bracket may not straddle the stationary point
    if s_lo >= 0.0 {
        return Ok((lo, s_lo));
    }
    if s_hi <= 0.0 {
        return Ok((hi, s_hi));
    }

    let mut last_side = 0;
    loop {
        let x = lo - s_lo * (hi - lo) / (s_hi - s_lo);
        if hi - lo <= COLLAPSED * (1.0 + x.abs()) {
            let s = slope(x, hi - lo)?;
            return Ok((x, s));
        }
        let s = slope(x, hi - lo)?;
        if s.abs() <= tol {
            return Ok((x, s));
        }
        if s < 0.0 {
            lo = x;
            s_lo = s;
            if last_side < 0 {
                s_hi *= 0.5;
            }
            last_side = -1;
        } else {
            hi = x;
            s_hi = s;
            if last_side > 0 {
                s_lo *= 0.5;
            }
            last_side = 1;
        }
    }
}
