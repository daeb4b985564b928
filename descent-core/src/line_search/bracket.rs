use crate::error::{OptimizeError, Result};

use super::Budget;

/// Accelerated step search: walk downhill from `x0` doubling the step each time
/// until `phi` stops decreasing, and return the bracket around the last descent.
pub fn expand_bracket(
    phi: &mut dyn FnMut(f64) -> f64,
    x0: f64,
    step: f64,
    max_evaluations: usize,
) -> Result<(f64, f64)> {
    let mut budget = Budget::new(phi, "bracket", max_evaluations);
    expand_with_budget(&mut budget, x0, step)
}

pub(crate) fn expand_with_budget(budget: &mut Budget<'_>, x0: f64, step: f64) -> Result<(f64, f64)> {
    if !(step > 0.0) || !step.is_finite() {
        return Err(OptimizeError::InvalidConfig(format!(
            "bracket step must be positive, got {step}"
        )));
    }

    let f0 = budget.eval(x0)?;
    if !f0.is_finite() {
        return Err(OptimizeError::NonFiniteValue {
            what: "line-search value at the start point",
        });
    }

    let f_fwd = budget.eval(x0 + step)?;
    let sign = if f_fwd < f0 {
        1.0
    } else {
        let f_back = budget.eval(x0 - step)?;
        if f_back < f0 {
            -1.0
        } else {
            // x0 already beats both neighbours.
            return Ok((x0 - step, x0 + step));
        }
    };

    let mut prev = x0;
    let mut cur = x0 + sign * step;
    let mut f_cur = if sign > 0.0 { f_fwd } else { budget.eval(cur)? };
    let mut k = step;
    loop {
        k *= 2.0;
        let next = cur + sign * k;
        let f_next = budget.eval(next)?;
        if !(f_next < f_cur) {
            let (lo, hi) = if prev < next { (prev, next) } else { (next, prev) };
            return Ok((lo, hi));
        }
        prev = cur;
        cur = next;
        f_cur = f_next;
    }
}
