use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::{resolve_bracket, Budget, ScalarMinimizer, ScalarMinimum, SearchStart};

/// Fibonacci search: a fixed number of bracket reductions with Fibonacci ratios.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fibonacci {
    /// Number of Fibonacci stages; derived from the tolerance when `None`.
    pub intervals: Option<usize>,
    pub initial_step: f64,
    pub max_evaluations: usize,
}

impl Default for Fibonacci {
    fn default() -> Self {
        Self {
            intervals: None,
            initial_step: 1e-2,
            max_evaluations: 500,
        }
    }
}

/// F[0] = F[1] = 1, extended until F[n] is available and F[n] >= target.
fn fibonacci_table(min_len: usize, target: f64) -> Vec<f64> {
    let mut fib = vec![1.0, 1.0];
    while fib.len() <= min_len || fib[fib.len() - 1] < target {
        let next = fib[fib.len() - 1] + fib[fib.len() - 2];
        fib.push(next);
    }
    fib
}

impl ScalarMinimizer for Fibonacci {
    fn name(&self) -> &'static str {
        "fibonacci"
    }

    fn minimize(
        &mut self,
        phi: &mut dyn FnMut(f64) -> f64,
        start: SearchStart,
        tol: f64,
    ) -> Result<ScalarMinimum> {
        let mut budget = Budget::new(phi, self.name(), self.max_evaluations);
        let (mut a, mut b) = resolve_bracket(&mut budget, start, self.initial_step)?;

        // Final bracket length is 2 (b - a) / F[n].
        let fib = match self.intervals {
            Some(n) => fibonacci_table(n.max(3), 0.0),
            None => fibonacci_table(3, 2.0 * (b - a) / tol.max(f64::EPSILON)),
        };
        let n = fib.len() - 1;

        let mut x1 = a + fib[n - 2] / fib[n] * (b - a);
        let mut x2 = a + fib[n - 1] / fib[n] * (b - a);
        let mut f1 = budget.eval(x1)?;
        let mut f2 = budget.eval(x2)?;

        for m in (3..=n).rev() {
            if f1 > f2 {
                a = x1;
                if m > 3 {
                    x1 = x2;
                    f1 = f2;
                    x2 = a + fib[m - 2] / fib[m - 1] * (b - a);
                    f2 = budget.eval(x2)?;
                }
            } else {
                b = x2;
                if m > 3 {
                    x2 = x1;
                    f2 = f1;
                    x1 = a + fib[m - 3] / fib[m - 1] * (b - a);
                    f1 = budget.eval(x1)?;
                }
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
    fn converges_from_a_point() {
        let mut phi = |a: f64| (a - 1.5).powi(2) + 0.25;
        let min = Fibonacci::default()
            .minimize(&mut phi, SearchStart::Point(0.0), 1e-5)
            .unwrap();
        assert!((min.alpha - 1.5).abs() < 1e-5, "alpha = {}", min.alpha);
        assert!((min.value - 0.25).abs() < 1e-9);
    }
}
