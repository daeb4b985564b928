//! Central finite-difference derivatives for value-only objectives.

use super::objective::{Objective, TwiceDifferentiable};

/// Wraps `f: R^n -> R` and estimates its gradient and Hessian by central differences.
///
/// Steps are scaled per coordinate by `max(1, |x_i|)`.
#[derive(Clone, Copy, Debug)]
pub struct FiniteDifference<F> {
    pub f: F,
    /// Relative step for the gradient.
    pub grad_step: f64,
    /// Relative step for the Hessian.
    pub hess_step: f64,
}

impl<F> FiniteDifference<F>
where
    F: Fn(&[f64]) -> f64,
{
    pub fn new(f: F) -> Self {
        Self {
            f,
            grad_step: 1e-5,
            hess_step: 1e-4,
        }
    }

    fn step(base: f64, xi: f64) -> f64 {
        base * xi.abs().max(1.0)
    }
}

impl<F> Objective for FiniteDifference<F>
where
    F: Fn(&[f64]) -> f64,
{
    fn value(&self, x: &[f64]) -> f64 {
        (self.f)(x)
    }

    fn gradient(&self, x: &[f64], grad: &mut [f64]) {
        let mut shifted = x.to_vec();
        for i in 0..x.len() {
            let h = Self::step(self.grad_step, x[i]);
            shifted[i] = x[i] + h;
            let f_plus = (self.f)(&shifted);
            shifted[i] = x[i] - h;
            let f_minus = (self.f)(&shifted);
            shifted[i] = x[i];
            grad[i] = (f_plus - f_minus) / (2.0 * h);
        }
    }
}

impl<F> TwiceDifferentiable for FiniteDifference<F>
where
    F: Fn(&[f64]) -> f64,
{
    fn hessian(&self, x: &[f64], hess: &mut [f64]) {
        let n = x.len();
        let f0 = (self.f)(x);
        let mut shifted = x.to_vec();

        for i in 0..n {
            let hi = Self::step(self.hess_step, x[i]);

            shifted[i] = x[i] + hi;
            let f_plus = (self.f)(&shifted);
            shifted[i] = x[i] - hi;
            let f_minus = (self.f)(&shifted);
            shifted[i] = x[i];
            hess[i * n + i] = (f_plus - 2.0 * f0 + f_minus) / (hi * hi);

            for j in (i + 1)..n {
                let hj = Self::step(self.hess_step, x[j]);
                let mut corner = |si: f64, sj: f64| {
                    shifted[i] = x[i] + si * hi;
                    shifted[j] = x[j] + sj * hj;
                    let v = (self.f)(&shifted);
                    shifted[i] = x[i];
                    shifted[j] = x[j];
                    v
                };
                let fpp = corner(1.0, 1.0);
                let fpm = corner(1.0, -1.0);
                let fmp = corner(-1.0, 1.0);
                let fmm = corner(-1.0, -1.0);
                let hij = (fpp - fpm - fmp + fmm) / (4.0 * hi * hj);
                hess[i * n + j] = hij;
                hess[j * n + i] = hij;
            }
        }
    }
}
