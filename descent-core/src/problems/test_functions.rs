//! Standard objectives with analytic derivatives.

use crate::error::{OptimizeError, Result};
use crate::numerics::linalg::{dot, mat_vec_into, quadratic_form};
use crate::numerics::Matrix;

use super::objective::{Objective, TwiceDifferentiable};

/// f(x) = x^T A x - b^T x.
///
/// With `A` symmetric positive definite the unique minimizer solves `2 A x = b`.
#[derive(Clone, Debug)]
pub struct Quadratic {
    pub a: Matrix,
    pub b: Vec<f64>,
}

impl Quadratic {
    /// Pure quadratic form, minimizer at the origin for SPD `a`.
    pub fn new(a: Matrix) -> Self {
        let n = a.dim();
        Self { a, b: vec![0.0; n] }
    }

    /// Quadratic with a linear term; `b` must have `a.dim()` entries.
    pub fn with_linear(a: Matrix, b: Vec<f64>) -> Result<Self> {
        if b.len() != a.dim() {
            return Err(OptimizeError::dimension("quadratic linear term", a.dim(), b.len()));
        }
        Ok(Self { a, b })
    }
}

impl Objective for Quadratic {
    fn value(&self, x: &[f64]) -> f64 {
        quadratic_form(self.a.as_slice(), self.a.dim(), x) - dot(&self.b, x)
    }

    fn gradient(&self, x: &[f64], grad: &mut [f64]) {
        // (A + A^T) x - b
        let n = self.a.dim();
        let mut at_x = vec![0.0; n];
        mat_vec_into(self.a.as_slice(), n, x, grad);
        mat_vec_into(self.a.transpose().as_slice(), n, x, &mut at_x);
        for i in 0..n {
            grad[i] += at_x[i] - self.b[i];
        }
    }

    fn dim(&self) -> Option<usize> {
        Some(self.a.dim())
    }
}

impl TwiceDifferentiable for Quadratic {
    fn hessian(&self, _x: &[f64], hess: &mut [f64]) {
        let n = self.a.dim();
        for i in 0..n {
            for j in 0..n {
                hess[i * n + j] = self.a[(i, j)] + self.a[(j, i)];
            }
        }
    }
}

/// f(x) = sum x_i^2
#[derive(Clone, Copy, Debug, Default)]
pub struct Sphere;

impl Objective for Sphere {
    fn value(&self, x: &[f64]) -> f64 {
        dot(x, x)
    }

    fn gradient(&self, x: &[f64], grad: &mut [f64]) {
        for (g, xi) in grad.iter_mut().zip(x) {
            *g = 2.0 * xi;
        }
    }
}

impl TwiceDifferentiable for Sphere {
    fn hessian(&self, x: &[f64], hess: &mut [f64]) {
        let n = x.len();
        hess.fill(0.0);
        for i in 0..n {
            hess[i * n + i] = 2.0;
        }
    }
}

/// 2D Rosenbrock function.
/// f(x, y) = (a - x)^2 + b (y - x^2)^2, minimizer (a, a^2).
#[derive(Clone, Copy, Debug)]
pub struct Rosenbrock {
    pub a: f64,
    pub b: f64,
}

impl Default for Rosenbrock {
    fn default() -> Self {
        Self { a: 1.0, b: 100.0 }
    }
}

impl Objective for Rosenbrock {
    fn value(&self, x: &[f64]) -> f64 {
        let (x0, x1) = (x[0], x[1]);
        (self.a - x0).powi(2) + self.b * (x1 - x0 * x0).powi(2)
    }

    fn gradient(&self, x: &[f64], grad: &mut [f64]) {
        let (x0, x1) = (x[0], x[1]);
        // df/dx = -2(a - x) - 4bx(y - x^2)
        grad[0] = -2.0 * (self.a - x0) - 4.0 * self.b * x0 * (x1 - x0 * x0);
        // df/dy = 2b(y - x^2)
        grad[1] = 2.0 * self.b * (x1 - x0 * x0);
    }

    fn dim(&self) -> Option<usize> {
        Some(2)
    }
}

impl TwiceDifferentiable for Rosenbrock {
    fn hessian(&self, x: &[f64], hess: &mut [f64]) {
        let (x0, x1) = (x[0], x[1]);
        hess[0] = 2.0 - 4.0 * self.b * x1 + 12.0 * self.b * x0 * x0;
        hess[1] = -4.0 * self.b * x0;
        hess[2] = hess[1];
        hess[3] = 2.0 * self.b;
    }
}
