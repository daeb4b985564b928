use crate::error::{OptimizeError, Result};
use crate::numerics::linalg::{add_outer, dot, mat_vec_into, norm2};
use crate::numerics::Matrix;

/// Davidon-Fletcher-Powell inverse-Hessian approximation.
///
/// `H` starts at the identity and is only ever changed by a rank-two update
/// that keeps it symmetric positive definite while `d . y > 0`.
#[derive(Clone, Debug, PartialEq)]
pub struct DfpUpdate {
    h: Matrix,
    /// Relative floor for the curvature denominators `d . y` and `y^T H y`.
    pub curvature_tol: f64,
}

impl DfpUpdate {
    pub fn new(n: usize) -> Self {
        Self {
            h: Matrix::identity(n),
            curvature_tol: 1e-12,
        }
    }

    pub fn inverse_hessian(&self) -> &Matrix {
        &self.h
    }

    /// Search direction `-H grad`.
    pub fn direction(&self, grad: &[f64]) -> Result<Vec<f64>> {
        let mut d = self.h.mul_vec(grad)?;
        for v in &mut d {
            *v = -*v;
        }
        Ok(d)
    }

    pub fn reset(&mut self) {
        self.h = Matrix::identity(self.h.dim());
    }

    /// Apply `H += alpha d d^T / (d . y) - (H y)(H y)^T / (y^T H y)`.
    ///
    /// `d` is the search direction, `alpha` the accepted step and
    /// `y = grad_new - grad_old`. Degenerate curvature leaves `H` untouched
    /// and returns `SingularOrDegenerateCurvature`.
    pub fn update(&mut self, d: &[f64], y: &[f64], alpha: f64) -> Result<()> {
        let n = self.h.dim();
        if d.len() != n {
            return Err(OptimizeError::dimension("dfp direction", n, d.len()));
        }
        if y.len() != n {
            return Err(OptimizeError::dimension("dfp gradient change", n, y.len()));
        }

        let dy = dot(d, y);
        if !(dy > self.curvature_tol * norm2(d) * norm2(y)) {
            return Err(OptimizeError::degenerate("dfp d.y", dy));
        }
        let mut hy = vec![0.0; n];
        mat_vec_into(self.h.as_slice(), n, y, &mut hy);
        let yhy = dot(y, &hy);
        if !(yhy > self.curvature_tol * dot(y, y)) {
            return Err(OptimizeError::degenerate("dfp y^T H y", yhy));
        }

        let mut next = self.h.clone();
        add_outer(next.as_mut_slice(), n, alpha / dy, d, d);
        add_outer(next.as_mut_slice(), n, -1.0 / yhy, &hy, &hy);
        next.symmetrize();
        if !next.as_slice().iter().all(|v| v.is_finite()) {
            return Err(OptimizeError::degenerate("dfp update", dy));
        }
        self.h = next;
        Ok(())
    }
}
