//! Dense linear-algebra provider: PA = LU, Gauss-Jordan inversion, Cholesky,
//! leading-minor positive-definiteness test and Jacobi eigenvalues.

use crate::error::{OptimizeError, Result};

use super::matrix::Matrix;

/// Linear-algebra capability consumed by the second-order solvers.
///
/// Solvers take an implementation by value so tests can substitute their own.
pub trait LinearSolver {
    /// Solve `A x = b`.
    fn solve(&self, a: &Matrix, b: &[f64]) -> Result<Vec<f64>>;

    /// Explicit inverse of `A`.
    fn invert(&self, a: &Matrix) -> Result<Matrix>;

    /// Solve `A x = b` for symmetric positive definite `A` via `A = L L^T`.
    fn cholesky_solve(&self, a: &Matrix, b: &[f64]) -> Result<Vec<f64>>;

    /// Factor `P A = L U`.
    fn lu_factorize(&self, a: &Matrix) -> Result<LuFactors>;
}

/// Factors of `P A = L U`; `L` has a unit diagonal.
#[derive(Clone, Debug)]
pub struct LuFactors {
    pub p: Matrix,
    pub l: Matrix,
    pub u: Matrix,
    /// Row `i` of `P A` is row `perm[i]` of `A`.
    pub perm: Vec<usize>,
}

impl LuFactors {
    /// Forward/back substitution against the stored factors.
    pub fn solve(&self, b: &[f64]) -> Result<Vec<f64>> {
        let n = self.l.dim();
        if b.len() != n {
            return Err(OptimizeError::dimension("lu solve rhs", n, b.len()));
        }
        let mut y = vec![0.0; n];
        for i in 0..n {
            let mut s = b[self.perm[i]];
            for j in 0..i {
                s -= self.l[(i, j)] * y[j];
            }
            y[i] = s;
        }
        back_substitute(&self.u, &y)
    }
}

/// Default row-major implementation of [`LinearSolver`].
#[derive(Clone, Copy, Debug)]
pub struct DenseLinalg {
    /// Pivots at or below `pivot_tol * max|a_ij|` count as singular.
    pub pivot_tol: f64,
    /// Relative tolerance for the symmetry check before Cholesky.
    pub symmetry_tol: f64,
}

impl Default for DenseLinalg {
    fn default() -> Self {
        Self {
            pivot_tol: 1e-12,
            symmetry_tol: 1e-10,
        }
    }
}

impl DenseLinalg {
    pub fn new() -> Self {
        Self::default()
    }

    fn pivot_floor(&self, a: &Matrix) -> f64 {
        self.pivot_tol * max_abs(a).max(f64::MIN_POSITIVE)
    }

    /// Lower-triangular `L` with `A = L L^T`.
    ///
    /// Fails with `NotSymmetric` or `NotPositiveDefinite` instead of
    /// returning a partial factor.
    pub fn cholesky(&self, a: &Matrix) -> Result<Matrix> {
        a.check_symmetric(self.symmetry_tol)?;
        check_leading_minors(a)?;

        let n = a.dim();
        let mut l = Matrix::zeros(n);
        for i in 0..n {
            let mut diag = a[(i, i)];
            for k in 0..i {
                diag -= l[(i, k)] * l[(i, k)];
            }
            if !(diag > 0.0) {
                return Err(OptimizeError::NotPositiveDefinite {
                    order: i + 1,
                    minor: diag,
                });
            }
            let lii = diag.sqrt();
            l[(i, i)] = lii;
            for j in (i + 1)..n {
                let mut s = a[(i, j)];
                for k in 0..i {
                    s -= l[(i, k)] * l[(j, k)];
                }
                l[(j, i)] = s / lii;
            }
        }
        Ok(l)
    }
}

impl LinearSolver for DenseLinalg {
    fn solve(&self, a: &Matrix, b: &[f64]) -> Result<Vec<f64>> {
        if b.len() != a.dim() {
            return Err(OptimizeError::dimension("linear solve rhs", a.dim(), b.len()));
        }
        self.lu_factorize(a)?.solve(b)
    }

    fn invert(&self, a: &Matrix) -> Result<Matrix> {
        let n = a.dim();
        let floor = self.pivot_floor(a);
        let mut work = a.clone();
        let mut inv = Matrix::identity(n);

        for col in 0..n {
            let (piv, max_abs) = pivot_row(&work, col);
            if !(max_abs > floor) {
                return Err(OptimizeError::degenerate("gauss-jordan pivot", max_abs));
            }
            swap_rows(&mut work, col, piv);
            swap_rows(&mut inv, col, piv);

            let p = work[(col, col)];
            for k in 0..n {
                work[(col, k)] /= p;
                inv[(col, k)] /= p;
            }
            for row in 0..n {
                if row == col {
                    continue;
                }
                let f = work[(row, col)];
                if f == 0.0 {
                    continue;
                }
                for k in 0..n {
                    work[(row, k)] -= f * work[(col, k)];
                    inv[(row, k)] -= f * inv[(col, k)];
                }
            }
        }
        Ok(inv)
    }

    fn cholesky_solve(&self, a: &Matrix, b: &[f64]) -> Result<Vec<f64>> {
        let n = a.dim();
        if b.len() != n {
            return Err(OptimizeError::dimension("cholesky solve rhs", n, b.len()));
        }
        let l = self.cholesky(a)?;

        // L y = b
        let mut y = vec![0.0; n];
        for i in 0..n {
            let mut s = b[i];
            for j in 0..i {
                s -= l[(i, j)] * y[j];
            }
            y[i] = s / l[(i, i)];
        }
        // L^T x = y
        let mut x = vec![0.0; n];
        for i in (0..n).rev() {
            let mut s = y[i];
            for j in (i + 1)..n {
                s -= l[(j, i)] * x[j];
            }
            x[i] = s / l[(i, i)];
        }
        Ok(x)
    }

    fn lu_factorize(&self, a: &Matrix) -> Result<LuFactors> {
        let n = a.dim();
        let floor = self.pivot_floor(a);
        let mut u = a.clone();
        let mut l = Matrix::identity(n);
        let mut perm: Vec<usize> = (0..n).collect();

        for col in 0..n {
            let (piv, max_abs) = pivot_row(&u, col);
            if !(max_abs > floor) {
                return Err(OptimizeError::degenerate("lu pivot", max_abs));
            }
            if piv != col {
                swap_rows(&mut u, col, piv);
                perm.swap(col, piv);
                for k in 0..col {
                    let tmp = l[(col, k)];
                    l[(col, k)] = l[(piv, k)];
                    l[(piv, k)] = tmp;
                }
            }

            let diag = u[(col, col)];
            for row in (col + 1)..n {
                let f = u[(row, col)] / diag;
                l[(row, col)] = f;
                u[(row, col)] = 0.0;
                for k in (col + 1)..n {
                    u[(row, k)] -= f * u[(col, k)];
                }
            }
        }

        let mut p = Matrix::zeros(n);
        for (i, &src) in perm.iter().enumerate() {
            p[(i, src)] = 1.0;
        }
        Ok(LuFactors { p, l, u, perm })
    }
}

/// Determinant by elimination with partial pivoting; exactly singular input gives 0.
pub fn determinant(a: &Matrix) -> f64 {
    let n = a.dim();
    let mut u = a.clone();
    let mut det = 1.0;
    for col in 0..n {
        let (piv, max_abs) = pivot_row(&u, col);
        if max_abs == 0.0 {
            return 0.0;
        }
        if piv != col {
            swap_rows(&mut u, col, piv);
            det = -det;
        }
        let diag = u[(col, col)];
        det *= diag;
        for row in (col + 1)..n {
            let f = u[(row, col)] / diag;
            for k in col..n {
                u[(row, k)] -= f * u[(col, k)];
            }
        }
    }
    det
}

/// Leading-principal-minor test: every leading determinant must be strictly positive.
pub fn check_leading_minors(a: &Matrix) -> Result<()> {
    for order in 1..=a.dim() {
        let minor = determinant(&a.leading_block(order));
        if !(minor > 0.0) {
            return Err(OptimizeError::NotPositiveDefinite { order, minor });
        }
    }
    Ok(())
}

pub fn is_positive_definite(a: &Matrix) -> bool {
    check_leading_minors(a).is_ok()
}

/// Eigenvalues of a symmetric matrix in ascending order (cyclic Jacobi sweeps).
pub fn symmetric_eigenvalues(a: &Matrix) -> Result<Vec<f64>> {
    const MAX_SWEEPS: usize = 100;

    a.check_symmetric(1e-8)?;
    let n = a.dim();
    let mut m = a.clone();
    m.symmetrize();
    let scale = max_abs(&m);

    for _ in 0..MAX_SWEEPS {
        let mut off = 0.0;
        for p in 0..n {
            for q in (p + 1)..n {
                off += m[(p, q)] * m[(p, q)];
            }
        }
        if off.sqrt() <= 1e-14 * scale.max(f64::MIN_POSITIVE) {
            break;
        }

        for p in 0..n {
            for q in (p + 1)..n {
                let apq = m[(p, q)];
                if apq == 0.0 {
                    continue;
                }
                let theta = (m[(q, q)] - m[(p, p)]) / (2.0 * apq);
                let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;

                for k in 0..n {
                    let akp = m[(k, p)];
                    let akq = m[(k, q)];
                    m[(k, p)] = c * akp - s * akq;
                    m[(k, q)] = s * akp + c * akq;
                }
                for k in 0..n {
                    let apk = m[(p, k)];
                    let aqk = m[(q, k)];
                    m[(p, k)] = c * apk - s * aqk;
                    m[(q, k)] = s * apk + c * aqk;
                }
            }
        }
    }

    let mut eig: Vec<f64> = (0..n).map(|i| m[(i, i)]).collect();
    if eig.iter().any(|v| !v.is_finite()) {
        return Err(OptimizeError::NonFiniteValue { what: "eigenvalue" });
    }
    eig.sort_by(|a, b| a.total_cmp(b));
    Ok(eig)
}

fn back_substitute(u: &Matrix, y: &[f64]) -> Result<Vec<f64>> {
    let n = u.dim();
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut s = y[i];
        for j in (i + 1)..n {
            s -= u[(i, j)] * x[j];
        }
        let diag = u[(i, i)];
        if diag == 0.0 || !diag.is_finite() {
            return Err(OptimizeError::degenerate("back substitution", diag));
        }
        x[i] = s / diag;
    }
    Ok(x)
}

fn pivot_row(a: &Matrix, col: usize) -> (usize, f64) {
    let mut piv = col;
    let mut max_abs = a[(col, col)].abs();
    for row in (col + 1)..a.dim() {
        let v = a[(row, col)].abs();
        if v > max_abs {
            max_abs = v;
            piv = row;
        }
    }
    (piv, max_abs)
}

fn swap_rows(a: &mut Matrix, r1: usize, r2: usize) {
    if r1 == r2 {
        return;
    }
    let n = a.dim();
    let data = a.as_mut_slice();
    for k in 0..n {
        data.swap(r1 * n + k, r2 * n + k);
    }
}

fn max_abs(a: &Matrix) -> f64 {
    a.as_slice().iter().fold(0.0f64, |acc, v| acc.max(v.abs()))
}
