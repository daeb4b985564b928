use std::ops::{Index, IndexMut};

use crate::error::{OptimizeError, Result};

use super::linalg::{mat_vec_into, quadratic_form};

/// Square `n x n` matrix stored row-major.
///
/// Hessians, curvature approximations and factors all use this layout, so a
/// Hessian callback that fills `hess[i * n + k]` can hand its buffer straight
/// to [`Matrix::from_row_major`].
#[derive(Clone, Debug, PartialEq)]
pub struct Matrix {
    n: usize,
    data: Vec<f64>,
}

impl Matrix {
    pub fn zeros(n: usize) -> Self {
        Self {
            n,
            data: vec![0.0; n * n],
        }
    }

    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n);
        for i in 0..n {
            m.data[i * n + i] = 1.0;
        }
        m
    }

    /// Build from a row-major buffer of length `n * n`.
    pub fn from_row_major(n: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != n * n {
            return Err(OptimizeError::dimension("matrix buffer", n * n, data.len()));
        }
        Ok(Self { n, data })
    }

    /// Build from a slice of rows; every row must have as many entries as there are rows.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        let n = rows.len();
        let mut data = Vec::with_capacity(n * n);
        for row in rows {
            let row = row.as_ref();
            if row.len() != n {
                return Err(OptimizeError::dimension("matrix row", n, row.len()));
            }
            data.extend_from_slice(row);
        }
        Ok(Self { n, data })
    }

    pub fn from_diagonal(diag: &[f64]) -> Self {
        let n = diag.len();
        let mut m = Self::zeros(n);
        for (i, d) in diag.iter().enumerate() {
            m.data[i * n + i] = *d;
        }
        m
    }

    pub fn dim(&self) -> usize {
        self.n
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.n..(i + 1) * self.n]
    }

    pub fn transpose(&self) -> Self {
        let n = self.n;
        let mut t = Self::zeros(n);
        for i in 0..n {
            for j in 0..n {
                t.data[j * n + i] = self.data[i * n + j];
            }
        }
        t
    }

    /// A v
    pub fn mul_vec(&self, v: &[f64]) -> Result<Vec<f64>> {
        if v.len() != self.n {
            return Err(OptimizeError::dimension("matrix-vector product", self.n, v.len()));
        }
        let mut out = vec![0.0; self.n];
        mat_vec_into(&self.data, self.n, v, &mut out);
        Ok(out)
    }

    /// A B
    pub fn mul_mat(&self, other: &Matrix) -> Result<Matrix> {
        if other.n != self.n {
            return Err(OptimizeError::dimension("matrix product", self.n, other.n));
        }
        let n = self.n;
        let mut out = Self::zeros(n);
        for i in 0..n {
            for k in 0..n {
                let aik = self.data[i * n + k];
                if aik == 0.0 {
                    continue;
                }
                for j in 0..n {
                    out.data[i * n + j] += aik * other.data[k * n + j];
                }
            }
        }
        Ok(out)
    }

    /// v^T A v
    pub fn quadratic_form(&self, v: &[f64]) -> Result<f64> {
        if v.len() != self.n {
            return Err(OptimizeError::dimension("quadratic form", self.n, v.len()));
        }
        Ok(quadratic_form(&self.data, self.n, v))
    }

    /// A + shift * I
    pub fn shifted(&self, shift: f64) -> Self {
        let mut out = self.clone();
        for i in 0..self.n {
            out.data[i * self.n + i] += shift;
        }
        out
    }

    /// Symmetry check with a tolerance relative to the largest entry.
    ///
    /// Returns the first offending `(row, col)` pair.
    pub fn check_symmetric(&self, rel_tol: f64) -> Result<()> {
        let n = self.n;
        let scale = self
            .data
            .iter()
            .fold(0.0f64, |acc, v| acc.max(v.abs()))
            .max(1.0);
        for i in 0..n {
            for j in (i + 1)..n {
                let diff = (self.data[i * n + j] - self.data[j * n + i]).abs();
                if !(diff <= rel_tol * scale) {
                    return Err(OptimizeError::NotSymmetric { row: i, col: j });
                }
            }
        }
        Ok(())
    }

    /// Replace A with (A + A^T) / 2.
    pub fn symmetrize(&mut self) {
        let n = self.n;
        for i in 0..n {
            for j in (i + 1)..n {
                let avg = 0.5 * (self.data[i * n + j] + self.data[j * n + i]);
                self.data[i * n + j] = avg;
                self.data[j * n + i] = avg;
            }
        }
    }

    /// Top-left `k x k` block.
    pub fn leading_block(&self, k: usize) -> Matrix {
        let k = k.min(self.n);
        let mut out = Self::zeros(k);
        for i in 0..k {
            out.data[i * k..(i + 1) * k].copy_from_slice(&self.data[i * self.n..i * self.n + k]);
        }
        out
    }

    pub fn max_abs_diff(&self, other: &Matrix) -> f64 {
        self.data
            .iter()
            .zip(&other.data)
            .fold(0.0f64, |acc, (a, b)| acc.max((a - b).abs()))
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        &self.data[i * self.n + j]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut f64 {
        &mut self.data[i * self.n + j]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rows_rejects_ragged_input() {
        let err = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(matches!(err, OptimizeError::DimensionMismatch { .. }));
    }

    #[test]
    fn leading_block_and_transpose() {
        let m = Matrix::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]).unwrap();
        let b = m.leading_block(2);
        assert_eq!(b.as_slice(), &[1.0, 2.0, 4.0, 5.0]);
        assert_eq!(m.transpose()[(0, 2)], 7.0);
        assert!(m.check_symmetric(1e-12).is_err());
    }
}
