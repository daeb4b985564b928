//! Slice-level vector and matrix kernels (row-major, dependency-free).

pub(crate) fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

pub(crate) fn norm2(v: &[f64]) -> f64 {
    dot(v, v).sqrt()
}

/// out = x + alpha * d
pub(crate) fn axpy_into(out: &mut [f64], x: &[f64], d: &[f64], alpha: f64) {
    for ((o, xi), di) in out.iter_mut().zip(x).zip(d) {
        *o = xi + alpha * di;
    }
}

/// out = b - a
pub(crate) fn difference_into(out: &mut [f64], a: &[f64], b: &[f64]) {
    for ((o, ai), bi) in out.iter_mut().zip(a).zip(b) {
        *o = bi - ai;
    }
}

/// ||b - a||
pub(crate) fn distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(ai, bi)| (bi - ai) * (bi - ai))
        .sum::<f64>()
        .sqrt()
}

/// out = A v, A: (n x n) row-major
pub(crate) fn mat_vec_into(a: &[f64], n: usize, v: &[f64], out: &mut [f64]) {
    for i in 0..n {
        let row = &a[i * n..(i + 1) * n];
        out[i] = dot(row, v);
    }
}

/// v^T A v
pub(crate) fn quadratic_form(a: &[f64], n: usize, v: &[f64]) -> f64 {
    let mut acc = 0.0;
    for i in 0..n {
        acc += v[i] * dot(&a[i * n..(i + 1) * n], v);
    }
    acc
}

/// A += s * u v^T
pub(crate) fn add_outer(a: &mut [f64], n: usize, s: f64, u: &[f64], v: &[f64]) {
    for i in 0..n {
        let su = s * u[i];
        for j in 0..n {
            a[i * n + j] += su * v[j];
        }
    }
}

pub(crate) fn all_finite(v: &[f64]) -> bool {
    v.iter().all(|x| x.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mat_vec_and_quadratic_form_agree() {
        let a = [2.0, -1.0, -1.0, 2.0];
        let v = [1.0, 3.0];
        let mut av = [0.0; 2];
        mat_vec_into(&a, 2, &v, &mut av);
        assert_eq!(av, [-1.0, 5.0]);
        assert_eq!(quadratic_form(&a, 2, &v), dot(&v, &av));
    }

    #[test]
    fn add_outer_is_rank_one() {
        let mut a = [0.0; 4];
        add_outer(&mut a, 2, 2.0, &[1.0, 2.0], &[3.0, 4.0]);
        assert_eq!(a, [6.0, 8.0, 12.0, 16.0]);
    }
}
