use approx::assert_abs_diff_eq;
use descent::numerics::{determinant, is_positive_definite, symmetric_eigenvalues};
use descent::{DenseLinalg, LinearSolver, Matrix, OptimizeError};
use proptest::prelude::*;

#[test]
fn cholesky_solve_reproduces_rhs() {
    let a = Matrix::from_rows(&[[2.0, -1.0], [-1.0, 2.0]]).unwrap();
    let b = [0.0, 3.0];

    let x = DenseLinalg::new().cholesky_solve(&a, &b).unwrap();

    let ax = a.mul_vec(&x).unwrap();
    assert_abs_diff_eq!(ax[0], b[0], epsilon = 1e-9);
    assert_abs_diff_eq!(ax[1], b[1], epsilon = 1e-9);
    assert_abs_diff_eq!(x[0], 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(x[1], 2.0, epsilon = 1e-12);
}

#[test]
fn lu_factors_satisfy_pa_eq_lu() {
    let a = Matrix::from_rows(&[[0.0, 2.0, 1.0], [1.0, 1.0, 0.0], [3.0, 0.0, 1.0]]).unwrap();
    let lu = DenseLinalg::new().lu_factorize(&a).unwrap();

    let pa = lu.p.mul_mat(&a).unwrap();
    let l_u = lu.l.mul_mat(&lu.u).unwrap();
    assert!(pa.max_abs_diff(&l_u) < 1e-12);
    for i in 0..3 {
        assert_eq!(lu.l[(i, i)], 1.0);
    }

    let x = lu.solve(&[3.0, 2.0, 4.0]).unwrap();
    for (v, expected) in x.iter().zip([1.0, 1.0, 1.0]) {
        assert_abs_diff_eq!(*v, expected, epsilon = 1e-12);
    }
}

#[test]
fn inverse_times_matrix_is_identity() {
    let a = Matrix::from_rows(&[[4.0, 7.0], [2.0, 6.0]]).unwrap();
    let inv = DenseLinalg::new().invert(&a).unwrap();
    let prod = a.mul_mat(&inv).unwrap();
    assert!(prod.max_abs_diff(&Matrix::identity(2)) < 1e-12);
}

#[test]
fn singular_matrix_is_reported() {
    let a = Matrix::from_rows(&[[1.0, 2.0], [2.0, 4.0]]).unwrap();
    let linalg = DenseLinalg::new();
    assert!(matches!(
        linalg.solve(&a, &[1.0, 2.0]),
        Err(OptimizeError::SingularOrDegenerateCurvature { .. })
    ));
    assert!(matches!(
        linalg.invert(&a),
        Err(OptimizeError::SingularOrDegenerateCurvature { .. })
    ));
    assert_eq!(determinant(&a), 0.0);
}

#[test]
fn cholesky_preconditions() {
    let linalg = DenseLinalg::new();
    let skew = Matrix::from_rows(&[[2.0, 1.0], [0.0, 2.0]]).unwrap();
    assert!(matches!(
        linalg.cholesky_solve(&skew, &[1.0, 1.0]),
        Err(OptimizeError::NotSymmetric { row: 0, col: 1 })
    ));

    let indefinite = Matrix::from_diagonal(&[1.0, -1.0]);
    assert!(matches!(
        linalg.cholesky_solve(&indefinite, &[1.0, 1.0]),
        Err(OptimizeError::NotPositiveDefinite { order: 2, .. })
    ));

    assert!(matches!(
        linalg.cholesky_solve(&Matrix::identity(2), &[1.0]),
        Err(OptimizeError::DimensionMismatch { .. })
    ));
}

#[test]
fn eigenvalues_of_a_symmetric_3x3() {
    // eigenvalues 2 - sqrt(2), 2, 2 + sqrt(2)
    let a = Matrix::from_rows(&[[2.0, -1.0, 0.0], [-1.0, 2.0, -1.0], [0.0, -1.0, 2.0]]).unwrap();
    let eig = symmetric_eigenvalues(&a).unwrap();
    let s = 2f64.sqrt();
    assert_abs_diff_eq!(eig[0], 2.0 - s, epsilon = 1e-10);
    assert_abs_diff_eq!(eig[1], 2.0, epsilon = 1e-10);
    assert_abs_diff_eq!(eig[2], 2.0 + s, epsilon = 1e-10);
    assert!(is_positive_definite(&a));
}

proptest! {
    #[test]
    fn cholesky_and_lu_agree_on_spd_systems(
        m in prop::collection::vec(-2.0f64..2.0, 9),
        b in prop::collection::vec(-5.0f64..5.0, 3),
    ) {
        // A = M^T M + I is symmetric positive definite
        let m = Matrix::from_row_major(3, m).unwrap();
        let a = m.transpose().mul_mat(&m).unwrap().shifted(1.0);
        let linalg = DenseLinalg::new();

        let x_chol = linalg.cholesky_solve(&a, &b).unwrap();
        let x_lu = linalg.solve(&a, &b).unwrap();
        for (c, l) in x_chol.iter().zip(&x_lu) {
            prop_assert!((c - l).abs() < 1e-8);
        }
        let ax = a.mul_vec(&x_chol).unwrap();
        for (r, bi) in ax.iter().zip(&b) {
            prop_assert!((r - bi).abs() < 1e-8);
        }
    }
}
