pub mod dense;
pub(crate) mod linalg;
pub mod matrix;

pub use dense::{
    check_leading_minors, determinant, is_positive_definite, symmetric_eigenvalues, DenseLinalg,
    LinearSolver, LuFactors,
};
pub use matrix::Matrix;
