//! Error taxonomy shared by every solver and provider in the crate.

use thiserror::Error;

use crate::solvers::common::iterate::Trajectory;

/// Errors surfaced by runs, line searches and the linear-algebra provider.
///
/// Numerical degeneracies are detected where the division or factorization
/// happens and reported here; no solver hands back NaN or infinite iterates.
#[derive(Error, Debug, Clone)]
pub enum OptimizeError {
    /// Vector or matrix sizes are inconsistent with the problem dimension.
    #[error("dimension mismatch in {context}: expected {expected}, got {found}")]
    DimensionMismatch {
        context: &'static str,
        expected: usize,
        found: usize,
    },

    /// A symmetric matrix was required.
    #[error("matrix is not symmetric: |a[{row}][{col}] - a[{col}][{row}]| exceeds tolerance")]
    NotSymmetric { row: usize, col: usize },

    /// Leading-minor test failed for a solve that needs an SPD matrix.
    #[error("matrix is not positive definite (leading minor {order} = {minor:.3e})")]
    NotPositiveDefinite { order: usize, minor: f64 },

    /// A denominator or pivot is at or near zero.
    #[error("singular or degenerate curvature in {context} (denominator {value:.3e})")]
    SingularOrDegenerateCurvature { context: &'static str, value: f64 },

    /// The search direction does not satisfy `d · grad < 0`.
    #[error("not a descent direction: d . grad = {slope:.3e}")]
    NotADescentDirection { slope: f64 },

    /// Iteration cap reached before the stopping test was satisfied.
    #[error("no convergence after {iterations} iterations (|grad| = {grad_norm:.3e})")]
    NonConvergence {
        iterations: usize,
        grad_norm: f64,
        best: Vec<f64>,
        trajectory: Trajectory,
    },

    /// A run failed after accepting at least one step; the history so far is kept.
    #[error("run stopped after {iterations} iterations: {source}")]
    Interrupted {
        iterations: usize,
        trajectory: Trajectory,
        source: Box<OptimizeError>,
    },

    /// A scalar line search used up its evaluation budget.
    #[error("{method} line search exhausted after {evaluations} evaluations")]
    LineSearchExhausted {
        method: &'static str,
        evaluations: usize,
    },

    /// The objective produced NaN or an infinity where a finite value is required.
    #[error("objective returned a non-finite {what}")]
    NonFiniteValue { what: &'static str },

    /// Rejected run or solver configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, OptimizeError>;

impl OptimizeError {
    pub(crate) fn dimension(context: &'static str, expected: usize, found: usize) -> Self {
        Self::DimensionMismatch {
            context,
            expected,
            found,
        }
    }

    /// The underlying failure, looking through [`OptimizeError::Interrupted`].
    pub fn root_cause(&self) -> &OptimizeError {
        match self {
            Self::Interrupted { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Iterates recorded before the failure, if the error carries any.
    pub fn trajectory(&self) -> Option<&Trajectory> {
        match self {
            Self::Interrupted { trajectory, .. } | Self::NonConvergence { trajectory, .. } => {
                Some(trajectory)
            }
            _ => None,
        }
    }

    pub(crate) fn degenerate(context: &'static str, value: f64) -> Self {
        Self::SingularOrDegenerateCurvature { context, value }
    }
}
