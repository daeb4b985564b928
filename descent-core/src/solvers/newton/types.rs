use crate::line_search::ScalarSearch;
use crate::numerics::DenseLinalg;
use crate::solvers::common::step_policy::ExactLineSearch;

/// Configuration for Newton's method with Hessian repair and an exact line search.
///
/// When the Hessian fails the leading-minor test it is replaced by
/// `H + (|lambda_min| + shift_delta) I` before solving for the direction.
#[derive(Clone, Debug)]
pub struct Newton<M = ScalarSearch, L = DenseLinalg> {
    pub line_search: ExactLineSearch<M>,
    /// Linear-algebra provider for the Newton system.
    pub linalg: L,
    pub max_iters: usize,
    /// Stop when the Newton direction is no longer than this.
    pub tol: f64,
    /// Margin added on top of `|lambda_min|` when repairing an indefinite Hessian.
    pub shift_delta: f64,
    pub verbose: bool,
}

impl<M, L> Newton<M, L> {
    pub fn with_parts(line_search: ExactLineSearch<M>, linalg: L) -> Self {
        Self {
            line_search,
            linalg,
            max_iters: 1000,
            tol: 1e-3,
            shift_delta: 1e-6,
            verbose: false,
        }
    }
}

impl Newton<ScalarSearch, DenseLinalg> {
    pub fn new() -> Self {
        Self::with_parts(ExactLineSearch::default(), DenseLinalg::new())
    }
}

impl Default for Newton<ScalarSearch, DenseLinalg> {
    fn default() -> Self {
        Self::new()
    }
}
