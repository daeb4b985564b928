use crate::line_search::ScalarSearch;
use crate::solvers::common::step_policy::ExactLineSearch;

/// Configuration for steepest descent with an exact line search.
#[derive(Clone, Debug)]
pub struct GradientDescent<M = ScalarSearch> {
    /// Scalar minimizer used on `phi(alpha) = f(x - alpha grad)`.
    pub line_search: ExactLineSearch<M>,
    /// Maximum number of iterations.
    pub max_iters: usize,
    /// Stop when `|grad|` or `|x_new - x|` falls to this value.
    pub tol: f64,
    /// If true, per-iteration rows are logged at `info` instead of `debug`.
    pub verbose: bool,
}

impl<M> GradientDescent<M> {
    /// Build a solver around an explicit line search.
    pub fn with_line_search(line_search: ExactLineSearch<M>) -> Self {
        Self {
            line_search,
            max_iters: 1000,
            tol: 1e-3,
            verbose: false,
        }
    }
}

impl GradientDescent<ScalarSearch> {
    pub fn new() -> Self {
        Self::with_line_search(ExactLineSearch::default())
    }
}

impl Default for GradientDescent<ScalarSearch> {
    fn default() -> Self {
        Self::new()
    }
}
