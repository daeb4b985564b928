/// Configuration for the Hessian-based conjugate-gradient method.
///
/// Runs exactly `n` iterations for an `n`-variable problem; `max_iters` only
/// caps that count when it is smaller.
#[derive(Clone, Debug)]
pub struct ConjugateGradient {
    pub max_iters: usize,
    /// Used for the start pre-check and to report `converged` after the last step.
    pub tol: f64,
    pub verbose: bool,
}

impl ConjugateGradient {
    pub fn new() -> Self {
        Self {
            max_iters: 1000,
            tol: 1e-3,
            verbose: false,
        }
    }
}

impl Default for ConjugateGradient {
    fn default() -> Self {
        Self::new()
    }
}
