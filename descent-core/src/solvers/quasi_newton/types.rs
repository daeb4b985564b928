use serde::{Deserialize, Serialize};

use crate::solvers::common::step_policy::ArmijoBacktracking;

/// What to do when a secant pair fails the curvature test.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurvaturePolicy {
    /// Keep the previous `H` and continue.
    #[default]
    SkipUpdate,
    /// Restart from `H = I`.
    ResetToIdentity,
    /// Abort the run with `SingularOrDegenerateCurvature`.
    Fail,
}

/// Configuration for the DFP quasi-Newton method with Armijo step selection.
#[derive(Clone, Debug)]
pub struct QuasiNewton {
    pub armijo: ArmijoBacktracking,
    pub max_iters: usize,
    /// Stop when `|grad|` falls to this value.
    pub tol: f64,
    pub curvature_policy: CurvaturePolicy,
    pub verbose: bool,
}

impl QuasiNewton {
    pub fn new() -> Self {
        Self {
            armijo: ArmijoBacktracking::default(),
            max_iters: 1000,
            tol: 1e-3,
            curvature_policy: CurvaturePolicy::default(),
            verbose: false,
        }
    }
}

impl Default for QuasiNewton {
    fn default() -> Self {
        Self::new()
    }
}
