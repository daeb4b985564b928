//! Run configuration: starting point, stopping rule, method choice and per-method settings.
//!
//! ```toml
//! x0 = [-1.2, 1.0]
//! tolerance = 1e-3
//! max_iterations = 2000
//! method = "quasi_newton_dfp"
//!
//! [armijo]
//! alpha0 = 1e-3
//! ita = 2.0
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{OptimizeError, Result};
use crate::line_search::ScalarSearch;
use crate::solvers::{
    ArmijoBacktracking, ConjugateGradient, CurvaturePolicy, ExactLineSearch, GradientDescent,
    Newton, QuasiNewton,
};

/// Which iterative method a run uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    GradientDescent,
    Newton,
    #[default]
    QuasiNewtonDfp,
    ConjugateGradient,
}

impl Method {
    pub fn name(&self) -> &'static str {
        match self {
            Self::GradientDescent => "gradient_descent",
            Self::Newton => "newton",
            Self::QuasiNewtonDfp => "quasi_newton_dfp",
            Self::ConjugateGradient => "conjugate_gradient",
        }
    }
}

/// Everything needed to run one minimization.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub x0: Vec<f64>,
    pub tolerance: f64,
    pub max_iterations: usize,
    pub method: Method,
    /// Tolerance handed to the scalar minimizer of the exact line search.
    pub line_search_tol: f64,
    /// Diagonal margin for Newton's Hessian repair.
    pub shift_delta: f64,
    pub curvature_policy: CurvaturePolicy,
    pub verbose: bool,
    /// Step selection for the quasi-Newton method.
    pub armijo: ArmijoBacktracking,
    /// Scalar minimizer for gradient descent and Newton.
    pub line_search: ScalarSearch,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            x0: Vec::new(),
            tolerance: 1e-3,
            max_iterations: 1000,
            method: Method::default(),
            line_search_tol: 1e-6,
            shift_delta: 1e-6,
            curvature_policy: CurvaturePolicy::default(),
            verbose: false,
            armijo: ArmijoBacktracking::default(),
            line_search: ScalarSearch::default(),
        }
    }
}

impl RunConfig {
    pub fn new(x0: Vec<f64>, method: Method) -> Self {
        Self {
            x0,
            method,
            ..Self::default()
        }
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(s).map_err(|e| OptimizeError::InvalidConfig(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| OptimizeError::InvalidConfig(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.x0.is_empty() {
            return Err(OptimizeError::InvalidConfig("x0 must not be empty".into()));
        }
        if !self.x0.iter().all(|v| v.is_finite()) {
            return Err(OptimizeError::InvalidConfig("x0 must be finite".into()));
        }
        if !(self.tolerance > 0.0 && self.tolerance.is_finite()) {
            return Err(OptimizeError::InvalidConfig(format!(
                "tolerance must be positive and finite, got {}",
                self.tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(OptimizeError::InvalidConfig(
                "max_iterations must be at least 1".into(),
            ));
        }
        if !(self.line_search_tol > 0.0 && self.line_search_tol.is_finite()) {
            return Err(OptimizeError::InvalidConfig(format!(
                "line_search_tol must be positive and finite, got {}",
                self.line_search_tol
            )));
        }
        if !(self.shift_delta > 0.0 && self.shift_delta.is_finite()) {
            return Err(OptimizeError::InvalidConfig(format!(
                "shift_delta must be positive and finite, got {}",
                self.shift_delta
            )));
        }
        self.armijo.validate()
    }

    fn exact_line_search(&self) -> ExactLineSearch<ScalarSearch> {
        ExactLineSearch::new(self.line_search, self.line_search_tol)
    }

    pub fn gradient_descent(&self) -> GradientDescent {
        let mut solver = GradientDescent::with_line_search(self.exact_line_search());
        solver.max_iters = self.max_iterations;
        solver.tol = self.tolerance;
        solver.verbose = self.verbose;
        solver
    }

    pub fn newton(&self) -> Newton {
        let mut solver = Newton::new();
        solver.line_search = self.exact_line_search();
        solver.max_iters = self.max_iterations;
        solver.tol = self.tolerance;
        solver.shift_delta = self.shift_delta;
        solver.verbose = self.verbose;
        solver
    }

    pub fn quasi_newton(&self) -> QuasiNewton {
        QuasiNewton {
            armijo: self.armijo,
            max_iters: self.max_iterations,
            tol: self.tolerance,
            curvature_policy: self.curvature_policy,
            verbose: self.verbose,
        }
    }

    pub fn conjugate_gradient(&self) -> ConjugateGradient {
        ConjugateGradient {
            max_iters: self.max_iterations,
            tol: self.tolerance,
            verbose: self.verbose,
        }
    }
}
