//! descent: unconstrained minimization on R^n
//!
//! - `GradientDescent`: steepest descent with an exact line search
//! - `Newton`: Newton's method, repairing indefinite Hessians by a diagonal shift
//! - `QuasiNewton`: DFP inverse-Hessian updates with Armijo backtracking
//! - `ConjugateGradient`: Hessian-based conjugate directions, `n` steps
//!
//! Objectives implement [`Objective`] (and [`TwiceDifferentiable`] for the
//! second-order methods), or wrap a plain function in [`FiniteDifference`].
//! Every run returns a [`RunResult`] with the full [`Trajectory`].
//!
//! ```
//! use descent::{minimize, Method, RunConfig, Sphere};
//!
//! let cfg = RunConfig::new(vec![3.0, 3.0], Method::Newton);
//! let res = minimize(&Sphere, &cfg).unwrap();
//! assert!(res.converged);
//! ```

pub mod config;
pub mod error;
pub mod line_search;
pub mod numerics;
pub mod problems;
pub mod solvers;

pub use config::{Method, RunConfig};
pub use error::{OptimizeError, Result};
pub use line_search::{
    expand_bracket, Dichotomous, Exhaustive, Fibonacci, GoldenSection, IntervalHalving,
    NewtonRaphson, ParabolicNewton, ScalarMinimizer, ScalarMinimum, ScalarSearch, SearchStart,
    Secant, StationaryPoint,
};
pub use numerics::{DenseLinalg, LinearSolver, Matrix};
pub use problems::{
    FiniteDifference, FnObjective, FnTwiceObjective, Objective, Quadratic, Rosenbrock, Sphere,
    TwiceDifferentiable,
};
pub use solvers::{
    ArmijoBacktracking, ConjugateGradient, CurvaturePolicy, DfpUpdate, ExactLineSearch,
    GradientDescent, IteratePoint, LineSearchContext, LineSearchPolicy, LineSearchResult, Newton,
    QuasiNewton, RunResult, Trajectory,
};

/// Run the method selected in `cfg` on `obj`.
///
/// The configuration is validated first. Reaching the iteration cap is not an
/// error here; see [`RunResult::into_converged`].
///
/// Newton and conjugate gradient need second derivatives, so `obj` must be
/// [`TwiceDifferentiable`]. Objectives with a gradient only go through
/// [`minimize_first_order`], or through [`FiniteDifference`].
pub fn minimize<O>(obj: &O, cfg: &RunConfig) -> Result<RunResult>
where
    O: TwiceDifferentiable + ?Sized,
{
    cfg.validate()?;
    log::debug!(
        "minimize: method={} n={} tol={:e} max_iterations={}",
        cfg.method.name(),
        cfg.x0.len(),
        cfg.tolerance,
        cfg.max_iterations
    );
    let x0 = cfg.x0.clone();
    match cfg.method {
        Method::GradientDescent => cfg.gradient_descent().minimize(obj, x0),
        Method::Newton => cfg.newton().minimize(obj, x0),
        Method::QuasiNewtonDfp => cfg.quasi_newton().minimize(obj, x0),
        Method::ConjugateGradient => cfg.conjugate_gradient().minimize(obj, x0),
    }
}

/// Run a gradient-only method selected in `cfg` on `obj`.
///
/// Accepts `Method::GradientDescent` and `Method::QuasiNewtonDfp`; the
/// second-order methods are rejected with `InvalidConfig`.
pub fn minimize_first_order<O>(obj: &O, cfg: &RunConfig) -> Result<RunResult>
where
    O: Objective + ?Sized,
{
    cfg.validate()?;
    let x0 = cfg.x0.clone();
    match cfg.method {
        Method::GradientDescent => cfg.gradient_descent().minimize(obj, x0),
        Method::QuasiNewtonDfp => cfg.quasi_newton().minimize(obj, x0),
        Method::Newton | Method::ConjugateGradient => Err(OptimizeError::InvalidConfig(format!(
            "{} needs a twice-differentiable objective",
            cfg.method.name()
        ))),
    }
}
