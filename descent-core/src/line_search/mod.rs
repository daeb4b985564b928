//! Univariate minimizers used to pick a step length along a fixed direction.
//!
//! Every minimizer works on `phi(alpha)` and spends at most `max_evaluations`
//! calls to it; past that it fails with `LineSearchExhausted`.
//!
//! - bracket reduction: [`GoldenSection`], [`Fibonacci`], [`Dichotomous`],
//!   [`IntervalHalving`], [`Exhaustive`]
//! - derivative based: [`ParabolicNewton`] (difference quotients), [`Secant`]
//!   (on `phi'`), [`NewtonRaphson`] (analytic `phi'` and `phi''` only)

mod bracket;
mod dichotomous;
mod exhaustive;
mod fibonacci;
mod golden;
mod halving;
mod newton_raphson;
mod parabolic;
mod secant;

use serde::{Deserialize, Serialize};

use crate::error::{OptimizeError, Result};

pub use bracket::expand_bracket;
pub use dichotomous::Dichotomous;
pub use exhaustive::Exhaustive;
pub use fibonacci::Fibonacci;
pub use golden::GoldenSection;
pub use halving::IntervalHalving;
pub use newton_raphson::NewtonRaphson;
pub use parabolic::ParabolicNewton;
pub use secant::Secant;

/// Where a scalar search begins.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SearchStart {
    /// A starting guess; bracketing methods expand a bracket around it.
    Point(f64),
    /// A bracket `[a, b]` assumed to contain a minimizer.
    Bracket(f64, f64),
}

/// Minimizer returned by a scalar search.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScalarMinimum {
    pub alpha: f64,
    pub value: f64,
    pub evaluations: usize,
}

/// Zero of `phi'` found by a derivative-driven search.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StationaryPoint {
    pub alpha: f64,
    pub slope: f64,
    /// Derivative evaluations spent.
    pub evaluations: usize,
}

/// Univariate minimization capability.
pub trait ScalarMinimizer {
    fn name(&self) -> &'static str;

    /// Minimize `phi` to tolerance `tol` starting from `start`.
    fn minimize(
        &mut self,
        phi: &mut dyn FnMut(f64) -> f64,
        start: SearchStart,
        tol: f64,
    ) -> Result<ScalarMinimum>;
}

/// Counts calls to `phi` and enforces the evaluation cap.
pub(crate) struct Budget<'a> {
    phi: &'a mut dyn FnMut(f64) -> f64,
    method: &'static str,
    used: usize,
    max: usize,
}

impl<'a> Budget<'a> {
    pub(crate) fn new(phi: &'a mut dyn FnMut(f64) -> f64, method: &'static str, max: usize) -> Self {
        Self {
            phi,
            method,
            used: 0,
            max,
        }
    }

    pub(crate) fn eval(&mut self, alpha: f64) -> Result<f64> {
        if self.used >= self.max {
            return Err(OptimizeError::LineSearchExhausted {
                method: self.method,
                evaluations: self.used,
            });
        }
        self.used += 1;
        Ok((self.phi)(alpha))
    }

    pub(crate) fn used(&self) -> usize {
        self.used
    }
}

/// Serializable choice of scalar minimizer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScalarSearch {
    ParabolicNewton(ParabolicNewton),
    GoldenSection(GoldenSection),
    Fibonacci(Fibonacci),
    Dichotomous(Dichotomous),
    IntervalHalving(IntervalHalving),
    Exhaustive(Exhaustive),
    Secant(Secant),
}

impl Default for ScalarSearch {
    fn default() -> Self {
        Self::ParabolicNewton(ParabolicNewton::default())
    }
}

impl ScalarMinimizer for ScalarSearch {
    fn name(&self) -> &'static str {
        match self {
            Self::ParabolicNewton(m) => m.name(),
            Self::GoldenSection(m) => m.name(),
            Self::Fibonacci(m) => m.name(),
            Self::Dichotomous(m) => m.name(),
            Self::IntervalHalving(m) => m.name(),
            Self::Exhaustive(m) => m.name(),
            Self::Secant(m) => m.name(),
        }
    }

    fn minimize(
        &mut self,
        phi: &mut dyn FnMut(f64) -> f64,
        start: SearchStart,
        tol: f64,
    ) -> Result<ScalarMinimum> {
        match self {
            Self::ParabolicNewton(m) => m.minimize(phi, start, tol),
            Self::GoldenSection(m) => m.minimize(phi, start, tol),
            Self::Fibonacci(m) => m.minimize(phi, start, tol),
            Self::Dichotomous(m) => m.minimize(phi, start, tol),
            Self::IntervalHalving(m) => m.minimize(phi, start, tol),
            Self::Exhaustive(m) => m.minimize(phi, start, tol),
            Self::Secant(m) => m.minimize(phi, start, tol),
        }
    }
}

/// Resolve a start into a bracket, expanding around a point if needed.
pub(crate) fn resolve_bracket(
    budget: &mut Budget<'_>,
    start: SearchStart,
    initial_step: f64,
) -> Result<(f64, f64)> {
    match start {
        SearchStart::Bracket(a, b) if a <= b => Ok((a, b)),
        SearchStart::Bracket(a, b) => Ok((b, a)),
        SearchStart::Point(x0) => bracket::expand_with_budget(budget, x0, initial_step),
    }
}
