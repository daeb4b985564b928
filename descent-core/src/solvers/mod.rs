//! Iterative drivers and the machinery they share.

pub mod cg;
pub mod common;
pub mod gd;
pub mod newton;
pub mod quasi_newton;

pub use cg::ConjugateGradient;
pub use common::iterate::{IteratePoint, RunResult, Trajectory};
pub use common::step_policy::{
    ArmijoBacktracking, ExactLineSearch, LineSearchContext, LineSearchPolicy, LineSearchResult,
};
pub use gd::GradientDescent;
pub use newton::Newton;
pub use quasi_newton::{CurvaturePolicy, DfpUpdate, QuasiNewton};
