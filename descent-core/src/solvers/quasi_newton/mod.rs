mod dfp;
mod solve;
mod types;

pub use dfp::DfpUpdate;
pub use types::{CurvaturePolicy, QuasiNewton};
