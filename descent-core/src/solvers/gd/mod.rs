mod solve;
mod types;

pub use types::GradientDescent;
