mod solve;
mod types;

pub use types::Newton;
