pub mod finite_difference;
pub mod objective;
pub mod test_functions;

pub use finite_difference::FiniteDifference;
pub use objective::{FnObjective, FnTwiceObjective, Objective, TwiceDifferentiable};
pub use test_functions::{Quadratic, Rosenbrock, Sphere};
