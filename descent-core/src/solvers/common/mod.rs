pub(crate) mod controller;
pub mod iterate;
pub mod step_policy;
pub(crate) mod trace;
