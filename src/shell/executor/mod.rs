mod builtins;
mod error;
#[allow(clippy::module_inception)]
mod executor;
mod redirect;

pub use executor::{Executor, LaunchOutcome};
