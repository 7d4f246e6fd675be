#[allow(clippy::module_inception)]
pub mod error;
pub mod steps;

pub use error::{CliError, DispatchError};
pub use steps::StepParseError;
