use thiserror::Error;

/// A `--steps` value that is not a comma-separated list of non-negative integers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StepParseError {
    #[error("step list is empty")]
    Empty,
    #[error("token #{position} ({token:?}) is not a non-negative integer, expected e.g. '140,141'")]
    InvalidToken { position: usize, token: String },
}
