use std::path::PathBuf;

use thiserror::Error;

use super::steps::StepParseError;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("invalid --steps: {0}")]
    Usage(#[from] StepParseError),
    #[error("config error: {0}")]
    Config(String),
    #[error("dispatch failed: {0}")]
    Dispatch(#[from] DispatchError),
    #[error("{failed} of {total} steps failed")]
    StepsFailed { failed: usize, total: usize },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Errors that abort a run before any step is processed.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("create output dir {} failed: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("worker pool closed unexpectedly")]
    PoolClosed,
}
