use std::path::PathBuf;

use clap::Parser;

/// Merge sharded training checkpoints into fp32 model files, one external
/// converter run per step, in parallel.
#[derive(Parser, Debug, Clone)]
#[command(name = "ckptmerge", disable_version_flag = true)]
pub struct Args {
    /// Steps to process, comma separated, e.g. '140,141'.
    #[arg(long)]
    pub steps: String,

    /// Model version label; selects `<ckpt-root>/<version>/_actor` and
    /// `<model-root>/<version>`.
    #[arg(long)]
    pub version: String,

    /// Config file (defaults to ~/.ckptmerge/config.toml, then ./config.toml).
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub ckpt_root: Option<String>,

    #[arg(long)]
    pub model_root: Option<String>,

    /// Lower the worker cap (never above 64).
    #[arg(long)]
    pub max_workers: Option<usize>,

    /// Log the converter commands without running them.
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    #[arg(long, default_value_t = false)]
    pub progress: bool,

    /// Write a JSON report of every step's outcome.
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Exit non-zero when any step failed.
    #[arg(long, default_value_t = false)]
    pub strict: bool,
}
