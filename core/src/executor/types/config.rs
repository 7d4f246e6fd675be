use crate::config::{AppConfig, MAX_WORKERS_CAP};

/// Options for a single dispatcher run.
#[derive(Debug, Clone)]
pub struct DispatchOpts {
    /// Upper bound on concurrent workers, never above 64.
    pub max_workers: usize,

    /// Override for the detected CPU parallelism (tests, containers).
    pub available_parallelism: Option<usize>,

    /// Enable visual progress bar
    pub progress_bar: bool,
}

impl Default for DispatchOpts {
    fn default() -> Self {
        Self {
            max_workers: MAX_WORKERS_CAP,
            available_parallelism: None,
            progress_bar: false,
        }
    }
}

impl DispatchOpts {
    pub fn from_config(cfg: &AppConfig) -> Self {
        Self {
            max_workers: cfg.concurrency.effective_cap(),
            ..Self::default()
        }
    }
}
