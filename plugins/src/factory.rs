use std::sync::Arc;

use ckptmerge_core::config::ConverterConfig;
use ckptmerge_core::runner::ExternalRunner;

use crate::runner::{DryRunRunner, ProcessRunner};

pub fn build_runner(cfg: &ConverterConfig) -> Arc<dyn ExternalRunner> {
    if cfg.dry_run {
        Arc::new(DryRunRunner)
    } else {
        Arc::new(ProcessRunner::new())
    }
}
