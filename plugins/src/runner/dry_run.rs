use anyhow::Result;
use async_trait::async_trait;

use ckptmerge_core::runner::{ExternalOutcome, ExternalRunner};

/// Logs the command that would run and reports success without running it.
pub struct DryRunRunner;

#[async_trait]
impl ExternalRunner for DryRunRunner {
    fn name(&self) -> &str {
        "dry-run"
    }

    async fn run(&self, argv: &[String]) -> Result<ExternalOutcome> {
        tracing::info!("[dry-run] {}", render_command(argv));
        Ok(ExternalOutcome {
            simulated: true,
            ..ExternalOutcome::success()
        })
    }
}

/// Shell-like rendering of argv; empty or spaced arguments are quoted.
pub fn render_command(argv: &[String]) -> String {
    argv.iter()
        .map(|a| {
            if a.is_empty() || a.contains(char::is_whitespace) {
                format!("\"{a}\"")
            } else {
                a.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
