use anyhow::{Context, Result};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;

use ckptmerge_core::runner::{ExternalOutcome, ExternalRunner};

/// Spawns the converter as a child process and waits for it.
pub struct ProcessRunner {}

impl ProcessRunner {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExternalRunner for ProcessRunner {
    fn name(&self) -> &str {
        "process"
    }

    async fn run(&self, argv: &[String]) -> Result<ExternalOutcome> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| anyhow::anyhow!("converter command is empty"))?;

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .with_context(|| format!("spawn {program} failed"))?;

        Ok(ExternalOutcome {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            simulated: false,
        })
    }
}
