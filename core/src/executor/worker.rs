use std::time::Instant;

use crate::config::ConverterConfig;
use crate::runner::{converter_argv, ExternalRunner};

use super::types::{MergeTask, StepOutcome};

/// Convert one step. Never fails: every problem becomes a [`StepOutcome`].
pub async fn process_step(
    task: &MergeTask,
    runner: &dyn ExternalRunner,
    converter: &ConverterConfig,
) -> StepOutcome {
    let step = task.step;
    let step_dir = task.step_dir();
    let output = task.output_file();

    match tokio::fs::try_exists(&step_dir).await {
        Ok(true) => {}
        Ok(false) => {
            tracing::info!("step {} missing: {} does not exist", step, step_dir.display());
            return StepOutcome::MissingInput;
        }
        Err(e) => {
            tracing::error!("step {} failed to stat {}: {}", step, step_dir.display(), e);
            return StepOutcome::Errored {
                message: format!("stat {}: {e}", step_dir.display()),
            };
        }
    }

    match tokio::fs::try_exists(&output).await {
        Ok(false) => {}
        Ok(true) => {
            tracing::info!(
                "step {} already done, skipping: {}",
                step,
                output.display()
            );
            return StepOutcome::AlreadyDone;
        }
        Err(e) => {
            tracing::error!("step {} failed to stat {}: {}", step, output.display(), e);
            return StepOutcome::Errored {
                message: format!("stat {}: {e}", output.display()),
            };
        }
    }

    let argv = converter_argv(converter, &step_dir, &output);
    tracing::info!("step {} converting with {}", step, runner.name());
    tracing::debug!("step {} argv: {:?}", step, argv);

    let start = Instant::now();
    let outcome = match runner.run(&argv).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!("step {} could not run converter: {:#}", step, e);
            return StepOutcome::Errored {
                message: format!("{e:#}"),
            };
        }
    };
    let duration_ms = start.elapsed().as_millis() as u64;

    if outcome.simulated {
        tracing::info!("step {} dry-run, converter not executed", step);
        return StepOutcome::DryRun;
    }

    if outcome.is_success() {
        if !outcome.stdout.trim().is_empty() {
            tracing::debug!("step {} converter stdout:\n{}", step, outcome.stdout.trim_end());
        }
        tracing::info!("step {} converted in {}ms", step, duration_ms);
        StepOutcome::Converted { duration_ms }
    } else {
        tracing::error!(
            "step {} converter exited with {}: {}",
            step,
            outcome.exit_code,
            outcome.stderr.trim_end()
        );
        StepOutcome::Failed {
            exit_code: outcome.exit_code,
            stderr: outcome.stderr,
        }
    }
}
