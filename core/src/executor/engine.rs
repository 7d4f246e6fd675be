use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use chrono::Local;
use uuid::Uuid;

use crate::config::ConverterConfig;
use crate::error::DispatchError;
use crate::layout::RunLayout;
use crate::runner::ExternalRunner;
use crate::steps::StepList;

use super::progress::ProgressMonitor;
use super::scheduler::{available_parallelism, execute_bounded, worker_count};
use super::types::{DispatchOpts, MergeTask, RunReport, StepOutcome};
use super::worker::process_step;

/// Fans the steps of one version out over a bounded worker pool.
pub struct Dispatcher {
    runner: Arc<dyn ExternalRunner>,
    converter: Arc<ConverterConfig>,
    opts: DispatchOpts,
}

impl Dispatcher {
    pub fn new(
        runner: Arc<dyn ExternalRunner>,
        converter: ConverterConfig,
        opts: DispatchOpts,
    ) -> Self {
        Self {
            runner,
            converter: Arc::new(converter),
            opts,
        }
    }

    pub fn worker_count_for(&self, task_count: usize) -> usize {
        let available = self
            .opts
            .available_parallelism
            .unwrap_or_else(available_parallelism);
        worker_count(task_count, available, self.opts.max_workers)
    }

    /// Process every step and wait for all of them.
    ///
    /// Only setup problems are returned as errors; per-step failures are
    /// logged and recorded in the report.
    pub async fn run(
        &self,
        steps: &StepList,
        layout: &RunLayout,
    ) -> Result<RunReport, DispatchError> {
        let run_id = Uuid::new_v4().to_string();
        let started_at = Local::now().to_rfc3339();
        let start = Instant::now();

        if steps.has_duplicates() {
            tracing::warn!(
                "steps contain {} duplicate value(s), deduplicated to {:?}",
                steps.duplicates(),
                steps.steps()
            );
        }

        layout.ensure_output_dir()?;

        let workers = self.worker_count_for(steps.len());
        tracing::info!(
            "run {} for version {}: {} steps on {} workers",
            run_id,
            layout.version(),
            steps.len(),
            workers
        );

        let tasks: Vec<MergeTask> = steps
            .steps()
            .iter()
            .map(|&step| MergeTask::new(step, layout))
            .collect();
        let task_steps: Vec<_> = tasks.iter().map(|t| t.step).collect();

        let progress = Arc::new(Mutex::new(ProgressMonitor::new(
            tasks.len(),
            self.opts.progress_bar,
        )));

        let runner = self.runner.clone();
        let converter = self.converter.clone();
        let monitor = progress.clone();
        let results = execute_bounded(tasks, workers, move |task: MergeTask| {
            let runner = runner.clone();
            let converter = converter.clone();
            let monitor = monitor.clone();
            async move {
                let outcome = process_step(&task, runner.as_ref(), &converter).await;
                if let Ok(mut m) = monitor.lock() {
                    m.complete_step(task.step, !outcome.is_failure());
                }
                outcome
            }
        })
        .await?;

        let mut outcomes = BTreeMap::new();
        for (idx, res) in results {
            let step = task_steps[idx];
            let outcome = res.unwrap_or_else(|e| {
                tracing::error!("step {} worker crashed: {}", step, e);
                StepOutcome::Errored {
                    message: format!("worker crashed: {e}"),
                }
            });
            outcomes.insert(step, outcome);
        }

        if let Ok(m) = progress.lock() {
            m.finish();
        }

        let report = RunReport {
            run_id,
            version: layout.version().to_string(),
            started_at,
            duration_ms: start.elapsed().as_millis() as u64,
            workers,
            duplicates: steps.duplicates(),
            outcomes,
        };

        tracing::info!(
            "all merge tasks finished: converted={} already_done={} missing={} dry_run={} failed={} ({}ms)",
            report.converted(),
            report.already_done(),
            report.missing(),
            report.dry_run(),
            report.failed(),
            report.duration_ms
        );
        if report.failed() > 0 {
            tracing::warn!("failed steps: {:?}", report.failed_steps());
        }

        Ok(report)
    }
}
