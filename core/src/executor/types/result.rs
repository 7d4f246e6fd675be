use std::collections::BTreeMap;

use serde::Serialize;

use crate::steps::Step;

/// What happened to a single step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepOutcome {
    /// `global_step<N>` does not exist under the input base.
    MissingInput,
    /// The output file was already there; nothing to do.
    AlreadyDone,
    Converted {
        duration_ms: u64,
    },
    /// The converter ran and exited non-zero.
    Failed {
        exit_code: i32,
        stderr: String,
    },
    /// The step could not be processed (spawn failure, fs error, panic).
    Errored {
        message: String,
    },
    /// Dry-run: the converter was not executed.
    DryRun,
}

impl StepOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. } | Self::Errored { .. })
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, Self::MissingInput | Self::AlreadyDone)
    }
}

/// Result of a whole batch.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: String,
    pub version: String,
    pub started_at: String,
    pub duration_ms: u64,
    pub workers: usize,
    pub duplicates: usize,
    pub outcomes: BTreeMap<Step, StepOutcome>,
}

impl RunReport {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn converted(&self) -> usize {
        self.count(|o| matches!(o, StepOutcome::Converted { .. }))
    }

    pub fn missing(&self) -> usize {
        self.count(|o| matches!(o, StepOutcome::MissingInput))
    }

    pub fn already_done(&self) -> usize {
        self.count(|o| matches!(o, StepOutcome::AlreadyDone))
    }

    pub fn dry_run(&self) -> usize {
        self.count(|o| matches!(o, StepOutcome::DryRun))
    }

    pub fn failed(&self) -> usize {
        self.count(StepOutcome::is_failure)
    }

    pub fn failed_steps(&self) -> Vec<Step> {
        self.outcomes
            .iter()
            .filter(|(_, o)| o.is_failure())
            .map(|(step, _)| *step)
            .collect()
    }

    fn count<F: Fn(&StepOutcome) -> bool>(&self, pred: F) -> usize {
        self.outcomes.values().filter(|o| pred(o)).count()
    }
}
