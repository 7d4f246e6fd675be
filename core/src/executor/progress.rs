use indicatif::{ProgressBar, ProgressStyle};

use crate::steps::Step;

/// Progress bar over the steps of a run, one tick per finished step.
pub struct ProgressMonitor {
    bar: ProgressBar,
    failed: usize,
    enabled: bool,
}

impl ProgressMonitor {
    /// Create a new progress monitor
    ///
    /// # Arguments
    ///
    /// * `total_steps` - Number of steps that will be processed
    /// * `enabled` - Whether to draw anything at all
    pub fn new(total_steps: usize, enabled: bool) -> Self {
        if !enabled {
            return Self {
                bar: ProgressBar::hidden(),
                failed: 0,
                enabled: false,
            };
        }

        let bar = ProgressBar::new(total_steps as u64);
        let style = ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} steps ({percent}%) {msg}")
            .map(|s| s.progress_chars("█▓▒░  "))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);
        bar.set_message("starting...");

        Self {
            bar,
            failed: 0,
            enabled: true,
        }
    }

    pub fn complete_step(&mut self, step: Step, success: bool) {
        if !self.enabled {
            return;
        }

        if !success {
            self.failed += 1;
        }
        self.bar.inc(1);
        if self.failed > 0 {
            self.bar
                .set_message(format!("step {step} done, {} failed", self.failed));
        } else {
            self.bar.set_message(format!("step {step} done"));
        }
    }

    pub fn finish(&self) {
        if !self.enabled {
            return;
        }

        let msg = if self.failed == 0 {
            "all steps finished".to_string()
        } else {
            format!("finished with {} failed steps", self.failed)
        };
        self.bar.finish_with_message(msg);
    }
}
