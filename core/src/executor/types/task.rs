use std::path::PathBuf;

use crate::layout::{self, RunLayout};
use crate::steps::Step;

/// One unit of work: convert a single step of one version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeTask {
    pub step: Step,
    pub input_base: PathBuf,
    pub output_base: PathBuf,
    pub version: String,
}

impl MergeTask {
    pub fn new(step: Step, layout: &RunLayout) -> Self {
        Self {
            step,
            input_base: layout.input_base().to_path_buf(),
            output_base: layout.output_base().to_path_buf(),
            version: layout.version().to_string(),
        }
    }

    pub fn step_dir(&self) -> PathBuf {
        layout::step_dir(&self.input_base, self.step)
    }

    pub fn output_file(&self) -> PathBuf {
        layout::output_file(&self.output_base, self.step)
    }
}
