use std::path::{Path, PathBuf};

use crate::config::PathsConfig;
use crate::error::DispatchError;
use crate::steps::Step;

/// Input and output directories of one version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunLayout {
    version: String,
    input_base: PathBuf,
    output_base: PathBuf,
}

impl RunLayout {
    pub fn new(ckpt_root: impl AsRef<Path>, model_root: impl AsRef<Path>, version: &str) -> Self {
        Self {
            version: version.to_string(),
            input_base: ckpt_root.as_ref().join(version).join("_actor"),
            output_base: model_root.as_ref().join(version),
        }
    }

    pub fn from_config(paths: &PathsConfig, version: &str) -> Self {
        Self::new(&paths.ckpt_root, &paths.model_root, version)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// `<ckpt_root>/<version>/_actor`
    pub fn input_base(&self) -> &Path {
        &self.input_base
    }

    /// `<model_root>/<version>`
    pub fn output_base(&self) -> &Path {
        &self.output_base
    }

    pub fn step_dir(&self, step: Step) -> PathBuf {
        step_dir(&self.input_base, step)
    }

    pub fn output_file(&self, step: Step) -> PathBuf {
        output_file(&self.output_base, step)
    }

    /// Create the output base (with parents) if it does not exist yet.
    pub fn ensure_output_dir(&self) -> Result<(), DispatchError> {
        std::fs::create_dir_all(&self.output_base).map_err(|source| DispatchError::OutputDir {
            path: self.output_base.clone(),
            source,
        })?;
        tracing::info!("output dir ready: {}", self.output_base.display());
        Ok(())
    }
}

pub fn step_dir(input_base: &Path, step: Step) -> PathBuf {
    input_base.join(format!("global_step{step}"))
}

pub fn output_file(output_base: &Path, step: Step) -> PathBuf {
    output_base.join(format!("pytorch_model_fp32_step{step}"))
}
