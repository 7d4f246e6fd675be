use std::path::Path;

use crate::config::ConverterConfig;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExternalOutcome {
    /// Process exit code, -1 when terminated by a signal.
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    /// Set by runners that did not actually execute anything.
    pub simulated: bool,
}

impl ExternalOutcome {
    pub fn success() -> Self {
        Self::default()
    }

    pub fn failure(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stderr: stderr.into(),
            ..Self::default()
        }
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}

/// `<command...> <input_dir> <output_path> --tag <tag>`
pub fn converter_argv(cfg: &ConverterConfig, input_dir: &Path, output_path: &Path) -> Vec<String> {
    let mut argv = cfg.command.clone();
    argv.push(input_dir.to_string_lossy().to_string());
    argv.push(output_path.to_string_lossy().to_string());
    argv.push("--tag".to_string());
    argv.push(cfg.tag.clone());
    argv
}
