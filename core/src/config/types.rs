use serde::{Deserialize, Serialize};

/// Hard upper bound on the worker pool, regardless of configuration.
pub const MAX_WORKERS_CAP: usize = 64;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub converter: ConverterConfig,

    #[serde(default)]
    pub concurrency: ConcurrencyConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_enabled")]
    pub enabled: bool,

    /// If true, log to stderr.
    #[serde(default = "default_logging_console")]
    pub console: bool,

    /// If true, log to a file under `directory`.
    #[serde(default = "default_logging_file")]
    pub file: bool,

    /// EnvFilter string, e.g. "info" or "ckptmerge_core=debug".
    #[serde(default = "default_logging_level")]
    pub level: String,

    /// Directory for log files. Defaults to `~/.ckptmerge/logs`; the OS temp
    /// dir is used only when no home directory can be found.
    #[serde(default)]
    pub directory: Option<String>,
}

fn default_logging_enabled() -> bool {
    true
}

fn default_logging_console() -> bool {
    true
}

fn default_logging_file() -> bool {
    false
}

fn default_logging_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_logging_enabled(),
            console: default_logging_console(),
            file: default_logging_file(),
            level: default_logging_level(),
            directory: None,
        }
    }
}

/// Roots under which the per-version input and output directories live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Training checkpoints: `<ckpt_root>/<version>/_actor/global_step<N>`.
    #[serde(default = "default_ckpt_root")]
    pub ckpt_root: String,

    /// Converted models: `<model_root>/<version>/pytorch_model_fp32_step<N>`.
    #[serde(default = "default_model_root")]
    pub model_root: String,
}

fn default_ckpt_root() -> String {
    "./ckpts".to_string()
}

fn default_model_root() -> String {
    "./model".to_string()
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            ckpt_root: default_ckpt_root(),
            model_root: default_model_root(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// Program plus leading arguments; the step directory, output path and
    /// `--tag <tag>` are appended per step.
    #[serde(default = "default_converter_command")]
    pub command: Vec<String>,

    #[serde(default)]
    pub tag: String,

    /// Log only the argv instead of spawning the converter.
    #[serde(default)]
    pub dry_run: bool,
}

fn default_converter_command() -> Vec<String> {
    vec!["python".to_string(), "zero_to_fp32.py".to_string()]
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            command: default_converter_command(),
            tag: String::new(),
            dry_run: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConcurrencyConfig {
    /// Upper bound on workers. Values above 64 are clamped.
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,
}

fn default_max_workers() -> usize {
    MAX_WORKERS_CAP
}

impl Default for ConcurrencyConfig {
    fn default() -> Self {
        Self {
            max_workers: default_max_workers(),
        }
    }
}

impl ConcurrencyConfig {
    pub fn effective_cap(&self) -> usize {
        self.max_workers.clamp(1, MAX_WORKERS_CAP)
    }
}
