use std::path::{Path, PathBuf};

use super::types::AppConfig;

pub const ENV_CKPT_ROOT: &str = "CKPTMERGE_CKPT_ROOT";
pub const ENV_MODEL_ROOT: &str = "CKPTMERGE_MODEL_ROOT";
/// Split on whitespace, so no argument may contain spaces. Use
/// `converter.command` in the TOML config for such paths.
pub const ENV_CONVERTER: &str = "CKPTMERGE_CONVERTER";

/// Get the default data directory: ~/.ckptmerge
pub fn get_data_dir() -> anyhow::Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(home.join(".ckptmerge"))
}

/// Load configuration.
///
/// Priority: explicit path, then `~/.ckptmerge/config.toml`, then
/// `./config.toml`, then built-in defaults. Environment overrides are applied
/// last.
pub fn load_default(explicit: Option<&Path>) -> anyhow::Result<AppConfig> {
    let data_dir = get_data_dir().ok();

    let mut cfg = match explicit {
        Some(path) => read_config(path)?,
        None => {
            let user_config = data_dir.as_ref().map(|d| d.join("config.toml"));
            let local_config = Path::new("config.toml");
            match user_config.filter(|p| p.exists()) {
                Some(p) => read_config(&p)?,
                None if local_config.exists() => read_config(local_config)?,
                None => AppConfig::default(),
            }
        }
    };

    if cfg
        .logging
        .directory
        .as_deref()
        .map(|s| s.trim().is_empty())
        .unwrap_or(true)
    {
        cfg.logging.directory = data_dir.map(|d| d.join("logs").to_string_lossy().to_string());
    }

    apply_env_overrides(&mut cfg, |key| std::env::var(key).ok());
    expand_roots(&mut cfg);

    Ok(cfg)
}

fn read_config(path: &Path) -> anyhow::Result<AppConfig> {
    let s = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("read {} failed: {e}", path.display()))?;
    let cfg = toml::from_str::<AppConfig>(&s)
        .map_err(|e| anyhow::anyhow!("parse {} failed: {e}", path.display()))?;
    tracing::debug!("loaded config from {}", path.display());
    Ok(cfg)
}

pub fn apply_env_overrides<F>(cfg: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(v) = non_empty(ENV_CKPT_ROOT) {
        cfg.paths.ckpt_root = v;
    }
    if let Some(v) = non_empty(ENV_MODEL_ROOT) {
        cfg.paths.model_root = v;
    }
    if let Some(v) = non_empty(ENV_CONVERTER) {
        cfg.converter.command = v.split_whitespace().map(str::to_string).collect();
    }
}

/// Expand a leading `~` in the configured roots.
pub fn expand_roots(cfg: &mut AppConfig) {
    cfg.paths.ckpt_root = shellexpand::tilde(&cfg.paths.ckpt_root).into_owned();
    cfg.paths.model_root = shellexpand::tilde(&cfg.paths.model_root).into_owned();
}
