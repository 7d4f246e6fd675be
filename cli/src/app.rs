use std::path::Path;

use ckptmerge_core::config::{expand_roots, AppConfig};
use ckptmerge_core::error::{CliError, DispatchError};
use ckptmerge_core::{parse_steps, DispatchOpts, Dispatcher, RunLayout, RunReport};

use crate::commands::cli::Args;

/// Fold command-line overrides into the loaded config.
pub fn apply_args(args: &Args, cfg: &mut AppConfig) {
    if let Some(root) = args.ckpt_root.as_ref() {
        cfg.paths.ckpt_root = root.clone();
    }
    if let Some(root) = args.model_root.as_ref() {
        cfg.paths.model_root = root.clone();
    }
    if let Some(n) = args.max_workers {
        cfg.concurrency.max_workers = n;
    }
    if args.dry_run {
        cfg.converter.dry_run = true;
    }
    expand_roots(cfg);
}

/// Run one batch and return the process exit code.
pub async fn run_app(args: &Args, mut cfg: AppConfig) -> Result<i32, CliError> {
    let steps = parse_steps(&args.steps)?;
    apply_args(args, &mut cfg);

    let layout = RunLayout::from_config(&cfg.paths, &args.version);
    let runner = ckptmerge_plugins::factory::build_runner(&cfg.converter);
    let opts = DispatchOpts {
        progress_bar: args.progress,
        ..DispatchOpts::from_config(&cfg)
    };

    tracing::info!(
        "version {}: reading {}, writing {}",
        layout.version(),
        layout.input_base().display(),
        layout.output_base().display()
    );

    let dispatcher = Dispatcher::new(runner, cfg.converter.clone(), opts);
    let report = dispatcher.run(&steps, &layout).await?;

    if let Some(path) = args.report.as_deref() {
        write_report(path, &report)?;
    }

    if args.strict && report.failed() > 0 {
        return Err(CliError::StepsFailed {
            failed: report.failed(),
            total: report.total(),
        });
    }

    Ok(0)
}

/// Process exit status for an error that ended the run.
pub fn exit_code_for_error(e: &CliError) -> i32 {
    // 0: success (step failures included unless --strict)
    // 2: malformed --steps
    // 11: config error
    // 20: setup / IO error
    // 30: step failures under --strict
    // 50: internal/uncategorized
    match e {
        CliError::Usage(_) => 2,
        CliError::Config(_) => 11,
        CliError::Dispatch(de) => match de {
            DispatchError::OutputDir { .. } => 20,
            DispatchError::PoolClosed => 50,
        },
        CliError::StepsFailed { .. } => 30,
        CliError::Io(_) => 20,
        CliError::Anyhow(_) => 50,
    }
}

fn write_report(path: &Path, report: &RunReport) -> Result<(), CliError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(report).map_err(anyhow::Error::from)?;
    std::fs::write(path, json)?;
    tracing::info!("report written to {}", path.display());
    Ok(())
}
