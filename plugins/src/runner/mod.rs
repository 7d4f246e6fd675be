pub mod dry_run;
pub mod process;

pub use dry_run::DryRunRunner;
pub use process::ProcessRunner;
