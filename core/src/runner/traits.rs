use async_trait::async_trait;

use super::types::ExternalOutcome;

/// Runs the external converter.
///
/// `argv[0]` is the program, the rest are its arguments. An `Err` means the
/// command could not be run at all; a non-zero exit is reported through
/// [`ExternalOutcome::exit_code`].
#[async_trait]
pub trait ExternalRunner: Send + Sync {
    fn name(&self) -> &str;
    async fn run(&self, argv: &[String]) -> anyhow::Result<ExternalOutcome>;
}
