//! Bounded-parallel conversion of checkpoint steps.
//!
//! ```text
//! StepList + RunLayout
//!   ↓
//! Dispatcher::run() → ensure_output_dir(), worker_count()
//!   ↓
//! execute_bounded() → process_step() per MergeTask
//!   ↓
//! RunReport
//! ```

mod engine;
mod progress;
mod scheduler;
pub mod types;
mod worker;

pub use engine::Dispatcher;
pub use progress::ProgressMonitor;
pub use scheduler::{available_parallelism, execute_bounded, worker_count};
pub use types::{DispatchOpts, MergeTask, RunReport, StepOutcome};
pub use worker::process_step;
