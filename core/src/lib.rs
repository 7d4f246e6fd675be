//! Core of `ckptmerge`: turns a list of training steps into one external
//! converter run per step, on a bounded worker pool.

pub mod config;
pub mod error;
pub mod executor;
pub mod layout;
pub mod runner;
pub mod steps;

pub use executor::{Dispatcher, DispatchOpts, RunReport, StepOutcome};
pub use layout::RunLayout;
pub use steps::{parse_steps, Step, StepList};
