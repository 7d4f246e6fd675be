mod traits;
pub mod types;

pub use traits::ExternalRunner;
pub use types::{converter_argv, ExternalOutcome};
