pub mod code;
#[allow(clippy::module_inception)]
pub mod error;

pub use code::ErrorCode;
pub use error::{AnalysisError, CliError, Phase};
