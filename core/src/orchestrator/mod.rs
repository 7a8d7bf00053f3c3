//! One remote analysis job, end to end: upload → agent → thread/message/run →
//! poll → download.
pub mod artifacts;
pub mod clock;
pub mod observer;
pub mod poll;
pub mod run;
pub mod submit;
pub mod upload;

pub use artifacts::{artifact_filename, fetch_artifacts, FetchedArtifacts};
pub use clock::{Clock, TokioClock};
pub use observer::RunObserver;
pub use poll::{await_completion, effective_interval, effective_timeout, AwaitArgs, PollSettings};
pub use run::{run_analysis, AnalysisReport, RunAnalysisArgs};
pub use submit::{define_agent, start_job};
pub use upload::{upload_file, validate_input};
