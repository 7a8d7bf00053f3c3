//! Stable re-exports for consumers (`cli`, `plugins`, and external crates).
//!
//! Prefer importing from `sheet_analyst_core::api` instead of reaching into internal modules.

pub use crate::agent::{
    AgentDefinition, AgentService, AgentSpec, Capability, CompletedJob, ConversationThread,
    InputFile, Job, JobError, JobStatus, OutputArtifact, Role, UserMessage, ANALYST_INSTRUCTIONS,
    DATA_DICTIONARY_FILENAME, DEFAULT_QUESTION,
};
pub use crate::config::{
    load_default, AgentConfig, AppConfig, LoggingConfig, PollingConfig, ServiceConfig,
};
pub use crate::error::{AnalysisError, CliError, ErrorCode, Phase};
pub use crate::orchestrator::{
    await_completion, define_agent, fetch_artifacts, run_analysis, start_job, upload_file,
    validate_input, AnalysisReport, AwaitArgs, Clock, FetchedArtifacts, PollSettings,
    RunAnalysisArgs, RunObserver, TokioClock,
};
