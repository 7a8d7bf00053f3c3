pub mod instructions;
pub mod models;
pub mod r#trait;

pub use instructions::{
    ANALYST_INSTRUCTIONS, DATA_DICTIONARY_FILENAME, DEFAULT_AGENT_NAME, DEFAULT_MODEL,
    DEFAULT_QUESTION,
};
pub use models::{
    AgentDefinition, AgentSpec, Capability, CompletedJob, ConversationThread, InputFile, Job,
    JobError, JobStatus, OutputArtifact, Role, UserMessage,
};
pub use r#trait::AgentService;
