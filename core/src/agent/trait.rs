use std::path::Path;

use async_trait::async_trait;
use bytes::Bytes;

use super::models::{AgentDefinition, AgentSpec, ConversationThread, Job, UserMessage};

/// Capability set of the remote agent service.
///
/// Every method is a single request. Implementations must not retry; callers
/// decide what a failure means for the run.
#[async_trait]
pub trait AgentService: Send + Sync {
    fn name(&self) -> &str;

    /// Upload `path` and return the remote file id.
    async fn upload_file(&self, path: &Path) -> anyhow::Result<String>;
    async fn create_agent(&self, spec: &AgentSpec) -> anyhow::Result<AgentDefinition>;
    async fn create_thread(&self) -> anyhow::Result<ConversationThread>;
    async fn create_message(&self, thread_id: &str, message: &UserMessage) -> anyhow::Result<()>;
    async fn create_job(&self, thread_id: &str, agent_id: &str) -> anyhow::Result<Job>;
    async fn get_job(&self, thread_id: &str, job_id: &str) -> anyhow::Result<Job>;
    async fn cancel_job(&self, thread_id: &str, job_id: &str) -> anyhow::Result<()>;
    async fn file_content(&self, file_id: &str) -> anyhow::Result<Bytes>;
}
