use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use sheet_analyst_core::api as core_api;

use super::http_client::HttpClient;
use super::wire::{
    AttachmentPayload, ContentPart, CreateAgentRequest, CreateMessageRequest, CreateRunRequest,
    OutputItem, RunObject, ToolPayload,
};

pub struct HttpAgentService {
    client: HttpClient,
}

impl HttpAgentService {
    pub fn new(cfg: &core_api::ServiceConfig) -> Result<Self> {
        let client = HttpClient::new(
            cfg.base_url.clone(),
            cfg.api_key.clone(),
            cfg.organization.clone(),
            cfg.timeout_ms,
        )?;
        Ok(Self { client })
    }

    pub fn from_client(client: HttpClient) -> Self {
        Self { client }
    }
}

fn role_str(role: core_api::Role) -> &'static str {
    match role {
        core_api::Role::User => "user",
    }
}

/// Unknown statuses count as running so the deadline still applies.
fn map_status(raw: &str, run_id: &str) -> core_api::JobStatus {
    core_api::JobStatus::from_wire(raw).unwrap_or_else(|| {
        tracing::warn!(
            target: "sheet_analyst.http",
            run_id = %run_id,
            status = %raw,
            "unknown run status, treating as running"
        );
        core_api::JobStatus::Running
    })
}

pub(crate) fn run_to_job(run: RunObject, thread_id: &str, agent_id: &str) -> core_api::Job {
    let status = map_status(&run.status, &run.id);
    let output = run
        .output
        .into_iter()
        .filter_map(|item| match item {
            OutputItem::OutputText { text } => Some(core_api::OutputArtifact::Text { text }),
            OutputItem::OutputFile { file_id, filename } => {
                Some(core_api::OutputArtifact::File { file_id, filename })
            }
            OutputItem::Other => None,
        })
        .collect();
    core_api::Job {
        id: run.id,
        thread_id: run.thread_id.unwrap_or_else(|| thread_id.to_string()),
        agent_id: run.agent_id.unwrap_or_else(|| agent_id.to_string()),
        status,
        output,
        output_text: run.output_text,
        last_error: run.last_error.map(|e| core_api::JobError {
            code: e.code,
            message: e.message,
        }),
    }
}

#[async_trait]
impl core_api::AgentService for HttpAgentService {
    fn name(&self) -> &str {
        "agent_http"
    }

    async fn upload_file(&self, path: &Path) -> Result<String> {
        Ok(self.client.upload_file(path).await?.id)
    }

    async fn create_agent(&self, spec: &core_api::AgentSpec) -> Result<core_api::AgentDefinition> {
        let req = CreateAgentRequest {
            name: &spec.name,
            model: &spec.model,
            instructions: &spec.instructions,
            tools: spec
                .capabilities
                .iter()
                .map(|c| ToolPayload {
                    kind: c.as_str().to_string(),
                })
                .collect(),
        };
        let obj = self.client.create_agent(&req).await?;
        Ok(core_api::AgentDefinition {
            id: obj.id,
            spec: spec.clone(),
        })
    }

    async fn create_thread(&self) -> Result<core_api::ConversationThread> {
        let obj = self.client.create_thread().await?;
        Ok(core_api::ConversationThread { id: obj.id })
    }

    async fn create_message(&self, thread_id: &str, message: &core_api::UserMessage) -> Result<()> {
        let req = CreateMessageRequest {
            role: role_str(message.role),
            content: vec![ContentPart::InputText {
                text: &message.text,
            }],
            attachments: message
                .attachments
                .iter()
                .map(|file_id| AttachmentPayload {
                    file_id: file_id.as_str(),
                })
                .collect(),
        };
        self.client.create_message(thread_id, &req).await
    }

    async fn create_job(&self, thread_id: &str, agent_id: &str) -> Result<core_api::Job> {
        let run = self
            .client
            .create_run(thread_id, &CreateRunRequest { agent_id })
            .await?;
        Ok(run_to_job(run, thread_id, agent_id))
    }

    async fn get_job(&self, thread_id: &str, job_id: &str) -> Result<core_api::Job> {
        let run = self.client.get_run(thread_id, job_id).await?;
        Ok(run_to_job(run, thread_id, ""))
    }

    async fn cancel_job(&self, thread_id: &str, job_id: &str) -> Result<()> {
        self.client.cancel_run(thread_id, job_id).await
    }

    async fn file_content(&self, file_id: &str) -> Result<Bytes> {
        self.client.file_content(file_id).await
    }
}
