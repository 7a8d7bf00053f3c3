use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// A local file after it has been handed to the remote service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    pub path: PathBuf,
    pub file_id: String,
    pub bytes: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    CodeInterpreter,
}

impl Capability {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CodeInterpreter => "code_interpreter",
        }
    }
}

/// Configuration bundle sent once per run. `instructions` is opaque text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSpec {
    pub name: String,
    pub model: String,
    pub instructions: String,
    pub capabilities: Vec<Capability>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentDefinition {
    pub id: String,
    pub spec: AgentSpec,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationThread {
    pub id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserMessage {
    pub role: Role,
    pub text: String,
    pub attachments: Vec<String>,
}

impl UserMessage {
    pub fn with_attachment(text: impl Into<String>, file_id: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            attachments: vec![file_id.into()],
        }
    }
}

/// `created → queued → running → {succeeded | failed | cancelled | expired}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Created,
    Queued,
    Running,
    Succeeded,
    Failed,
    Cancelled,
    Expired,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Succeeded | Self::Failed | Self::Cancelled | Self::Expired
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Queued => "queued",
            Self::Running => "running",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
            Self::Expired => "expired",
        }
    }

    /// Maps a vendor status string. Returns `None` for strings this crate
    /// does not know; callers decide how to treat those.
    pub fn from_wire(raw: &str) -> Option<Self> {
        let status = match raw.trim().to_ascii_lowercase().as_str() {
            "created" => Self::Created,
            "queued" => Self::Queued,
            "in_progress" | "running" | "cancelling" | "requires_action" => Self::Running,
            "completed" | "succeeded" => Self::Succeeded,
            "failed" | "incomplete" => Self::Failed,
            "cancelled" | "canceled" => Self::Cancelled,
            "expired" => Self::Expired,
            _ => return None,
        };
        Some(status)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutputArtifact {
    Text {
        text: String,
    },
    File {
        file_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        filename: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobError {
    pub code: Option<String>,
    pub message: String,
}

impl fmt::Display for JobError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{}: {}", code, self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Snapshot of a remote run as returned by create/poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub id: String,
    pub thread_id: String,
    pub agent_id: String,
    pub status: JobStatus,
    pub output: Vec<OutputArtifact>,
    pub output_text: Option<String>,
    pub last_error: Option<JobError>,
}

impl Job {
    pub fn file_artifacts(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.output.iter().filter_map(|item| match item {
            OutputArtifact::File { file_id, filename } => {
                Some((file_id.as_str(), filename.as_deref()))
            }
            OutputArtifact::Text { .. } => None,
        })
    }

    /// Text segments of the output list. Falls back to the aggregated
    /// `output_text` when the list carries no text items.
    pub fn texts(&self) -> Vec<String> {
        let texts: Vec<String> = self
            .output
            .iter()
            .filter_map(|item| match item {
                OutputArtifact::Text { text } => Some(text.clone()),
                OutputArtifact::File { .. } => None,
            })
            .collect();
        if !texts.is_empty() {
            return texts;
        }
        self.output_text
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| vec![s.to_string()])
            .unwrap_or_default()
    }
}

/// A job observed in `Succeeded`. Only constructed by the poll loop.
#[derive(Debug, Clone)]
pub struct CompletedJob {
    pub job: Job,
    pub polls: u32,
    pub waited: Duration,
}
