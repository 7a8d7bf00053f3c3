use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::agent::JobStatus;

use super::code::ErrorCode;

/// Which step of the pipeline a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Upload,
    AgentConfig,
    Submission,
    Polling,
    Download,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Upload => "upload",
            Self::AgentConfig => "agent configuration",
            Self::Submission => "job submission",
            Self::Polling => "polling",
            Self::Download => "artifact download",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("{phase} failed: {source:#}")]
    Transport {
        phase: Phase,
        #[source]
        source: anyhow::Error,
    },

    #[error("polling failed: job {job_id} ended as {status}{}", .detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default())]
    JobFailed {
        job_id: String,
        status: JobStatus,
        detail: Option<String>,
    },

    #[error("polling failed: job {job_id} still {last_status} after {}s", .waited.as_secs())]
    Timeout {
        job_id: String,
        waited: Duration,
        last_status: JobStatus,
    },

    #[error("{phase} cancelled{}: {reason}", .job_id.as_deref().map(|j| format!(" (job {j})")).unwrap_or_default())]
    Cancelled {
        phase: Phase,
        job_id: Option<String>,
        reason: String,
    },

    #[error("artifact download failed: cannot write {}: {source}", .path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AnalysisError {
    pub fn transport(phase: Phase) -> impl FnOnce(anyhow::Error) -> Self {
        move |source| Self::Transport { phase, source }
    }

    pub fn phase(&self) -> Option<Phase> {
        match self {
            Self::InvalidInput(_) => None,
            Self::Transport { phase, .. } => Some(*phase),
            Self::JobFailed { .. } | Self::Timeout { .. } => Some(Phase::Polling),
            Self::Cancelled { phase, .. } => Some(*phase),
            Self::Persist { .. } => Some(Phase::Download),
        }
    }

    /// Transport failures map to `BackendError`; the CLI refines them once it
    /// can see the concrete HTTP error.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::InvalidInput(_) => ErrorCode::ValidationError,
            Self::Transport { .. } => ErrorCode::BackendError,
            Self::JobFailed { .. } => ErrorCode::JobFailed,
            Self::Timeout { .. } => ErrorCode::Timeout,
            Self::Cancelled { .. } => ErrorCode::Cancelled,
            Self::Persist { .. } => ErrorCode::FileAccessDenied,
        }
    }
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error("analysis failed: {0}")]
    Analysis(#[from] AnalysisError),
    #[error("config error: {0}")]
    Config(String),
    #[error("command failed: {0}")]
    Command(String),
}
