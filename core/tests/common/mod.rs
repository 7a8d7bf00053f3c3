#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use bytes::Bytes;
use sheet_analyst_core::api::{
    AgentDefinition, AgentService, AgentSpec, Clock, ConversationThread, Job, JobError,
    JobStatus, OutputArtifact, UserMessage,
};

pub const THREAD_ID: &str = "thread_1";
pub const AGENT_ID: &str = "agent_1";
pub const JOB_ID: &str = "run_1";

/// Scripted in-memory agent service. Each `get_job` pops the next status;
/// the last one repeats once the script runs out.
pub struct FakeService {
    pub calls: Mutex<Vec<String>>,
    pub messages: Mutex<Vec<UserMessage>>,
    pub specs: Mutex<Vec<AgentSpec>>,
    statuses: Mutex<VecDeque<JobStatus>>,
    last_status: Mutex<JobStatus>,
    output: Vec<OutputArtifact>,
    output_text: Option<String>,
    last_error: Option<JobError>,
    files: HashMap<String, Vec<u8>>,
    failing_file: Option<String>,
    upload_id: String,
    fail_cancel: bool,
}

impl FakeService {
    pub fn new(statuses: &[JobStatus]) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            messages: Mutex::new(Vec::new()),
            specs: Mutex::new(Vec::new()),
            statuses: Mutex::new(statuses.iter().copied().collect()),
            last_status: Mutex::new(JobStatus::Queued),
            output: Vec::new(),
            output_text: None,
            last_error: None,
            files: HashMap::new(),
            failing_file: None,
            upload_id: "file-upload-1".to_string(),
            fail_cancel: false,
        }
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.output.push(OutputArtifact::Text {
            text: text.to_string(),
        });
        self
    }

    pub fn with_output_text(mut self, text: &str) -> Self {
        self.output_text = Some(text.to_string());
        self
    }

    pub fn with_file(mut self, file_id: &str, filename: Option<&str>, content: &[u8]) -> Self {
        self.output.push(OutputArtifact::File {
            file_id: file_id.to_string(),
            filename: filename.map(str::to_string),
        });
        self.files.insert(file_id.to_string(), content.to_vec());
        self
    }

    pub fn with_last_error(mut self, code: &str, message: &str) -> Self {
        self.last_error = Some(JobError {
            code: Some(code.to_string()),
            message: message.to_string(),
        });
        self
    }

    pub fn failing_download(mut self, file_id: &str) -> Self {
        self.failing_file = Some(file_id.to_string());
        self
    }

    pub fn with_upload_id(mut self, id: &str) -> Self {
        self.upload_id = id.to_string();
        self
    }

    pub fn failing_cancel(mut self) -> Self {
        self.fail_cancel = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn snapshot(&self, status: JobStatus) -> Job {
        let terminal = status == JobStatus::Succeeded;
        Job {
            id: JOB_ID.to_string(),
            thread_id: THREAD_ID.to_string(),
            agent_id: AGENT_ID.to_string(),
            status,
            output: if terminal {
                self.output.clone()
            } else {
                Vec::new()
            },
            output_text: if terminal {
                self.output_text.clone()
            } else {
                None
            },
            last_error: if status == JobStatus::Failed {
                self.last_error.clone()
            } else {
                None
            },
        }
    }
}

#[async_trait]
impl AgentService for FakeService {
    fn name(&self) -> &str {
        "fake"
    }

    async fn upload_file(&self, path: &Path) -> anyhow::Result<String> {
        self.record(format!("upload_file:{}", path.display()));
        Ok(self.upload_id.clone())
    }

    async fn create_agent(&self, spec: &AgentSpec) -> anyhow::Result<AgentDefinition> {
        self.record(format!("create_agent:{}", spec.model));
        self.specs.lock().unwrap().push(spec.clone());
        Ok(AgentDefinition {
            id: AGENT_ID.to_string(),
            spec: spec.clone(),
        })
    }

    async fn create_thread(&self) -> anyhow::Result<ConversationThread> {
        self.record("create_thread".to_string());
        Ok(ConversationThread {
            id: THREAD_ID.to_string(),
        })
    }

    async fn create_message(&self, thread_id: &str, message: &UserMessage) -> anyhow::Result<()> {
        self.record(format!("create_message:{thread_id}"));
        self.messages.lock().unwrap().push(message.clone());
        Ok(())
    }

    async fn create_job(&self, thread_id: &str, agent_id: &str) -> anyhow::Result<Job> {
        self.record(format!("create_job:{thread_id}:{agent_id}"));
        Ok(self.snapshot(JobStatus::Queued))
    }

    async fn get_job(&self, thread_id: &str, job_id: &str) -> anyhow::Result<Job> {
        self.record(format!("get_job:{thread_id}:{job_id}"));
        let next = self.statuses.lock().unwrap().pop_front();
        let mut last = self.last_status.lock().unwrap();
        if let Some(status) = next {
            *last = status;
        }
        Ok(self.snapshot(*last))
    }

    async fn cancel_job(&self, thread_id: &str, job_id: &str) -> anyhow::Result<()> {
        self.record(format!("cancel_job:{thread_id}:{job_id}"));
        if self.fail_cancel {
            anyhow::bail!("cancel rejected");
        }
        Ok(())
    }

    async fn file_content(&self, file_id: &str) -> anyhow::Result<Bytes> {
        self.record(format!("file_content:{file_id}"));
        if self.failing_file.as_deref() == Some(file_id) {
            anyhow::bail!("download of {file_id} failed with status 500");
        }
        self.files
            .get(file_id)
            .map(|b| Bytes::from(b.clone()))
            .ok_or_else(|| anyhow::anyhow!("no such file {file_id}"))
    }
}

/// Virtual clock: `sleep` advances time instantly.
pub struct ManualClock {
    origin: Instant,
    offset: Mutex<Duration>,
    pub sleeps: Mutex<Vec<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
            sleeps: Mutex::new(Vec::new()),
        }
    }

    pub fn elapsed(&self) -> Duration {
        *self.offset.lock().unwrap()
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + *self.offset.lock().unwrap()
    }

    async fn sleep(&self, duration: Duration) {
        {
            *self.offset.lock().unwrap() += duration;
            self.sleeps.lock().unwrap().push(duration);
        }
        tokio::task::yield_now().await;
    }
}

pub fn write_workbook(dir: &Path, name: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"PK\x03\x04 fake workbook").unwrap();
    path
}
