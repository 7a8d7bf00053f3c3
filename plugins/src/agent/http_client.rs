use std::path::Path;
use std::{error::Error as StdError, fmt};

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::wire::{
    CreateAgentRequest, CreateMessageRequest, CreateRunRequest, IdObject, RunObject,
};

const BODY_PREVIEW_LIMIT: usize = 512;
const ORGANIZATION_HEADER: &str = "OpenAI-Organization";
pub const UPLOAD_PURPOSE: &str = "assistants";

/// What went wrong, classified when the error is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentHttpErrorKind {
    /// No response within the per-request timeout.
    Timeout,
    /// Could not reach the service.
    Connect,
    /// 401 or 403: missing, wrong or under-privileged API key.
    Auth,
    /// 429.
    RateLimited,
    /// 5xx.
    Server,
    /// Any other non-success status, usually a malformed request.
    Rejected,
    /// Success status with a body that does not match the expected shape.
    Decode,
    /// Request could not be built or the body stream broke.
    Transport,
}

impl AgentHttpErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Connect => "connect",
            Self::Auth => "auth",
            Self::RateLimited => "rate_limited",
            Self::Server => "server",
            Self::Rejected => "rejected",
            Self::Decode => "decode",
            Self::Transport => "transport",
        }
    }

    fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => Self::Auth,
            429 => Self::RateLimited,
            500..=599 => Self::Server,
            _ => Self::Rejected,
        }
    }
}

impl fmt::Display for AgentHttpErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub struct AgentHttpError {
    kind: AgentHttpErrorKind,
    status: Option<u16>,
    url: String,
    message: String,
    source: Option<reqwest::Error>,
}

impl AgentHttpError {
    pub fn kind(&self) -> AgentHttpErrorKind {
        self.kind
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn is_auth(&self) -> bool {
        self.kind == AgentHttpErrorKind::Auth
    }

    pub fn is_network(&self) -> bool {
        matches!(
            self.kind,
            AgentHttpErrorKind::Timeout | AgentHttpErrorKind::Connect
        )
    }

    fn from_reqwest(err: reqwest::Error, url: String) -> Self {
        let status = err.status().map(|s| s.as_u16());
        let kind = if err.is_timeout() {
            AgentHttpErrorKind::Timeout
        } else if err.is_connect() {
            AgentHttpErrorKind::Connect
        } else if let Some(code) = status {
            AgentHttpErrorKind::from_status(code)
        } else if err.is_decode() {
            AgentHttpErrorKind::Decode
        } else {
            AgentHttpErrorKind::Transport
        };
        AgentHttpError {
            kind,
            status,
            url,
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Non-success response. The vendor's `error.message` is preferred over
    /// the raw body.
    fn from_status(status: u16, url: String, body: &str) -> Self {
        AgentHttpError {
            kind: AgentHttpErrorKind::from_status(status),
            status: Some(status),
            url,
            message: service_message(body),
            source: None,
        }
    }

    fn decode_error(status: u16, url: String, err: serde_json::Error, body: &str) -> Self {
        AgentHttpError {
            kind: AgentHttpErrorKind::Decode,
            status: Some(status),
            url,
            message: format!("unexpected response body ({err}): {}", preview_body(body)),
            source: None,
        }
    }
}

impl fmt::Display for AgentHttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} error (HTTP {status})", self.kind)?,
            None => write!(f, "{} error", self.kind)?,
        }
        write!(f, " from {}: {}", self.url, self.message)
    }
}

impl StdError for AgentHttpError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|err| err as &(dyn StdError + 'static))
    }
}

#[derive(serde::Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(serde::Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(default)]
    code: Option<String>,
}

fn service_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(ErrorEnvelope { error }) if !error.message.trim().is_empty() => match error.code {
            Some(code) => format!("{} [{code}]", error.message.trim()),
            None => error.message.trim().to_string(),
        },
        _ => preview_body(body),
    }
}

fn preview_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty body>".to_string();
    }

    let mut out: String = trimmed.chars().take(BODY_PREVIEW_LIMIT).collect();
    if trimmed.chars().nth(BODY_PREVIEW_LIMIT).is_some() {
        out.push_str("...");
    }
    out
}

async fn read_body(resp: reqwest::Response) -> Result<(u16, String, String), AgentHttpError> {
    let status = resp.status().as_u16();
    let url = resp.url().to_string();
    let body = resp
        .text()
        .await
        .map_err(|err| AgentHttpError::from_reqwest(err, url.clone()))?;
    Ok((status, url, body))
}

async fn parse_json_response<T: DeserializeOwned>(resp: reqwest::Response) -> anyhow::Result<T> {
    let success = resp.status().is_success();
    let (status, url, body) = read_body(resp).await?;
    if !success {
        return Err(AgentHttpError::from_status(status, url, &body).into());
    }
    serde_json::from_str::<T>(&body)
        .map_err(|err| AgentHttpError::decode_error(status, url, err, &body).into())
}

async fn ensure_success(resp: reqwest::Response) -> anyhow::Result<reqwest::Response> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let (status, url, body) = read_body(resp).await?;
    Err(AgentHttpError::from_status(status, url, &body).into())
}

#[derive(Clone)]
pub struct HttpClient {
    api_key: String,
    organization: Option<String>,
    http: reqwest::Client,
    url_files: String,
    url_agents: String,
    url_threads: String,
}

impl HttpClient {
    pub fn new(
        base_url: String,
        api_key: String,
        organization: Option<String>,
        timeout_ms: u64,
    ) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(timeout_ms))
            .build()?;
        let normalized = base_url.trim_end_matches('/').to_string();
        Ok(Self {
            api_key,
            organization: organization.filter(|o| !o.trim().is_empty()),
            http,
            url_files: format!("{}/files", normalized),
            url_agents: format!("{}/agents", normalized),
            url_threads: format!("{}/threads", normalized),
        })
    }

    fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let req = match &self.organization {
            Some(org) => req.header(ORGANIZATION_HEADER, org),
            None => req,
        };
        if self.api_key.trim().is_empty() {
            req
        } else {
            req.bearer_auth(&self.api_key)
        }
    }

    async fn send(
        &self,
        req: reqwest::RequestBuilder,
        url: &str,
    ) -> anyhow::Result<reqwest::Response> {
        self.auth(req)
            .send()
            .await
            .map_err(|err| AgentHttpError::from_reqwest(err, url.to_string()).into())
    }

    async fn post_json<B, T>(&self, url: &str, body: &B) -> anyhow::Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self.send(self.http.post(url).json(body), url).await?;
        parse_json_response(resp).await
    }

    pub async fn upload_file(&self, path: &Path) -> anyhow::Result<IdObject> {
        let url = &self.url_files;
        let content = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        tracing::debug!(
            target: "sheet_analyst.http",
            stage = "http.upload.in",
            url = %url,
            file_name = %file_name,
            bytes = content.len()
        );
        let part = reqwest::multipart::Part::bytes(content).file_name(file_name);
        let form = reqwest::multipart::Form::new()
            .text("purpose", UPLOAD_PURPOSE)
            .part("file", part);
        let resp = self.send(self.http.post(url).multipart(form), url).await?;
        let status = resp.status();
        let obj: IdObject = parse_json_response(resp).await?;
        tracing::debug!(
            target: "sheet_analyst.http",
            stage = "http.upload.out",
            status = %status,
            file_id = %obj.id
        );
        Ok(obj)
    }

    pub async fn create_agent(&self, req: &CreateAgentRequest<'_>) -> anyhow::Result<IdObject> {
        tracing::debug!(
            target: "sheet_analyst.http",
            stage = "http.agent.in",
            url = %self.url_agents,
            model = %req.model,
            tools = req.tools.len()
        );
        let obj: IdObject = self.post_json(&self.url_agents, req).await?;
        tracing::debug!(target: "sheet_analyst.http", stage = "http.agent.out", agent_id = %obj.id);
        Ok(obj)
    }

    pub async fn create_thread(&self) -> anyhow::Result<IdObject> {
        let obj: IdObject = self
            .post_json(&self.url_threads, &serde_json::json!({}))
            .await?;
        tracing::debug!(target: "sheet_analyst.http", stage = "http.thread.out", thread_id = %obj.id);
        Ok(obj)
    }

    pub async fn create_message(
        &self,
        thread_id: &str,
        req: &CreateMessageRequest<'_>,
    ) -> anyhow::Result<()> {
        let url = format!("{}/{}/messages", self.url_threads, thread_id);
        tracing::debug!(
            target: "sheet_analyst.http",
            stage = "http.message.in",
            url = %url,
            attachments = req.attachments.len()
        );
        let resp = self.send(self.http.post(&url).json(req), &url).await?;
        ensure_success(resp).await?;
        Ok(())
    }

    pub async fn create_run(
        &self,
        thread_id: &str,
        req: &CreateRunRequest<'_>,
    ) -> anyhow::Result<RunObject> {
        let url = format!("{}/{}/runs", self.url_threads, thread_id);
        let run: RunObject = self.post_json(&url, req).await?;
        tracing::debug!(
            target: "sheet_analyst.http",
            stage = "http.run.create.out",
            run_id = %run.id,
            status = %run.status
        );
        Ok(run)
    }

    pub async fn get_run(&self, thread_id: &str, run_id: &str) -> anyhow::Result<RunObject> {
        let url = format!("{}/{}/runs/{}", self.url_threads, thread_id, run_id);
        let resp = self.send(self.http.get(&url), &url).await?;
        let run: RunObject = parse_json_response(resp).await?;
        tracing::trace!(
            target: "sheet_analyst.http",
            stage = "http.run.get.out",
            run_id = %run.id,
            status = %run.status,
            output = run.output.len()
        );
        Ok(run)
    }

    pub async fn cancel_run(&self, thread_id: &str, run_id: &str) -> anyhow::Result<()> {
        let url = format!("{}/{}/runs/{}/cancel", self.url_threads, thread_id, run_id);
        let resp = self.send(self.http.post(&url), &url).await?;
        ensure_success(resp).await?;
        Ok(())
    }

    pub async fn file_content(&self, file_id: &str) -> anyhow::Result<Bytes> {
        let url = format!("{}/{}/content", self.url_files, file_id);
        let resp = self.send(self.http.get(&url), &url).await?;
        let resp = ensure_success(resp).await?;
        let body = resp
            .bytes()
            .await
            .map_err(|err| AgentHttpError::from_reqwest(err, url.clone()))?;
        tracing::debug!(
            target: "sheet_analyst.http",
            stage = "http.file.content.out",
            file_id = %file_id,
            bytes = body.len()
        );
        Ok(body)
    }
}
