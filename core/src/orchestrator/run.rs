use std::future::Future;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc;

use crate::agent::{AgentService, AgentSpec, DATA_DICTIONARY_FILENAME};
use crate::error::{AnalysisError, Phase};

use super::artifacts::fetch_artifacts;
use super::clock::Clock;
use super::observer::RunObserver;
use super::poll::{await_completion, next_abort, AwaitArgs, PollSettings};
use super::submit::{define_agent, start_job};
use super::upload::upload_file;

pub struct RunAnalysisArgs<'a> {
    pub service: &'a dyn AgentService,
    pub clock: &'a dyn Clock,
    pub workbook: &'a Path,
    pub question: &'a str,
    pub agent: AgentSpec,
    pub destination: &'a Path,
    pub settings: PollSettings,
    pub abort_rx: Option<mpsc::Receiver<String>>,
    pub observer: Option<&'a dyn RunObserver>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub input_file_id: String,
    pub agent_id: String,
    pub thread_id: String,
    pub job_id: String,
    pub texts: Vec<String>,
    pub saved: Vec<PathBuf>,
    /// Where the data dictionary landed, if the agent produced one.
    pub data_dictionary: Option<PathBuf>,
    pub polls: u32,
    pub waited_ms: u64,
    pub finished_at: DateTime<Utc>,
}

/// Runs `fut` unless an abort arrives first. A pending abort wins over a
/// ready result.
async fn abortable<T>(
    abort_rx: &mut Option<mpsc::Receiver<String>>,
    phase: Phase,
    job_id: Option<&str>,
    fut: impl Future<Output = Result<T, AnalysisError>>,
) -> Result<T, AnalysisError> {
    tokio::select! {
        biased;
        reason = next_abort(abort_rx.as_mut()) => {
            tracing::warn!(
                target: "sheet_analyst.run",
                stage = "run.abort",
                phase = %phase,
                reason = %reason
            );
            Err(AnalysisError::Cancelled {
                phase,
                job_id: job_id.map(str::to_string),
                reason,
            })
        }
        res = fut => res,
    }
}

/// Upload, configure, submit, wait, download. Stops at the first error or
/// at the first abort, whichever phase it lands in.
pub async fn run_analysis(args: RunAnalysisArgs<'_>) -> Result<AnalysisReport, AnalysisError> {
    let RunAnalysisArgs {
        service,
        clock,
        workbook,
        question,
        agent,
        destination,
        settings,
        mut abort_rx,
        observer,
    } = args;

    let input = abortable(
        &mut abort_rx,
        Phase::Upload,
        None,
        upload_file(service, workbook),
    )
    .await?;
    let agent = abortable(
        &mut abort_rx,
        Phase::AgentConfig,
        None,
        define_agent(service, agent),
    )
    .await?;
    let job = abortable(
        &mut abort_rx,
        Phase::Submission,
        None,
        start_job(service, &agent, question, &input),
    )
    .await?;

    // The poll loop owns remote cancellation once a job exists.
    let completed = await_completion(AwaitArgs {
        service,
        clock,
        job: &job,
        settings,
        abort_rx: abort_rx.as_mut(),
        observer,
    })
    .await?;

    let texts = completed.job.texts();
    if let Some(observer) = observer {
        observer.on_texts(&texts);
    }

    let fetched = abortable(
        &mut abort_rx,
        Phase::Download,
        Some(completed.job.id.as_str()),
        fetch_artifacts(service, &completed, destination, observer),
    )
    .await?;

    let data_dictionary = fetched
        .saved
        .iter()
        .rev()
        .find(|p| p.file_name().is_some_and(|n| n == DATA_DICTIONARY_FILENAME))
        .cloned();
    if data_dictionary.is_none() && !fetched.saved.is_empty() {
        tracing::warn!(
            target: "sheet_analyst.run",
            job_id = %completed.job.id,
            "agent produced files but no {}",
            DATA_DICTIONARY_FILENAME
        );
    }

    Ok(AnalysisReport {
        input_file_id: input.file_id,
        agent_id: agent.id,
        thread_id: completed.job.thread_id.clone(),
        job_id: completed.job.id.clone(),
        texts,
        saved: fetched.saved,
        data_dictionary,
        polls: completed.polls,
        waited_ms: completed.waited.as_millis() as u64,
        finished_at: Utc::now(),
    })
}
