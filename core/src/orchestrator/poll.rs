use std::time::Duration;

use tokio::sync::mpsc;

use crate::agent::{AgentService, CompletedJob, Job, JobStatus};
use crate::config::PollingConfig;
use crate::error::{AnalysisError, Phase};

use super::clock::Clock;
use super::observer::RunObserver;

pub const MIN_POLL_INTERVAL_MS: u64 = 100;
pub const MAX_POLL_INTERVAL_MS: u64 = 60_000;
pub const MAX_TIMEOUT_SECS: u64 = 6 * 60 * 60;

pub fn effective_interval(interval_ms: u64) -> Duration {
    Duration::from_millis(interval_ms.clamp(MIN_POLL_INTERVAL_MS, MAX_POLL_INTERVAL_MS))
}

pub fn effective_timeout(timeout_secs: u64) -> Duration {
    Duration::from_secs(timeout_secs.clamp(1, MAX_TIMEOUT_SECS))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    pub timeout: Duration,
}

impl From<&PollingConfig> for PollSettings {
    fn from(cfg: &PollingConfig) -> Self {
        Self {
            interval: effective_interval(cfg.interval_ms),
            timeout: effective_timeout(cfg.timeout_secs),
        }
    }
}

pub struct AwaitArgs<'a> {
    pub service: &'a dyn AgentService,
    pub clock: &'a dyn Clock,
    pub job: &'a Job,
    pub settings: PollSettings,
    pub abort_rx: Option<&'a mut mpsc::Receiver<String>>,
    pub observer: Option<&'a dyn RunObserver>,
}

/// Polls once immediately and then once per interval until the job is
/// terminal or the deadline passes. The final wait is clipped to the
/// deadline, so the call returns within `timeout + interval`.
pub async fn await_completion(args: AwaitArgs<'_>) -> Result<CompletedJob, AnalysisError> {
    let AwaitArgs {
        service,
        clock,
        job,
        settings,
        mut abort_rx,
        observer,
    } = args;

    let started = clock.now();
    let mut polls: u32 = 0;
    let mut last_status = job.status;

    loop {
        let current = service
            .get_job(&job.thread_id, &job.id)
            .await
            .map_err(AnalysisError::transport(Phase::Polling))?;
        polls += 1;
        let elapsed = clock.now().saturating_duration_since(started);

        if current.status != last_status || polls == 1 {
            tracing::info!(
                target: "sheet_analyst.poll",
                stage = "poll.status",
                job_id = %current.id,
                status = %current.status,
                poll = polls,
                elapsed_ms = elapsed.as_millis() as u64
            );
        }
        last_status = current.status;
        if let Some(observer) = observer {
            observer.on_status(&current, polls, elapsed);
        }

        match current.status {
            JobStatus::Succeeded => {
                return Ok(CompletedJob {
                    job: current,
                    polls,
                    waited: elapsed,
                });
            }
            JobStatus::Failed | JobStatus::Cancelled | JobStatus::Expired => {
                return Err(AnalysisError::JobFailed {
                    job_id: current.id,
                    status: current.status,
                    detail: current.last_error.map(|e| e.to_string()),
                });
            }
            JobStatus::Created | JobStatus::Queued | JobStatus::Running => {}
        }

        if elapsed >= settings.timeout {
            tracing::warn!(
                target: "sheet_analyst.poll",
                stage = "poll.timeout",
                job_id = %job.id,
                status = %last_status,
                polls = polls
            );
            return Err(AnalysisError::Timeout {
                job_id: job.id.clone(),
                waited: elapsed,
                last_status,
            });
        }

        let wait = settings.interval.min(settings.timeout - elapsed);
        tokio::select! {
            _ = clock.sleep(wait) => {}
            reason = next_abort(abort_rx.as_deref_mut()) => {
                cancel_remote(service, job).await;
                return Err(AnalysisError::Cancelled {
                    phase: Phase::Polling,
                    job_id: Some(job.id.clone()),
                    reason,
                });
            }
        }
    }
}

/// Resolves with the abort reason; never resolves without a live sender.
pub(crate) async fn next_abort(rx: Option<&mut mpsc::Receiver<String>>) -> String {
    if let Some(rx) = rx {
        if let Some(reason) = rx.recv().await {
            return reason;
        }
    }
    std::future::pending().await
}

async fn cancel_remote(service: &dyn AgentService, job: &Job) {
    match service.cancel_job(&job.thread_id, &job.id).await {
        Ok(()) => tracing::info!(
            target: "sheet_analyst.poll",
            stage = "poll.cancel",
            job_id = %job.id,
            "remote cancel requested"
        ),
        Err(e) => tracing::warn!(
            target: "sheet_analyst.poll",
            stage = "poll.cancel",
            job_id = %job.id,
            error = %e,
            "remote cancel failed"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_and_timeout_are_clamped() {
        assert_eq!(effective_interval(0), Duration::from_millis(MIN_POLL_INTERVAL_MS));
        assert_eq!(effective_interval(2_500), Duration::from_millis(2_500));
        assert_eq!(
            effective_interval(u64::MAX),
            Duration::from_millis(MAX_POLL_INTERVAL_MS)
        );
        assert_eq!(effective_timeout(0), Duration::from_secs(1));
        assert_eq!(
            effective_timeout(MAX_TIMEOUT_SECS + 10),
            Duration::from_secs(MAX_TIMEOUT_SECS)
        );
    }

    #[test]
    fn settings_from_config() {
        let cfg = PollingConfig {
            interval_ms: 500,
            timeout_secs: 120,
        };
        let s = PollSettings::from(&cfg);
        assert_eq!(s.interval, Duration::from_millis(500));
        assert_eq!(s.timeout, Duration::from_secs(120));
    }
}
