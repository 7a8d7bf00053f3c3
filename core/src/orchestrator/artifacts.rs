use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::agent::{AgentService, CompletedJob};
use crate::error::{AnalysisError, Phase};

use super::observer::RunObserver;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchedArtifacts {
    pub texts: Vec<String>,
    /// One entry per file artifact, in output order.
    pub saved: Vec<PathBuf>,
}

/// Local name for a remote file: last component of the suggested name, or
/// the file id when nothing usable is left.
pub fn artifact_filename(file_id: &str, suggested: Option<&str>) -> String {
    suggested
        .and_then(last_component)
        .or_else(|| last_component(file_id))
        .unwrap_or_else(|| "artifact".to_string())
}

fn last_component(raw: &str) -> Option<String> {
    raw.trim()
        .rsplit(['/', '\\'])
        .next()
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "." && *s != "..")
        .map(str::to_string)
}

/// Downloads file artifacts in output order. Later duplicates overwrite
/// earlier ones; files already written stay on disk if a later download
/// fails, and the observer has already been told about each of them.
pub async fn fetch_artifacts(
    service: &dyn AgentService,
    completed: &CompletedJob,
    destination: &Path,
    observer: Option<&dyn RunObserver>,
) -> Result<FetchedArtifacts, AnalysisError> {
    let texts = completed.job.texts();

    tokio::fs::create_dir_all(destination)
        .await
        .map_err(|source| AnalysisError::Persist {
            path: destination.to_path_buf(),
            source,
        })?;

    let mut saved = Vec::new();
    let mut seen = HashSet::new();
    for (file_id, suggested) in completed.job.file_artifacts() {
        let filename = artifact_filename(file_id, suggested);
        if !seen.insert(filename.clone()) {
            tracing::warn!(
                target: "sheet_analyst.artifacts",
                file_id = %file_id,
                filename = %filename,
                "duplicate artifact name, overwriting earlier file"
            );
        }

        tracing::debug!(
            target: "sheet_analyst.artifacts",
            stage = "download.in",
            file_id = %file_id,
            filename = %filename
        );
        let content = service
            .file_content(file_id)
            .await
            .map_err(AnalysisError::transport(Phase::Download))?;

        let path = destination.join(&filename);
        tokio::fs::write(&path, &content)
            .await
            .map_err(|source| AnalysisError::Persist {
                path: path.clone(),
                source,
            })?;
        tracing::info!(
            target: "sheet_analyst.artifacts",
            stage = "download.out",
            file_id = %file_id,
            path = %path.display(),
            bytes = content.len()
        );
        if let Some(observer) = observer {
            observer.on_saved(&path);
        }
        saved.push(path);
    }

    Ok(FetchedArtifacts { texts, saved })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{Job, JobStatus, OutputArtifact};
    use bytes::Bytes;
    use std::time::Duration;

    struct NoFiles;

    #[async_trait::async_trait]
    impl AgentService for NoFiles {
        fn name(&self) -> &str {
            "no_files"
        }
        async fn upload_file(&self, _: &Path) -> anyhow::Result<String> {
            unreachable!()
        }
        async fn create_agent(
            &self,
            _: &crate::agent::AgentSpec,
        ) -> anyhow::Result<crate::agent::AgentDefinition> {
            unreachable!()
        }
        async fn create_thread(&self) -> anyhow::Result<crate::agent::ConversationThread> {
            unreachable!()
        }
        async fn create_message(
            &self,
            _: &str,
            _: &crate::agent::UserMessage,
        ) -> anyhow::Result<()> {
            unreachable!()
        }
        async fn create_job(&self, _: &str, _: &str) -> anyhow::Result<Job> {
            unreachable!()
        }
        async fn get_job(&self, _: &str, _: &str) -> anyhow::Result<Job> {
            unreachable!()
        }
        async fn cancel_job(&self, _: &str, _: &str) -> anyhow::Result<()> {
            unreachable!()
        }
        async fn file_content(&self, _: &str) -> anyhow::Result<Bytes> {
            Ok(Bytes::from_static(b"x"))
        }
    }

    fn completed_with_file() -> CompletedJob {
        CompletedJob {
            job: Job {
                id: "run_1".into(),
                thread_id: "thread_1".into(),
                agent_id: "agent_1".into(),
                status: JobStatus::Succeeded,
                output: vec![OutputArtifact::File {
                    file_id: "f1".into(),
                    filename: Some("chart.png".into()),
                }],
                output_text: None,
                last_error: None,
            },
            polls: 1,
            waited: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn destination_that_is_a_file_is_persist_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("out");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let err = fetch_artifacts(&NoFiles, &completed_with_file(), &blocker, None)
            .await
            .unwrap_err();
        match &err {
            AnalysisError::Persist { path, .. } => assert_eq!(path, &blocker),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(err.phase(), Some(Phase::Download));
        assert_eq!(err.error_code().exit_code(), 61);
    }

    #[test]
    fn filename_uses_suggestion() {
        assert_eq!(artifact_filename("f1", Some("chart.png")), "chart.png");
    }

    #[test]
    fn filename_strips_sandbox_directories() {
        assert_eq!(
            artifact_filename("f1", Some("/mnt/data/data_dictionary.json")),
            "data_dictionary.json"
        );
        assert_eq!(artifact_filename("f1", Some("..\\..\\evil.txt")), "evil.txt");
    }

    #[test]
    fn filename_falls_back_to_file_id() {
        assert_eq!(artifact_filename("file-abc", None), "file-abc");
        assert_eq!(artifact_filename("file-abc", Some("  ")), "file-abc");
        assert_eq!(artifact_filename("file-abc", Some("/mnt/data/")), "file-abc");
        assert_eq!(artifact_filename("file-abc", Some("..")), "file-abc");
    }

    #[test]
    fn filename_never_empty() {
        assert_eq!(artifact_filename("", None), "artifact");
    }
}
