use std::path::Path;

use crate::agent::{AgentService, InputFile};
use crate::error::{AnalysisError, Phase};

/// Local checks only: the path must be a readable regular file. Returns its
/// size in bytes.
pub async fn validate_input(path: &Path) -> Result<u64, AnalysisError> {
    let meta = tokio::fs::metadata(path).await.map_err(|e| {
        AnalysisError::InvalidInput(format!("cannot access {}: {}", path.display(), e))
    })?;
    if !meta.is_file() {
        return Err(AnalysisError::InvalidInput(format!(
            "{} is not a regular file",
            path.display()
        )));
    }
    tokio::fs::File::open(path).await.map_err(|e| {
        AnalysisError::InvalidInput(format!("cannot read {}: {}", path.display(), e))
    })?;
    Ok(meta.len())
}

/// No request is made unless `validate_input` passes.
pub async fn upload_file(
    service: &dyn AgentService,
    path: &Path,
) -> Result<InputFile, AnalysisError> {
    let bytes = validate_input(path).await?;

    tracing::debug!(
        target: "sheet_analyst.upload",
        stage = "upload.in",
        backend = service.name(),
        path = %path.display(),
        bytes = bytes
    );
    let file_id = service
        .upload_file(path)
        .await
        .map_err(AnalysisError::transport(Phase::Upload))?;
    if file_id.trim().is_empty() {
        return Err(AnalysisError::Transport {
            phase: Phase::Upload,
            source: anyhow::anyhow!("service returned an empty file id"),
        });
    }
    tracing::info!(
        target: "sheet_analyst.upload",
        stage = "upload.out",
        file_id = %file_id
    );

    Ok(InputFile {
        path: path.to_path_buf(),
        file_id,
        bytes,
    })
}
