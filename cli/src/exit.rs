use sheet_analyst_core::api::{AnalysisError, CliError, ErrorCode};
use sheet_analyst_plugins::agent::AgentHttpError;

fn transport_code(source: &anyhow::Error) -> ErrorCode {
    let http = source
        .chain()
        .find_map(|cause| cause.downcast_ref::<AgentHttpError>());
    match http {
        Some(e) if e.is_auth() => ErrorCode::AuthError,
        Some(e) if e.is_network() => ErrorCode::NetworkError,
        _ => ErrorCode::BackendError,
    }
}

/// Process exit code for a failed run. See `ErrorCode` for the table.
pub fn exit_code_for_error(e: &CliError) -> i32 {
    let code = match e {
        CliError::Config(_) => ErrorCode::ConfigError,
        CliError::Analysis(AnalysisError::Transport { source, .. }) => transport_code(source),
        CliError::Analysis(err) => err.error_code(),
        CliError::Command(_) => ErrorCode::GeneralError,
    };
    code.exit_code()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheet_analyst_core::api::{JobStatus, Phase};
    use std::time::Duration;

    #[test]
    fn analysis_errors_use_their_codes() {
        let timeout = CliError::Analysis(AnalysisError::Timeout {
            job_id: "run_1".into(),
            waited: Duration::from_secs(30),
            last_status: JobStatus::Running,
        });
        assert_eq!(exit_code_for_error(&timeout), 30);

        let failed = CliError::Analysis(AnalysisError::JobFailed {
            job_id: "run_1".into(),
            status: JobStatus::Failed,
            detail: None,
        });
        assert_eq!(exit_code_for_error(&failed), 21);

        let invalid = CliError::Analysis(AnalysisError::InvalidInput("missing".into()));
        assert_eq!(exit_code_for_error(&invalid), 3);

        let cancelled = CliError::Analysis(AnalysisError::Cancelled {
            phase: Phase::Upload,
            job_id: None,
            reason: "interrupted by Ctrl-C".into(),
        });
        assert_eq!(exit_code_for_error(&cancelled), 31);
    }

    #[test]
    fn unwritable_artifact_is_file_access_code() {
        let persist = CliError::Analysis(AnalysisError::Persist {
            path: "out/chart.png".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        });
        assert_eq!(exit_code_for_error(&persist), 61);
    }

    #[test]
    fn config_and_plain_transport() {
        assert_eq!(exit_code_for_error(&CliError::Config("no key".into())), 11);
        let transport = CliError::Analysis(AnalysisError::transport(Phase::Upload)(
            anyhow::anyhow!("boom"),
        ));
        assert_eq!(exit_code_for_error(&transport), 20);
    }
}
