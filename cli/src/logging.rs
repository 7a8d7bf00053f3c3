//! tracing setup: EnvFilter, stderr console layer and an optional per-process log file.
use std::path::PathBuf;

use sheet_analyst_core::api::LoggingConfig;
use sheet_analyst_core::config::get_data_dir;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

static LOG_GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
    std::sync::OnceLock::new();

/// HTTP internals stay at warn unless RUST_LOG asks otherwise.
const QUIET_DEPENDENCIES: &str = "hyper=warn,hyper_util=warn,reqwest=warn,rustls=warn";

fn filter_directives(level: &str) -> String {
    let level = level.trim();
    let level = if level.is_empty() { "warn" } else { level };
    format!("{level},{QUIET_DEPENDENCIES}")
}

/// Configured directory (with `~` expanded), else `~/.sheet-analyst/logs`,
/// else the OS temp dir.
fn log_dir(logging: &LoggingConfig) -> PathBuf {
    if let Some(d) = logging
        .directory
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        return PathBuf::from(shellexpand::tilde(d).as_ref());
    }
    get_data_dir()
        .map(|d| d.join("logs"))
        .unwrap_or_else(|_| std::env::temp_dir().join("sheet-analyst"))
}

fn log_file_name() -> String {
    format!("sheet-analyst.{}.log", std::process::id())
}

/// Returns the log file path when file logging is on.
pub fn init_tracing(logging: &LoggingConfig) -> Result<Option<PathBuf>, String> {
    if !logging.enabled {
        return Ok(None);
    }
    if !logging.console && !logging.file {
        return Err("logging disabled for both console and file".to_string());
    }

    let filter = match std::env::var("RUST_LOG") {
        Ok(v) if !v.trim().is_empty() => EnvFilter::from_default_env(),
        _ => EnvFilter::try_new(filter_directives(&logging.level))
            .map_err(|e| format!("invalid logging.level {:?}: {e}", logging.level))?,
    };

    let mut log_path = None;
    let file_layer = if logging.file {
        let dir = log_dir(logging);
        std::fs::create_dir_all(&dir)
            .map_err(|e| format!("create log dir {} failed: {e}", dir.display()))?;
        let name = log_file_name();
        log_path = Some(dir.join(&name));
        let (writer, guard) =
            tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
        let _ = LOG_GUARD.set(guard);
        Some(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
    } else {
        None
    };

    let console_layer = logging.console.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(atty::is(atty::Stream::Stderr))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(log_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives_keep_http_crates_quiet() {
        assert_eq!(
            filter_directives("debug"),
            format!("debug,{QUIET_DEPENDENCIES}")
        );
        assert!(filter_directives("  ").starts_with("warn,"));
        assert!(EnvFilter::try_new(filter_directives("sheet_analyst=debug")).is_ok());
    }

    #[test]
    fn configured_log_dir_wins() {
        let logging = LoggingConfig {
            directory: Some("/var/log/sheet-analyst".into()),
            ..LoggingConfig::default()
        };
        assert_eq!(log_dir(&logging), PathBuf::from("/var/log/sheet-analyst"));
    }

    #[test]
    fn log_file_is_per_process() {
        assert_eq!(
            log_file_name(),
            format!("sheet-analyst.{}.log", std::process::id())
        );
    }

    #[test]
    fn both_sinks_off_is_rejected() {
        let logging = LoggingConfig {
            console: false,
            file: false,
            ..LoggingConfig::default()
        };
        assert!(init_tracing(&logging).is_err());
    }
}
