use clap::Parser;
use sheet_analyst::app;
use sheet_analyst::commands::cli;
use sheet_analyst::exit::exit_code_for_error;
use sheet_analyst::logging::init_tracing;
use sheet_analyst_core::api as core_api;
use sheet_analyst_core::api::{CliError, ErrorCode};

#[tokio::main]
async fn main() {
    let exit = match real_main().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e}");
            exit_code_for_error(&e)
        }
    };

    std::process::exit(exit);
}

async fn real_main() -> Result<i32, CliError> {
    let args = cli::Args::parse();
    let cfg = core_api::load_default().map_err(|e| CliError::Config(e.to_string()))?;
    if let Some(path) = init_tracing(&cfg.logging).map_err(CliError::Command)? {
        tracing::debug!(target: "sheet_analyst.cli", log_file = %path.display());
    }

    // First Ctrl-C aborts the run gracefully; a second one exits immediately.
    let (abort_tx, abort_rx) = tokio::sync::mpsc::channel::<String>(1);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        tracing::warn!(target: "sheet_analyst.cli", "Ctrl-C received, cancelling run");
        let _ = abort_tx.send("interrupted by Ctrl-C".to_string()).await;
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("interrupted again, exiting");
            std::process::exit(ErrorCode::Cancelled.exit_code());
        }
    });

    app::run_app(args, cfg, Some(abort_rx)).await
}
