//! CLI assembly: merge flag overrides into the config, build the agent service,
//! then hand the pipeline to `run_analysis` and print its report.
use std::path::PathBuf;

use sheet_analyst_core::api as core_api;
use sheet_analyst_core::api::{AnalysisError, CliError};
use tokio::sync::mpsc;

use crate::commands::cli::{Args, OutputFormat};
use crate::progress::PollProgress;
use crate::report::{self, ConsoleObserver};

/// Flags win over config file and environment.
pub fn apply_overrides(args: &Args, cfg: &mut core_api::AppConfig) {
    if let Some(key) = args.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
        cfg.service.api_key = key.to_string();
    }
    if let Some(model) = &args.model {
        cfg.agent.model = model.clone();
    }
    if let Some(url) = &args.base_url {
        cfg.service.base_url = url.clone();
    }
    if let Some(ms) = args.poll_interval_ms {
        cfg.polling.interval_ms = ms;
    }
    if let Some(secs) = args.timeout_secs {
        cfg.polling.timeout_secs = secs;
    }
    if let Some(dir) = &args.output_dir {
        cfg.output.directory = Some(dir.to_string_lossy().to_string());
    }
}

fn output_dir(cfg: &core_api::AppConfig) -> PathBuf {
    match cfg
        .output
        .directory
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        Some(d) => PathBuf::from(shellexpand::tilde(d).as_ref()),
        None => PathBuf::from("."),
    }
}

async fn resolve_instructions(
    args: &Args,
    cfg: &core_api::AppConfig,
) -> Result<String, AnalysisError> {
    let Some(path) = &args.instructions_file else {
        return Ok(cfg.agent.instructions.clone());
    };
    let text = tokio::fs::read_to_string(path).await.map_err(|e| {
        AnalysisError::InvalidInput(format!(
            "cannot read instructions file {}: {}",
            path.display(),
            e
        ))
    })?;
    if text.trim().is_empty() {
        return Err(AnalysisError::InvalidInput(format!(
            "instructions file {} is empty",
            path.display()
        )));
    }
    Ok(text)
}

#[tracing::instrument(name = "cli.run_app", skip(args, cfg, abort_rx))]
pub async fn run_app(
    args: Args,
    mut cfg: core_api::AppConfig,
    abort_rx: Option<mpsc::Receiver<String>>,
) -> Result<i32, CliError> {
    // Local checks run before any credentials are needed.
    core_api::validate_input(&args.workbook).await?;

    apply_overrides(&args, &mut cfg);
    let instructions = resolve_instructions(&args, &cfg).await?;

    let service = sheet_analyst_plugins::factory::build_agent_service(&cfg)
        .map_err(|e| CliError::Config(e.to_string()))?;

    let run_id = uuid::Uuid::new_v4().to_string();
    let destination = output_dir(&cfg);
    let settings = core_api::PollSettings::from(&cfg.polling);
    tracing::debug!(
        run_id = %run_id,
        backend = service.name(),
        model = %cfg.agent.model,
        destination = %destination.display(),
        interval_ms = settings.interval.as_millis() as u64,
        timeout_secs = settings.timeout.as_secs(),
        "run initialized"
    );

    let agent = core_api::AgentSpec {
        name: cfg.agent.name.clone(),
        model: cfg.agent.model.clone(),
        instructions,
        capabilities: vec![core_api::Capability::CodeInterpreter],
    };

    let progress = PollProgress::new(!args.no_progress && atty::is(atty::Stream::Stderr));
    let console = ConsoleObserver::new(&progress, args.format);
    let clock = core_api::TokioClock;

    let result = core_api::run_analysis(core_api::RunAnalysisArgs {
        service: service.as_ref(),
        clock: &clock,
        workbook: &args.workbook,
        question: &args.question,
        agent,
        destination: &destination,
        settings,
        abort_rx,
        observer: Some(&console),
    })
    .await;
    progress.finish(result.is_ok());

    let report = result?;
    tracing::info!(
        run_id = %run_id,
        job_id = %report.job_id,
        polls = report.polls,
        saved = report.saved.len(),
        data_dictionary = report.data_dictionary.is_some(),
        "run finished"
    );

    // Text output was already streamed by the console observer.
    if args.format == OutputFormat::Json {
        let out = report::render_json(&report)
            .map_err(|e| CliError::Command(format!("failed to render report: {e}")))?;
        println!("{out}");
    }
    Ok(0)
}
