use std::path::Path;
use std::time::Duration;

use sheet_analyst_core::api::{AnalysisReport, Job, RunObserver};

use crate::commands::cli::OutputFormat;
use crate::progress::PollProgress;

fn display_path(path: &Path) -> String {
    path.strip_prefix(".")
        .unwrap_or(path)
        .display()
        .to_string()
}

pub fn text_block(texts: &[String]) -> String {
    texts
        .iter()
        .map(|t| t.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn saved_line(path: &Path) -> String {
    format!("Saved {}", display_path(path))
}

pub fn render_json(report: &AnalysisReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

/// Drives the spinner. In text mode it also prints agent output and each
/// saved file as soon as the pipeline reports them.
pub struct ConsoleObserver<'a> {
    progress: &'a PollProgress,
    format: OutputFormat,
}

impl<'a> ConsoleObserver<'a> {
    pub fn new(progress: &'a PollProgress, format: OutputFormat) -> Self {
        Self { progress, format }
    }

    fn emit(&self, line: String) {
        if self.format == OutputFormat::Text && !line.is_empty() {
            self.progress.suspend(|| println!("{line}"));
        }
    }
}

impl RunObserver for ConsoleObserver<'_> {
    fn on_status(&self, job: &Job, poll: u32, _elapsed: Duration) {
        self.progress.on_status(job, poll);
    }

    fn on_texts(&self, texts: &[String]) {
        self.emit(text_block(texts));
    }

    fn on_saved(&self, path: &Path) {
        self.emit(saved_line(path));
    }
}
