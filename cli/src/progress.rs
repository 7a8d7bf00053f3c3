use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use sheet_analyst_core::api::Job;

/// Spinner on stderr that follows the job status while polling.
pub struct PollProgress {
    bar: ProgressBar,
    enabled: bool,
}

impl PollProgress {
    pub fn new(enabled: bool) -> Self {
        if !enabled {
            return Self {
                bar: ProgressBar::hidden(),
                enabled: false,
            };
        }

        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        bar.set_style(style);
        bar.set_message("⏳ submitting job");
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar, enabled: true }
    }

    pub fn set_message(&self, msg: &str) {
        if self.enabled {
            self.bar.set_message(msg.to_string());
        }
    }

    /// Hides the spinner while `f` writes to the terminal.
    pub fn suspend<F: FnOnce() -> R, R>(&self, f: F) -> R {
        self.bar.suspend(f)
    }

    pub fn on_status(&self, job: &Job, poll: u32) {
        self.set_message(&format!("job {} {} (poll {})", job.id, job.status, poll));
    }

    pub fn finish(&self, success: bool) {
        if !self.enabled {
            return;
        }
        if success {
            self.bar.finish_and_clear();
        } else {
            self.bar.abandon_with_message("❌ analysis failed");
        }
    }
}
