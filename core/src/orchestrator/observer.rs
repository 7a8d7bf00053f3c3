use std::path::Path;
use std::time::Duration;

use crate::agent::Job;

/// Progress hooks for one analysis run. Only `on_status` is required.
pub trait RunObserver: Send + Sync {
    /// Every status the poll loop observes, terminal ones included.
    fn on_status(&self, job: &Job, poll: u32, elapsed: Duration);

    /// Agent text, delivered once the job succeeds and before any download.
    fn on_texts(&self, _texts: &[String]) {}

    /// One call per artifact, right after it is written.
    fn on_saved(&self, _path: &Path) {}
}
