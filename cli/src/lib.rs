//! sheet-analyst CLI library; modules are public for unit tests.

pub mod app;
pub mod commands;
pub mod exit;
pub mod logging;
pub mod progress;
pub mod report;
