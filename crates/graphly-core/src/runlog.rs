//! Plain-text run log.
//!
//! Every recovered failure and stage-progress line lands here as well as
//! in `tracing` output; the CLI writes the rendered log next to the
//! report. The log survives even when the run aborts fatally.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Info,
    Warn,
    Error,
}

impl Level {
    fn as_str(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}

/// Accumulates timestamped log lines for one run.
#[derive(Debug, Default)]
pub struct RunLog {
    lines: Vec<String>,
}

impl RunLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, level: Level, message: &str) {
        let stamp: DateTime<Utc> = Utc::now();
        self.lines.push(format!(
            "{} [{}] {message}",
            stamp.format("%Y-%m-%d %H:%M:%S"),
            level.as_str()
        ));
    }

    pub fn info(&mut self, message: impl AsRef<str>) {
        tracing::info!("{}", message.as_ref());
        self.push(Level::Info, message.as_ref());
    }

    pub fn warn(&mut self, message: impl AsRef<str>) {
        tracing::warn!("{}", message.as_ref());
        self.push(Level::Warn, message.as_ref());
    }

    pub fn error(&mut self, message: impl AsRef<str>) {
        tracing::error!("{}", message.as_ref());
        self.push(Level::Error, message.as_ref());
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Count of WARN lines (recovered failures).
    pub fn warning_count(&self) -> usize {
        self.lines.iter().filter(|l| l.contains("[WARN]")).count()
    }

    /// Render the full log as newline-terminated text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}
