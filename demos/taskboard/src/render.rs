//! Terminal rendering of sync state and content.

use std::io::Write;

use chrono::{DateTime, Utc};
use todosync::core::SyncObserver;
use todosync::sync::{ContentState, StatusTone, SyncStatus, describe_updated_at, format_countdown};
use tracing::debug;

const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const RESET: &str = "\x1b[0m";
const CLEAR_LINE: &str = "\r\x1b[2K";

/// Observer printing the board to a terminal.
///
/// With `ansi` enabled the status is colored and the countdown is redrawn in
/// place on the last line; without it the countdown is not printed at all.
pub struct TerminalRenderer<W> {
    out: W,
    ansi: bool,
    syncing: bool,
}

impl<W: Write + Send> TerminalRenderer<W> {
    /// Renderer writing to `out`.
    pub fn new(out: W, ansi: bool) -> Self {
        Self {
            out,
            ansi,
            syncing: false,
        }
    }

    fn emit(&mut self, text: &str) {
        let prefix = if self.ansi { CLEAR_LINE } else { "" };
        let result = write!(self.out, "{}{}", prefix, text).and_then(|_| self.out.flush());
        if let Err(err) = result {
            debug!(error = %err, "failed to write to terminal");
        }
    }

    fn paint(&self, text: &str, tone: StatusTone) -> String {
        if !self.ansi {
            return text.to_string();
        }
        match tone {
            StatusTone::Alert => format!("{}{}{}", RED, text, RESET),
            StatusTone::Healthy => format!("{}{}{}", GREEN, text, RESET),
            StatusTone::Neutral => text.to_string(),
        }
    }
}

/// Render the task table.
pub fn task_table(content: &ContentState) -> String {
    let mut out = String::new();

    let labels: Vec<&str> = content.labels.iter().map(|l| l.name.as_str()).collect();
    if labels.is_empty() {
        out.push_str("Labels: (none)\n");
    } else {
        out.push_str(&format!("Labels: {}\n", labels.join(", ")));
    }

    if content.tasks.is_empty() {
        out.push_str("No tasks.\n");
        return out;
    }

    let width = content
        .tasks
        .iter()
        .map(|t| t.content.chars().count())
        .max()
        .unwrap_or(0)
        .max("Task".len());

    out.push_str(&format!(
        "{:>3}  {:<width$}  {:<10}  {:>5}\n",
        "#", "Task", "Due", "Score"
    ));
    for (i, task) in content.tasks.iter().enumerate() {
        let due = task
            .due_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "{:>3}  {:<width$}  {:<10}  {:>5}\n",
            i + 1,
            task.content,
            due,
            task.score
        ));
    }
    out
}

/// Render the one-line status.
pub fn status_line(status: &SyncStatus, updated_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let label = status
        .label()
        .map(|l| l.to_string())
        .unwrap_or_else(|| "Starting".to_string());
    format!("[{}] Updated: {}", label, describe_updated_at(updated_at, now))
}

impl<W: Write + Send> SyncObserver for TerminalRenderer<W> {
    fn on_sync_state(&mut self, status: &SyncStatus, updated_at: Option<DateTime<Utc>>) {
        let line = status_line(status, updated_at, Utc::now());
        let line = self.paint(&line, StatusTone::of(status));
        self.emit(&format!("{}\n", line));
    }

    fn on_content(&mut self, content: &ContentState) {
        self.emit(&task_table(content));
    }

    fn on_countdown(&mut self, next_update_seconds: u32) {
        if !self.ansi || self.syncing {
            return;
        }
        self.emit(&format!("Next update in {}", format_countdown(next_update_seconds)));
    }

    fn on_sync_started(&mut self) {
        self.syncing = true;
        if self.ansi {
            self.emit("Syncing...");
        }
    }

    fn on_sync_finished(&mut self) {
        self.syncing = false;
    }
}
