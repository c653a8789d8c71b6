//! CLI presenter for output formatting

use std::time::Duration;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::domain::library::RecordedItem;
use crate::domain::session::{PermissionState, RecordingStatus};

/// Presenter for CLI output formatting
pub struct Presenter {
    spinner: Option<ProgressBar>,
}

impl Presenter {
    /// Create a new presenter
    pub fn new() -> Self {
        Self { spinner: None }
    }

    /// Start a spinner with message
    pub fn start_spinner(&mut self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    /// Mark spinner as success and finish
    pub fn spinner_success(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_with_message(format!("{} {}", "✓".green(), message));
        }
    }

    /// Mark spinner as failed and finish
    pub fn spinner_fail(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_with_message(format!("{} {}", "✗".red(), message));
        }
    }

    /// Stop spinner without status
    pub fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Output text to stdout
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Print a key-value pair (for config list)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }

    /// Status line text, e.g. `Recording status: recording`
    pub fn format_status(status: RecordingStatus) -> String {
        format!("Recording status: {}", status)
    }

    /// Print the recording status line
    pub fn status_line(&self, status: RecordingStatus) {
        let line = Self::format_status(status);
        let colored = match status {
            RecordingStatus::Recording => line.red().bold(),
            RecordingStatus::Stopped => line.green(),
            RecordingStatus::Idle => line.normal(),
        };
        println!("{} {}", "●".cyan(), colored);
    }

    /// Print a permission warning when access is not granted
    pub fn permission(&self, state: PermissionState) {
        match state {
            PermissionState::Granted => {}
            PermissionState::Denied => {
                self.warn("Microphone access denied; recording is unavailable")
            }
            PermissionState::Unknown => self.warn("Microphone access could not be confirmed"),
        }
    }

    /// Format elapsed recording time as `m:ss`
    pub fn format_elapsed(elapsed: Duration) -> String {
        let secs = elapsed.as_secs();
        format!("{}:{:02}", secs / 60, secs % 60)
    }

    /// One list row: 1-based position and file name
    pub fn format_item(position: usize, item: &RecordedItem) -> String {
        format!("{:>3}. {}", position, item.file_name)
    }

    /// Print the recordings list, in insertion order
    pub fn item_list(&self, items: &[RecordedItem]) {
        if items.is_empty() {
            self.info("No recordings yet");
            return;
        }
        for (index, item) in items.iter().enumerate() {
            println!("{}", Self::format_item(index + 1, item));
        }
    }

    /// Print the interactive key help
    pub fn help(&self) {
        println!("{}", "Commands:".bold());
        println!("  {}  start or stop recording", "r, Enter".cyan());
        println!("  {}         list recordings", "l".cyan());
        println!("  {}     play recording n", "p <n>".cyan());
        println!("  {}     delete recording n", "d <n>".cyan());
        println!("  {}         show status", "s".cyan());
        println!("  {}         show this help", "h".cyan());
        println!("  {}         quit", "q".cyan());
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}
