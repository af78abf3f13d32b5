//! CLI output formatting

use crate::core::{CommandStep, ExecutionStatus, Region, RunReport};
use console::Emoji;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "> ");

/// Create a spinner showing the step in flight
pub fn create_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Spinner message for step `index` of `total`
pub fn format_step_progress(index: usize, total: usize, label: &str) -> String {
    format!("[{}/{}] {}", index + 1, total, label)
}

/// Format an execution status for display
pub fn format_status(status: ExecutionStatus) -> String {
    match status {
        ExecutionStatus::Completed => style("COMPLETED").green().to_string(),
        ExecutionStatus::Failed => style("FAILED").red().to_string(),
    }
}

/// Format one planned step: number, label, command, and credential bindings
pub fn format_planned_step(index: usize, step: &CommandStep) -> String {
    let mut line = format!(
        "{:>2}. {}\n    {}",
        index + 1,
        style(step.label()).bold(),
        style(step.command()).dim()
    );
    for binding in step.env() {
        line.push_str(&format!(
            "\n    {} {} <- ${}",
            style("env").cyan(),
            binding.var,
            binding.credential
        ));
    }
    line
}

/// Format a region table row
pub fn format_region(region: &Region) -> String {
    format!("{} {} {}", region.flag, style(region.code).cyan(), region.name)
}

/// One-line summary of a finished run
pub fn format_report_summary(report: &RunReport) -> String {
    let icon = if report.is_success() { CHECK } else { CROSS };
    let elapsed = report
        .finished_at
        .signed_duration_since(report.started_at)
        .to_std()
        .unwrap_or_default();
    format!(
        "{}{} {} ({}/{} steps, {}) - {}",
        icon,
        style(&report.pipeline).bold(),
        format_status(report.status),
        report.completed_steps(),
        report.total_steps,
        format_duration(elapsed),
        style(&report.run_id.to_string()[..8]).dim()
    )
}

pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
