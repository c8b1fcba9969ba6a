use crate::error::{AggregatorError, UserFriendlyError};
use crate::extractor::{AggregationProgress, RunReport};
use crate::scanner::VideoFolder;
use console::{style, Emoji, Term};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

// Emojis with text fallbacks
static CHECKMARK: Emoji = Emoji("✅ ", "✓ ");
static CROSS: Emoji = Emoji("❌ ", "✗ ");
static INFO: Emoji = Emoji("ℹ️  ", "i ");
static WARNING: Emoji = Emoji("⚠️  ", "! ");
static ROCKET: Emoji = Emoji("🚀 ", "> ");
static SPARKLES: Emoji = Emoji("✨ ", "* ");

pub struct OutputFormatter {
    mode: OutputMode,
    use_colors: bool,
    verbose_level: u8,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let use_colors = match mode {
            OutputMode::Human => Term::stdout().features().colors_supported() && !quiet,
            _ => false,
        };

        Self {
            mode,
            use_colors,
            verbose_level: if quiet { 0 } else { verbose },
            quiet,
        }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    pub fn success(&self, message: &str) {
        self.emit(Level::Success, message);
    }

    /// Errors are printed even in quiet mode.
    pub fn error(&self, message: &str) {
        self.emit(Level::Error, message);
    }

    pub fn warning(&self, message: &str) {
        self.emit(Level::Warning, message);
    }

    pub fn info(&self, message: &str) {
        self.emit(Level::Info, message);
    }

    pub fn debug(&self, message: &str) {
        self.emit(Level::Debug, message);
    }

    pub fn start_operation(&self, operation: &str) {
        self.emit(Level::Step, operation);
    }

    pub fn print_user_friendly_error(&self, error: &AggregatorError) {
        self.emit(Level::Error, &error.user_message());

        if let Some(suggestion) = error.suggestion() {
            self.emit(Level::Suggestion, &suggestion);
        }
    }

    /// Lists what a run would read and write, for `--dry-run`.
    pub fn print_scan_plan(&self, videos: &[VideoFolder]) {
        match self.mode {
            OutputMode::Json => {
                let plan: Vec<_> = videos
                    .iter()
                    .map(|video| {
                        serde_json::json!({
                            "video_id": video.video_id,
                            "archives": video.archives.iter().map(|a| serde_json::json!({
                                "file": a.filename,
                                "kind": a.kind,
                            })).collect::<Vec<_>>(),
                            "ignored": video.ignored_archives,
                        })
                    })
                    .collect();
                self.print_json_object(&serde_json::json!({ "type": "plan", "videos": plan }));
            }
            _ => {
                for video in videos {
                    println!("  {}", video.video_id);
                    for archive in &video.archives {
                        println!("    [{}] {}", archive.kind, archive.filename);
                    }
                    for ignored in &video.ignored_archives {
                        println!("    [ignored] {}", ignored);
                    }
                }
            }
        }
    }

    pub fn print_aggregation_summary(&self, progress: &AggregationProgress) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => self.print_human_summary(progress),
            OutputMode::Json => self.print_json_summary(progress),
            OutputMode::Plain => self.print_plain_summary(progress),
        }
    }

    pub fn print_run_report(&self, report: &RunReport) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => self.print_human_report(report),
            OutputMode::Json => {
                let json_output =
                    serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string());
                println!("{}", json_output);
            }
            OutputMode::Plain => self.print_plain_report(report),
        }
    }

    pub fn print_header(&self, title: &str) {
        if self.quiet || self.mode == OutputMode::Json {
            return;
        }

        if self.use_colors {
            println!("\n{} {}\n", SPARKLES, style(title).bold().cyan());
        } else {
            println!("=== {} ===", title);
        }
    }

    pub fn print_separator(&self) {
        if self.quiet || self.mode == OutputMode::Json {
            return;
        }

        if self.use_colors {
            println!("{}", style("─".repeat(60)).dim());
        } else {
            println!("{}", "-".repeat(60));
        }
    }

    fn should_show_message(&self, min_verbose_level: u8) -> bool {
        !self.quiet && self.verbose_level >= min_verbose_level
    }

    fn emit(&self, level: Level, message: &str) {
        if !level.always_shown() && !self.should_show_message(level.min_verbosity()) {
            return;
        }

        let line = self.render(level, message);
        if level.uses_stderr() {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }

    fn render(&self, level: Level, message: &str) -> String {
        match self.mode {
            OutputMode::Json => json_line(&serde_json::json!({
                "type": "message",
                "level": level.name(),
                "message": message,
                "timestamp": chrono::Utc::now().to_rfc3339()
            })),
            OutputMode::Plain => format!("{}: {}", level.name().to_uppercase(), message),
            OutputMode::Human if self.use_colors => match level {
                Level::Error => format!("{}{}", CROSS, style(message).red().bold()),
                Level::Warning => format!("{}{}", WARNING, style(message).yellow().bold()),
                Level::Success => format!("{}{}", CHECKMARK, style(message).green().bold()),
                Level::Info => format!("{}{}", INFO, style(message).cyan()),
                Level::Step => format!("{}{}", ROCKET, style(message).bold()),
                Level::Debug => format!("  {}", style(message).dim()),
                Level::Suggestion => {
                    format!("{}{}", INFO, style(format!("Suggestion: {}", message)).cyan())
                }
            },
            OutputMode::Human => match level {
                Level::Error => format!("Error: {}", message),
                Level::Step => format!("> {}", message),
                Level::Debug => format!("  DEBUG: {}", message),
                Level::Suggestion => format!("Suggestion: {}", message),
                _ => message.to_string(),
            },
        }
    }

    fn print_json_object(&self, obj: &serde_json::Value) {
        println!("{}", json_line(obj));
    }

    fn highlight(&self, value: impl ToString) -> String {
        if self.use_colors {
            style(value.to_string()).cyan().bold().to_string()
        } else {
            value.to_string()
        }
    }

    fn print_human_summary(&self, progress: &AggregationProgress) {
        println!();
        self.print_separator();
        println!("  Videos processed:   {}", self.highlight(progress.videos_processed));
        println!("  Archives processed: {}", self.highlight(progress.archives_processed));
        println!("  Archives skipped:   {}", self.highlight(progress.archives_skipped));
        println!("  Time taken:         {}", self.highlight(format_duration(progress.elapsed())));

        if !progress.warnings.is_empty() {
            println!("  Warnings:           {}", progress.warnings.len());
        }
        if !progress.errors.is_empty() {
            println!("  Errors:             {}", progress.errors.len());
        }

        self.print_separator();
    }

    fn print_json_summary(&self, progress: &AggregationProgress) {
        self.print_json_object(&serde_json::json!({
            "type": "summary",
            "videos_processed": progress.videos_processed,
            "archives_processed": progress.archives_processed,
            "archives_skipped": progress.archives_skipped,
            "duration_ms": progress.elapsed().as_millis() as u64,
            "warnings": progress.warnings.len(),
            "errors": progress.errors.len(),
            "timestamp": chrono::Utc::now().to_rfc3339()
        }));
    }

    fn print_plain_summary(&self, progress: &AggregationProgress) {
        println!("Videos processed: {}", progress.videos_processed);
        println!("Archives processed: {}", progress.archives_processed);
        println!("Archives skipped: {}", progress.archives_skipped);
        println!("Duration: {:?}", progress.elapsed());
    }

    fn print_human_report(&self, report: &RunReport) {
        self.print_header("Aggregation Report");

        println!("Source:  {}", report.root_directory.display());
        println!("Content report:        {}", report.content_report.display());
        println!("Traffic source report: {}", report.traffic_source_report.display());
        println!(
            "Rows written: {} content, {} traffic source",
            report.summary.content_rows, report.summary.traffic_source_rows
        );
        println!(
            "Completed at: {}",
            report.completed_at.format("%Y-%m-%d %H:%M UTC")
        );

        if !report.errors.is_empty() || !report.warnings.is_empty() {
            println!();
            println!("Issues encountered:");
            for warning in &report.warnings {
                println!("  - {}", warning);
            }
            for error in &report.errors {
                println!("  - {}", error);
            }
        }
    }

    fn print_plain_report(&self, report: &RunReport) {
        println!("REPORT: Aggregation completed");
        println!("Content report: {}", report.content_report.display());
        println!("Traffic source report: {}", report.traffic_source_report.display());
        println!("Content rows: {}", report.summary.content_rows);
        println!("Traffic source rows: {}", report.summary.traffic_source_rows);

        if !report.errors.is_empty() {
            println!("Errors: {}", report.errors.len());
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Error,
    Suggestion,
    Warning,
    Success,
    Info,
    Step,
    Debug,
}

impl Level {
    fn name(self) -> &'static str {
        match self {
            Level::Error => "error",
            Level::Suggestion => "suggestion",
            Level::Warning => "warning",
            Level::Success => "success",
            Level::Info => "info",
            Level::Step => "starting",
            Level::Debug => "debug",
        }
    }

    fn min_verbosity(self) -> u8 {
        match self {
            Level::Info | Level::Step => 1,
            Level::Debug => 2,
            _ => 0,
        }
    }

    fn always_shown(self) -> bool {
        matches!(self, Level::Error | Level::Suggestion)
    }

    fn uses_stderr(self) -> bool {
        matches!(self, Level::Error | Level::Suggestion)
    }
}

fn json_line(value: &serde_json::Value) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
}

fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs > 0 {
        format!("{}s", secs)
    } else {
        format!("{}ms", duration.as_millis())
    }
}

/// Routes messages around an active progress bar.
pub struct ProgressAwareOutput<'a> {
    formatter: &'a OutputFormatter,
    progress_manager: Option<&'a crate::ui::ProgressManager>,
}

impl<'a> ProgressAwareOutput<'a> {
    pub fn new(
        formatter: &'a OutputFormatter,
        progress_manager: Option<&'a crate::ui::ProgressManager>,
    ) -> Self {
        Self {
            formatter,
            progress_manager,
        }
    }

    pub fn suspend_and_print<F>(&self, f: F)
    where
        F: FnOnce(&OutputFormatter),
    {
        if let Some(pm) = self.progress_manager {
            pm.suspend(|| f(self.formatter));
        } else {
            f(self.formatter);
        }
    }

    pub fn error(&self, message: &str) {
        self.suspend_and_print(|f| f.error(message));
    }

    pub fn warning(&self, message: &str) {
        self.suspend_and_print(|f| f.warning(message));
    }

    pub fn debug(&self, message: &str) {
        self.suspend_and_print(|f| f.debug(message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatter_creation() {
        let formatter = OutputFormatter::new(OutputMode::Plain, 1, false);
        assert_eq!(formatter.mode(), OutputMode::Plain);
        assert_eq!(formatter.verbose_level, 1);
        assert!(!formatter.use_colors);
    }

    #[test]
    fn test_quiet_mode() {
        let formatter = OutputFormatter::new(OutputMode::Human, 2, true);
        assert_eq!(formatter.verbose_level, 0);
        assert!(formatter.quiet);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(30)), "30s");
        assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
        assert_eq!(format_duration(Duration::from_millis(500)), "500ms");
    }

    #[test]
    fn test_warnings_shown_without_verbosity() {
        let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
        assert!(formatter.should_show_message(0));
        assert!(!formatter.should_show_message(1));

        let quiet_formatter = OutputFormatter::new(OutputMode::Human, 2, true);
        assert!(!quiet_formatter.should_show_message(0));
    }

    #[test]
    fn test_plain_lines_carry_level_prefix() {
        let formatter = OutputFormatter::new(OutputMode::Plain, 0, false);
        assert_eq!(
            formatter.render(Level::Warning, "No CSV files found in a.zip"),
            "WARNING: No CSV files found in a.zip"
        );
        assert_eq!(formatter.render(Level::Step, "Scanning"), "STARTING: Scanning");
    }

    #[test]
    fn test_human_lines_without_colors() {
        let formatter = OutputFormatter::new(OutputMode::Human, 0, true);
        assert_eq!(formatter.render(Level::Error, "boom"), "Error: boom");
        assert_eq!(formatter.render(Level::Suggestion, "retry"), "Suggestion: retry");
        assert_eq!(formatter.render(Level::Success, "done"), "done");
    }

    #[test]
    fn test_json_lines_are_objects() {
        let formatter = OutputFormatter::new(OutputMode::Json, 0, false);
        let line = formatter.render(Level::Error, "boom");
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["level"], "error");
        assert_eq!(value["message"], "boom");
    }

    #[test]
    fn test_errors_bypass_quiet() {
        assert!(Level::Error.always_shown());
        assert!(!Level::Warning.always_shown());
        assert_eq!(Level::Debug.min_verbosity(), 2);
    }
}
