pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod scanner;
pub mod tables;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{CliOverrides, Config, ReportPaths};
pub use error::{AggregatorError, Result, UserFriendlyError};

// Core functionality re-exports
pub use extractor::{
    process_archive, AggregationProgress, Aggregates, ArchiveIssue, ArchiveRow, ReportWriter,
    RunReport,
};
pub use scanner::{ArchiveFile, ArchiveKind, VideoFolder, VideoScanner};
pub use tables::{ContentRow, ReportRow, ReportTable, TrafficSourceRow};
pub use ui::{OutputFormatter, OutputMode, ProgressAwareOutput, ProgressManager};

use extractor::archive_processor::describe_archive_error;
use std::path::Path;

/// Main library interface: scans the export folders and writes both aggregate reports.
pub struct Aggregator {
    paths: ReportPaths,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
}

impl Aggregator {
    pub fn new(paths: ReportPaths, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(!quiet && output_mode == OutputMode::Human);

        Self {
            paths,
            output_formatter,
            progress_manager,
        }
    }

    /// Create an Aggregator from CLI arguments
    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let paths = cli_args.load_config()?;
        let output_mode = match cli_args.output_format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        };

        Ok(Self::new(paths, output_mode, cli_args.verbosity_level(), cli_args.quiet))
    }

    /// Runs the whole pipeline. Only listing and report-writing failures abort the run;
    /// archive-level failures are reported and skipped.
    pub fn run(&self) -> Result<RunReport> {
        self.output_formatter.start_operation("Scanning video folders");

        let scanner = VideoScanner::new();
        let videos = self.scan_videos(&scanner)?;
        let scan_stats = scanner.get_statistics(&videos);
        self.output_formatter.debug(&scan_stats.display_summary());
        self.output_formatter.info(&format!(
            "Found {} video folders with {} exports",
            scan_stats.total_videos,
            scan_stats.total_archives()
        ));

        let writer = ReportWriter::new(self.paths.clone());
        writer.initialize()?;

        let (aggregates, progress) = self.aggregate(&videos);

        self.output_formatter.start_operation("Writing aggregate reports");
        let (content_path, traffic_source_path) = writer.write_reports(&aggregates)?;
        self.output_formatter
            .info(&format!("Wrote {}", content_path.display()));
        self.output_formatter
            .info(&format!("Wrote {}", traffic_source_path.display()));

        self.output_formatter.print_aggregation_summary(&progress);

        Ok(writer.create_run_report(&aggregates, &scan_stats, &progress))
    }

    /// Scans without reading any archive.
    pub fn scan_videos(&self, scanner: &VideoScanner) -> Result<Vec<VideoFolder>> {
        scanner.scan_directory(&self.paths.root_directory)
    }

    /// Processes every classified archive, one at a time, in listing order.
    pub fn aggregate(&self, videos: &[VideoFolder]) -> (Aggregates, AggregationProgress) {
        self.output_formatter.start_operation("Aggregating exports");

        let mut aggregates = Aggregates::new();
        let mut progress = AggregationProgress::new(videos.len());
        let pb = self.progress_manager.create_video_progress(videos.len() as u64);
        let output = ProgressAwareOutput::new(&self.output_formatter, Some(&self.progress_manager));

        for video in videos {
            progress.start_video(video.video_id.as_str());

            for ignored in &video.ignored_archives {
                output.debug(&format!("Skipping {} in {}", ignored, video.video_id));
            }

            for archive in &video.archives {
                let aggregated = process_archive(archive).and_then(|row| match row {
                    Some(row) => aggregates.insert(archive, row).map(|()| true),
                    None => Ok(false),
                });

                match aggregated {
                    Ok(true) => progress.record_processed(),
                    Ok(false) => {
                        output.debug(&format!("{} has an empty table", archive.display_path()));
                        progress.record_processed();
                    }
                    Err(e) => match progress.record_skipped(archive, &e) {
                        ArchiveIssue::Warning(warning) => output.warning(&warning.to_string()),
                        ArchiveIssue::Error(error) => {
                            output.error(&describe_archive_error(archive, error))
                        }
                    },
                }
            }

            progress.finish_video();
            ui::progress::update_video_progress(&pb, &progress);
        }

        ui::progress::finish_progress_with_summary(
            &pb,
            &format!("Aggregated {} videos", progress.videos_processed),
            progress.elapsed(),
        );

        (aggregates, progress)
    }

    /// Generate sample configuration file
    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config(output_path.as_ref());
        std::fs::write(output_path.as_ref(), sample_config).map_err(AggregatorError::Io)?;
        Ok(())
    }

    pub fn paths(&self) -> &ReportPaths {
        &self.paths
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    /// Handle error with user-friendly output
    pub fn handle_error(&self, error: &AggregatorError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

/// Aggregates `root_directory` into `reports_directory` with quiet output.
pub fn aggregate_simple(root_directory: &Path, reports_directory: &Path) -> Result<RunReport> {
    let paths = ReportPaths::new(root_directory, reports_directory);
    Aggregator::new(paths, OutputMode::Plain, 0, true).run()
}
