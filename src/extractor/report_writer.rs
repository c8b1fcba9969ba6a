use crate::config::ReportPaths;
use crate::error::{AggregatorError, Result};
use crate::extractor::{AggregationProgress, Aggregates};
use crate::scanner::ScanStatistics;
use crate::tables::{ReportRow, ReportTable};
use chrono::{DateTime, Utc};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub root_directory: PathBuf,
    pub reports_directory: PathBuf,
    pub content_report: PathBuf,
    pub traffic_source_report: PathBuf,
    pub summary: RunSummary,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub videos_scanned: usize,
    pub archives_found: usize,
    pub archives_ignored: usize,
    pub archives_processed: usize,
    pub archives_skipped: usize,
    pub content_rows: usize,
    pub traffic_source_rows: usize,
    pub duration: Duration,
}

pub struct ReportWriter {
    paths: ReportPaths,
}

impl ReportWriter {
    pub fn new(paths: ReportPaths) -> Self {
        Self { paths }
    }

    /// Creates the reports directory if it does not exist yet.
    pub fn initialize(&self) -> Result<()> {
        fs::create_dir_all(&self.paths.reports_directory).map_err(|e| AggregatorError::ReportWrite {
            path: self.paths.reports_directory.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Writes both aggregate reports, replacing any previous versions.
    pub fn write_reports(&self, aggregates: &Aggregates) -> Result<(PathBuf, PathBuf)> {
        let content_path = self.paths.content_report_path();
        write_report(&aggregates.content, &content_path)?;

        let traffic_source_path = self.paths.traffic_source_report_path();
        write_report(&aggregates.traffic_source, &traffic_source_path)?;

        Ok((content_path, traffic_source_path))
    }

    pub fn create_run_report(
        &self,
        aggregates: &Aggregates,
        scan: &ScanStatistics,
        progress: &AggregationProgress,
    ) -> RunReport {
        RunReport {
            root_directory: self.paths.root_directory.clone(),
            reports_directory: self.paths.reports_directory.clone(),
            content_report: self.paths.content_report_path(),
            traffic_source_report: self.paths.traffic_source_report_path(),
            summary: RunSummary {
                videos_scanned: scan.total_videos,
                archives_found: scan.total_archives(),
                archives_ignored: scan.ignored_archives,
                archives_processed: progress.archives_processed,
                archives_skipped: progress.archives_skipped,
                content_rows: aggregates.content.row_count(),
                traffic_source_rows: aggregates.traffic_source.row_count(),
                duration: progress.elapsed(),
            },
            warnings: progress.warnings.clone(),
            errors: progress.errors.clone(),
            completed_at: Utc::now(),
        }
    }
}

/// Writes the header followed by every row, grouped by video in first-seen order.
pub fn write_report<R: ReportRow>(table: &ReportTable<R>, path: &Path) -> Result<()> {
    let report_error = |message: String| AggregatorError::ReportWrite {
        path: path.display().to_string(),
        message,
    };

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::CRLF)
        .from_path(path)
        .map_err(|e| report_error(e.to_string()))?;

    writer
        .write_record(R::HEADER)
        .map_err(|e| report_error(e.to_string()))?;

    for row in table.iter() {
        writer
            .write_record(row.fields())
            .map_err(|e| report_error(e.to_string()))?;
    }

    writer.flush().map_err(|e| report_error(e.to_string()))?;

    Ok(())
}
