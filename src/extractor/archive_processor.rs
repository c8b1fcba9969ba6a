use crate::error::{AggregatorError, Result};
use crate::extractor::table_extractor::read_table_data;
use crate::scanner::{ArchiveFile, ArchiveKind};
use crate::tables::{content, traffic_source, ContentRow, ReportTable, TrafficSourceRow};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveRow {
    Content(ContentRow),
    TrafficSource(TrafficSourceRow),
}

/// Extracts and folds the table of a single archive into at most one report row.
pub fn process_archive(archive: &ArchiveFile) -> Result<Option<ArchiveRow>> {
    let table = read_table_data(&archive.path)?;

    let row = match archive.kind {
        ArchiveKind::Content => {
            content::process_table(table.records(), &archive.video_id)?.map(ArchiveRow::Content)
        }
        ArchiveKind::TrafficSource => {
            traffic_source::process_table(table.records(), &archive.video_id)?
                .map(ArchiveRow::TrafficSource)
        }
    };

    Ok(row)
}

/// Accumulated rows of both reports for one run.
#[derive(Debug, Clone, Default)]
pub struct Aggregates {
    pub content: ReportTable<ContentRow>,
    pub traffic_source: ReportTable<TrafficSourceRow>,
}

impl Aggregates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps the first row per video and report; a later export for the same video is rejected.
    pub fn insert(&mut self, archive: &ArchiveFile, row: ArchiveRow) -> Result<()> {
        let inserted = match row {
            ArchiveRow::Content(row) => self.content.push(row),
            ArchiveRow::TrafficSource(row) => self.traffic_source.push(row),
        };

        if inserted {
            Ok(())
        } else {
            Err(AggregatorError::DuplicateArchive {
                path: archive.display_path(),
                video_id: archive.video_id.clone(),
                kind: archive.kind,
            })
        }
    }
}

/// What happened to an archive that produced no row.
#[derive(Debug)]
pub enum ArchiveIssue<'a> {
    Warning(&'a AggregatorError),
    Error(&'a AggregatorError),
}

#[derive(Debug, Clone)]
pub struct AggregationProgress {
    pub videos_processed: usize,
    pub total_videos: usize,
    pub archives_processed: usize,
    pub archives_skipped: usize,
    pub current_video: Option<String>,
    pub start_time: Instant,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl AggregationProgress {
    pub fn new(total_videos: usize) -> Self {
        Self {
            videos_processed: 0,
            total_videos,
            archives_processed: 0,
            archives_skipped: 0,
            current_video: None,
            start_time: Instant::now(),
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn start_video<S: Into<String>>(&mut self, video_id: S) {
        self.current_video = Some(video_id.into());
    }

    pub fn finish_video(&mut self) {
        self.videos_processed += 1;
    }

    pub fn record_processed(&mut self) {
        self.archives_processed += 1;
    }

    /// Counts a skipped archive and returns the issue to report.
    pub fn record_skipped<'e>(&mut self, archive: &ArchiveFile, error: &'e AggregatorError) -> ArchiveIssue<'e> {
        self.archives_skipped += 1;

        if error.is_warning() {
            self.warnings.push(error.to_string());
            ArchiveIssue::Warning(error)
        } else {
            self.errors.push(describe_archive_error(archive, error));
            ArchiveIssue::Error(error)
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Console wording for an archive-level failure.
pub fn describe_archive_error(archive: &ArchiveFile, error: &AggregatorError) -> String {
    match error {
        AggregatorError::BadArchive { .. } | AggregatorError::NoCsvEntries { .. } => error.to_string(),
        _ => format!(
            "An error occurred processing {}: {}",
            archive.display_path(),
            error
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;

    fn write_zip(dir: &Path, name: &str, entries: &[(&str, &str)]) -> PathBuf {
        let path = dir.join(name);
        let mut zip = zip::ZipWriter::new(File::create(&path).unwrap());
        for (entry, content) in entries {
            zip.start_file(*entry, SimpleFileOptions::default()).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
        path
    }

    fn archive(path: PathBuf, kind: ArchiveKind) -> ArchiveFile {
        ArchiveFile {
            video_id: "VID1".to_string(),
            filename: path.file_name().unwrap().to_string_lossy().to_string(),
            path,
            kind,
        }
    }

    #[test]
    fn test_content_archive_row() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_zip(
            temp_dir.path(),
            "Content - abc.zip",
            &[(
                "Table data.csv",
                "Content,Views,Watch time (hours),Subscribers,Average view duration,Impressions,Impressions click-through rate (%)\nTotal,100,5.0,3,0:45,1000,10.0\n",
            )],
        );

        let row = process_archive(&archive(path, ArchiveKind::Content)).unwrap();
        match row {
            Some(ArchiveRow::Content(row)) => {
                assert_eq!(row.video_id, "VID1");
                assert_eq!(row.impressions_ctr, "10.0");
            }
            other => panic!("expected content row, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_table_yields_no_row() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_zip(temp_dir.path(), "Traffic source.zip", &[("Table data.csv", "")]);

        let row = process_archive(&archive(path, ArchiveKind::TrafficSource)).unwrap();
        assert_eq!(row, None);
    }

    fn content_row(views: &str) -> ArchiveRow {
        ArchiveRow::Content(ContentRow {
            video_id: "VID1".to_string(),
            views: views.to_string(),
            watch_time_hours: String::new(),
            subscribers: String::new(),
            average_view_duration: String::new(),
            impressions: String::new(),
            impressions_ctr: String::new(),
        })
    }

    #[test]
    fn test_aggregates_route_rows_by_kind() {
        let mut aggregates = Aggregates::new();
        let file = archive(PathBuf::from("VID1/Content.zip"), ArchiveKind::Content);
        aggregates.insert(&file, content_row("1")).unwrap();

        assert_eq!(aggregates.content.row_count(), 1);
        assert!(aggregates.traffic_source.is_empty());
    }

    #[test]
    fn test_second_export_for_video_is_rejected() {
        let mut aggregates = Aggregates::new();
        let first = archive(PathBuf::from("VID1/Content - a.zip"), ArchiveKind::Content);
        let second = archive(PathBuf::from("VID1/Content - b.zip"), ArchiveKind::Content);

        aggregates.insert(&first, content_row("1")).unwrap();
        match aggregates.insert(&second, content_row("9")) {
            Err(AggregatorError::DuplicateArchive { path, video_id, kind }) => {
                assert_eq!(path, "VID1/Content - b.zip");
                assert_eq!(video_id, "VID1");
                assert_eq!(kind, ArchiveKind::Content);
            }
            other => panic!("expected DuplicateArchive, got {:?}", other),
        }

        assert_eq!(aggregates.content.row_count(), 1);
        assert_eq!(aggregates.content.get("VID1").unwrap().views, "1");
    }

    #[test]
    fn test_progress_records_issues() {
        let file = archive(PathBuf::from("VID1/Content.zip"), ArchiveKind::Content);
        let mut progress = AggregationProgress::new(2);

        let warning = AggregatorError::NoCsvEntries {
            path: "VID1/Content.zip".to_string(),
        };
        assert!(matches!(
            progress.record_skipped(&file, &warning),
            ArchiveIssue::Warning(_)
        ));

        let error = AggregatorError::MissingTrafficSource {
            source_name: "Channel pages".to_string(),
        };
        assert!(matches!(
            progress.record_skipped(&file, &error),
            ArchiveIssue::Error(_)
        ));

        assert_eq!(progress.archives_skipped, 2);
        assert_eq!(progress.warnings, vec!["No CSV files found in VID1/Content.zip".to_string()]);
        assert!(progress.errors[0].starts_with("An error occurred processing VID1/Content.zip"));
    }
}
