use crate::scanner::ArchiveKind;
use std::string::FromUtf8Error;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AggregatorError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Path validation failed: {path}")]
    InvalidPath { path: String },

    #[error("{path} is not a valid zip file")]
    BadArchive {
        path: String,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("No CSV files found in {path}")]
    NoCsvEntries { path: String },

    #[error("No 'Table data' CSV found in {path} (found: {})", .csv_entries.join(", "))]
    TableDataNotFound {
        path: String,
        csv_entries: Vec<String>,
    },

    #[error("{entry} in {path} is not valid UTF-8")]
    Decode {
        path: String,
        entry: String,
        #[source]
        source: FromUtf8Error,
    },

    #[error("Failed to parse CSV in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("Table has a header but no data row")]
    MissingDataRow,

    #[error("Row '{row}' has no '{column}' column (index {index}, row has {found} fields)")]
    ShortRow {
        row: String,
        column: &'static str,
        index: usize,
        found: usize,
    },

    #[error("Traffic source '{source_name}' not found in table")]
    MissingTrafficSource { source_name: String },

    #[error("Invalid view count '{value}' for traffic source '{source_name}'")]
    InvalidViewCount { source_name: String, value: String },

    #[error("External+ views overflow: {external} + {direct_or_unknown}")]
    ViewCountOverflow {
        external: i64,
        direct_or_unknown: i64,
    },

    #[error("{path} is another {kind} export for {video_id}; keeping the row already aggregated")]
    DuplicateArchive {
        path: String,
        video_id: String,
        kind: ArchiveKind,
    },

    #[error("Failed to write report {path}: {message}")]
    ReportWrite { path: String, message: String },
}

impl AggregatorError {
    /// Archives without any CSV entry, and extra exports for an already aggregated video,
    /// are reported as warnings rather than errors.
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            AggregatorError::NoCsvEntries { .. } | AggregatorError::DuplicateArchive { .. }
        )
    }
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for AggregatorError {
    fn user_message(&self) -> String {
        match self {
            AggregatorError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            AggregatorError::InvalidPath { path } => {
                format!("Invalid path: {}", path)
            }
            AggregatorError::BadArchive { path, .. } => {
                format!("{} is not a valid zip file.", path)
            }
            AggregatorError::Decode { path, entry, .. } => {
                format!("Could not decode {} in {} as UTF-8", entry, path)
            }
            AggregatorError::ReportWrite { path, message } => {
                format!("Could not write report {}: {}", path, message)
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            AggregatorError::Config { .. } => Some(
                "Check that the configuration file exists, is valid YAML or TOML, and sets both root_directory and reports_directory.".to_string()
            ),
            AggregatorError::InvalidPath { .. } => Some(
                "root_directory must point to an existing folder containing one sub-folder per video.".to_string()
            ),
            AggregatorError::ReportWrite { .. } => Some(
                "Ensure the reports directory is writable and the report files are not open in another program.".to_string()
            ),
            AggregatorError::TableDataNotFound { .. } => Some(
                "The archive should contain a single CSV whose name starts with 'Table data'.".to_string()
            ),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, AggregatorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_friendly_messages() {
        let error = AggregatorError::Config {
            message: "root_directory is not set".to_string(),
        };
        assert!(error.user_message().contains("root_directory"));
        assert!(error.suggestion().is_some());
    }

    #[test]
    fn test_bad_archive_message() {
        let error = AggregatorError::BadArchive {
            path: "VID1/Content.zip".to_string(),
            source: zip::result::ZipError::InvalidArchive("Invalid zip header".into()),
        };
        assert_eq!(error.user_message(), "VID1/Content.zip is not a valid zip file.");
        assert!(!error.is_warning());
    }

    #[test]
    fn test_missing_csv_is_warning() {
        let error = AggregatorError::NoCsvEntries {
            path: "VID1/Content.zip".to_string(),
        };
        assert!(error.is_warning());
        assert_eq!(error.to_string(), "No CSV files found in VID1/Content.zip");
    }

    #[test]
    fn test_duplicate_archive_is_warning() {
        let error = AggregatorError::DuplicateArchive {
            path: "VID1/Content - b.zip".to_string(),
            video_id: "VID1".to_string(),
            kind: ArchiveKind::Content,
        };
        assert!(error.is_warning());
        assert_eq!(
            error.to_string(),
            "VID1/Content - b.zip is another content export for VID1; keeping the row already aggregated"
        );
    }

    #[test]
    fn test_table_data_not_found_lists_entries() {
        let error = AggregatorError::TableDataNotFound {
            path: "a.zip".to_string(),
            csv_entries: vec!["Chart data.csv".to_string(), "Totals.csv".to_string()],
        };
        assert!(error.to_string().contains("Chart data.csv, Totals.csv"));
    }
}
