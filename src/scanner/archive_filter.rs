use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

pub const ZIP_EXTENSION: &str = ".zip";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArchiveKind {
    Content,
    TrafficSource,
}

impl ArchiveKind {
    /// Filename prefix identifying the archive kind.
    pub fn prefix(&self) -> &'static str {
        match self {
            ArchiveKind::Content => "Content",
            ArchiveKind::TrafficSource => "Traffic source",
        }
    }
}

impl fmt::Display for ArchiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ArchiveKind::Content => "content",
            ArchiveKind::TrafficSource => "traffic source",
        })
    }
}

#[derive(Debug, Clone)]
pub struct ArchiveFilter {
    kinds: Vec<ArchiveKind>,
}

impl Default for ArchiveFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveFilter {
    pub fn new() -> Self {
        Self {
            kinds: vec![ArchiveKind::Content, ArchiveKind::TrafficSource],
        }
    }

    pub fn is_zip_archive(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|s| s.to_str())
            .is_some_and(|name| name.ends_with(ZIP_EXTENSION))
    }

    /// Classifies a zip file by name prefix; anything unrecognised yields `None`.
    pub fn classify(&self, path: &Path) -> Option<ArchiveKind> {
        if !self.is_zip_archive(path) {
            return None;
        }

        let filename = path.file_name().and_then(|s| s.to_str())?;
        self.kinds
            .iter()
            .copied()
            .find(|kind| filename.starts_with(kind.prefix()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_content_archive() {
        let filter = ArchiveFilter::new();
        assert_eq!(
            filter.classify(&PathBuf::from("VID1/Content 2024-01-01_2024-02-01 Channel.zip")),
            Some(ArchiveKind::Content)
        );
    }

    #[test]
    fn test_traffic_source_archive() {
        let filter = ArchiveFilter::new();
        assert_eq!(
            filter.classify(&PathBuf::from("VID1/Traffic source.zip")),
            Some(ArchiveKind::TrafficSource)
        );
    }

    #[test]
    fn test_unrecognised_archives() {
        let filter = ArchiveFilter::new();
        assert_eq!(filter.classify(&PathBuf::from("VID1/Random.zip")), None);
        assert_eq!(filter.classify(&PathBuf::from("VID1/content.zip")), None);
        assert_eq!(filter.classify(&PathBuf::from("VID1/Traffic.zip")), None);
    }

    #[test]
    fn test_non_zip_files_ignored() {
        let filter = ArchiveFilter::new();
        assert!(!filter.is_zip_archive(&PathBuf::from("VID1/Content.csv")));
        assert_eq!(filter.classify(&PathBuf::from("VID1/Content.csv")), None);
        assert_eq!(filter.classify(&PathBuf::from("VID1/Content.ZIP")), None);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(ArchiveKind::Content.to_string(), "content");
        assert_eq!(ArchiveKind::TrafficSource.to_string(), "traffic source");
        assert_eq!(ArchiveKind::TrafficSource.prefix(), "Traffic source");
    }
}
