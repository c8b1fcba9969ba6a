use crate::error::{AggregatorError, Result};
use crate::scanner::archive_filter::{ArchiveFilter, ArchiveKind};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// A zip export belonging to one video folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveFile {
    pub video_id: String,
    pub path: PathBuf,
    pub filename: String,
    pub kind: ArchiveKind,
}

impl ArchiveFile {
    pub fn display_path(&self) -> String {
        self.path.display().to_string()
    }
}

/// One immediate sub-directory of the root; its name identifies the video.
#[derive(Debug, Clone)]
pub struct VideoFolder {
    pub video_id: String,
    pub path: PathBuf,
    pub archives: Vec<ArchiveFile>,
    pub ignored_archives: Vec<String>,
}

impl VideoFolder {
    pub fn archives_of_kind(&self, kind: ArchiveKind) -> impl Iterator<Item = &ArchiveFile> {
        self.archives.iter().filter(move |a| a.kind == kind)
    }
}

pub struct VideoScanner {
    filter: ArchiveFilter,
}

impl Default for VideoScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoScanner {
    pub fn new() -> Self {
        Self {
            filter: ArchiveFilter::new(),
        }
    }

    /// Lists video folders under `root` in file-name order.
    ///
    /// Listing failures are fatal; unrecognised zip files are recorded and skipped.
    pub fn scan_directory<P: AsRef<Path>>(&self, root: P) -> Result<Vec<VideoFolder>> {
        let root_path = root.as_ref();

        if !root_path.exists() {
            return Err(AggregatorError::InvalidPath {
                path: root_path.display().to_string(),
            });
        }

        if !root_path.is_dir() {
            return Err(AggregatorError::InvalidPath {
                path: format!("{} is not a directory", root_path.display()),
            });
        }

        let mut videos = Vec::new();

        for entry in immediate_children(root_path) {
            let entry = entry.map_err(|e| AggregatorError::Io(e.into()))?;

            if !entry.file_type().is_dir() {
                continue;
            }

            videos.push(self.scan_video_folder(&entry)?);
        }

        Ok(videos)
    }

    fn scan_video_folder(&self, entry: &DirEntry) -> Result<VideoFolder> {
        let video_id = entry.file_name().to_string_lossy().to_string();
        let mut archives = Vec::new();
        let mut ignored_archives = Vec::new();

        for child in immediate_children(entry.path()) {
            let child = child.map_err(|e| AggregatorError::Io(e.into()))?;
            let path = child.path();

            if !child.file_type().is_file() || !self.filter.is_zip_archive(path) {
                continue;
            }

            let filename = child.file_name().to_string_lossy().to_string();
            match self.filter.classify(path) {
                Some(kind) => archives.push(ArchiveFile {
                    video_id: video_id.clone(),
                    path: path.to_path_buf(),
                    filename,
                    kind,
                }),
                None => ignored_archives.push(filename),
            }
        }

        Ok(VideoFolder {
            video_id,
            path: entry.path().to_path_buf(),
            archives,
            ignored_archives,
        })
    }

    pub fn get_statistics(&self, videos: &[VideoFolder]) -> ScanStatistics {
        let count_kind = |kind: ArchiveKind| -> usize {
            videos.iter().map(|v| v.archives_of_kind(kind).count()).sum()
        };

        ScanStatistics {
            total_videos: videos.len(),
            content_archives: count_kind(ArchiveKind::Content),
            traffic_source_archives: count_kind(ArchiveKind::TrafficSource),
            ignored_archives: videos.iter().map(|v| v.ignored_archives.len()).sum(),
            videos_without_archives: videos.iter().filter(|v| v.archives.is_empty()).count(),
        }
    }
}

fn immediate_children(dir: &Path) -> walkdir::IntoIter {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanStatistics {
    pub total_videos: usize,
    pub content_archives: usize,
    pub traffic_source_archives: usize,
    pub ignored_archives: usize,
    pub videos_without_archives: usize,
}

impl ScanStatistics {
    pub fn total_archives(&self) -> usize {
        self.content_archives + self.traffic_source_archives
    }

    pub fn display_summary(&self) -> String {
        let mut summary = format!(
            "Scan Results:\n  Video folders: {}\n  Content archives: {}\n  Traffic source archives: {}\n",
            self.total_videos, self.content_archives, self.traffic_source_archives
        );

        if self.ignored_archives > 0 {
            summary.push_str(&format!("  Ignored zip files: {}\n", self.ignored_archives));
        }

        if self.videos_without_archives > 0 {
            summary.push_str(&format!(
                "  Folders without exports: {}\n",
                self.videos_without_archives
            ));
        }

        summary
    }
}
