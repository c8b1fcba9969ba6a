pub mod archive_filter;
pub mod video_scanner;

pub use archive_filter::{ArchiveFilter, ArchiveKind};
pub use video_scanner::{ArchiveFile, ScanStatistics, VideoFolder, VideoScanner};
