pub mod archive_processor;
pub mod report_writer;
pub mod table_extractor;

pub use archive_processor::{process_archive, AggregationProgress, Aggregates, ArchiveIssue, ArchiveRow};
pub use report_writer::{ReportWriter, RunReport, RunSummary};
pub use table_extractor::{read_table_data, TableData};
