pub mod content;
pub mod traffic_source;

pub use content::ContentRow;
pub use traffic_source::{SourceMetrics, TrafficSource, TrafficSourceRow};

use crate::error::{AggregatorError, Result};
use csv::StringRecord;
use std::collections::HashMap;

/// A fixed-column row of one aggregate report.
pub trait ReportRow {
    const HEADER: &'static [&'static str];

    fn video_id(&self) -> &str;

    /// Fields in header order, starting with the video id.
    fn fields(&self) -> Vec<&str>;
}

/// One row per video, kept in the order videos were first seen.
#[derive(Debug, Clone)]
pub struct ReportTable<R> {
    order: Vec<String>,
    rows: HashMap<String, R>,
}

impl<R> Default for ReportTable<R> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            rows: HashMap::new(),
        }
    }
}

impl<R: ReportRow> ReportTable<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the row unless its video already has one. Returns false when the row was dropped.
    pub fn push(&mut self, row: R) -> bool {
        if self.rows.contains_key(row.video_id()) {
            return false;
        }

        let video_id = row.video_id().to_string();
        self.order.push(video_id.clone());
        self.rows.insert(video_id, row);
        true
    }

    pub fn contains(&self, video_id: &str) -> bool {
        self.rows.contains_key(video_id)
    }

    pub fn get(&self, video_id: &str) -> Option<&R> {
        self.rows.get(video_id)
    }

    pub fn video_ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &R> {
        self.order.iter().filter_map(move |id| self.rows.get(id))
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Positional field lookup that reports which column was missing.
pub(crate) fn field<'r>(record: &'r StringRecord, index: usize, column: &'static str) -> Result<&'r str> {
    record.get(index).ok_or_else(|| AggregatorError::ShortRow {
        row: record.get(0).unwrap_or_default().to_string(),
        column,
        index,
        found: record.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content(video_id: &str, views: &str) -> ContentRow {
        ContentRow {
            video_id: video_id.to_string(),
            views: views.to_string(),
            watch_time_hours: String::new(),
            subscribers: String::new(),
            average_view_duration: String::new(),
            impressions: String::new(),
            impressions_ctr: String::new(),
        }
    }

    #[test]
    fn test_table_preserves_first_seen_order() {
        let mut table = ReportTable::new();
        assert!(table.push(content("VID2", "1")));
        assert!(table.push(content("VID1", "2")));

        let ids: Vec<_> = table.video_ids().collect();
        assert_eq!(ids, vec!["VID2", "VID1"]);

        let views: Vec<_> = table.iter().map(|r| r.views.as_str()).collect();
        assert_eq!(views, vec!["1", "2"]);
        assert_eq!(table.row_count(), 2);
        assert!(table.get("VID3").is_none());
    }

    #[test]
    fn test_second_row_for_video_is_dropped() {
        let mut table = ReportTable::new();
        assert!(table.push(content("VID1", "1")));
        assert!(!table.push(content("VID1", "9")));

        assert!(table.contains("VID1"));
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.get("VID1").unwrap().views, "1");
    }

    #[test]
    fn test_field_lookup_reports_short_rows() {
        let record = StringRecord::from(vec!["Total", "100"]);
        assert_eq!(field(&record, 1, "Views").unwrap(), "100");

        match field(&record, 4, "Average view duration") {
            Err(AggregatorError::ShortRow { row, column, index, found }) => {
                assert_eq!(row, "Total");
                assert_eq!(column, "Average view duration");
                assert_eq!(index, 4);
                assert_eq!(found, 2);
            }
            other => panic!("expected ShortRow, got {:?}", other),
        }
    }
}
