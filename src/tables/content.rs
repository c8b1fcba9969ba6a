use crate::error::{AggregatorError, Result};
use crate::tables::{field, ReportRow};
use csv::StringRecord;
use serde::{Deserialize, Serialize};

/// Channel-wide totals for one video, copied verbatim from the export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRow {
    pub video_id: String,
    pub views: String,
    pub watch_time_hours: String,
    pub subscribers: String,
    pub average_view_duration: String,
    pub impressions: String,
    pub impressions_ctr: String,
}

impl ReportRow for ContentRow {
    const HEADER: &'static [&'static str] = &[
        "Video ID",
        "Views",
        "Watch time (hours)",
        "Subscribers",
        "Average view duration",
        "Impressions",
        "Impressions click-through rate (%)",
    ];

    fn video_id(&self) -> &str {
        &self.video_id
    }

    fn fields(&self) -> Vec<&str> {
        vec![
            self.video_id.as_str(),
            self.views.as_str(),
            self.watch_time_hours.as_str(),
            self.subscribers.as_str(),
            self.average_view_duration.as_str(),
            self.impressions.as_str(),
            self.impressions_ctr.as_str(),
        ]
    }
}

/// Reads the first data row after the header. An empty table yields `None`.
///
/// Column 0 of the export (usually "Total") is replaced by `video_id`; rows after the
/// first data row are ignored.
pub fn process_table(records: &[StringRecord], video_id: &str) -> Result<Option<ContentRow>> {
    let mut rows = records.iter();

    if rows.next().is_none() {
        return Ok(None);
    }

    let data_row = rows.next().ok_or(AggregatorError::MissingDataRow)?;

    Ok(Some(ContentRow {
        video_id: video_id.to_string(),
        views: field(data_row, 1, "Views")?.to_string(),
        watch_time_hours: field(data_row, 2, "Watch time (hours)")?.to_string(),
        subscribers: field(data_row, 3, "Subscribers")?.to_string(),
        average_view_duration: field(data_row, 4, "Average view duration")?.to_string(),
        impressions: field(data_row, 5, "Impressions")?.to_string(),
        impressions_ctr: field(data_row, 6, "Impressions click-through rate (%)")?.to_string(),
    }))
}
