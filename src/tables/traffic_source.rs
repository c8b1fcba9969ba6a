use crate::error::{AggregatorError, Result};
use crate::tables::{field, ReportRow};
use csv::StringRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Traffic sources carried into the report. Other sources in the export are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrafficSource {
    BrowseFeatures,
    ChannelPages,
    SuggestedVideos,
    YouTubeSearch,
    External,
    DirectOrUnknown,
}

impl TrafficSource {
    pub const ALL: [TrafficSource; 6] = [
        TrafficSource::BrowseFeatures,
        TrafficSource::ChannelPages,
        TrafficSource::SuggestedVideos,
        TrafficSource::YouTubeSearch,
        TrafficSource::External,
        TrafficSource::DirectOrUnknown,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TrafficSource::BrowseFeatures => "Browse features",
            TrafficSource::ChannelPages => "Channel pages",
            TrafficSource::SuggestedVideos => "Suggested videos",
            TrafficSource::YouTubeSearch => "YouTube search",
            TrafficSource::External => "External",
            TrafficSource::DirectOrUnknown => "Direct or unknown",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|source| source.label() == label)
    }
}

/// One source's record from the export, fields kept as written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceRecord {
    pub views: String,
    pub watch_time_hours: String,
    pub average_view_duration: String,
    pub impressions: String,
    pub impressions_ctr: String,
}

impl SourceRecord {
    fn from_record(record: &StringRecord) -> Result<Self> {
        Ok(Self {
            views: field(record, 1, "Views")?.to_string(),
            watch_time_hours: field(record, 2, "Watch time (hours)")?.to_string(),
            average_view_duration: field(record, 3, "Average view duration")?.to_string(),
            impressions: field(record, 4, "Impressions")?.to_string(),
            impressions_ctr: field(record, 5, "Impressions click-through rate (%)")?.to_string(),
        })
    }

    fn metrics(&self) -> SourceMetrics {
        SourceMetrics {
            views: self.views.clone(),
            impressions: self.impressions.clone(),
            ctr: self.impressions_ctr.clone(),
        }
    }
}

/// The three report columns contributed by each source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceMetrics {
    pub views: String,
    pub impressions: String,
    pub ctr: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficSourceRow {
    pub video_id: String,
    pub browse_features: SourceMetrics,
    pub channel_pages: SourceMetrics,
    pub suggested_videos: SourceMetrics,
    pub youtube_search: SourceMetrics,
    /// External and Direct or unknown combined. Only views can be summed; impressions
    /// and CTR stay empty because neither source reports them.
    pub external_plus: SourceMetrics,
}

impl ReportRow for TrafficSourceRow {
    const HEADER: &'static [&'static str] = &[
        "Video ID",
        "Browse Views",
        "Browse Impressions",
        "Browse CTR",
        "Channel pages Views",
        "Channel pages Impressions",
        "Channel pages CTR",
        "Suggested videos Views",
        "Suggested videos Impressions",
        "Suggested videos CTR",
        "YouTube search Views",
        "YouTube search Impressions",
        "YouTube search CTR",
        "External+ Views",
        "External+ Impressions",
        "External+ CTR",
    ];

    fn video_id(&self) -> &str {
        &self.video_id
    }

    fn fields(&self) -> Vec<&str> {
        let mut fields = vec![self.video_id.as_str()];
        for metrics in [
            &self.browse_features,
            &self.channel_pages,
            &self.suggested_videos,
            &self.youtube_search,
            &self.external_plus,
        ] {
            fields.extend([
                metrics.views.as_str(),
                metrics.impressions.as_str(),
                metrics.ctr.as_str(),
            ]);
        }
        fields
    }
}

/// Folds the per-source records of one export into a single wide row.
///
/// An empty table yields `None`. Each of the four named sources must be present;
/// External and Direct or unknown may be absent and then count as zero views.
pub fn process_table(records: &[StringRecord], video_id: &str) -> Result<Option<TrafficSourceRow>> {
    let mut rows = records.iter();

    if rows.next().is_none() {
        return Ok(None);
    }

    let mut by_source: HashMap<TrafficSource, SourceRecord> = HashMap::new();
    for record in rows {
        let Some(source) = record.get(0).and_then(TrafficSource::from_label) else {
            continue;
        };
        by_source.insert(source, SourceRecord::from_record(record)?);
    }

    let external = parse_views(&by_source, TrafficSource::External)?;
    let direct_or_unknown = parse_views(&by_source, TrafficSource::DirectOrUnknown)?;
    let external_views = external
        .checked_add(direct_or_unknown)
        .ok_or(AggregatorError::ViewCountOverflow {
            external,
            direct_or_unknown,
        })?;

    let named = |source: TrafficSource| -> Result<SourceMetrics> {
        by_source
            .get(&source)
            .map(SourceRecord::metrics)
            .ok_or_else(|| AggregatorError::MissingTrafficSource {
                source_name: source.label().to_string(),
            })
    };

    Ok(Some(TrafficSourceRow {
        video_id: video_id.to_string(),
        browse_features: named(TrafficSource::BrowseFeatures)?,
        channel_pages: named(TrafficSource::ChannelPages)?,
        suggested_videos: named(TrafficSource::SuggestedVideos)?,
        youtube_search: named(TrafficSource::YouTubeSearch)?,
        external_plus: SourceMetrics {
            views: external_views.to_string(),
            impressions: String::new(),
            ctr: String::new(),
        },
    }))
}

fn parse_views(by_source: &HashMap<TrafficSource, SourceRecord>, source: TrafficSource) -> Result<i64> {
    let views = match by_source.get(&source) {
        Some(record) => record.views.trim(),
        None => return Ok(0),
    };

    if views.is_empty() {
        return Ok(0);
    }

    views.parse().map_err(|_| AggregatorError::InvalidViewCount {
        source_name: source.label().to_string(),
        value: views.to_string(),
    })
}
