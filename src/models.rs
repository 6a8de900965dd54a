use chrono::{Local, NaiveDateTime};
use serde::Deserialize;
use std::fmt;

/// The two traffic series the API exposes per repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    Visits,
    Clones,
}

impl MetricKind {
    /// Path segment under `/traffic/`, which is also the array field of the payload.
    pub fn resource(self) -> &'static str {
        match self {
            Self::Visits => "views",
            Self::Clones => "clones",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.resource())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MetricRecord {
    pub timestamp: String,
    pub count: u64,
    pub uniques: u64,
}

impl MetricRecord {
    pub fn new(timestamp: impl Into<String>, count: u64, uniques: u64) -> Self {
        Self {
            timestamp: timestamp.into(),
            count,
            uniques,
        }
    }
}

/// Body of `/traffic/views` and `/traffic/clones`.
///
/// The summary `count`/`uniques` are kept for completeness; report totals are
/// always re-summed from the window rows.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrafficResponse {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub uniques: u64,
    #[serde(default, alias = "views", alias = "clones")]
    pub records: Vec<MetricRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Counts {
    pub count: u64,
    pub uniques: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WindowRow {
    pub date_key: String,
    pub visits: u64,
    pub unique_visits: u64,
    pub clones: u64,
    pub unique_clones: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Totals {
    pub visits: u64,
    pub unique_visits: u64,
    pub clones: u64,
    pub unique_clones: u64,
}

impl Totals {
    pub fn add_row(&mut self, row: &WindowRow) {
        self.visits = self.visits.saturating_add(row.visits);
        self.unique_visits = self.unique_visits.saturating_add(row.unique_visits);
        self.clones = self.clones.saturating_add(row.clones);
        self.unique_clones = self.unique_clones.saturating_add(row.unique_clones);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowReport {
    pub rows: Vec<WindowRow>,
    pub totals: Totals,
}

/// Generation time of one run, shared by the banner and output file names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStamp(pub NaiveDateTime);

impl RunStamp {
    pub fn now() -> Self {
        Self(Local::now().naive_local())
    }

    /// `2024-01-13-09h-30m`
    pub fn label(&self) -> String {
        self.0.format("%Y-%m-%d-%Hh-%Mm").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn traffic_response_reads_both_resource_shapes() {
        let views: TrafficResponse = serde_json::from_str(
            r#"{"count":3,"uniques":2,"views":[{"timestamp":"2024-01-10T00:00:00Z","count":3,"uniques":2}]}"#,
        )
        .unwrap();
        assert_eq!(views.records.len(), 1);
        assert_eq!(views.records[0].count, 3);

        let clones: TrafficResponse =
            serde_json::from_str(r#"{"count":0,"uniques":0,"clones":[]}"#).unwrap();
        assert!(clones.records.is_empty());
    }

    #[test]
    fn run_stamp_label_matches_file_naming() {
        let at = NaiveDate::from_ymd_opt(2024, 1, 13)
            .unwrap()
            .and_hms_opt(9, 5, 0)
            .unwrap();
        assert_eq!(RunStamp(at).label(), "2024-01-13-09h-05m");
    }
}
