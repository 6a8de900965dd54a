use crate::errors::TrafficError;
use crate::models::{Counts, MetricRecord};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::warn;

/// Length of a `YYYY-MM-DDTHH` key.
pub const KEY_LEN: usize = 13;

/// Date-hour key to counts for one metric kind. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeriesIndex {
    entries: BTreeMap<String, Counts>,
}

impl SeriesIndex {
    pub fn get(&self, key: &str) -> Option<Counts> {
        self.entries.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Counts)> {
        self.entries.iter().map(|(key, counts)| (key.as_str(), *counts))
    }
}

/// Indexes records by their canonical key. Later duplicates replace earlier ones.
pub fn build_index<'a, I>(records: I) -> Result<SeriesIndex, TrafficError>
where
    I: IntoIterator<Item = &'a MetricRecord>,
{
    let mut entries = BTreeMap::new();
    for record in records {
        let key = canonical_key(&record.timestamp)?;
        if record.uniques > record.count {
            warn!(
                "record {} reports {} uniques over {} events",
                record.timestamp, record.uniques, record.count
            );
        }
        entries.insert(
            key.to_owned(),
            Counts {
                count: record.count,
                uniques: record.uniques,
            },
        );
    }

    Ok(SeriesIndex { entries })
}

/// Returns the `YYYY-MM-DDTHH` prefix of `timestamp`.
pub fn canonical_key(timestamp: &str) -> Result<&str, TrafficError> {
    let key = timestamp
        .get(..KEY_LEN)
        .filter(|key| key.is_ascii())
        .ok_or_else(|| TrafficError::malformed(timestamp))?;

    let (date, hour) = key.split_at(10);
    let hour = hour
        .strip_prefix('T')
        .filter(|digits| digits.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|digits| digits.parse::<u8>().ok())
        .filter(|hour| *hour < 24);
    if hour.is_none() || NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
        return Err(TrafficError::malformed(timestamp));
    }

    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(timestamp: &str, count: u64, uniques: u64) -> MetricRecord {
        MetricRecord::new(timestamp, count, uniques)
    }

    #[test]
    fn keys_by_date_and_hour() {
        let records = vec![
            record("2024-01-10T00:00:00Z", 5, 3),
            record("2024-01-12T00:00:00Z", 2, 2),
        ];
        let index = build_index(&records).unwrap();

        assert_eq!(index.len(), 2);
        assert_eq!(index.get("2024-01-10T00"), Some(Counts { count: 5, uniques: 3 }));
        assert_eq!(index.get("2024-01-12T00"), Some(Counts { count: 2, uniques: 2 }));
        assert_eq!(index.get("2024-01-11T00"), None);
    }

    #[test]
    fn later_duplicate_overwrites_earlier() {
        let records = vec![
            record("2024-01-10T00:00:00Z", 9, 4),
            record("2024-01-10T00:59:59Z", 1, 1),
        ];
        let index = build_index(&records).unwrap();

        assert_eq!(index.len(), 1);
        assert_eq!(index.get("2024-01-10T00"), Some(Counts { count: 1, uniques: 1 }));
    }

    #[test]
    fn rebuilding_yields_same_mapping() {
        let records = vec![
            record("2024-01-08T00:00:00Z", 4, 1),
            record("2024-01-09T00:00:00Z", 0, 0),
            record("2024-01-08T00:00:00Z", 7, 2),
        ];
        assert_eq!(build_index(&records).unwrap(), build_index(&records).unwrap());
    }

    #[test]
    fn short_timestamp_is_malformed() {
        let records = vec![record("2024-01-10T00:00:00Z", 1, 1), record("2024-01", 2, 1)];
        let err = build_index(&records).unwrap_err();
        assert!(
            matches!(err, TrafficError::MalformedRecord { ref timestamp } if timestamp == "2024-01")
        );
    }

    #[test]
    fn bad_key_shape_is_malformed() {
        for bad in ["2024-13-01T00:00", "2024-01-10 00:00", "2024-01-10T25", "2024-01-10T+1", "2024-01-1éT00"] {
            assert!(canonical_key(bad).is_err(), "{bad} accepted");
        }
        assert_eq!(canonical_key("2024-01-10T07").unwrap(), "2024-01-10T07");
    }

    #[test]
    fn empty_input_builds_empty_index() {
        let index = build_index(&Vec::<MetricRecord>::new()).unwrap();
        assert!(index.is_empty());
    }
}
