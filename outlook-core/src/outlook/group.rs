use indexmap::IndexMap;
use serde::Serialize;

use crate::{model::Sample, zone::Zone};

/// Samples that fall on one calendar day, in arrival order.
///
/// Only `group_by_day` creates buckets, so a bucket always holds at least
/// one sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayBucket {
    date: String,
    samples: Vec<Sample>,
}

impl DayBucket {
    fn new(date: String, first: Sample) -> Self {
        Self {
            date,
            samples: vec![first],
        }
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn first(&self) -> &Sample {
        // Non-empty by construction.
        &self.samples[0]
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Buckets keyed by date, in order of each date's first appearance.
pub type DayBuckets = IndexMap<String, DayBucket>;

/// Partition `samples` into calendar days of `zone`.
pub fn group_by_day(samples: impl IntoIterator<Item = Sample>, zone: &Zone) -> DayBuckets {
    let mut buckets = DayBuckets::new();

    for sample in samples {
        let Some(key) = zone.date_key(sample.timestamp) else {
            tracing::warn!(
                timestamp = sample.timestamp,
                "Skipping sample with unrepresentable timestamp"
            );
            continue;
        };

        match buckets.get_mut(&key) {
            Some(bucket) => bucket.samples.push(sample),
            None => {
                buckets.insert(key.clone(), DayBucket::new(key, sample));
            }
        }
    }

    tracing::debug!(days = buckets.len(), "Grouped forecast samples by day");

    buckets
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const DAY: i64 = 86_400;
    // 2024-06-01T00:00:00Z
    pub(crate) const JUNE_1: i64 = 1_717_200_000;

    pub(crate) fn sample_at(timestamp: i64, description: &str) -> Sample {
        Sample {
            timestamp,
            temperature: 20.0,
            temperature_min: 15.0,
            temperature_max: 25.0,
            pressure: 1010.0,
            humidity: 65.0,
            description: description.to_string(),
            sunrise_time: timestamp - timestamp.rem_euclid(DAY) + 5 * 3600,
            sunset_time: timestamp - timestamp.rem_euclid(DAY) + 21 * 3600,
        }
    }

    #[test]
    fn empty_input_yields_no_buckets() {
        let buckets = group_by_day(Vec::new(), &Zone::utc());
        assert!(buckets.is_empty());
    }

    #[test]
    fn samples_land_in_their_day_in_order() {
        let samples = vec![
            sample_at(JUNE_1 + 3 * 3600, "a"),
            sample_at(JUNE_1 + 6 * 3600, "b"),
            sample_at(JUNE_1 + DAY, "c"),
            sample_at(JUNE_1 + 9 * 3600, "d"),
        ];

        let buckets = group_by_day(samples, &Zone::utc());

        let keys: Vec<&str> = buckets.keys().map(String::as_str).collect();
        assert_eq!(keys, ["2024-06-01", "2024-06-02"]);

        let first: Vec<&str> = buckets["2024-06-01"]
            .samples()
            .iter()
            .map(|s| s.description.as_str())
            .collect();
        assert_eq!(first, ["a", "b", "d"]);
        assert_eq!(buckets["2024-06-02"].len(), 1);
        assert_eq!(buckets["2024-06-02"].date(), "2024-06-02");
    }

    #[test]
    fn key_order_follows_first_appearance() {
        let samples = vec![
            sample_at(JUNE_1 + 2 * DAY, "late"),
            sample_at(JUNE_1, "early"),
        ];

        let buckets = group_by_day(samples, &Zone::utc());

        let keys: Vec<&str> = buckets.keys().map(String::as_str).collect();
        assert_eq!(keys, ["2024-06-03", "2024-06-01"]);
    }

    #[test]
    fn unrepresentable_timestamp_is_skipped() {
        let samples = vec![sample_at(JUNE_1, "ok"), sample_at(i64::MAX, "broken")];

        let buckets = group_by_day(samples, &Zone::utc());

        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets["2024-06-01"].first().description, "ok");
    }

    #[test]
    fn instant_past_the_local_range_is_skipped() {
        let last = chrono::DateTime::<chrono::Utc>::MAX_UTC.timestamp();
        let samples = vec![sample_at(JUNE_1, "ok"), sample_at(last, "edge")];

        let buckets = group_by_day(samples, &"Asia/Tokyo".parse().unwrap());

        let keys: Vec<&str> = buckets.keys().map(String::as_str).collect();
        assert_eq!(keys, ["2024-06-01"]);
    }

    #[test]
    fn zone_decides_the_day() {
        // 22:00 UTC is already the next day in Tokyo.
        let samples = vec![sample_at(JUNE_1 + 22 * 3600, "night")];

        let utc = group_by_day(samples.clone(), &Zone::utc());
        let tokyo = group_by_day(samples, &"Asia/Tokyo".parse().unwrap());

        assert!(utc.contains_key("2024-06-01"));
        assert!(tokyo.contains_key("2024-06-02"));
    }
}
