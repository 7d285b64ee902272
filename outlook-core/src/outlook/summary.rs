use serde::{Serialize, Serializer};
use std::{collections::HashMap, fmt};

use super::group::DayBucket;
use crate::{
    error::{OutlookError, Result},
    model::Sample,
    zone::Zone,
};

/// Placeholder for the country column; the forecast feed carries no
/// per-day country.
pub const PLACEHOLDER_COUNTRY: &str = "N/A";

const UNKNOWN_TIME: &str = "--:--:--";

/// A value rounded half away from zero to two decimals, shown as `20.00`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Fixed2(f64);

impl Fixed2 {
    pub fn new(value: f64) -> Self {
        let rounded = (value * 100.0).round() / 100.0;
        // Keep "-0.00" out of the table.
        Self(if rounded == 0.0 { 0.0 } else { rounded })
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Fixed2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Serialize for Fixed2 {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Statistics of one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySummary {
    pub date: String,
    pub average_temperature: Fixed2,
    pub dominant_description: String,
    /// Lowest `temperature_min` of the day.
    pub min_temperature: Fixed2,
    /// Highest `temperature_max` of the day.
    pub max_temperature: Fixed2,
    pub average_pressure: Fixed2,
    pub average_humidity: Fixed2,
    pub sunrise: String,
    pub sunset: String,
    pub country: String,
}

/// Reduce a day's bucket to its summary.
pub fn summarize(bucket: &DayBucket, zone: &Zone) -> DaySummary {
    reduce(bucket.date(), bucket.samples(), zone)
}

/// Like [`summarize`], for a bare slice that may be empty.
pub fn summarize_samples(date: &str, samples: &[Sample], zone: &Zone) -> Result<DaySummary> {
    if samples.is_empty() {
        return Err(OutlookError::EmptyBucket);
    }

    Ok(reduce(date, samples, zone))
}

fn reduce(date: &str, samples: &[Sample], zone: &Zone) -> DaySummary {
    let first = &samples[0];
    let count = samples.len() as f64;
    let mean = |field: fn(&Sample) -> f64| {
        Fixed2::new(samples.iter().map(field).sum::<f64>() / count)
    };

    let min_temperature = samples
        .iter()
        .map(|s| s.temperature_min)
        .fold(f64::INFINITY, f64::min);
    let max_temperature = samples
        .iter()
        .map(|s| s.temperature_max)
        .fold(f64::NEG_INFINITY, f64::max);

    let time_of_day = |ts: i64| zone.time_of_day(ts).unwrap_or_else(|| UNKNOWN_TIME.to_string());

    DaySummary {
        date: date.to_string(),
        average_temperature: mean(|s| s.temperature),
        dominant_description: dominant_description(samples),
        min_temperature: Fixed2::new(min_temperature),
        max_temperature: Fixed2::new(max_temperature),
        average_pressure: mean(|s| s.pressure),
        average_humidity: mean(|s| s.humidity),
        sunrise: time_of_day(first.sunrise_time),
        sunset: time_of_day(first.sunset_time),
        country: PLACEHOLDER_COUNTRY.to_string(),
    }
}

/// Most frequent description of the bucket.
///
/// Every sample's description is listed, the list is stably sorted by how
/// often each entry occurs in the whole list, and the last entry wins. With
/// several equally frequent descriptions, the one whose final occurrence
/// comes latest is picked.
pub fn dominant_description(samples: &[Sample]) -> String {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for sample in samples {
        *counts.entry(sample.description.as_str()).or_default() += 1;
    }

    let mut descriptions: Vec<&str> = samples.iter().map(|s| s.description.as_str()).collect();
    descriptions.sort_by_key(|d| counts[d]);

    descriptions.pop().unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outlook::group::{
        group_by_day,
        tests::{JUNE_1, sample_at},
    };

    fn bucket_of(samples: Vec<Sample>) -> DayBucket {
        let mut buckets = group_by_day(samples, &Zone::utc());
        assert_eq!(buckets.len(), 1, "test samples must share one day");
        buckets.swap_remove_index(0).map(|(_, b)| b).unwrap()
    }

    fn with_descriptions(descriptions: &[&str]) -> Vec<Sample> {
        descriptions
            .iter()
            .enumerate()
            .map(|(i, d)| sample_at(JUNE_1 + i as i64 * 600, d))
            .collect()
    }

    #[test]
    fn average_temperature_is_fixed_to_two_decimals() {
        let samples = [10.0, 20.0, 30.0]
            .iter()
            .enumerate()
            .map(|(i, t)| Sample {
                temperature: *t,
                ..sample_at(JUNE_1 + i as i64 * 3600, "clear sky")
            })
            .collect();

        let summary = summarize(&bucket_of(samples), &Zone::utc());

        assert_eq!(summary.average_temperature.to_string(), "20.00");
    }

    #[test]
    fn min_and_max_read_the_per_sample_extremes() {
        let samples = vec![
            Sample {
                temperature_min: 5.0,
                temperature_max: 25.0,
                temperature: 100.0,
                ..sample_at(JUNE_1, "clear sky")
            },
            Sample {
                temperature_min: 8.0,
                temperature_max: 22.0,
                temperature: -100.0,
                ..sample_at(JUNE_1 + 3600, "clear sky")
            },
        ];

        let summary = summarize(&bucket_of(samples), &Zone::utc());

        assert_eq!(summary.min_temperature.value(), 5.0);
        assert_eq!(summary.max_temperature.value(), 25.0);
    }

    #[test]
    fn min_and_max_are_fixed_to_two_decimals() {
        let samples = vec![
            Sample {
                temperature_min: 4.456,
                temperature_max: 21.999,
                ..sample_at(JUNE_1, "clear sky")
            },
            Sample {
                temperature_min: 6.0,
                temperature_max: 18.0,
                ..sample_at(JUNE_1 + 3600, "clear sky")
            },
        ];

        let summary = summarize(&bucket_of(samples), &Zone::utc());

        assert_eq!(summary.min_temperature.to_string(), "4.46");
        assert_eq!(summary.max_temperature.to_string(), "22.00");

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["min_temperature"], "4.46");
        assert_eq!(json["max_temperature"], "22.00");
    }

    #[test]
    fn pressure_and_humidity_are_averaged() {
        let at = |offset: i64, pressure: f64, humidity: f64| Sample {
            pressure,
            humidity,
            ..sample_at(JUNE_1 + offset, "x")
        };
        let samples = vec![at(0, 1000.0, 60.0), at(60, 1003.0, 61.0), at(120, 1004.0, 63.0)];

        let summary = summarize(&bucket_of(samples), &Zone::utc());

        assert_eq!(summary.average_pressure.to_string(), "1002.33");
        assert_eq!(summary.average_humidity.to_string(), "61.33");
    }

    #[test]
    fn tie_goes_to_the_description_seen_last() {
        let samples = with_descriptions(&["rain", "rain", "clear", "clear"]);
        assert_eq!(dominant_description(&samples), "clear");

        let samples = with_descriptions(&["clear", "rain", "clear", "rain"]);
        assert_eq!(dominant_description(&samples), "rain");
    }

    #[test]
    fn highest_count_wins_regardless_of_position() {
        let samples = with_descriptions(&["fog", "fog", "fog", "rain", "snow"]);
        assert_eq!(dominant_description(&samples), "fog");
    }

    #[test]
    fn single_sample_bucket_copies_its_fields() {
        let sample = sample_at(JUNE_1 + 3600, "overcast clouds");
        let summary = summarize(&bucket_of(vec![sample.clone()]), &Zone::utc());

        assert_eq!(summary.dominant_description, "overcast clouds");
        assert_eq!(summary.sunrise, "05:00:00");
        assert_eq!(summary.sunset, "21:00:00");
        assert_eq!(summary.min_temperature.value(), sample.temperature_min);
        assert_eq!(summary.max_temperature.value(), sample.temperature_max);
        assert_eq!(summary.country, PLACEHOLDER_COUNTRY);
    }

    #[test]
    fn sunrise_comes_from_the_first_sample_only() {
        let samples = vec![
            sample_at(JUNE_1 + 3600, "a"),
            Sample {
                sunrise_time: JUNE_1 + 7 * 3600,
                ..sample_at(JUNE_1 + 7200, "a")
            },
        ];

        let summary = summarize(&bucket_of(samples), &Zone::utc());

        assert_eq!(summary.sunrise, "05:00:00");
    }

    #[test]
    fn empty_slice_is_rejected() {
        let err = summarize_samples("2024-06-01", &[], &Zone::utc()).unwrap_err();
        assert_eq!(err, OutlookError::EmptyBucket);
    }

    #[test]
    fn fixed2_rounds_half_away_from_zero() {
        assert_eq!(Fixed2::new(2.375).to_string(), "2.38");
        assert_eq!(Fixed2::new(-2.5).to_string(), "-2.50");
        assert_eq!(Fixed2::new(-0.001).to_string(), "0.00");
        assert_eq!(Fixed2::new(7.0).value(), 7.0);
    }

    #[test]
    fn fixed2_serializes_as_string() {
        let json = serde_json::to_string(&Fixed2::new(3.14159)).unwrap();
        assert_eq!(json, "\"3.14\"");
    }
}
