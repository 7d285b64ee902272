use serde::Serialize;

use super::{
    group::DayBuckets,
    summary::{DaySummary, Fixed2, summarize},
};
use crate::zone::Zone;

/// One row of the day table, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayRow {
    pub date: String,
    pub average_temperature: Fixed2,
    pub min_temperature: Fixed2,
    pub max_temperature: Fixed2,
    pub dominant_description: String,
    pub average_pressure: Fixed2,
    pub average_humidity: Fixed2,
    pub sunrise: String,
    pub sunset: String,
    pub country: String,
}

impl From<DaySummary> for DayRow {
    fn from(summary: DaySummary) -> Self {
        Self {
            date: summary.date,
            average_temperature: summary.average_temperature,
            min_temperature: summary.min_temperature,
            max_temperature: summary.max_temperature,
            dominant_description: summary.dominant_description,
            average_pressure: summary.average_pressure,
            average_humidity: summary.average_humidity,
            sunrise: summary.sunrise,
            sunset: summary.sunset,
            country: summary.country,
        }
    }
}

/// Summarize every bucket except `current_date`, keeping bucket order.
pub fn assemble_table(buckets: &DayBuckets, current_date: &str, zone: &Zone) -> Vec<DayRow> {
    buckets
        .iter()
        .filter(|(date, _)| date.as_str() != current_date)
        .map(|(_, bucket)| DayRow::from(summarize(bucket, zone)))
        .collect()
}
