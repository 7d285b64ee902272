//! The aggregation engine: sub-daily samples in, one row per day out.
//!
//! Pure and synchronous. Everything here is rebuilt from scratch for each
//! query; nothing is cached or mutated after construction.

mod group;
mod summary;
mod table;

pub use group::{DayBucket, DayBuckets, group_by_day};
pub use summary::{
    DaySummary, Fixed2, PLACEHOLDER_COUNTRY, dominant_description, summarize, summarize_samples,
};
pub use table::{DayRow, assemble_table};

use serde::Serialize;

use crate::{
    error::{OutlookError, Result},
    model::{CurrentConditions, Forecast},
    zone::Zone,
};

/// Current conditions plus the per-day table for the following days.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outlook {
    pub location: String,
    pub current_date: String,
    pub current: CurrentConditions,
    pub rows: Vec<DayRow>,
}

impl Outlook {
    /// Group the forecast, then summarize every day except the one already
    /// covered by `current`.
    pub fn build(current: CurrentConditions, forecast: Forecast, zone: &Zone) -> Result<Self> {
        let current_date = zone
            .date_key(current.timestamp)
            .ok_or(OutlookError::InvalidTimestamp(current.timestamp))?;

        let buckets = group_by_day(forecast.samples, zone);
        let rows = assemble_table(&buckets, &current_date, zone);

        tracing::debug!(
            location = %forecast.location_name,
            %current_date,
            rows = rows.len(),
            "Built outlook"
        );

        Ok(Self {
            location: forecast.location_name,
            current_date,
            current,
            rows,
        })
    }
}
