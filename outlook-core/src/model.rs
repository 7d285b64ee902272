use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{OutlookError, Result};

/// One sub-daily forecast observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Seconds since the Unix epoch, UTC.
    pub timestamp: i64,
    pub temperature: f64,
    pub temperature_min: f64,
    pub temperature_max: f64,
    /// hPa.
    pub pressure: f64,
    /// Percent.
    pub humidity: f64,
    pub description: String,
    pub sunrise_time: i64,
    pub sunset_time: i64,
}

impl Sample {
    /// Rejects samples carrying non-finite readings or instants chrono
    /// cannot represent.
    pub fn validate(self) -> Result<Self> {
        let instants = [
            ("timestamp", self.timestamp),
            ("sunrise_time", self.sunrise_time),
            ("sunset_time", self.sunset_time),
        ];

        if let Some((name, value)) = instants
            .iter()
            .find(|(_, ts)| DateTime::<Utc>::from_timestamp(*ts, 0).is_none())
        {
            return Err(OutlookError::MalformedSample {
                timestamp: self.timestamp,
                reason: format!("{name} {value} is out of range"),
            });
        }

        let readings = [
            ("temperature", self.temperature),
            ("temperature_min", self.temperature_min),
            ("temperature_max", self.temperature_max),
            ("pressure", self.pressure),
            ("humidity", self.humidity),
        ];

        if let Some((name, value)) = readings.iter().find(|(_, v)| !v.is_finite()) {
            return Err(OutlookError::MalformedSample {
                timestamp: self.timestamp,
                reason: format!("{name} is not a finite number ({value})"),
            });
        }

        Ok(self)
    }
}

/// The "right now" reading shown next to the day table. Never altered by
/// the aggregation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub location_name: String,
    pub country: Option<String>,
    pub timestamp: i64,
    pub temperature: f64,
    pub temperature_min: f64,
    pub temperature_max: f64,
    pub pressure: f64,
    pub humidity: f64,
    pub description: String,
    pub sunrise_time: i64,
    pub sunset_time: i64,
}

/// An ordered run of sub-daily samples for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub location_name: String,
    pub samples: Vec<Sample>,
}
