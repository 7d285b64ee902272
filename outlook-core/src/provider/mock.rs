use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};

use crate::model::{CurrentConditions, Forecast, Sample};

use super::WeatherProvider;

const SECONDS_PER_DAY: i64 = 86_400;
const DESCRIPTIONS: &[&str] = &[
    "clear sky",
    "few clouds",
    "scattered clouds",
    "overcast clouds",
    "light rain",
];

/// Fabricates a month of sub-daily samples for any location.
///
/// Handy for demos and for running the whole pipeline without credentials.
/// With a seed, every call returns the same data.
#[derive(Debug, Clone)]
pub struct MockProvider {
    seed: Option<u64>,
    start: Option<DateTime<Utc>>,
    days: u32,
    samples_per_day: u32,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self {
            seed: None,
            start: None,
            days: 30,
            samples_per_day: 8,
        }
    }
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Fix the instant the feed starts at instead of "now".
    pub fn starting_at(mut self, start: DateTime<Utc>) -> Self {
        self.start = Some(start);
        self
    }

    pub fn with_shape(mut self, days: u32, samples_per_day: u32) -> Self {
        self.days = days;
        self.samples_per_day = samples_per_day.max(1);
        self
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    fn start(&self) -> DateTime<Utc> {
        let start = self.start.unwrap_or_else(Utc::now);
        start.duration_trunc(TimeDelta::hours(1)).unwrap_or(start)
    }

    fn sample(rng: &mut StdRng, timestamp: i64) -> Sample {
        let (sunrise_time, sunset_time) = sun_times(timestamp);

        Sample {
            timestamp,
            temperature: rng.gen_range(15.0..25.0),
            temperature_min: rng.gen_range(10.0..15.0),
            temperature_max: rng.gen_range(20.0..30.0),
            pressure: rng.gen_range(1000.0..1020.0),
            humidity: rng.gen_range(60.0..80.0),
            description: DESCRIPTIONS
                .choose(rng)
                .copied()
                .unwrap_or(DESCRIPTIONS[0])
                .to_string(),
            sunrise_time,
            sunset_time,
        }
    }
}

/// 06:00 and 18:00 UTC of the day containing `timestamp`.
fn sun_times(timestamp: i64) -> (i64, i64) {
    let midnight = timestamp - timestamp.rem_euclid(SECONDS_PER_DAY);
    (midnight + 6 * 3600, midnight + 18 * 3600)
}

#[async_trait]
impl WeatherProvider for MockProvider {
    async fn current(&self, location: &str) -> Result<CurrentConditions> {
        let mut rng = self.rng();
        let sample = Self::sample(&mut rng, self.start().timestamp());

        Ok(CurrentConditions {
            location_name: location.to_string(),
            country: None,
            timestamp: sample.timestamp,
            temperature: sample.temperature,
            temperature_min: sample.temperature_min,
            temperature_max: sample.temperature_max,
            pressure: sample.pressure,
            humidity: sample.humidity,
            description: sample.description,
            sunrise_time: sample.sunrise_time,
            sunset_time: sample.sunset_time,
        })
    }

    async fn forecast(&self, location: &str) -> Result<Forecast> {
        let mut rng = self.rng();
        let start = self.start().timestamp();
        let step = SECONDS_PER_DAY / i64::from(self.samples_per_day);
        let total = i64::from(self.days) * i64::from(self.samples_per_day);

        let samples = (0..total)
            .map(|i| Self::sample(&mut rng, start + i * step))
            .collect();

        tracing::debug!(location, total, "Generated mock forecast");

        Ok(Forecast {
            location_name: location.to_string(),
            samples,
        })
    }
}
