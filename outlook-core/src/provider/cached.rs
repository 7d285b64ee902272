use anyhow::{Result, anyhow};
use async_trait::async_trait;
use moka::future::Cache;
use std::{fmt, time::Duration};

use crate::model::{CurrentConditions, Forecast};

use super::WeatherProvider;

pub const DEFAULT_TTL: Duration = Duration::from_secs(600);
const MAX_LOCATIONS: u64 = 256;

/// In-memory, per-location cache in front of another provider.
///
/// Current conditions and forecasts are cached separately, keyed by the
/// exact location string. Failed retrievals are not cached. Nothing
/// survives the process.
pub struct CachedProvider<P> {
    inner: P,
    current: Cache<String, CurrentConditions>,
    forecast: Cache<String, Forecast>,
}

impl<P: fmt::Debug> fmt::Debug for CachedProvider<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedProvider")
            .field("inner", &self.inner)
            .field("current_entries", &self.current.entry_count())
            .field("forecast_entries", &self.forecast.entry_count())
            .finish()
    }
}

impl<P: WeatherProvider> CachedProvider<P> {
    pub fn new(inner: P, ttl: Duration) -> Self {
        Self {
            inner,
            current: Cache::builder()
                .max_capacity(MAX_LOCATIONS)
                .time_to_live(ttl)
                .build(),
            forecast: Cache::builder()
                .max_capacity(MAX_LOCATIONS)
                .time_to_live(ttl)
                .build(),
        }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }
}

#[async_trait]
impl<P: WeatherProvider> WeatherProvider for CachedProvider<P> {
    /// Concurrent misses for the same location share one upstream call.
    async fn current(&self, location: &str) -> Result<CurrentConditions> {
        let init = async {
            tracing::debug!(location, "Current conditions not cached, fetching");
            self.inner.current(location).await
        };

        self.current
            .try_get_with(location.to_string(), init)
            .await
            .map_err(|err| anyhow!("{err:#}"))
    }

    async fn forecast(&self, location: &str) -> Result<Forecast> {
        let init = async {
            tracing::debug!(location, "Forecast not cached, fetching");
            self.inner.forecast(location).await
        };

        self.forecast
            .try_get_with(location.to_string(), init)
            .await
            .map_err(|err| anyhow!("{err:#}"))
    }
}
