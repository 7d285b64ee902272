use crate::{
    Config, CurrentConditions, Forecast,
    provider::{cached::CachedProvider, mock::MockProvider, openweather::OpenWeatherProvider},
};
use async_trait::async_trait;
use std::{convert::TryFrom, fmt::Debug};

pub mod cached;
pub mod mock;
pub mod openweather;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    OpenWeather,
    Mock,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenWeather => "openweather",
            ProviderId::Mock => "mock",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::OpenWeather, ProviderId::Mock]
    }

    /// Whether the provider cannot be built without an API key.
    pub fn requires_api_key(&self) -> bool {
        matches!(self, ProviderId::OpenWeather)
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "openweather" => Ok(ProviderId::OpenWeather),
            "mock" => Ok(ProviderId::Mock),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: openweather, mock."
            )),
        }
    }
}

/// Source of current conditions and sub-daily forecasts for a location.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, location: &str) -> anyhow::Result<CurrentConditions>;

    async fn forecast(&self, location: &str) -> anyhow::Result<Forecast>;
}

#[async_trait]
impl<P: WeatherProvider + ?Sized> WeatherProvider for Box<P> {
    async fn current(&self, location: &str) -> anyhow::Result<CurrentConditions> {
        (**self).current(location).await
    }

    async fn forecast(&self, location: &str) -> anyhow::Result<Forecast> {
        (**self).forecast(location).await
    }
}

/// Run both retrievals for `location` concurrently.
pub async fn fetch_report<P: WeatherProvider + ?Sized>(
    provider: &P,
    location: &str,
) -> anyhow::Result<(CurrentConditions, Forecast)> {
    tracing::debug!(location, "Fetching current conditions and forecast");
    tokio::try_join!(provider.current(location), provider.forecast(location))
}

/// Construct a provider from config and explicit ProviderId.
pub fn provider_from_config(
    id: ProviderId,
    config: &Config,
) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let boxed: Box<dyn WeatherProvider> = match id {
        ProviderId::OpenWeather => {
            let api_key = config.provider_api_key(id).ok_or_else(|| {
                anyhow::anyhow!(
                    "No API key configured for provider '{id}'.\n\
                         Hint: run `outlook configure {id}` and enter your API key."
                )
            })?;

            let provider = match config.provider_base_url(id) {
                Some(base_url) => OpenWeatherProvider::with_base_url(api_key.to_owned(), base_url),
                None => OpenWeatherProvider::new(api_key.to_owned()),
            };
            Box::new(provider)
        }
        ProviderId::Mock => Box::new(MockProvider::new()),
    };

    Ok(boxed)
}

/// Construct the default provider from config, using `default_provider` field.
pub fn default_provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let id = config.default_provider_id()?;
    provider_from_config(id, config)
}

/// Like [`provider_from_config`], wrapped in a per-location cache.
pub fn cached_provider_from_config(
    id: ProviderId,
    config: &Config,
) -> anyhow::Result<CachedProvider<Box<dyn WeatherProvider>>> {
    let inner = provider_from_config(id, config)?;
    Ok(CachedProvider::new(inner, config.cache_ttl()))
}
