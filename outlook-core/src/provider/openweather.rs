use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};

use crate::{
    error::OutlookError,
    model::{CurrentConditions, Forecast, Sample},
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Point the provider at another deployment of the same API.
    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str, location: &str) -> Result<T> {
        let url = format!("{}/{endpoint}", self.base_url);
        tracing::debug!(%url, location, "Requesting OpenWeather {endpoint}");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", location),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .with_context(|| format!("Failed to send request to OpenWeather ({endpoint})"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read OpenWeather {endpoint} response body"))?;

        if !status.is_success() {
            return Err(anyhow!(
                "OpenWeather {} request failed with status {}: {}",
                endpoint,
                status,
                truncate_body(&body),
            ));
        }

        serde_json::from_str(&body)
            .with_context(|| format!("Failed to parse OpenWeather {endpoint} JSON"))
    }
}

#[derive(Debug, Default, Deserialize)]
struct OwMain {
    temp: Option<f64>,
    temp_min: Option<f64>,
    temp_max: Option<f64>,
    pressure: Option<f64>,
    humidity: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct OwSys {
    country: Option<String>,
    sunrise: Option<i64>,
    sunset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: Option<String>,
    dt: Option<i64>,
    main: Option<OwMain>,
    #[serde(default)]
    weather: Vec<OwWeather>,
    sys: Option<OwSys>,
}

#[derive(Debug, Default, Deserialize)]
struct OwCity {
    name: Option<String>,
    sunrise: Option<i64>,
    sunset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: Option<i64>,
    main: Option<OwMain>,
    #[serde(default)]
    weather: Vec<OwWeather>,
    /// Some feeds repeat sunrise/sunset per entry instead of per city.
    sys: Option<OwSys>,
}

/// Entries stay raw until each one is decoded on its own, so a single
/// mistyped entry cannot reject the whole feed.
#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: Option<OwCity>,
    #[serde(default)]
    list: Vec<serde_json::Value>,
}

fn required<T>(value: Option<T>, field: &'static str) -> Result<T, OutlookError> {
    value.ok_or(OutlookError::IncompleteData { field })
}

/// Only the first condition tag counts.
fn first_description(weather: &[OwWeather]) -> Result<String, OutlookError> {
    required(
        weather.first().and_then(|w| w.description.clone()),
        "weather[0].description",
    )
}

impl OwCurrentResponse {
    fn into_current(self, location: &str) -> Result<CurrentConditions, OutlookError> {
        let main = required(self.main, "main")?;
        let sys = self.sys.unwrap_or_default();

        Ok(CurrentConditions {
            location_name: self.name.unwrap_or_else(|| location.to_string()),
            country: sys.country,
            timestamp: required(self.dt, "dt")?,
            temperature: required(main.temp, "main.temp")?,
            temperature_min: required(main.temp_min, "main.temp_min")?,
            temperature_max: required(main.temp_max, "main.temp_max")?,
            pressure: required(main.pressure, "main.pressure")?,
            humidity: required(main.humidity, "main.humidity")?,
            description: first_description(&self.weather)?,
            sunrise_time: required(sys.sunrise, "sys.sunrise")?,
            sunset_time: required(sys.sunset, "sys.sunset")?,
        })
    }
}

impl OwForecastEntry {
    fn decode(raw: serde_json::Value) -> Result<Self, OutlookError> {
        let timestamp = raw.get("dt").and_then(serde_json::Value::as_i64).unwrap_or_default();

        serde_json::from_value(raw).map_err(|err| OutlookError::MalformedSample {
            timestamp,
            reason: err.to_string(),
        })
    }

    fn into_sample(self, city: &OwCity) -> Result<Sample, OutlookError> {
        let main = required(self.main, "main")?;
        let sys = self.sys.unwrap_or_default();

        Sample {
            timestamp: required(self.dt, "dt")?,
            temperature: required(main.temp, "main.temp")?,
            temperature_min: required(main.temp_min, "main.temp_min")?,
            temperature_max: required(main.temp_max, "main.temp_max")?,
            pressure: required(main.pressure, "main.pressure")?,
            humidity: required(main.humidity, "main.humidity")?,
            description: first_description(&self.weather)?,
            sunrise_time: required(sys.sunrise.or(city.sunrise), "sunrise")?,
            sunset_time: required(sys.sunset.or(city.sunset), "sunset")?,
        }
        .validate()
    }
}

impl OwForecastResponse {
    /// Unusable entries are dropped; a feed with entries but none usable is
    /// incomplete.
    fn into_forecast(self, location: &str) -> Result<Forecast, OutlookError> {
        let city = self.city.unwrap_or_default();
        let total = self.list.len();
        let mut first_error = None;

        let samples: Vec<Sample> = self
            .list
            .into_iter()
            .map(|raw| OwForecastEntry::decode(raw).and_then(|entry| entry.into_sample(&city)))
            .filter_map(|parsed| match parsed {
                Ok(sample) => Some(sample),
                Err(err) => {
                    tracing::warn!(error = %err, "Excluding forecast entry");
                    first_error.get_or_insert(err);
                    None
                }
            })
            .collect();

        if let (true, Some(err)) = (samples.is_empty(), first_error) {
            tracing::warn!(total, "No usable forecast entries");
            return Err(err);
        }

        Ok(Forecast {
            location_name: city.name.unwrap_or_else(|| location.to_string()),
            samples,
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current(&self, location: &str) -> Result<CurrentConditions> {
        let parsed: OwCurrentResponse = self.get_json("weather", location).await?;
        parsed
            .into_current(location)
            .context("OpenWeather current conditions are incomplete")
    }

    async fn forecast(&self, location: &str) -> Result<Forecast> {
        let parsed: OwForecastResponse = self.get_json("forecast", location).await?;
        parsed
            .into_forecast(location)
            .context("OpenWeather forecast is incomplete")
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
