use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs, path::Path, path::PathBuf, time::Duration};

use crate::{provider::ProviderId, provider::cached::DEFAULT_TTL, zone::Zone};

/// Configuration for a single provider: credential and optional endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProviderConfig {
    pub api_key: String,

    /// Overrides the provider's public endpoint, e.g. for a proxy or a
    /// local stand-in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Optional default provider id, e.g. "openweather" or "mock".
    pub default_provider: Option<String>,

    /// IANA zone used to split the forecast into days; host local time
    /// when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,

    /// How long a location's data is reused within one session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_ttl_secs: Option<u64>,

    /// Example TOML:
    /// [providers.openweather]
    /// api_key = "..."
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

impl Config {
    /// Return the default provider as a strongly-typed ProviderId.
    pub fn default_provider_id(&self) -> Result<ProviderId> {
        let s = self.default_provider.as_ref().ok_or_else(|| {
            anyhow::anyhow!(
                "No default provider configured.\n\
                 Hint: run `outlook configure <provider>` (e.g. `outlook configure openweather`) first."
            )
        })?;

        ProviderId::try_from(s.as_str())
    }

    pub fn provider_config(&self, id: ProviderId) -> Option<&ProviderConfig> {
        self.providers.get(id.as_str())
    }

    /// Store default provider as string.
    pub fn set_default_provider(&mut self, id: ProviderId) {
        self.default_provider = Some(id.as_str().to_string());
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-outlook", "outlook")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Set/replace a provider's credentials; the first provider configured
    /// becomes the default.
    pub fn upsert_provider(
        &mut self,
        provider_id: ProviderId,
        api_key: String,
        base_url: Option<String>,
    ) {
        let entry = ProviderConfig { api_key, base_url };
        self.providers.insert(provider_id.as_str().to_string(), entry);

        if self.default_provider.is_none() {
            self.default_provider = Some(provider_id.to_string());
        }
    }

    /// Returns API key for a provider, if present.
    pub fn provider_api_key(&self, provider_id: ProviderId) -> Option<&str> {
        self.provider_config(provider_id).map(|cfg| cfg.api_key.as_str())
    }

    pub fn provider_base_url(&self, provider_id: ProviderId) -> Option<&str> {
        self.provider_config(provider_id).and_then(|cfg| cfg.base_url.as_deref())
    }

    pub fn is_provider_configured(&self, provider_id: ProviderId) -> bool {
        !provider_id.requires_api_key() || self.provider_api_key(provider_id).is_some()
    }

    /// The zone forecasts are grouped in.
    pub fn zone(&self) -> Result<Zone> {
        match self.timezone.as_deref() {
            Some(name) => Ok(name.parse::<Zone>()?),
            None => Ok(Zone::Local),
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        self.cache_ttl_secs.map(Duration::from_secs).unwrap_or(DEFAULT_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderId;

    #[test]
    fn default_provider_id_errors_when_not_set() {
        let cfg = Config::default();
        let err = cfg.default_provider_id().unwrap_err();

        assert!(err.to_string().contains("No default provider configured"));
    }

    #[test]
    fn set_api_key_and_default_for_provider() {
        let mut cfg = Config::default();

        cfg.upsert_provider(ProviderId::OpenWeather, "OPEN_KEY".into(), None);

        let default = cfg.default_provider_id().expect("default provider must exist");
        assert_eq!(default, ProviderId::OpenWeather);

        let key = cfg.provider_api_key(ProviderId::OpenWeather);
        assert_eq!(key, Some("OPEN_KEY"));
        assert_eq!(cfg.provider_base_url(ProviderId::OpenWeather), None);
        assert!(cfg.is_provider_configured(ProviderId::OpenWeather));
    }

    #[test]
    fn upsert_does_not_override_existing_default() {
        let mut cfg = Config::default();

        cfg.upsert_provider(ProviderId::Mock, "".into(), None);
        cfg.upsert_provider(
            ProviderId::OpenWeather,
            "OPEN_KEY".into(),
            Some("http://localhost:9000".into()),
        );

        let default = cfg.default_provider_id().expect("default provider must exist");

        assert_eq!(default, ProviderId::Mock);
        assert_eq!(
            cfg.provider_base_url(ProviderId::OpenWeather),
            Some("http://localhost:9000")
        );
    }

    #[test]
    fn set_default_provider_overrides_default() {
        let mut cfg = Config::default();

        cfg.upsert_provider(ProviderId::OpenWeather, "OPEN_KEY".into(), None);

        cfg.set_default_provider(ProviderId::Mock);

        let default = cfg.default_provider_id().expect("default provider must exist");
        assert_eq!(default, ProviderId::Mock);
    }

    #[test]
    fn mock_counts_as_configured_without_key() {
        let cfg = Config::default();
        assert!(cfg.is_provider_configured(ProviderId::Mock));
        assert!(!cfg.is_provider_configured(ProviderId::OpenWeather));
    }

    #[test]
    fn zone_and_ttl_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.zone().unwrap(), Zone::Local);
        assert_eq!(cfg.cache_ttl(), DEFAULT_TTL);
    }

    #[test]
    fn unknown_zone_is_an_error() {
        let cfg = Config {
            timezone: Some("Atlantis/Capital".into()),
            ..Config::default()
        };
        let err = cfg.zone().unwrap_err();
        assert!(err.to_string().contains("unknown time zone 'Atlantis/Capital'"));
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config {
            timezone: Some("Europe/Madrid".into()),
            cache_ttl_secs: Some(30),
            ..Config::default()
        };
        cfg.upsert_provider(ProviderId::OpenWeather, "KEY".into(), None);
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();

        assert_eq!(loaded, cfg);
        assert_eq!(loaded.cache_ttl(), Duration::from_secs(30));
        assert_eq!(loaded.zone().unwrap().to_string(), "Europe/Madrid");
    }

    #[test]
    fn missing_file_loads_default() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn broken_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "default_provider = [").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
