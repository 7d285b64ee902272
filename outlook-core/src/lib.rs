//! Core library for the `outlook` CLI.
//!
//! This crate defines:
//! - The aggregation engine turning sub-daily samples into per-day rows
//! - Abstraction over weather providers, plus a per-location cache
//! - Configuration & credentials handling
//! - Shared domain models (samples, current conditions)
//!
//! It is used by `outlook-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod model;
pub mod outlook;
pub mod provider;
pub mod zone;

pub use config::{Config, ProviderConfig};
pub use error::OutlookError;
pub use model::{CurrentConditions, Forecast, Sample};
pub use outlook::{DayRow, DaySummary, Fixed2, Outlook};
pub use provider::{ProviderId, WeatherProvider, fetch_report};
pub use zone::Zone;
