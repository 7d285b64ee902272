use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use inquire::{Confirm, InquireError, Password, Text};
use outlook_core::{
    Config, Outlook, ProviderId, WeatherProvider, Zone, fetch_report,
    provider::{cached_provider_from_config, provider_from_config},
};

use crate::render::{SortColumn, TableView, render_json, render_outlook};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "outlook", version, about = "Current weather and a day-by-day outlook")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure credentials for a specific provider.
    Configure {
        /// Provider short name, e.g. "openweather" or "mock".
        provider: String,
    },

    /// Show current conditions and the daily outlook for a location.
    Show {
        /// City or place name.
        location: String,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// Prompt for locations one after another; empty input quits.
    Search {
        #[command(flatten)]
        view: ViewArgs,
    },
}

#[derive(Debug, Args)]
pub struct ViewArgs {
    /// Provider to use instead of the configured default.
    #[arg(long)]
    provider: Option<String>,

    /// IANA time zone used to split days, or "local".
    #[arg(long)]
    tz: Option<String>,

    /// Column to sort the day table by.
    #[arg(long, value_enum)]
    sort: Option<SortColumn>,

    /// Sort in descending order.
    #[arg(long, requires = "sort")]
    desc: bool,

    /// Only show days whose date, weather or country contains this text.
    #[arg(long)]
    filter: Option<String>,

    /// Print JSON instead of a table.
    #[arg(long)]
    json: bool,
}

impl ViewArgs {
    fn provider_id(&self, config: &Config) -> anyhow::Result<ProviderId> {
        match self.provider.as_deref() {
            Some(name) => ProviderId::try_from(name),
            None => config.default_provider_id(),
        }
    }

    fn zone(&self, config: &Config) -> anyhow::Result<Zone> {
        match self.tz.as_deref() {
            Some(name) => Ok(name.parse::<Zone>()?),
            None => config.zone(),
        }
    }

    fn table_view(&self) -> TableView {
        TableView {
            sort: self.sort,
            descending: self.desc,
            filter: self.filter.clone(),
        }
    }

    fn print(&self, outlook: &Outlook, zone: &Zone) -> anyhow::Result<()> {
        let view = self.table_view();
        if self.json {
            println!("{}", render_json(outlook, &view)?);
        } else {
            print!("{}", render_outlook(outlook, &view, zone));
        }
        Ok(())
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = Config::load()?;

        match self.command {
            Command::Configure { provider } => {
                let id = ProviderId::try_from(provider.as_str())?;
                configure(&mut config, id)?;
            }
            Command::Show { location, view } => {
                let id = view.provider_id(&config)?;
                let zone = view.zone(&config)?;
                let provider = provider_from_config(id, &config)?;

                let outlook = query(provider.as_ref(), &location, &zone).await?;
                view.print(&outlook, &zone)?;
            }
            Command::Search { view } => {
                let id = view.provider_id(&config)?;
                let zone = view.zone(&config)?;
                let provider = cached_provider_from_config(id, &config)?;

                loop {
                    let location = match Text::new("Location:")
                        .with_help_message("Enter a city or state; leave empty to quit")
                        .prompt()
                    {
                        Ok(input) => input.trim().to_string(),
                        Err(
                            InquireError::OperationCanceled | InquireError::OperationInterrupted,
                        ) => break,
                        Err(err) => return Err(err.into()),
                    };

                    if location.is_empty() {
                        break;
                    }

                    match query(&provider, &location, &zone).await {
                        Ok(outlook) => view.print(&outlook, &zone)?,
                        Err(err) => eprintln!("Error: {err:#}"),
                    }
                }
            }
        }

        Ok(())
    }
}

async fn query<P: WeatherProvider + ?Sized>(
    provider: &P,
    location: &str,
    zone: &Zone,
) -> anyhow::Result<Outlook> {
    let (current, forecast) = fetch_report(provider, location)
        .await
        .with_context(|| format!("Failed to retrieve weather for '{location}'"))?;

    tracing::info!(location, samples = forecast.samples.len(), "Retrieved forecast");

    Ok(Outlook::build(current, forecast, zone)?)
}

fn configure(config: &mut Config, id: ProviderId) -> anyhow::Result<()> {
    let (api_key, base_url) = if id.requires_api_key() {
        let api_key = Password::new(&format!("API key for {id}:"))
            .without_confirmation()
            .prompt()?;

        let base_url = Text::new("Custom endpoint (leave empty for the public API):").prompt()?;
        let base_url = Some(base_url.trim().to_string()).filter(|u| !u.is_empty());

        (api_key.trim().to_string(), base_url)
    } else {
        (String::new(), None)
    };

    let make_default = config.default_provider.is_some()
        && Confirm::new(&format!("Use {id} as the default provider?"))
            .with_default(true)
            .prompt()?;

    config.upsert_provider(id, api_key, base_url);
    if make_default {
        config.set_default_provider(id);
    }

    config.save()?;
    println!(
        "Saved {id} configuration to {}",
        Config::config_file_path()?.display()
    );

    Ok(())
}
