use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand, ValueEnum};
use inquire::{Password, PasswordDisplayMode, Select, validator::Validation};
use skycast_core::{
    Config, Coordinates, FileStore, FixedLocator, Lookup, PreferenceStore, Unit, WeatherService,
    config::is_api_key_usable, provider_from_config,
};
use std::io::{self, IsTerminal};
use tracing::debug;

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Current weather, 5-day forecast and weather alerts")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Switch {
    On,
    Off,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeatherMap API key and the default unit.
    Configure,

    /// Show weather for a city.
    Show {
        /// City name, e.g. "London" or "New York, USA".
        #[arg(required = true, num_args = 1..)]
        city: Vec<String>,

        /// Temperature unit to use from now on: celsius or fahrenheit.
        #[arg(long, short)]
        unit: Option<Unit>,
    },

    /// Show weather for your position (flags, or `[home]` in the config).
    Here {
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,

        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,
    },

    /// Switch the temperature unit and refresh the last search.
    Unit {
        /// celsius or fahrenheit
        unit: Unit,
    },

    /// List recent searches, or repeat one.
    Recent {
        /// Repeat the Nth search (1 is the newest).
        #[arg(long)]
        pick: Option<usize>,

        /// Choose a search interactively.
        #[arg(long, conflicts_with = "pick")]
        select: bool,
    },

    /// Forget recent searches and settings.
    Clear,

    /// Show or hide weather alerts.
    Alerts { state: Switch },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Clear => {
                FileStore::open_default()?.clear_all()?;
                println!("Cleared recent searches and settings.");
                Ok(())
            }
            Command::Alerts { state } => {
                let dismissed = state == Switch::Off;
                FileStore::open_default()?.set_alerts_dismissed(dismissed)?;
                println!("Weather alerts {}.", if dismissed { "hidden" } else { "shown" });
                Ok(())
            }
            Command::Recent { pick: None, select: false } => {
                let store = FileStore::open_default()?;
                println!("{}", render::recent_list(&store.recent_searches()));
                Ok(())
            }
            command => {
                let config = Config::load()?;
                let mut service = build_service(&config)?;
                lookup_command(command, &config, &mut service).await
            }
        }
    }
}

fn build_service(config: &Config) -> anyhow::Result<WeatherService> {
    let provider = provider_from_config(config)?;
    let store = FileStore::open_default()?;

    let mut service = WeatherService::new(provider, Box::new(store))
        .with_icon_base(config.endpoints.icon_url.clone());
    if let Some(unit) = config.default_unit {
        service = service.with_default_unit(unit);
    }
    Ok(service)
}

async fn lookup_command(
    command: Command,
    config: &Config,
    service: &mut WeatherService,
) -> anyhow::Result<()> {
    debug!(?command, unit = %service.active_unit(), "running lookup");
    let lookup = match command {
        Command::Show { city, unit } => {
            if let Some(unit) = unit {
                service.store_mut().set_active_unit(unit)?;
            }
            Some(service.search_city(&city.join(" ")).await?)
        }
        Command::Here { lat, lon } => {
            let position = match (lat, lon) {
                (Some(lat), Some(lon)) => Some(Coordinates { lat, lon }),
                _ => config.home,
            };
            Some(service.search_here(&FixedLocator::new(position)).await?)
        }
        Command::Unit { unit } => {
            let refreshed = service.change_unit(unit).await?;
            if refreshed.is_none() {
                println!("Temperature unit set to {unit}.");
            }
            refreshed
        }
        Command::Recent { pick, select } => {
            let recent = service.recent_searches();
            if recent.is_empty() {
                println!("{}", render::recent_list(&recent));
                return Ok(());
            }

            let index = if select {
                require_terminal(io::stdin().is_terminal())?;
                let labels: Vec<String> = recent.iter().map(|e| e.display_name.clone()).collect();
                Select::new("Repeat a recent search:", labels).raw_prompt()?.index
            } else {
                let n = pick.unwrap_or(1);
                n.checked_sub(1).filter(|i| *i < recent.len()).ok_or_else(|| {
                    anyhow!("There is no recent search #{n}. Run `skycast recent` to list them.")
                })?
            };

            Some(service.search_recent(&recent[index]).await?)
        }
        Command::Configure | Command::Clear | Command::Alerts { .. } => None,
    };

    if let Some(lookup) = lookup {
        print_lookup(&lookup, service);
    }
    Ok(())
}

fn require_terminal(is_terminal: bool) -> anyhow::Result<()> {
    if is_terminal {
        Ok(())
    } else {
        Err(anyhow!(
            "Interactive selection needs a terminal. Use `skycast recent --pick N` instead."
        ))
    }
}

fn print_lookup(lookup: &Lookup, service: &WeatherService) {
    let show_alerts = !service.store().alerts_dismissed();
    print!("{}", render::report(lookup, show_alerts));
}

fn configure() -> anyhow::Result<()> {
    let path = Config::config_file_path()?;
    let mut config = Config::load_from(&path)?;

    let key = Password::new("OpenWeatherMap API key:")
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .with_help_message("Get a free key at openweathermap.org/api")
        .with_validator(|input: &str| {
            if is_api_key_usable(input) {
                Ok(Validation::Valid)
            } else {
                Ok(Validation::Invalid("That does not look like an OpenWeatherMap API key.".into()))
            }
        })
        .prompt()
        .context("API key prompt was cancelled")?;
    config.set_api_key(key);

    let units = vec![Unit::Celsius, Unit::Fahrenheit];
    let start = units.iter().position(|u| Some(*u) == config.default_unit).unwrap_or(0);
    let unit = Select::new("Default temperature unit:", units)
        .with_starting_cursor(start)
        .prompt()
        .context("Unit prompt was cancelled")?;
    config.default_unit = Some(unit);

    config.save_to(&path)?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}
