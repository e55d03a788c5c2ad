//! Command implementations for the JalDrishti CLI.
//!
//! Offline subcommands work from the embedded seed metrics; the live ones
//! refresh an observation from OpenWeatherMap, falling back to simulated
//! data when the service is unavailable.

use chrono::NaiveDate;
use clap::Subcommand;
use jd_utils::dates::parse_date;
use std::path::PathBuf;

pub mod config;
pub mod live;
pub mod lookup;
pub mod session;
pub mod weather;

use config::{WeatherArgs, DEFAULT_CITY};

#[derive(Subcommand)]
pub enum Command {
    /// Classify drought severity from monthly rainfall and temperature
    Classify {
        /// Monthly rainfall in mm
        #[arg(short, long, allow_negative_numbers = true)]
        rainfall: f64,

        /// Temperature in °C
        #[arg(short, long, allow_negative_numbers = true)]
        temperature: f64,
    },

    /// Resolve a boundary-source state name to its canonical form
    Resolve {
        #[arg(required_unless_present = "properties")]
        name: Option<String>,

        /// Boundary feature property; the name is picked from NAME_1, name,
        /// ST_NM or state, in that order
        #[arg(
            short,
            long = "property",
            value_name = "KEY=VALUE",
            value_parser = lookup::parse_property,
            conflicts_with = "name"
        )]
        properties: Vec<(String, String)>,
    },

    /// Show popup fields and map styling for a state, or every state's popup
    State {
        #[arg(required_unless_present = "all")]
        name: Option<String>,

        /// List every state in the year instead of a single one
        #[arg(short, long, conflicts_with = "name")]
        all: bool,

        /// With --all, only states at this severity tier
        #[arg(long, requires = "all")]
        tier: Option<String>,

        /// Seed year; falls back to the latest year when absent or unknown
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Build the derived card metrics for a manually entered observation
    Derive {
        #[arg(short, long, allow_negative_numbers = true)]
        rainfall: f64,

        #[arg(short, long, allow_negative_numbers = true)]
        temperature: f64,

        #[arg(long, default_value_t = 60.0)]
        reservoir: f64,

        #[arg(long, default_value_t = 20.0)]
        groundwater: f64,

        /// Population at risk, millions (needs --agriculture too)
        #[arg(long, requires = "agriculture")]
        population: Option<f64>,

        /// Agricultural impact, percent (needs --population too)
        #[arg(long, requires = "population")]
        agriculture: Option<f64>,
    },

    /// Refresh the live observation once and print the derived metrics
    Fetch {
        #[arg(short, long, default_value = DEFAULT_CITY)]
        city: String,

        #[command(flatten)]
        weather: WeatherArgs,
    },

    /// Refresh the live observation and write the CSV report
    Export {
        #[arg(short, long, default_value = DEFAULT_CITY)]
        city: String,

        /// Year of the state-wise table; defaults to the latest seed year
        #[arg(short, long)]
        year: Option<i32>,

        /// Date in the report filename (YYYY-MM-DD); defaults to today
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,

        /// Directory the report is written into
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        #[command(flatten)]
        weather: WeatherArgs,
    },

    /// Refresh periodically, logging status and drought alerts
    Watch {
        #[arg(short, long, default_value = DEFAULT_CITY)]
        city: String,

        /// Stop after this many refreshes
        #[arg(short = 'n', long)]
        count: Option<u64>,

        #[command(flatten)]
        weather: WeatherArgs,
    },
}

pub async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Classify {
            rainfall,
            temperature,
        } => lookup::run_classify(rainfall, temperature),
        Command::Resolve { name, properties } => lookup::run_resolve(name.as_deref(), &properties),
        Command::State {
            name,
            all,
            tier,
            year,
        } => match name {
            Some(name) if !all => lookup::run_state(&name, year),
            _ => lookup::run_all_states(year, tier.as_deref()),
        },
        Command::Derive {
            rainfall,
            temperature,
            reservoir,
            groundwater,
            population,
            agriculture,
        } => lookup::run_derive(
            rainfall,
            temperature,
            reservoir,
            groundwater,
            population,
            agriculture,
        ),
        Command::Fetch { city, weather } => live::run_fetch(&city, &weather).await,
        Command::Export {
            city,
            year,
            date,
            output_dir,
            weather,
        } => live::run_export(&city, year, date, &output_dir, &weather).await,
        Command::Watch {
            city,
            count,
            weather,
        } => live::run_watch(&city, &weather, count).await,
    }
}
