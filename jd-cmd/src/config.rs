//! Weather-service settings shared by the live subcommands.

use crate::weather::{FetchError, OpenWeatherMap, DEFAULT_BASE_URL};
use clap::Args;
use std::time::Duration;

pub const DEFAULT_CITY: &str = "Delhi";

#[derive(Args, Debug, Clone)]
pub struct WeatherArgs {
    /// OpenWeatherMap API key; without one every refresh uses simulated data
    #[arg(long, env = "OWM_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Current-weather endpoint
    #[arg(long, env = "OWM_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Seconds between refreshes
    #[arg(long, default_value_t = 300)]
    pub interval_secs: u64,
}

impl WeatherArgs {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn source(&self) -> Result<OpenWeatherMap, FetchError> {
        OpenWeatherMap::new(self.base_url.clone(), self.api_key.clone())
    }
}
