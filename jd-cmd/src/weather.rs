//! Current-weather client for OpenWeatherMap.

use async_trait::async_trait;
use jd_data::WeatherReading;
use log::debug;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Errors from a current-weather fetch. The `Display` text is what the
/// session shows as the reason for falling back to simulated data.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("No API key configured")]
    MissingApiKey,

    #[error("Invalid API key")]
    Unauthorized,

    #[error("API error {0}")]
    Http(u16),

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Anything that can report the current weather for a city.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn current(&self, city: &str) -> Result<WeatherReading, FetchError>;
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    main: MainBlock,
    #[serde(default)]
    rain: Option<RainBlock>,
}

#[derive(Debug, Deserialize)]
struct MainBlock {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct RainBlock {
    #[serde(rename = "1h", default)]
    one_hour: Option<f64>,
}

impl From<CurrentWeather> for WeatherReading {
    fn from(weather: CurrentWeather) -> Self {
        WeatherReading {
            rain_1h_mm: weather.rain.and_then(|rain| rain.one_hour),
            temperature_c: weather.main.temp,
            humidity_pct: weather.main.humidity,
        }
    }
}

/// Parse a `/data/2.5/weather` response body.
pub fn parse_current_weather(body: &str) -> Result<WeatherReading, FetchError> {
    let weather: CurrentWeather = serde_json::from_str(body)?;
    Ok(weather.into())
}

pub struct OpenWeatherMap {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenWeatherMap {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(Duration::from_secs(15)).build()?;
        Ok(OpenWeatherMap {
            client,
            base_url: base_url.into(),
            api_key,
        })
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherMap {
    async fn current(&self, city: &str) -> Result<WeatherReading, FetchError> {
        let api_key = self.api_key.as_deref().ok_or(FetchError::MissingApiKey)?;
        debug!("Requesting current weather for {}", city);
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("q", format!("{city},IN")),
                ("appid", api_key.to_string()),
                ("units", "metric".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(FetchError::Unauthorized);
        }
        if !status.is_success() {
            return Err(FetchError::Http(status.as_u16()));
        }
        let body = response.text().await?;
        parse_current_weather(&body)
    }
}
