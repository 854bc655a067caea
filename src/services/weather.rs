//! Current weather via `OpenWeatherMap`

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::{CapabilityError, WeatherProvider, WeatherReport};

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    weather: Vec<Condition>,
    main: MainReadings,
}

#[derive(Debug, Deserialize)]
struct Condition {
    description: String,
}

#[derive(Debug, Deserialize)]
struct MainReadings {
    temp: f64,
    humidity: f64,
}

/// `OpenWeatherMap` current-conditions client (metric units)
pub struct OpenWeatherMap {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
}

impl OpenWeatherMap {
    /// Create a client
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built
    pub fn new(api_key: &SecretString) -> crate::Result<Self> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client against a different API endpoint
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built
    pub fn with_base_url(api_key: &SecretString, base_url: &str) -> crate::Result<Self> {
        Ok(Self {
            client: super::http_client()?,
            api_key: SecretString::from(api_key.expose_secret()),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait(?Send)]
impl WeatherProvider for OpenWeatherMap {
    async fn current(&self, city: &str) -> Result<WeatherReport, CapabilityError> {
        tracing::debug!(city, "weather request");

        let response = self
            .client
            .get(format!("{}/weather", self.base_url))
            .query(&[
                ("q", city),
                ("appid", self.api_key.expose_secret()),
                ("units", "metric"),
            ])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(CapabilityError::NotFound);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "weather API error");
            return Err(CapabilityError::Unavailable(format!("weather API returned {status}")));
        }

        let data: CurrentResponse = response.json().await?;
        let description = data
            .weather
            .into_iter()
            .next()
            .map(|c| c.description)
            .ok_or_else(|| {
                CapabilityError::Unexpected("weather response had no conditions".to_string())
            })?;

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let humidity = data.main.humidity.round().clamp(0.0, 100.0) as u8;

        Ok(WeatherReport {
            description,
            temperature: data.main.temp,
            humidity,
        })
    }
}
