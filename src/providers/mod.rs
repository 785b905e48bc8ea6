//! Data collaborators feeding the risk pipeline.
//!
//! Weather and air-quality providers absorb transport failures and hand back
//! flagged synthetic records. An `Err` from any provider is a hard fault.

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::models::{Coordinates, RawAirQuality, RawWeather};

pub mod fallback;
pub mod openweather;
pub mod social_feed;

#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn fetch_weather(&self, coordinates: Coordinates) -> Result<RawWeather, ProviderError>;
}

#[async_trait]
pub trait AirQualityProvider: Send + Sync {
    async fn fetch_air_quality(
        &self,
        coordinates: Coordinates,
    ) -> Result<RawAirQuality, ProviderError>;
}

#[async_trait]
pub trait SocialSignalProvider: Send + Sync {
    /// Community posts available for `location`.
    async fn fetch_posts(&self, location: &str) -> Result<Vec<String>, ProviderError>;
}
