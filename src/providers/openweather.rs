use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use super::fallback::{synthetic_air_quality, synthetic_weather};
use super::{AirQualityProvider, WeatherProvider};
use crate::error::ProviderError;
use crate::models::{Coordinates, RawAirQuality, RawPollutants, RawWeather};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    main: Option<MainBlock>,
    wind: Option<WindBlock>,
    rain: Option<RainBlock>,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MainBlock {
    temp: Option<f64>,
    feels_like: Option<f64>,
    humidity: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct WindBlock {
    speed: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RainBlock {
    #[serde(rename = "1h")]
    one_hour: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct UvReading {
    value: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct AirPollution {
    #[serde(default)]
    list: Vec<AirPollutionEntry>,
}

#[derive(Debug, Deserialize)]
struct AirPollutionEntry {
    main: Option<AqiBlock>,
    #[serde(default)]
    components: RawPollutants,
}

#[derive(Debug, Deserialize)]
struct AqiBlock {
    aqi: Option<u8>,
}

impl CurrentWeather {
    fn into_raw(self, uv_index: Option<f64>) -> RawWeather {
        let (temperature, feels_like, humidity) = match self.main {
            Some(main) => (main.temp, main.feels_like, main.humidity),
            None => (None, None, None),
        };
        RawWeather {
            temperature,
            feels_like,
            humidity,
            wind_speed: self.wind.and_then(|wind| wind.speed),
            rain_1h: self.rain.and_then(|rain| rain.one_hour),
            uv_index,
            location_name: self.name,
            is_fallback: false,
        }
    }
}

impl AirPollution {
    fn into_raw(self) -> Result<RawAirQuality, ProviderError> {
        let entry = self
            .list
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::Malformed("air pollution list is empty".to_string()))?;
        Ok(RawAirQuality {
            aqi: entry.main.and_then(|main| main.aqi),
            components: entry.components,
            is_fallback: false,
        })
    }
}

/// Never-fail OpenWeatherMap collaborator.
pub struct OpenWeatherClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenWeatherClient {
    pub fn new(
        base_url: &str,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        api_key: &str,
        coordinates: Coordinates,
        metric: bool,
    ) -> Result<T, ProviderError> {
        let mut query = vec![
            ("lat", coordinates.lat.to_string()),
            ("lon", coordinates.lon.to_string()),
            ("appid", api_key.to_string()),
        ];
        if metric {
            query.push(("units", "metric".to_string()));
        }

        let response = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .query(&query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        Ok(response.json::<T>().await?)
    }

    async fn live_weather(
        &self,
        api_key: &str,
        coordinates: Coordinates,
    ) -> Result<RawWeather, ProviderError> {
        let current: CurrentWeather = self
            .get("/data/2.5/weather", api_key, coordinates, true)
            .await?;

        // UV is a secondary lookup; losing it only drops one field.
        let uv_index = match self
            .get::<UvReading>("/data/2.5/uvi", api_key, coordinates, false)
            .await
        {
            Ok(reading) => reading.value,
            Err(err) => {
                debug!(error = %err, "UV lookup failed");
                None
            }
        };

        Ok(current.into_raw(uv_index))
    }

    async fn live_air_quality(
        &self,
        api_key: &str,
        coordinates: Coordinates,
    ) -> Result<RawAirQuality, ProviderError> {
        let pollution: AirPollution = self
            .get("/data/2.5/air_pollution", api_key, coordinates, false)
            .await?;
        pollution.into_raw()
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn fetch_weather(&self, coordinates: Coordinates) -> Result<RawWeather, ProviderError> {
        let Some(api_key) = self.api_key.as_deref() else {
            debug!("no OpenWeather API key configured, serving synthetic weather");
            return Ok(synthetic_weather(&mut rand::thread_rng()));
        };

        match self.live_weather(api_key, coordinates).await {
            Ok(weather) => Ok(weather),
            Err(err) => {
                warn!(
                    error = %err,
                    lat = coordinates.lat,
                    lon = coordinates.lon,
                    "weather lookup failed, serving synthetic weather"
                );
                let fallback = synthetic_weather(&mut rand::thread_rng());
                Ok(fallback)
            }
        }
    }
}

#[async_trait]
impl AirQualityProvider for OpenWeatherClient {
    async fn fetch_air_quality(
        &self,
        coordinates: Coordinates,
    ) -> Result<RawAirQuality, ProviderError> {
        let Some(api_key) = self.api_key.as_deref() else {
            debug!("no OpenWeather API key configured, serving synthetic air quality");
            return Ok(synthetic_air_quality(&mut rand::thread_rng()));
        };

        match self.live_air_quality(api_key, coordinates).await {
            Ok(air_quality) => Ok(air_quality),
            Err(err) => {
                warn!(
                    error = %err,
                    lat = coordinates.lat,
                    lon = coordinates.lon,
                    "air-quality lookup failed, serving synthetic air quality"
                );
                let fallback = synthetic_air_quality(&mut rand::thread_rng());
                Ok(fallback)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Query, routing::get, Json, Router};
    use std::collections::HashMap;

    const POINT: Coordinates = Coordinates {
        lat: 13.08,
        lon: 80.27,
    };

    async fn spawn_upstream() -> String {
        let app = Router::new()
            .route(
                "/data/2.5/weather",
                get(|Query(params): Query<HashMap<String, String>>| async move {
                    assert_eq!(params.get("units").map(String::as_str), Some("metric"));
                    Json(serde_json::json!({
                        "name": "Chennai",
                        "main": { "temp": 34.5, "feels_like": 39.0, "humidity": 78 },
                        "wind": { "speed": 4.1 }
                    }))
                }),
            )
            .route(
                "/data/2.5/uvi",
                get(|| async { Json(serde_json::json!({ "value": 9.2 })) }),
            )
            .route(
                "/data/2.5/air_pollution",
                get(|| async {
                    Json(serde_json::json!({
                        "list": [{
                            "main": { "aqi": 4 },
                            "components": { "pm2_5": 61.2, "pm10": 90.0, "o3": 40.5 },
                            "dt": 1605187200
                        }]
                    }))
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{address}")
    }

    fn client(base_url: &str, api_key: Option<&str>) -> OpenWeatherClient {
        OpenWeatherClient::new(
            base_url,
            api_key.map(str::to_string),
            Duration::from_secs(2),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn live_weather_maps_fields() {
        let base_url = spawn_upstream().await;
        let weather = client(&base_url, Some("test-key"))
            .fetch_weather(POINT)
            .await
            .unwrap();

        assert!(!weather.is_fallback);
        assert_eq!(weather.temperature, Some(34.5));
        assert_eq!(weather.humidity, Some(78.0));
        assert_eq!(weather.wind_speed, Some(4.1));
        assert_eq!(weather.rain_1h, None);
        assert_eq!(weather.uv_index, Some(9.2));
        assert_eq!(weather.location_name.as_deref(), Some("Chennai"));
    }

    #[tokio::test]
    async fn live_air_quality_maps_components() {
        let base_url = spawn_upstream().await;
        let air = client(&base_url, Some("test-key"))
            .fetch_air_quality(POINT)
            .await
            .unwrap();

        assert!(!air.is_fallback);
        assert_eq!(air.aqi, Some(4));
        assert_eq!(air.components.pm2_5, Some(61.2));
        assert_eq!(air.components.no2, None);
    }

    #[tokio::test]
    async fn unreachable_upstream_serves_flagged_fallback() {
        let client = client("http://127.0.0.1:9", Some("test-key"));
        let weather = client.fetch_weather(POINT).await.unwrap();
        let air = client.fetch_air_quality(POINT).await.unwrap();
        assert!(weather.is_fallback);
        assert!(air.is_fallback);
    }

    #[tokio::test]
    async fn missing_api_key_skips_the_network() {
        let client = client("http://127.0.0.1:9", None);
        assert!(client.fetch_weather(POINT).await.unwrap().is_fallback);
        assert!(client.fetch_air_quality(POINT).await.unwrap().is_fallback);
    }

    #[test]
    fn empty_pollution_list_is_malformed() {
        let pollution: AirPollution = serde_json::from_str(r#"{"list": []}"#).unwrap();
        assert!(matches!(
            pollution.into_raw(),
            Err(ProviderError::Malformed(_))
        ));
    }
}
