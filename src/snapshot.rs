//! Every default lives here; downstream scorers never see an absent value.

use chrono::{DateTime, Datelike, Timelike, Utc};

use crate::models::{
    AggregatedMetrics, EnvironmentalSnapshot, Pollutants, RawAirQuality, RawPollutants,
    RawWeather,
};
use crate::risk::round_one;

pub const DEFAULT_TEMPERATURE: f64 = 25.0;
pub const DEFAULT_FEELS_LIKE: f64 = 27.0;
pub const DEFAULT_HUMIDITY: f64 = 60.0;
pub const DEFAULT_WIND_SPEED: f64 = 5.0;
pub const DEFAULT_RAIN_1H: f64 = 0.0;
pub const DEFAULT_UV_INDEX: f64 = 5.0;
pub const DEFAULT_AQI: u8 = 2;
pub const DEFAULT_POLLUTANT: f64 = 0.0;
pub const DEFAULT_LOCATION: &str = "Local Area";

fn finite_or(value: Option<f64>, default: f64) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(default)
}

fn concentration(value: Option<f64>) -> f64 {
    finite_or(value, DEFAULT_POLLUTANT).max(0.0)
}

fn normalize_pollutants(raw: &RawPollutants) -> Pollutants {
    Pollutants {
        pm2_5: concentration(raw.pm2_5),
        pm10: concentration(raw.pm10),
        no2: concentration(raw.no2),
        o3: concentration(raw.o3),
        so2: concentration(raw.so2),
        nh3: concentration(raw.nh3),
        co: concentration(raw.co),
    }
}

pub fn normalize(weather: &RawWeather, air_quality: &RawAirQuality) -> EnvironmentalSnapshot {
    let location_name = weather
        .location_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_LOCATION)
        .to_string();

    EnvironmentalSnapshot {
        temperature: finite_or(weather.temperature, DEFAULT_TEMPERATURE),
        feels_like: finite_or(weather.feels_like, DEFAULT_FEELS_LIKE),
        humidity: finite_or(weather.humidity, DEFAULT_HUMIDITY).clamp(0.0, 100.0),
        wind_speed: finite_or(weather.wind_speed, DEFAULT_WIND_SPEED).max(0.0),
        rain_1h: finite_or(weather.rain_1h, DEFAULT_RAIN_1H).max(0.0),
        uv_index: finite_or(weather.uv_index, DEFAULT_UV_INDEX).max(0.0),
        aqi: air_quality.aqi.unwrap_or(DEFAULT_AQI).clamp(1, 5),
        pollutants: normalize_pollutants(&air_quality.components),
        location_name,
        weather_is_fallback: weather.is_fallback,
        air_quality_is_fallback: air_quality.is_fallback,
    }
}

/// Flat metrics view, including the coarse trend estimates clients chart.
/// Hour and weekday are read in UTC, whatever the host timezone.
pub fn metrics(snapshot: &EnvironmentalSnapshot, at: DateTime<Utc>) -> AggregatedMetrics {
    AggregatedMetrics {
        temperature: snapshot.temperature,
        humidity: snapshot.humidity,
        pm25: snapshot.pollutants.pm2_5,
        wind_speed: snapshot.wind_speed,
        rainfall: snapshot.rain_1h,
        uv_index: snapshot.uv_index,
        hour_of_day: at.hour(),
        day_of_week: at.weekday().num_days_from_monday(),
        temp_3_day_avg: round_one(snapshot.temperature * 0.98),
        rain_7_day_total: round_one(snapshot.rain_1h * 2.5),
    }
}
