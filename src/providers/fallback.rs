use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::{RawAirQuality, RawPollutants, RawWeather};

const FALLBACK_RAIN_CHOICES: [f64; 5] = [0.0, 0.0, 0.0, 1.5, 0.5];

pub fn synthetic_weather<R: Rng + ?Sized>(rng: &mut R) -> RawWeather {
    RawWeather {
        temperature: Some(25.0 + rng.gen_range(-5.0..=5.0)),
        feels_like: Some(27.0 + rng.gen_range(-5.0..=5.0)),
        humidity: Some(60.0 + rng.gen_range(-10.0..=10.0)),
        wind_speed: Some(5.0 + rng.gen_range(-2.0..=5.0)),
        rain_1h: FALLBACK_RAIN_CHOICES.choose(rng).copied(),
        uv_index: Some(rng.gen_range(0.0..=10.0)),
        location_name: None,
        is_fallback: true,
    }
}

pub fn synthetic_air_quality<R: Rng + ?Sized>(rng: &mut R) -> RawAirQuality {
    RawAirQuality {
        aqi: Some(rng.gen_range(1..=5)),
        components: RawPollutants {
            pm2_5: Some(rng.gen_range(5.0..=50.0)),
            pm10: Some(rng.gen_range(10.0..=80.0)),
            no2: Some(rng.gen_range(2.0..=30.0)),
            o3: Some(rng.gen_range(20.0..=100.0)),
            so2: Some(rng.gen_range(1.0..=10.0)),
            nh3: Some(rng.gen_range(0.5..=5.0)),
            co: Some(rng.gen_range(200.0..=1000.0)),
        },
        is_fallback: true,
    }
}
