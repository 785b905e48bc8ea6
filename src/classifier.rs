use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{ClassifierVerdict, EnvironmentalSnapshot, RiskLabel};
use crate::risk::{clamp_score, severity_for};
use crate::snapshot::{DEFAULT_HUMIDITY, DEFAULT_POLLUTANT, DEFAULT_TEMPERATURE};

pub const FEATURE_TEMPERATURE: &str = "temperature";
pub const FEATURE_HUMIDITY: &str = "humidity";
pub const FEATURE_PM25: &str = "pm25";

const HIGH_RISK_POINTS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierMode {
    Binary,
    Continuous,
}

#[derive(Debug, Clone, Copy)]
pub struct RiskClassifier {
    mode: ClassifierMode,
}

impl RiskClassifier {
    pub fn new(mode: ClassifierMode) -> Self {
        Self { mode }
    }

    pub fn classify(&self, snapshot: &EnvironmentalSnapshot) -> ClassifierVerdict {
        match self.mode {
            ClassifierMode::Binary => predict(
                snapshot.temperature,
                snapshot.humidity,
                snapshot.pollutants.pm2_5,
            ),
            ClassifierMode::Continuous => {
                let score = predict_continuous(&features(snapshot));
                ClassifierVerdict::Continuous {
                    score,
                    severity: severity_for(score),
                }
            }
        }
    }
}

impl Default for RiskClassifier {
    fn default() -> Self {
        Self::new(ClassifierMode::Binary)
    }
}

pub fn features(snapshot: &EnvironmentalSnapshot) -> HashMap<String, f64> {
    HashMap::from([
        (FEATURE_TEMPERATURE.to_string(), snapshot.temperature),
        (FEATURE_HUMIDITY.to_string(), snapshot.humidity),
        (FEATURE_PM25.to_string(), snapshot.pollutants.pm2_5),
    ])
}

pub fn risk_points(temperature: f64, humidity: f64, pm25: f64) -> u32 {
    let mut points = 0;
    if temperature > 30.0 {
        points += 1;
    }
    if temperature > 35.0 {
        points += 1;
    }
    if humidity > 80.0 {
        points += 1;
    }
    if pm25 > 50.0 {
        points += 2;
    }
    if pm25 > 100.0 {
        points += 3;
    }
    points
}

pub fn predict(temperature: f64, humidity: f64, pm25: f64) -> ClassifierVerdict {
    let points = risk_points(temperature, humidity, pm25);
    let label = if points >= HIGH_RISK_POINTS {
        RiskLabel::HighRisk
    } else {
        RiskLabel::LowRisk
    };

    ClassifierVerdict::Binary {
        label,
        points,
        raw_value: u8::from(label == RiskLabel::HighRisk),
    }
}

fn feature(features: &HashMap<String, f64>, name: &str, default: f64) -> f64 {
    features
        .get(name)
        .copied()
        .filter(|value| value.is_finite())
        .unwrap_or(default)
}

pub fn predict_continuous(features: &HashMap<String, f64>) -> f64 {
    let temperature = feature(features, FEATURE_TEMPERATURE, DEFAULT_TEMPERATURE);
    let humidity = feature(features, FEATURE_HUMIDITY, DEFAULT_HUMIDITY);
    let pm25 = feature(features, FEATURE_PM25, DEFAULT_POLLUTANT);

    clamp_score((temperature / 40.0 * 4.0 + humidity / 100.0 * 2.0 + pm25 / 100.0 * 4.0) * 2.0)
}
