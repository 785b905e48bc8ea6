use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Four-level ordinal classification shared by every score in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Moderate,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Moderate => "Moderate",
            Severity::High => "High",
            Severity::Critical => "Critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Weather as reported by a provider. Any measurement may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawWeather {
    pub temperature: Option<f64>,
    pub feels_like: Option<f64>,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
    pub rain_1h: Option<f64>,
    pub uv_index: Option<f64>,
    pub location_name: Option<String>,
    pub is_fallback: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPollutants {
    pub pm2_5: Option<f64>,
    pub pm10: Option<f64>,
    pub no2: Option<f64>,
    pub o3: Option<f64>,
    pub so2: Option<f64>,
    pub nh3: Option<f64>,
    pub co: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawAirQuality {
    pub aqi: Option<u8>,
    pub components: RawPollutants,
    pub is_fallback: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pollutants {
    pub pm2_5: f64,
    pub pm10: f64,
    pub no2: f64,
    pub o3: f64,
    pub so2: f64,
    pub nh3: f64,
    pub co: f64,
}

/// Fully-populated, immutable measurements for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalSnapshot {
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub rain_1h: f64,
    pub uv_index: f64,
    pub aqi: u8,
    pub pollutants: Pollutants,
    pub location_name: String,
    pub weather_is_fallback: bool,
    pub air_quality_is_fallback: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PulseEntry {
    pub text: String,
    pub sentiment: SentimentLabel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialSignal {
    pub location: String,
    pub sample: Vec<String>,
    pub pulse: Vec<PulseEntry>,
    pub sentiment_average: f64,
    pub stress_indicator_count: usize,
    pub score: f64,
    pub severity: Severity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentalStrategy {
    Threshold,
    WeightedAverage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub score: f64,
    pub severity: Severity,
    pub factors: Vec<String>,
    pub strategy: EnvironmentalStrategy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLabel {
    #[serde(rename = "Low Risk")]
    LowRisk,
    #[serde(rename = "High Risk")]
    HighRisk,
}

impl RiskLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLabel::LowRisk => "Low Risk",
            RiskLabel::HighRisk => "High Risk",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ClassifierVerdict {
    Binary {
        label: RiskLabel,
        points: u32,
        raw_value: u8,
    },
    Continuous {
        score: f64,
        severity: Severity,
    },
}

impl ClassifierVerdict {
    pub fn label(&self) -> String {
        match self {
            ClassifierVerdict::Binary { label, .. } => label.as_str().to_string(),
            ClassifierVerdict::Continuous { severity, .. } => severity.to_string(),
        }
    }

    pub fn raw_value(&self) -> f64 {
        match self {
            ClassifierVerdict::Binary { raw_value, .. } => f64::from(*raw_value),
            ClassifierVerdict::Continuous { score, .. } => *score,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedMetrics {
    pub temperature: f64,
    pub humidity: f64,
    pub pm25: f64,
    pub wind_speed: f64,
    pub rainfall: f64,
    pub uv_index: f64,
    pub hour_of_day: u32,
    pub day_of_week: u32,
    pub temp_3_day_avg: f64,
    pub rain_7_day_total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeRiskResult {
    pub assessment_id: Uuid,
    pub assessed_at: DateTime<Utc>,
    pub coordinates: Coordinates,
    pub score: f64,
    pub severity: Severity,
    pub contributing_factors: Vec<String>,
    pub environmental: RiskAssessment,
    pub social: SocialSignal,
    pub classifier: ClassifierVerdict,
    pub metrics: AggregatedMetrics,
    pub snapshot: EnvironmentalSnapshot,
}
