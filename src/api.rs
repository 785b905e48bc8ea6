use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::aggregator::RiskAggregator;
use crate::error::{ApiError, ApiResult};
use crate::models::{
    AggregatedMetrics, CompositeRiskResult, Coordinates, EnvironmentalSnapshot, RiskAssessment,
    SocialSignal,
};

#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<RiskAggregator>,
    pub version: String,
}

#[derive(Debug, Deserialize)]
pub struct LocationQuery {
    pub lat: f64,
    pub lon: f64,
}

impl LocationQuery {
    fn coordinates(&self) -> ApiResult<Coordinates> {
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(ApiError::BadRequest(format!("lat {} out of range", self.lat)));
        }
        if !(-180.0..=180.0).contains(&self.lon) {
            return Err(ApiError::BadRequest(format!("lon {} out of range", self.lon)));
        }
        Ok(Coordinates {
            lat: self.lat,
            lon: self.lon,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RiskSummary {
    pub temperature: f64,
    pub humidity: f64,
    pub pm25: f64,
    pub uv_index: f64,
    pub rainfall: f64,
    pub risk_level: f64,
    pub severity_label: String,
    pub social_stress_score: f64,
}

impl From<&CompositeRiskResult> for RiskSummary {
    fn from(result: &CompositeRiskResult) -> Self {
        Self {
            temperature: result.metrics.temperature,
            humidity: result.metrics.humidity,
            pm25: result.metrics.pm25,
            uv_index: result.metrics.uv_index,
            rainfall: result.metrics.rainfall,
            risk_level: result.score,
            severity_label: result.severity.to_string(),
            social_stress_score: result.social.score,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AssessmentBlock {
    pub score: f64,
    pub level: String,
    pub factors: Vec<String>,
    pub ml_model_prediction: String,
    pub ml_raw_output: f64,
    pub social_stress_score: f64,
    pub social_severity: String,
    pub recent_social_sentiment: f64,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RiskDataResponse {
    pub assessment_id: String,
    pub location: Coordinates,
    pub weather: EnvironmentalSnapshot,
    pub air_quality: AirQualityView,
    pub risk_assessment: AssessmentBlock,
    pub social_data: SocialSignal,
    pub environmental_data: RiskAssessment,
    pub aggregated_metrics: AggregatedMetrics,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AirQualityView {
    pub aqi: u8,
    pub components: crate::models::Pollutants,
    pub is_fallback: bool,
}

impl From<CompositeRiskResult> for RiskDataResponse {
    fn from(result: CompositeRiskResult) -> Self {
        let risk_assessment = AssessmentBlock {
            score: result.score,
            level: result.severity.to_string(),
            factors: result.contributing_factors.clone(),
            ml_model_prediction: result.classifier.label(),
            ml_raw_output: result.classifier.raw_value(),
            social_stress_score: result.social.score,
            social_severity: result.social.severity.to_string(),
            recent_social_sentiment: result.social.sentiment_average,
            timestamp: result.assessed_at.to_rfc3339(),
        };

        Self {
            assessment_id: result.assessment_id.to_string(),
            location: result.coordinates,
            air_quality: AirQualityView {
                aqi: result.snapshot.aqi,
                components: result.snapshot.pollutants,
                is_fallback: result.snapshot.air_quality_is_fallback,
            },
            weather: result.snapshot,
            risk_assessment,
            social_data: result.social,
            environmental_data: result.environmental,
            aggregated_metrics: result.metrics,
        }
    }
}

async fn assess(state: &AppState, query: &LocationQuery) -> ApiResult<CompositeRiskResult> {
    let coordinates = query.coordinates()?;
    state.aggregator.analyze(coordinates).await.map_err(|err| {
        error!(error = %err, lat = coordinates.lat, lon = coordinates.lon, "assessment failed");
        ApiError::from(err)
    })
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
    })
}

pub async fn risk_summary(
    State(state): State<AppState>,
    Query(query): Query<LocationQuery>,
) -> ApiResult<Json<RiskSummary>> {
    let result = assess(&state, &query).await?;
    Ok(Json(RiskSummary::from(&result)))
}

pub async fn risk_data(
    State(state): State<AppState>,
    Query(query): Query<LocationQuery>,
) -> ApiResult<Json<RiskDataResponse>> {
    let result = assess(&state, &query).await?;
    Ok(Json(RiskDataResponse::from(result)))
}

pub async fn environmental_data(
    State(state): State<AppState>,
    Query(query): Query<LocationQuery>,
) -> ApiResult<Json<AggregatedMetrics>> {
    let coordinates = query.coordinates()?;
    let metrics = state
        .aggregator
        .environmental_metrics(coordinates)
        .await
        .map_err(|err| {
            error!(
                error = %err,
                lat = coordinates.lat,
                lon = coordinates.lon,
                "environmental lookup failed"
            );
            ApiError::from(err)
        })?;
    Ok(Json(metrics))
}

pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/risk", get(risk_summary))
        .route("/risk-data", get(risk_data))
        .route("/environmental-data", get(environmental_data));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
