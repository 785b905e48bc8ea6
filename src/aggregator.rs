use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::classifier::RiskClassifier;
use crate::environment::EnvironmentalScorer;
use crate::error::AggregationError;
use crate::models::{AggregatedMetrics, CompositeRiskResult, Coordinates, EnvironmentalSnapshot};
use crate::providers::{AirQualityProvider, SocialSignalProvider, WeatherProvider};
use crate::risk::{severity_for, BlendWeights};
use crate::snapshot;
use crate::social::SocialStressScorer;

pub struct RiskAggregator {
    weather: Arc<dyn WeatherProvider>,
    air_quality: Arc<dyn AirQualityProvider>,
    social: Arc<dyn SocialSignalProvider>,
    social_scorer: SocialStressScorer,
    environmental: EnvironmentalScorer,
    classifier: RiskClassifier,
    blend: BlendWeights,
}

impl RiskAggregator {
    pub fn new(
        weather: Arc<dyn WeatherProvider>,
        air_quality: Arc<dyn AirQualityProvider>,
        social: Arc<dyn SocialSignalProvider>,
        social_scorer: SocialStressScorer,
    ) -> Self {
        Self {
            weather,
            air_quality,
            social,
            social_scorer,
            environmental: EnvironmentalScorer::default(),
            classifier: RiskClassifier::default(),
            blend: BlendWeights::default(),
        }
    }

    pub fn with_environmental_scorer(mut self, environmental: EnvironmentalScorer) -> Self {
        self.environmental = environmental;
        self
    }

    pub fn with_classifier(mut self, classifier: RiskClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_blend(mut self, blend: BlendWeights) -> Self {
        self.blend = blend;
        self
    }

    async fn fetch_snapshot(
        &self,
        coordinates: Coordinates,
    ) -> Result<EnvironmentalSnapshot, AggregationError> {
        let (weather, air_quality) = tokio::try_join!(
            async {
                self.weather
                    .fetch_weather(coordinates)
                    .await
                    .map_err(AggregationError::Weather)
            },
            async {
                self.air_quality
                    .fetch_air_quality(coordinates)
                    .await
                    .map_err(AggregationError::AirQuality)
            },
        )?;

        Ok(snapshot::normalize(&weather, &air_quality))
    }

    /// Environmental metrics only. The social provider is not consulted.
    pub async fn environmental_metrics(
        &self,
        coordinates: Coordinates,
    ) -> Result<AggregatedMetrics, AggregationError> {
        let snapshot = self.fetch_snapshot(coordinates).await?;
        Ok(snapshot::metrics(&snapshot, Utc::now()))
    }

    pub async fn analyze(
        &self,
        coordinates: Coordinates,
    ) -> Result<CompositeRiskResult, AggregationError> {
        let snapshot = self.fetch_snapshot(coordinates).await?;
        let environmental = self.environmental.score(&snapshot);
        let classifier = self.classifier.classify(&snapshot);

        let posts = self
            .social
            .fetch_posts(&snapshot.location_name)
            .await
            .map_err(AggregationError::Social)?;
        debug!(
            location = %snapshot.location_name,
            posts = posts.len(),
            "fetched social corpus"
        );
        let social = self.social_scorer.score(&posts, &snapshot.location_name);

        let score = self.blend.combine(environmental.score, social.score);
        let severity = severity_for(score);
        let assessed_at = Utc::now();

        info!(
            lat = coordinates.lat,
            lon = coordinates.lon,
            score,
            severity = %severity,
            environmental = environmental.score,
            social = social.score,
            weather_fallback = snapshot.weather_is_fallback,
            air_quality_fallback = snapshot.air_quality_is_fallback,
            "assessment complete"
        );

        Ok(CompositeRiskResult {
            assessment_id: Uuid::new_v4(),
            assessed_at,
            coordinates,
            score,
            severity,
            contributing_factors: environmental.factors.clone(),
            metrics: snapshot::metrics(&snapshot, assessed_at),
            environmental,
            social,
            classifier,
            snapshot,
        })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use async_trait::async_trait;

    use crate::error::ProviderError;
    use crate::models::{Coordinates, RawAirQuality, RawWeather};
    use crate::providers::{AirQualityProvider, SocialSignalProvider, WeatherProvider};

    pub struct StaticWeather(pub RawWeather);

    #[async_trait]
    impl WeatherProvider for StaticWeather {
        async fn fetch_weather(&self, _: Coordinates) -> Result<RawWeather, ProviderError> {
            Ok(self.0.clone())
        }
    }

    pub struct StaticAirQuality(pub RawAirQuality);

    #[async_trait]
    impl AirQualityProvider for StaticAirQuality {
        async fn fetch_air_quality(&self, _: Coordinates) -> Result<RawAirQuality, ProviderError> {
            Ok(self.0.clone())
        }
    }

    pub struct StaticPosts(pub Vec<String>);

    #[async_trait]
    impl SocialSignalProvider for StaticPosts {
        async fn fetch_posts(&self, _: &str) -> Result<Vec<String>, ProviderError> {
            Ok(self.0.clone())
        }
    }

    pub struct BrokenPosts;

    #[async_trait]
    impl SocialSignalProvider for BrokenPosts {
        async fn fetch_posts(&self, _: &str) -> Result<Vec<String>, ProviderError> {
            Err(ProviderError::Unavailable("feed offline".to_string()))
        }
    }

    pub struct BrokenWeather;

    #[async_trait]
    impl WeatherProvider for BrokenWeather {
        async fn fetch_weather(&self, _: Coordinates) -> Result<RawWeather, ProviderError> {
            Err(ProviderError::Unavailable("weather station offline".to_string()))
        }
    }
}
