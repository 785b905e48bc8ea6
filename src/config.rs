use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::debug;

use crate::aggregator::RiskAggregator;
use crate::classifier::{ClassifierMode, RiskClassifier};
use crate::environment::EnvironmentalScorer;
use crate::models::EnvironmentalStrategy;
use crate::providers::openweather::{OpenWeatherClient, DEFAULT_BASE_URL};
use crate::providers::social_feed::MockSocialFeed;
use crate::risk::BlendWeights;
use crate::social::{RandomSampler, Sampler, SeededSampler, SocialStressScorer};

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
}

impl ProviderConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub fn from_vars<F>(var: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = var("OPENWEATHER_API_KEY")
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        let base_url = var("OPENWEATHER_BASE_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout_secs = match var("PROVIDER_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("PROVIDER_TIMEOUT_SECS must be whole seconds, got {raw:?}"))?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            anyhow::bail!("PROVIDER_TIMEOUT_SECS must be greater than zero");
        }

        Ok(Self {
            api_key,
            base_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

#[derive(Debug, Clone)]
pub struct ScoringConfig {
    pub environmental: EnvironmentalStrategy,
    pub classifier: ClassifierMode,
    pub blend: BlendWeights,
    pub sample_size: usize,
    pub corpus: Option<PathBuf>,
    /// Fixed sampler seed for reproducible social scores.
    pub seed: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub provider: ProviderConfig,
    pub scoring: ScoringConfig,
}

impl AppConfig {
    pub fn build_aggregator(&self) -> anyhow::Result<RiskAggregator> {
        let client = Arc::new(
            OpenWeatherClient::new(
                &self.provider.base_url,
                self.provider.api_key.clone(),
                self.provider.timeout,
            )
            .context("failed to build OpenWeather client")?,
        );

        let feed = match &self.scoring.corpus {
            Some(path) => MockSocialFeed::from_csv(path)
                .with_context(|| format!("failed to load social corpus {}", path.display()))?,
            None => MockSocialFeed::new(),
        };
        debug!(posts = feed.len(), "social corpus ready");

        let sampler: Arc<dyn Sampler> = match self.scoring.seed {
            Some(seed) => Arc::new(SeededSampler::new(seed)),
            None => Arc::new(RandomSampler),
        };
        let social_scorer =
            SocialStressScorer::new(sampler).with_sample_size(self.scoring.sample_size);

        Ok(RiskAggregator::new(client.clone(), client, Arc::new(feed), social_scorer)
            .with_environmental_scorer(EnvironmentalScorer::new(self.scoring.environmental))
            .with_classifier(RiskClassifier::new(self.scoring.classifier))
            .with_blend(self.scoring.blend))
    }
}
