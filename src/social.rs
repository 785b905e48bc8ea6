use std::collections::HashMap;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::models::{PulseEntry, SentimentLabel, SocialSignal};
use crate::risk::{clamp_score, round_one, severity_for};

pub const DEFAULT_SAMPLE_SIZE: usize = 5;

pub const STRESS_INDICATORS: [&str; 7] = [
    "unbearable",
    "worse",
    "heavy",
    "hard",
    "pollution",
    "smog",
    "stressed",
];

/// Draws `k` items from a corpus. Returns fewer when the corpus is smaller.
pub trait Sampler: Send + Sync {
    fn draw(&self, corpus: &[String], k: usize) -> Vec<String>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSampler;

impl Sampler for RandomSampler {
    fn draw(&self, corpus: &[String], k: usize) -> Vec<String> {
        let mut rng = rand::thread_rng();
        corpus.choose_multiple(&mut rng, k).cloned().collect()
    }
}

/// Reproducible sampling: the same seed always yields the same draw.
#[derive(Debug, Clone, Copy)]
pub struct SeededSampler {
    seed: u64,
}

impl SeededSampler {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl Sampler for SeededSampler {
    fn draw(&self, corpus: &[String], k: usize) -> Vec<String> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        corpus.choose_multiple(&mut rng, k).cloned().collect()
    }
}

#[cfg(test)]
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstKSampler;

#[cfg(test)]
impl Sampler for FirstKSampler {
    fn draw(&self, corpus: &[String], k: usize) -> Vec<String> {
        corpus.iter().take(k).cloned().collect()
    }
}

/// Lexicon-based polarity in [-1, 1]. A preceding negator halves and flips a word.
pub struct SentimentAnalyzer {
    lexicon: HashMap<&'static str, f64>,
}

impl SentimentAnalyzer {
    pub fn new() -> Self {
        Self {
            lexicon: Self::build_lexicon(),
        }
    }

    pub fn polarity(&self, text: &str) -> f64 {
        let lowered = text.to_lowercase();
        let tokens: Vec<&str> = lowered
            .split(|c: char| !c.is_alphanumeric() && c != '\'')
            .filter(|token| !token.is_empty())
            .collect();

        let mut total = 0.0;
        let mut matched = 0usize;
        for (index, token) in tokens.iter().enumerate() {
            let Some(value) = self.lexicon.get(*token) else {
                continue;
            };
            let negated = index > 0 && matches!(tokens[index - 1], "not" | "no" | "never" | "isn't");
            total += if negated { value * -0.5 } else { *value };
            matched += 1;
        }

        if matched == 0 {
            return 0.0;
        }
        (total / matched as f64).clamp(-1.0, 1.0)
    }

    pub fn label(&self, text: &str) -> SentimentLabel {
        let polarity = self.polarity(text);
        if polarity > 0.0 {
            SentimentLabel::Positive
        } else if polarity < 0.0 {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }

    fn build_lexicon() -> HashMap<&'static str, f64> {
        [
            // Positive
            ("beautiful", 0.85),
            ("perfect", 1.0),
            ("love", 0.5),
            ("lovely", 0.5),
            ("helpful", 0.3),
            ("new", 0.14),
            ("better", 0.5),
            ("best", 1.0),
            ("great", 0.8),
            ("good", 0.7),
            ("nice", 0.6),
            ("clean", 0.37),
            ("fresh", 0.3),
            ("clear", 0.1),
            ("sunny", 0.3),
            ("pleasant", 0.73),
            ("happy", 0.8),
            ("green", 0.2),
            ("more", 0.5),
            ("calm", 0.3),
            ("safe", 0.5),
            // Negative
            ("heavy", -0.2),
            ("hard", -0.29),
            ("worse", -0.4),
            ("worst", -1.0),
            ("bad", -0.7),
            ("terrible", -1.0),
            ("awful", -1.0),
            ("unbearable", -0.8),
            ("stuck", -0.25),
            ("stressed", -0.5),
            ("dirty", -0.6),
            ("toxic", -0.6),
            ("polluted", -0.5),
            ("hazy", -0.3),
            ("sick", -0.71),
            ("dangerous", -0.6),
            ("scary", -0.5),
            ("warning", -0.2),
        ]
        .into_iter()
        .collect()
    }
}

impl Default for SentimentAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

pub struct SocialStressScorer {
    sampler: Arc<dyn Sampler>,
    analyzer: SentimentAnalyzer,
    indicators: Vec<String>,
    sample_size: usize,
}

impl SocialStressScorer {
    pub fn new(sampler: Arc<dyn Sampler>) -> Self {
        Self {
            sampler,
            analyzer: SentimentAnalyzer::new(),
            indicators: STRESS_INDICATORS.iter().map(|word| word.to_string()).collect(),
            sample_size: DEFAULT_SAMPLE_SIZE,
        }
    }

    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size.max(1);
        self
    }

    /// Substring matches over the joined, lower-cased sample.
    pub fn count_indicators(&self, sample: &[String]) -> usize {
        let all_text = sample.join(" ").to_lowercase();
        self.indicators
            .iter()
            .filter(|word| all_text.contains(word.as_str()))
            .count()
    }

    pub fn score(&self, corpus: &[String], location: &str) -> SocialSignal {
        let sample = self.sampler.draw(corpus, self.sample_size);

        let polarities: Vec<f64> = sample
            .iter()
            .map(|post| self.analyzer.polarity(post))
            .collect();
        let sentiment_average = if polarities.is_empty() {
            0.0
        } else {
            (polarities.iter().sum::<f64>() / polarities.len() as f64).clamp(-1.0, 1.0)
        };

        let stress_indicator_count = self.count_indicators(&sample);
        let base = 5.0 - sentiment_average * 5.0;
        let bonus = if self.indicators.is_empty() {
            0.0
        } else {
            stress_indicator_count as f64 / self.indicators.len() as f64 * 5.0
        };
        let score = round_one(clamp_score(base + bonus));

        let pulse = sample
            .iter()
            .map(|post| PulseEntry {
                text: post.clone(),
                sentiment: self.analyzer.label(post),
            })
            .collect();

        SocialSignal {
            location: location.to_string(),
            sample,
            pulse,
            sentiment_average,
            stress_indicator_count,
            score,
            severity: severity_for(score),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::social_feed::default_feed;
    use proptest::prelude::*;

    fn corpus(posts: &[&str]) -> Vec<String> {
        posts.iter().map(|post| post.to_string()).collect()
    }

    fn first_k_scorer() -> SocialStressScorer {
        SocialStressScorer::new(Arc::new(FirstKSampler))
    }

    #[test]
    fn polarity_follows_lexicon() {
        let analyzer = SentimentAnalyzer::new();
        assert!(analyzer.polarity("Beautiful sunny day! Perfect for a walk.") > 0.5);
        assert!(analyzer.polarity("Stuck in traffic, the smog is unbearable.") < 0.0);
        assert_eq!(analyzer.polarity("The bus leaves at noon."), 0.0);
        assert_eq!(analyzer.polarity(""), 0.0);
    }

    #[test]
    fn negation_flips_and_dampens() {
        let analyzer = SentimentAnalyzer::new();
        assert!((analyzer.polarity("not good") - (-0.35)).abs() < 1e-9);
        assert_eq!(analyzer.label("not good"), SentimentLabel::Negative);
    }

    #[test]
    fn neutral_sample_scores_five() {
        let scorer = first_k_scorer();
        let signal = scorer.score(&corpus(&["perfect", "terrible"]), "Testville");
        assert_eq!(signal.sentiment_average, 0.0);
        assert_eq!(signal.stress_indicator_count, 0);
        assert_eq!(signal.score, 5.0);
        assert_eq!(signal.location, "Testville");
        assert_eq!(
            signal.pulse.iter().map(|p| p.sentiment).collect::<Vec<_>>(),
            vec![SentimentLabel::Positive, SentimentLabel::Negative]
        );
    }

    #[test]
    fn indicators_match_inside_words() {
        let scorer = first_k_scorer();
        assert_eq!(scorer.count_indicators(&corpus(&["I could hardly see"])), 1);
        assert_eq!(scorer.count_indicators(&corpus(&["SMOG and Pollution"])), 2);
        assert_eq!(scorer.count_indicators(&corpus(&["heavy", "heavy rain"])), 1);
    }

    #[test]
    fn score_follows_base_plus_bonus() {
        let scorer = first_k_scorer();
        let feed = default_feed();
        let signal = scorer.score(&feed, "Local Area");
        let analyzer = SentimentAnalyzer::new();

        let sample = &feed[..DEFAULT_SAMPLE_SIZE];
        assert_eq!(signal.sample, sample.to_vec());
        let average =
            sample.iter().map(|p| analyzer.polarity(p)).sum::<f64>() / sample.len() as f64;
        // heavy, hard, pollution, worse, smog, unbearable
        assert_eq!(signal.stress_indicator_count, 6);
        let expected = round_one((5.0 - average * 5.0 + 6.0 / 7.0 * 5.0).clamp(1.0, 10.0));
        assert_eq!(signal.score, expected);
        assert_eq!(signal.severity, severity_for(expected));
    }

    #[test]
    fn empty_corpus_is_neutral() {
        let signal = first_k_scorer().score(&[], "Nowhere");
        assert!(signal.sample.is_empty());
        assert_eq!(signal.score, 5.0);
    }

    #[test]
    fn seeded_sampler_is_reproducible() {
        let feed = default_feed();
        let sampler = SeededSampler::new(42);
        let first = sampler.draw(&feed, 4);
        let second = sampler.draw(&feed, 4);
        assert_eq!(first, second);
        assert_eq!(first.len(), 4);
        assert!(first.iter().all(|post| feed.contains(post)));
    }

    #[test]
    fn sample_size_is_respected() {
        let scorer = SocialStressScorer::new(Arc::new(RandomSampler)).with_sample_size(4);
        let signal = scorer.score(&default_feed(), "Local Area");
        assert_eq!(signal.sample.len(), 4);
    }

    proptest! {
        #[test]
        fn random_draws_stay_bounded(seed in any::<u64>(), size in 4usize..=5) {
            let scorer = SocialStressScorer::new(Arc::new(SeededSampler::new(seed)))
                .with_sample_size(size);
            let signal = scorer.score(&default_feed(), "Local Area");
            prop_assert!((1.0..=10.0).contains(&signal.score));
            prop_assert!((-1.0..=1.0).contains(&signal.sentiment_average));
            prop_assert_eq!(signal.sample.len(), size);
        }
    }
}
