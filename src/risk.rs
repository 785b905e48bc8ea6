use tracing::warn;

use crate::models::Severity;

pub const MIN_SCORE: f64 = 1.0;
pub const MAX_SCORE: f64 = 10.0;
pub const NEUTRAL_SCORE: f64 = 5.0;

pub fn severity_for(score: f64) -> Severity {
    match score {
        s if s >= 8.0 => Severity::Critical,
        s if s >= 6.0 => Severity::High,
        s if s >= 4.0 => Severity::Moderate,
        _ => Severity::Low,
    }
}

/// Clamps into [1, 10]. Non-finite input collapses to the neutral score.
pub fn clamp_score(score: f64) -> f64 {
    if !score.is_finite() {
        warn!(score, "non-finite score replaced with neutral fallback");
        return NEUTRAL_SCORE;
    }
    score.clamp(MIN_SCORE, MAX_SCORE)
}

pub fn round_one(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Relative weights of the environmental and social sub-scores.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendWeights {
    pub environmental: f64,
    pub social: f64,
}

impl Default for BlendWeights {
    fn default() -> Self {
        Self {
            environmental: 0.7,
            social: 0.3,
        }
    }
}

impl BlendWeights {
    /// Validates and rescales so the weights sum to one.
    pub fn normalized(environmental: f64, social: f64) -> anyhow::Result<Self> {
        let valid = |w: f64| w.is_finite() && w >= 0.0;
        if !valid(environmental) || !valid(social) {
            anyhow::bail!("blend weights must be non-negative numbers");
        }
        let total = environmental + social;
        if total <= 0.0 {
            anyhow::bail!("blend weights must have a positive sum");
        }
        Ok(Self {
            environmental: environmental / total,
            social: social / total,
        })
    }

    pub fn combine(&self, environmental: f64, social: f64) -> f64 {
        let blended = clamp_score(environmental) * self.environmental
            + clamp_score(social) * self.social;
        clamp_score(round_one(blended))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_thresholds_are_exact() {
        assert_eq!(severity_for(8.0), Severity::Critical);
        assert_eq!(severity_for(7.999), Severity::High);
        assert_eq!(severity_for(6.0), Severity::High);
        assert_eq!(severity_for(4.0), Severity::Moderate);
        assert_eq!(severity_for(3.999), Severity::Low);
        assert_eq!(severity_for(1.0), Severity::Low);
        assert_eq!(severity_for(10.0), Severity::Critical);
    }

    #[test]
    fn severity_is_monotonic() {
        let mut previous = Severity::Low;
        for step in 0..=100 {
            let current = severity_for(step as f64 / 10.0);
            assert!(current >= previous);
            previous = current;
        }
    }

    #[test]
    fn clamp_keeps_scores_in_range() {
        assert_eq!(clamp_score(-3.0), 1.0);
        assert_eq!(clamp_score(0.0), 1.0);
        assert_eq!(clamp_score(4.2), 4.2);
        assert_eq!(clamp_score(12.5), 10.0);
        assert_eq!(clamp_score(f64::NAN), NEUTRAL_SCORE);
        assert_eq!(clamp_score(f64::INFINITY), NEUTRAL_SCORE);
    }

    #[test]
    fn default_blend_matches_seventy_thirty() {
        let weights = BlendWeights::default();
        let composite = weights.combine(8.0, 4.0);
        assert_eq!(composite, 6.8);
        assert_eq!(severity_for(composite), Severity::High);
    }

    #[test]
    fn blend_rounds_to_one_decimal() {
        let weights = BlendWeights::default();
        for env in 1..=10 {
            for social in 1..=10 {
                let expected = round_one(env as f64 * 0.7 + social as f64 * 0.3);
                assert_eq!(weights.combine(env as f64, social as f64), expected);
            }
        }
    }

    #[test]
    fn blend_clamps_out_of_range_inputs_first() {
        let weights = BlendWeights::default();
        assert_eq!(weights.combine(25.0, 0.0), round_one(10.0 * 0.7 + 1.0 * 0.3));
    }

    #[test]
    fn normalized_weights_sum_to_one() {
        let weights = BlendWeights::normalized(3.0, 1.0).unwrap();
        assert!((weights.environmental - 0.75).abs() < 1e-12);
        assert!((weights.social - 0.25).abs() < 1e-12);
        assert!(BlendWeights::normalized(0.0, 0.0).is_err());
        assert!(BlendWeights::normalized(-1.0, 2.0).is_err());
    }
}
