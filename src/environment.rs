use crate::models::{EnvironmentalSnapshot, EnvironmentalStrategy, RiskAssessment};
use crate::risk::{clamp_score, severity_for, MAX_SCORE};

/// Environmental sub-scorer. Both strategies are total over a normalized snapshot.
#[derive(Debug, Clone, Copy)]
pub struct EnvironmentalScorer {
    strategy: EnvironmentalStrategy,
}

impl EnvironmentalScorer {
    pub fn new(strategy: EnvironmentalStrategy) -> Self {
        Self { strategy }
    }

    pub fn score(&self, snapshot: &EnvironmentalSnapshot) -> RiskAssessment {
        let (raw, factors) = match self.strategy {
            EnvironmentalStrategy::Threshold => threshold_score(snapshot),
            EnvironmentalStrategy::WeightedAverage => weighted_average_score(snapshot),
        };
        let score = clamp_score(raw);

        RiskAssessment {
            score,
            severity: severity_for(score),
            factors,
            strategy: self.strategy,
        }
    }
}

impl Default for EnvironmentalScorer {
    fn default() -> Self {
        Self::new(EnvironmentalStrategy::Threshold)
    }
}

fn threshold_score(snapshot: &EnvironmentalSnapshot) -> (f64, Vec<String>) {
    let mut total = 0.0;
    let mut factors = Vec::new();

    if snapshot.temperature > 35.0 {
        total += 3.0;
        factors.push("Extreme Heat".to_string());
    } else if snapshot.temperature > 30.0 {
        total += 2.0;
        factors.push("High Temperature".to_string());
    }

    if snapshot.humidity > 85.0 {
        total += 2.0;
        factors.push("High Humidity".to_string());
    }

    if snapshot.aqi >= 4 {
        total += 4.0;
        factors.push("Poor Air Quality".to_string());
    } else if snapshot.aqi >= 3 {
        total += 2.0;
        factors.push("Moderate Air Quality".to_string());
    }

    if factors.is_empty() {
        factors.push("Normal".to_string());
    }

    (f64::min(total, MAX_SCORE), factors)
}

fn weighted_average_score(snapshot: &EnvironmentalSnapshot) -> (f64, Vec<String>) {
    let heat = (snapshot.temperature / 40.0 * 10.0).clamp(0.0, 10.0);
    let air = f64::from(snapshot.aqi) * 2.0;
    let moisture = snapshot.humidity / 100.0 * 5.0;
    let factor = if snapshot.temperature > 30.0 { "Heat" } else { "Normal" };

    ((heat + air + moisture) / 3.0, vec![factor.to_string()])
}
