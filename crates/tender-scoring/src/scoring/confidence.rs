use serde::{Deserialize, Serialize};

use super::domain::{EconomicOffer, ProviderEvaluation, ProviderKey, RankingEntry};
use super::thresholds::{
    EngineThresholds, COMPLETENESS_FACTOR_WEIGHT, COVERAGE_FACTOR_WEIGHT,
    DIFFERENTIATION_FACTOR_WEIGHT, EXTRACTION_FACTOR_WEIGHT,
};

/// How far the ranking can be trusted, independent of who wins. All values are 0–100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceAssessment {
    pub coverage: f64,
    pub extraction: f64,
    pub completeness: f64,
    pub differentiation: f64,
    pub overall: f64,
    pub level: ConfidenceLevel,
}

impl ConfidenceAssessment {
    pub fn empty() -> Self {
        Self {
            coverage: 0.0,
            extraction: 0.0,
            completeness: 0.0,
            differentiation: 0.0,
            overall: 0.0,
            level: ConfidenceLevel::Low,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    pub fn from_overall(overall: f64) -> Self {
        if overall >= 75.0 {
            Self::High
        } else if overall >= 50.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

/// Combine coverage, extraction quality, completeness and differentiation into one score.
///
/// `evaluations` must follow `ranking` order. Extraction confidence is read from the
/// evaluation and falls back to the bidder's matching economic offer. Completeness counts the
/// scores each bidder actually carries; a slot is filled when its score is above 0, and
/// criteria a bidder was never scored on are not slots.
pub fn estimate_confidence(
    ranking: &[RankingEntry],
    evaluations: &[&ProviderEvaluation],
    offers: &[EconomicOffer],
    thresholds: &EngineThresholds,
) -> ConfidenceAssessment {
    if ranking.is_empty() {
        return ConfidenceAssessment::empty();
    }

    let bidders = ranking.len() as f64;
    let coverage = (ranking
        .iter()
        .map(|entry| entry.compliance_percentage)
        .sum::<f64>()
        / bidders)
        .clamp(0.0, 100.0);

    let extraction_samples: Vec<f64> = evaluations
        .iter()
        .filter_map(|evaluation| extraction_confidence(evaluation, offers))
        .collect();
    let extraction = if extraction_samples.is_empty() {
        thresholds.neutral_extraction_confidence
    } else {
        extraction_samples.iter().sum::<f64>() / extraction_samples.len() as f64 * 100.0
    }
    .clamp(0.0, 100.0);

    let (filled, total) = evaluations
        .iter()
        .map(|evaluation| carried_slots(evaluation))
        .fold((0usize, 0usize), |(filled, total), (f, t)| {
            (filled + f, total + t)
        });
    let completeness = if total > 0 {
        filled as f64 / total as f64 * 100.0
    } else {
        0.0
    };

    let best = ranking.first().map(|entry| entry.overall_score).unwrap_or(0.0);
    let worst = ranking.last().map(|entry| entry.overall_score).unwrap_or(0.0);
    let differentiation = differentiation_factor(best - worst);

    let overall = (coverage * COVERAGE_FACTOR_WEIGHT
        + extraction * EXTRACTION_FACTOR_WEIGHT
        + completeness * COMPLETENESS_FACTOR_WEIGHT
        + differentiation * DIFFERENTIATION_FACTOR_WEIGHT)
        .clamp(0.0, 100.0);

    ConfidenceAssessment {
        coverage,
        extraction,
        completeness,
        differentiation,
        overall,
        level: ConfidenceLevel::from_overall(overall),
    }
}

/// Step function rewarding a clear spread between best and worst overall scores.
pub fn differentiation_factor(spread: f64) -> f64 {
    if spread > 2.0 {
        100.0
    } else if spread > 1.0 {
        70.0
    } else if spread > 0.5 {
        40.0
    } else {
        20.0
    }
}

fn extraction_confidence(evaluation: &ProviderEvaluation, offers: &[EconomicOffer]) -> Option<f64> {
    let value = evaluation.extraction_confidence.or_else(|| {
        let key = ProviderKey::new(&evaluation.provider_name);
        offers
            .iter()
            .find(|offer| ProviderKey::new(&offer.provider_name) == key)
            .and_then(|offer| offer.extraction_confidence)
    })?;
    value.is_finite().then_some(value)
}

fn carried_slots(evaluation: &ProviderEvaluation) -> (usize, usize) {
    let filled = evaluation
        .individual_scores
        .values()
        .filter(|score| **score > 0.0)
        .count();
    (filled, evaluation.individual_scores.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn differentiation_steps() {
        assert_eq!(differentiation_factor(2.5), 100.0);
        assert_eq!(differentiation_factor(2.0), 70.0);
        assert_eq!(differentiation_factor(1.2), 70.0);
        assert_eq!(differentiation_factor(0.7), 40.0);
        assert_eq!(differentiation_factor(0.5), 20.0);
        assert_eq!(differentiation_factor(0.0), 20.0);
    }

    #[test]
    fn levels_follow_cutoffs() {
        assert_eq!(ConfidenceLevel::from_overall(80.0), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::from_overall(75.0), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::from_overall(60.0), ConfidenceLevel::Medium);
        assert_eq!(ConfidenceLevel::from_overall(10.0), ConfidenceLevel::Low);
    }

    #[test]
    fn no_bidders_means_zero_confidence() {
        let assessment =
            estimate_confidence(&[], &[], &[], &EngineThresholds::default());
        assert_eq!(assessment, ConfidenceAssessment::empty());
    }
}
