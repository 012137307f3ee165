use std::collections::BTreeMap;

use super::domain::{ProviderEvaluation, ScoringConfiguration};
use super::weights::{non_negative, ResolvedWeights};

/// What-if weights keyed by criterion id. They replace resolved weights without touching the
/// base configuration.
pub type WeightOverrides = BTreeMap<String, f64>;

/// Overall and per-category scores of one bidder.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedScore {
    pub overall_score: f64,
    pub category_scores: BTreeMap<String, f64>,
}

#[derive(Default)]
struct CategoryAccumulator {
    weighted_sum: f64,
    weight_total: f64,
}

/// Weight a bidder's criterion scores.
///
/// The overall score is `Σ score · weight / 100` across configured criteria. A category score is
/// the weighted average of its criteria, normalized by the category's own effective weight total
/// and set to 0 when that total is 0. Without any configured criteria the bidder's stored scores
/// are returned unchanged.
pub fn aggregate_provider(
    evaluation: &ProviderEvaluation,
    config: &ScoringConfiguration,
    resolved: &ResolvedWeights,
    overrides: &WeightOverrides,
) -> AggregatedScore {
    if resolved.is_empty() {
        return AggregatedScore {
            overall_score: evaluation.overall_score,
            category_scores: evaluation.category_scores.clone(),
        };
    }

    let mut accumulators: BTreeMap<&str, CategoryAccumulator> = config
        .categories
        .iter()
        .map(|category| (category.id.as_str(), CategoryAccumulator::default()))
        .collect();
    let mut overall_score = 0.0;

    for criterion in resolved.criteria() {
        let weight = effective_weight(&criterion.criterion_id, criterion.weight, overrides);
        let score = evaluation.score_for(&criterion.criterion_id);
        overall_score += score * weight / 100.0;

        let accumulator = accumulators
            .entry(criterion.category_id.as_str())
            .or_default();
        accumulator.weighted_sum += score * weight;
        accumulator.weight_total += weight;
    }

    let category_scores = accumulators
        .into_iter()
        .map(|(category_id, accumulator)| {
            let score = if accumulator.weight_total > 0.0 {
                accumulator.weighted_sum / accumulator.weight_total
            } else {
                0.0
            };
            (category_id.to_string(), finite_or_zero(score))
        })
        .collect();

    AggregatedScore {
        overall_score: finite_or_zero(overall_score),
        category_scores,
    }
}

fn effective_weight(criterion_id: &str, resolved: f64, overrides: &WeightOverrides) -> f64 {
    non_negative(overrides.get(criterion_id).copied().unwrap_or(resolved))
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
