use std::collections::BTreeMap;

use crate::scoring::domain::{
    Category, Criterion, EconomicOffer, ProviderEvaluation, ScoringConfiguration,
};
use crate::scoring::{EngineThresholds, ScoringEngine, WeightOverrides};

pub(super) fn category(id: &str, weight: f64, criteria: &[(&str, f64)]) -> Category {
    Category {
        id: id.to_string(),
        name: id.to_string(),
        weight,
        criteria: criteria
            .iter()
            .map(|(criterion_id, criterion_weight)| Criterion {
                id: (*criterion_id).to_string(),
                category_id: id.to_string(),
                weight: *criterion_weight,
            })
            .collect(),
    }
}

/// Technical 60 (tech/quality split 50/50) and economic 40 (cost only), category-relative.
pub(super) fn two_category_config() -> ScoringConfiguration {
    ScoringConfiguration {
        categories: vec![
            category("technical", 60.0, &[("tech", 50.0), ("quality", 50.0)]),
            category("economic", 40.0, &[("cost", 100.0)]),
        ],
    }
}

/// One criterion carrying the whole score, so a bidder's overall equals its `score` value.
pub(super) fn single_criterion_config() -> ScoringConfiguration {
    ScoringConfiguration {
        categories: vec![category("overall", 100.0, &[("score", 100.0)])],
    }
}

pub(super) fn scored(name: &str, score: f64, compliance: f64) -> ProviderEvaluation {
    evaluation(name, &[("score", score)], compliance)
}

pub(super) fn evaluation(name: &str, scores: &[(&str, f64)], compliance: f64) -> ProviderEvaluation {
    let mut evaluation = ProviderEvaluation::new(name);
    evaluation.individual_scores = scores
        .iter()
        .map(|(id, score)| ((*id).to_string(), *score))
        .collect();
    evaluation.compliance_percentage = compliance;
    evaluation
}

pub(super) fn offer(name: &str, net_price: f64) -> EconomicOffer {
    EconomicOffer {
        provider_name: name.to_string(),
        net_price,
        total_price: Some(net_price),
        discount_percentage: 0.0,
        extraction_confidence: None,
    }
}

pub(super) fn engine() -> ScoringEngine {
    ScoringEngine::new(EngineThresholds::default())
}

pub(super) fn no_overrides() -> WeightOverrides {
    BTreeMap::new()
}

pub(super) fn approx(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
