//! Weighted multi-criteria scoring, confidence and risk analysis for tender bids.
//!
//! A pass runs weight resolution, aggregation and ranking, then derives differentiators,
//! confidence, risks and economic flags from the ranking. Every step is a pure function of its
//! inputs, so the same inputs always serialize to the same report.

pub mod aggregate;
pub mod confidence;
pub mod differentiators;
pub mod domain;
pub mod economics;
pub mod ranking;
pub mod risks;
pub mod scenario;
pub mod templates;
pub mod thresholds;
pub mod validation;
pub mod weights;

#[cfg(test)]
mod tests;

pub use aggregate::WeightOverrides;
pub use confidence::{ConfidenceAssessment, ConfidenceLevel};
pub use differentiators::DifferentiatorEntry;
pub use domain::{
    display_name, Category, Criterion, EconomicOffer, ProviderEvaluation, ProviderKey,
    RankingEntry, ScoringConfiguration,
};
pub use economics::{EconomicComparisonRow, EconomicFlag};
pub use risks::{RiskFinding, RiskKind, RiskSeverity};
pub use scenario::{CategoryWeights, ScenarioComparison, ScenarioEntry};
pub use templates::default_configuration;
pub use thresholds::EngineThresholds;
pub use validation::{validate_configuration, ValidationIssue, ValidationReport};
pub use weights::{classify_weight_encoding, WeightAuditEntry, WeightEncoding};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Stateless engine applying a fixed set of thresholds. Safe to share between threads and to
/// call concurrently; nothing is cached between calls.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    thresholds: EngineThresholds,
}

impl ScoringEngine {
    pub fn new(thresholds: EngineThresholds) -> Self {
        Self {
            thresholds: thresholds.sanitized(),
        }
    }

    pub fn thresholds(&self) -> &EngineThresholds {
        &self.thresholds
    }

    /// Rank bidders and derive the decision summary.
    pub fn evaluate(
        &self,
        config: &ScoringConfiguration,
        evaluations: &[ProviderEvaluation],
        offers: &[EconomicOffer],
        overrides: &WeightOverrides,
    ) -> EvaluationReport {
        let resolved =
            weights::resolve_configuration(config, self.thresholds.relative_weight_tolerance);

        let entries = evaluations
            .iter()
            .map(|evaluation| {
                let aggregated = aggregate::aggregate_provider(evaluation, config, &resolved, overrides);
                RankingEntry {
                    provider_name: evaluation.provider_name.clone(),
                    overall_score: aggregated.overall_score,
                    category_scores: aggregated.category_scores,
                    compliance_percentage: evaluation.compliance_percentage,
                    rank: 0,
                }
            })
            .collect();
        let ranking = ranking::rank_entries(entries);

        let ranked_evaluations = ranked_evaluations(&ranking, evaluations);
        let differentiators = differentiators::find_differentiators(
            ranked_evaluations.first().copied(),
            ranked_evaluations.get(1).copied(),
            self.thresholds.differentiator_min_gap,
        );

        let confidence = confidence::estimate_confidence(
            &ranking,
            &ranked_evaluations,
            offers,
            &self.thresholds,
        );

        let economic_comparison = economics::build_comparison(offers);
        let risks = risks::detect_risks(&ranking, offers, &economic_comparison, &self.thresholds);
        let economic_flags =
            economics::flag_offers(&ranking, offers, &economic_comparison, &self.thresholds);

        debug!(
            bidders = ranking.len(),
            criteria = resolved.criteria().len(),
            risks = risks.len(),
            confidence = confidence.overall,
            "scoring pass complete"
        );

        EvaluationReport {
            ranking,
            confidence,
            risks,
            differentiators,
            economic_flags,
            economic_comparison,
            weight_audit: resolved.audit().to_vec(),
            scenario: None,
        }
    }

    /// Compare a report's ranking with the ranking under alternative category weights.
    pub fn simulate(
        &self,
        config: &ScoringConfiguration,
        baseline: &EvaluationReport,
        category_weights: &CategoryWeights,
    ) -> ScenarioComparison {
        scenario::simulate_scenario(
            &baseline.ranking,
            config,
            category_weights,
            self.thresholds.scenario_weight_tolerance,
        )
    }
}

/// Full output of one scoring pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub ranking: Vec<RankingEntry>,
    pub confidence: ConfidenceAssessment,
    pub risks: Vec<RiskFinding>,
    pub differentiators: Vec<DifferentiatorEntry>,
    pub economic_flags: BTreeMap<String, Vec<EconomicFlag>>,
    pub economic_comparison: Vec<EconomicComparisonRow>,
    pub weight_audit: Vec<WeightAuditEntry>,
    /// Present when the caller asked for a category what-if.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario: Option<ScenarioComparison>,
}

impl EvaluationReport {
    pub fn winner(&self) -> Option<&RankingEntry> {
        ranking::winner(&self.ranking)
    }

    pub fn runner_up(&self) -> Option<&RankingEntry> {
        ranking::runner_up(&self.ranking)
    }

    pub fn winning_margin(&self) -> Option<f64> {
        ranking::winning_margin(&self.ranking)
    }

    pub fn has_high_severity_risks(&self) -> bool {
        self.risks
            .iter()
            .any(|risk| risk.severity == RiskSeverity::High)
    }
}

/// Evaluations reordered to follow the ranking. Provider names are unique keys, so the first
/// evaluation carrying a ranked name is the one that produced that entry.
fn ranked_evaluations<'a>(
    ranking: &[RankingEntry],
    evaluations: &'a [ProviderEvaluation],
) -> Vec<&'a ProviderEvaluation> {
    ranking
        .iter()
        .filter_map(|entry| {
            evaluations
                .iter()
                .find(|evaluation| evaluation.provider_name == entry.provider_name)
        })
        .collect()
}
