use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::import::{EconomicOfferImporter, EvaluationBundle, ImportError};
use crate::scoring::{
    validate_configuration, CategoryWeights, EngineThresholds, EvaluationReport, ProviderKey,
    ScoringConfiguration, ScoringEngine, ValidationReport, WeightOverrides,
};

/// Boundary in front of the scoring engine. The engine degrades on odd input; this service
/// rejects bundles that break the contract callers are expected to honor.
#[derive(Debug, Clone)]
pub struct EvaluationService {
    engine: Arc<ScoringEngine>,
}

impl EvaluationService {
    pub fn new(thresholds: EngineThresholds) -> Self {
        Self {
            engine: Arc::new(ScoringEngine::new(thresholds)),
        }
    }

    /// Check the bundle and run one scoring pass over it. When the bundle carries category
    /// weights, the report also compares the resulting ranking with that what-if.
    pub fn evaluate(
        &self,
        bundle: &EvaluationBundle,
    ) -> Result<EvaluationReport, EvaluationServiceError> {
        check_unique_providers(bundle)?;
        check_overrides(bundle)?;
        check_category_weights(bundle)?;

        let mut report = self.engine.evaluate(
            &bundle.configuration,
            &bundle.evaluations,
            &bundle.economic_offers,
            &bundle.weight_overrides,
        );
        if !bundle.category_weights.is_empty() {
            report.scenario = Some(self.engine.simulate(
                &bundle.configuration,
                &report,
                &bundle.category_weights,
            ));
        }

        info!(
            bidders = report.ranking.len(),
            winner = report.winner().map(|entry| entry.provider_name.as_str()).unwrap_or("-"),
            confidence = report.confidence.level.label(),
            risks = report.risks.len(),
            scenario_moves = report
                .scenario
                .as_ref()
                .map(|scenario| scenario.movers().count())
                .unwrap_or(0),
            "evaluation complete"
        );

        Ok(report)
    }

    /// Read a bundle from disk, fold in an optional offers CSV and extra what-if weights, then
    /// evaluate it. Returns the bundle alongside the report so callers can render names from its
    /// configuration.
    pub fn evaluate_files(
        &self,
        bundle_path: &Path,
        offers_path: Option<&Path>,
        overrides: WeightOverrides,
        category_weights: CategoryWeights,
    ) -> Result<(EvaluationBundle, EvaluationReport), EvaluationServiceError> {
        let mut bundle = EvaluationBundle::from_path(bundle_path)?;
        if let Some(path) = offers_path {
            bundle.merge_offers(EconomicOfferImporter::from_path(path)?);
        }
        bundle.weight_overrides.extend(overrides);
        bundle.category_weights.extend(category_weights);
        let report = self.evaluate(&bundle)?;
        Ok((bundle, report))
    }

    pub fn validate(&self, config: &ScoringConfiguration) -> ValidationReport {
        validate_configuration(config)
    }
}

/// Error raised by the evaluation service.
#[derive(Debug, thiserror::Error)]
pub enum EvaluationServiceError {
    #[error("provider '{provider_name}' is evaluated more than once")]
    DuplicateProvider { provider_name: String },
    #[error("weight override targets unknown criterion '{criterion_id}'")]
    UnknownCriterion { criterion_id: String },
    #[error("weight override for '{criterion_id}' must be a finite, non-negative number (got {value})")]
    InvalidOverride { criterion_id: String, value: f64 },
    #[error("scenario weight targets unknown category '{category_id}'")]
    UnknownCategory { category_id: String },
    #[error("scenario weight for '{category_id}' must be a finite, non-negative number (got {value})")]
    InvalidCategoryWeight { category_id: String, value: f64 },
    #[error(transparent)]
    Import(#[from] ImportError),
}

fn check_unique_providers(bundle: &EvaluationBundle) -> Result<(), EvaluationServiceError> {
    let mut seen = BTreeSet::new();
    for evaluation in &bundle.evaluations {
        if !seen.insert(ProviderKey::new(&evaluation.provider_name)) {
            return Err(EvaluationServiceError::DuplicateProvider {
                provider_name: evaluation.provider_name.clone(),
            });
        }
    }
    Ok(())
}

fn check_overrides(bundle: &EvaluationBundle) -> Result<(), EvaluationServiceError> {
    let configured: BTreeSet<&str> = bundle
        .configuration
        .criteria()
        .map(|criterion| criterion.id.as_str())
        .collect();

    for (criterion_id, value) in &bundle.weight_overrides {
        if !value.is_finite() || *value < 0.0 {
            return Err(EvaluationServiceError::InvalidOverride {
                criterion_id: criterion_id.clone(),
                value: *value,
            });
        }
        if !configured.contains(criterion_id.as_str()) {
            return Err(EvaluationServiceError::UnknownCriterion {
                criterion_id: criterion_id.clone(),
            });
        }
    }
    Ok(())
}

fn check_category_weights(bundle: &EvaluationBundle) -> Result<(), EvaluationServiceError> {
    for (category_id, value) in &bundle.category_weights {
        if !value.is_finite() || *value < 0.0 {
            return Err(EvaluationServiceError::InvalidCategoryWeight {
                category_id: category_id.clone(),
                value: *value,
            });
        }
        if !bundle
            .configuration
            .categories
            .iter()
            .any(|category| &category.id == category_id)
        {
            return Err(EvaluationServiceError::UnknownCategory {
                category_id: category_id.clone(),
            });
        }
    }
    Ok(())
}
