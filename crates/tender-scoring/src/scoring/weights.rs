//! Weight resolution.
//!
//! Scoring configurations arrive in one of two legacy encodings. Criteria weights inside a
//! category either split the category's own weight (they sum to ~100) or are already absolute
//! shares of the overall score (they sum to the category weight, or to anything else). Both are
//! resolved here into a single absolute scale: the percentage of the 0–100 overall score a
//! criterion contributes.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::domain::{Category, ScoringConfiguration};

/// Totals closer to 100 than this are treated as exact.
const EXACT_TOTAL_EPSILON: f64 = 1e-9;

/// How the raw criterion weights of a category are to be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightEncoding {
    /// Criteria split the category's weight; they sum to ~100.
    Relative,
    /// Criteria already carry their share of the overall score.
    Absolute,
}

impl WeightEncoding {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Relative => "relative",
            Self::Absolute => "absolute",
        }
    }
}

/// Classify a category's criteria total. A single criterion weighted 100 is ambiguous between
/// the two encodings and resolves as relative.
pub fn classify_weight_encoding(criteria_total: f64, tolerance: f64) -> WeightEncoding {
    if (criteria_total - 100.0).abs() < tolerance {
        WeightEncoding::Relative
    } else {
        WeightEncoding::Absolute
    }
}

/// True when a total sits inside the tolerance window without being exactly 100.
pub fn is_borderline_total(criteria_total: f64, tolerance: f64) -> bool {
    let distance = (criteria_total - 100.0).abs();
    distance <= tolerance && distance > EXACT_TOTAL_EPSILON
}

/// Record of the encoding decision taken for one category, kept for audit trails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightAuditEntry {
    pub category_id: String,
    pub encoding: WeightEncoding,
    pub criteria_total: f64,
    pub borderline: bool,
}

/// Effective weight of one criterion on the absolute 0–100 scale.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCriterion {
    pub category_id: String,
    pub criterion_id: String,
    pub weight: f64,
}

/// Resolved weights for a whole configuration, in configuration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedWeights {
    criteria: Vec<ResolvedCriterion>,
    audit: Vec<WeightAuditEntry>,
}

impl ResolvedWeights {
    pub fn criteria(&self) -> &[ResolvedCriterion] {
        &self.criteria
    }

    pub fn audit(&self) -> &[WeightAuditEntry] {
        &self.audit
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    pub fn weight_of(&self, criterion_id: &str) -> Option<f64> {
        self.criteria
            .iter()
            .find(|criterion| criterion.criterion_id == criterion_id)
            .map(|criterion| criterion.weight)
    }

    pub fn total(&self) -> f64 {
        self.criteria.iter().map(|criterion| criterion.weight).sum()
    }
}

/// Resolve every category of a configuration.
pub fn resolve_configuration(config: &ScoringConfiguration, tolerance: f64) -> ResolvedWeights {
    let mut resolved = ResolvedWeights::default();

    for category in &config.categories {
        let (weights, audit) = resolve_category(category, tolerance);
        resolved.criteria.extend(weights);
        if let Some(entry) = audit {
            resolved.audit.push(entry);
        }
    }

    resolved
}

/// Resolve one category. Categories without criteria produce neither weights nor an audit entry.
pub fn resolve_category(
    category: &Category,
    tolerance: f64,
) -> (Vec<ResolvedCriterion>, Option<WeightAuditEntry>) {
    if category.criteria.is_empty() {
        return (Vec::new(), None);
    }

    let criteria_total: f64 = category
        .criteria
        .iter()
        .map(|criterion| non_negative(criterion.weight))
        .sum();
    let encoding = classify_weight_encoding(criteria_total, tolerance);
    let borderline = is_borderline_total(criteria_total, tolerance);

    if borderline {
        warn!(
            category = %category.id,
            criteria_total,
            encoding = encoding.label(),
            "criteria weight total is near 100 but not exact; verify the weight encoding"
        );
    }

    let category_weight = non_negative(category.weight);
    let weights = category
        .criteria
        .iter()
        .map(|criterion| {
            let raw = non_negative(criterion.weight);
            let effective = match encoding {
                WeightEncoding::Relative => raw * category_weight / 100.0,
                WeightEncoding::Absolute => raw,
            };
            ResolvedCriterion {
                category_id: category.id.clone(),
                criterion_id: criterion.id.clone(),
                weight: round_to_cents(effective),
            }
        })
        .collect();

    let audit = WeightAuditEntry {
        category_id: category.id.clone(),
        encoding,
        criteria_total,
        borderline,
    };

    (weights, Some(audit))
}

pub(crate) fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

pub(crate) fn round_to_cents(value: f64) -> f64 {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded.is_finite() {
        rounded
    } else {
        0.0
    }
}
