use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Smallest scored unit of a tender, owned by exactly one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    pub id: String,
    pub category_id: String,
    /// Raw declared weight. Either relative to the owning category or absolute across the
    /// configuration; see [`classify_weight_encoding`](super::weights::classify_weight_encoding).
    pub weight: f64,
}

/// Named grouping of criteria with its own share of the overall score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub weight: f64,
    #[serde(default)]
    pub criteria: Vec<Criterion>,
}

/// Ordered categories and criteria for one project. Immutable for the duration of a pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfiguration {
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl ScoringConfiguration {
    pub fn criteria(&self) -> impl Iterator<Item = &Criterion> {
        self.categories
            .iter()
            .flat_map(|category| category.criteria.iter())
    }

    pub fn criteria_count(&self) -> usize {
        self.categories
            .iter()
            .map(|category| category.criteria.len())
            .sum()
    }

    pub fn is_unconfigured(&self) -> bool {
        self.criteria_count() == 0
    }

    pub fn total_category_weight(&self) -> f64 {
        self.categories.iter().map(|category| category.weight).sum()
    }
}

/// Per-bidder output of the external evaluation pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderEvaluation {
    pub provider_name: String,
    #[serde(default)]
    pub individual_scores: BTreeMap<String, f64>,
    #[serde(default)]
    pub compliance_percentage: f64,
    #[serde(default)]
    pub extraction_confidence: Option<f64>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub summary: Option<String>,
    /// Score previously stored by the pipeline, used verbatim when no weight model exists.
    #[serde(default)]
    pub overall_score: f64,
    #[serde(default)]
    pub category_scores: BTreeMap<String, f64>,
}

impl ProviderEvaluation {
    pub fn new(provider_name: impl Into<String>) -> Self {
        Self {
            provider_name: provider_name.into(),
            individual_scores: BTreeMap::new(),
            compliance_percentage: 0.0,
            extraction_confidence: None,
            strengths: Vec::new(),
            weaknesses: Vec::new(),
            summary: None,
            overall_score: 0.0,
            category_scores: BTreeMap::new(),
        }
    }

    pub fn score_for(&self, criterion_id: &str) -> f64 {
        self.individual_scores
            .get(criterion_id)
            .copied()
            .filter(|score| score.is_finite())
            .unwrap_or(0.0)
    }
}

/// Pricing submitted by a bidder. Bidders without an offer have no entry at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomicOffer {
    pub provider_name: String,
    pub net_price: f64,
    #[serde(default)]
    pub total_price: Option<f64>,
    #[serde(default)]
    pub discount_percentage: f64,
    #[serde(default)]
    pub extraction_confidence: Option<f64>,
}

/// Position of one bidder after aggregation and ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub provider_name: String,
    pub overall_score: f64,
    pub category_scores: BTreeMap<String, f64>,
    pub compliance_percentage: f64,
    pub rank: usize,
}

/// Key used to match bidders across stores: case-insensitive, whitespace-collapsed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProviderKey(String);

impl ProviderKey {
    pub fn new(provider_name: &str) -> Self {
        let collapsed = provider_name.split_whitespace().collect::<Vec<_>>().join(" ");
        Self(collapsed.to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Title-cases a provider name for display: "ACME CORP" becomes "Acme Corp".
pub fn display_name(provider_name: &str) -> String {
    provider_name
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
