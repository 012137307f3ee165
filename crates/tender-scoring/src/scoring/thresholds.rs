use serde::{Deserialize, Serialize};

/// Criteria totals within this distance of 100 are read as category-relative weights.
pub const RELATIVE_WEIGHT_TOLERANCE: f64 = 1.0;
/// Minimum winner lead (0–10 scale) for a criterion to count as a differentiator.
pub const DIFFERENTIATOR_MIN_GAP: f64 = 1.0;
/// Extraction factor used when no bidder reports an extraction confidence.
pub const NEUTRAL_EXTRACTION_CONFIDENCE: f64 = 50.0;
/// Compliance percentages strictly between 0 and this value raise a high-severity risk.
pub const LOW_COMPLIANCE_THRESHOLD: f64 = 60.0;
/// Winner/runner-up gaps below this value raise a close-race risk.
pub const CLOSE_RACE_GAP: f64 = 0.5;
/// Net prices above this multiple of the cheapest net price are flagged.
pub const PRICE_OUTLIER_MULTIPLIER: f64 = 2.0;
/// Discounts above this percentage are flagged as suspicious.
pub const HIGH_DISCOUNT_PERCENTAGE: f64 = 40.0;
/// Offers extracted with less confidence than this are flagged.
pub const LOW_EXTRACTION_CONFIDENCE: f64 = 0.5;
/// What-if category weights totalling within this distance of 100 count as balanced.
pub const SCENARIO_WEIGHT_TOLERANCE: f64 = 0.5;

pub const COVERAGE_FACTOR_WEIGHT: f64 = 0.30;
pub const EXTRACTION_FACTOR_WEIGHT: f64 = 0.25;
pub const COMPLETENESS_FACTOR_WEIGHT: f64 = 0.25;
pub const DIFFERENTIATION_FACTOR_WEIGHT: f64 = 0.20;

/// Tunable dials of the engine. Every field falls back to its named constant, so a partial
/// JSON document overrides only what it mentions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineThresholds {
    pub relative_weight_tolerance: f64,
    pub differentiator_min_gap: f64,
    pub neutral_extraction_confidence: f64,
    pub low_compliance_threshold: f64,
    pub close_race_gap: f64,
    pub price_outlier_multiplier: f64,
    pub high_discount_percentage: f64,
    pub low_extraction_confidence: f64,
    pub scenario_weight_tolerance: f64,
}

impl Default for EngineThresholds {
    fn default() -> Self {
        Self {
            relative_weight_tolerance: RELATIVE_WEIGHT_TOLERANCE,
            differentiator_min_gap: DIFFERENTIATOR_MIN_GAP,
            neutral_extraction_confidence: NEUTRAL_EXTRACTION_CONFIDENCE,
            low_compliance_threshold: LOW_COMPLIANCE_THRESHOLD,
            close_race_gap: CLOSE_RACE_GAP,
            price_outlier_multiplier: PRICE_OUTLIER_MULTIPLIER,
            high_discount_percentage: HIGH_DISCOUNT_PERCENTAGE,
            low_extraction_confidence: LOW_EXTRACTION_CONFIDENCE,
            scenario_weight_tolerance: SCENARIO_WEIGHT_TOLERANCE,
        }
    }
}

impl EngineThresholds {
    /// Replace any non-finite or negative dial with its default.
    pub fn sanitized(self) -> Self {
        fn dial(value: f64, fallback: f64) -> f64 {
            if value.is_finite() && value >= 0.0 {
                value
            } else {
                fallback
            }
        }

        Self {
            relative_weight_tolerance: dial(
                self.relative_weight_tolerance,
                RELATIVE_WEIGHT_TOLERANCE,
            ),
            differentiator_min_gap: dial(self.differentiator_min_gap, DIFFERENTIATOR_MIN_GAP),
            neutral_extraction_confidence: dial(
                self.neutral_extraction_confidence,
                NEUTRAL_EXTRACTION_CONFIDENCE,
            )
            .min(100.0),
            low_compliance_threshold: dial(self.low_compliance_threshold, LOW_COMPLIANCE_THRESHOLD),
            close_race_gap: dial(self.close_race_gap, CLOSE_RACE_GAP),
            price_outlier_multiplier: dial(self.price_outlier_multiplier, PRICE_OUTLIER_MULTIPLIER),
            high_discount_percentage: dial(self.high_discount_percentage, HIGH_DISCOUNT_PERCENTAGE),
            low_extraction_confidence: dial(
                self.low_extraction_confidence,
                LOW_EXTRACTION_CONFIDENCE,
            ),
            scenario_weight_tolerance: dial(
                self.scenario_weight_tolerance,
                SCENARIO_WEIGHT_TOLERANCE,
            ),
        }
    }
}
