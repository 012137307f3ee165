//! What-if re-weighting of categories, compared position by position against a baseline ranking.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{RankingEntry, ScoringConfiguration};
use super::weights::{non_negative, round_to_cents};

/// Category id → alternative category weight. Categories left out keep their configured weight.
pub type CategoryWeights = BTreeMap<String, f64>;

/// One bidder's standing before and after a what-if re-weighting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioEntry {
    pub provider_name: String,
    pub baseline_score: f64,
    pub baseline_position: usize,
    pub simulated_score: f64,
    pub simulated_position: usize,
    /// Positive when the bidder moved up, negative when it dropped.
    pub position_change: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioComparison {
    /// Weight applied to every configured category, alternative or configured.
    pub category_weights: CategoryWeights,
    pub total_weight: f64,
    /// Whether the applied weights total 100 within the scenario tolerance.
    pub balanced: bool,
    /// Ordered by simulated position.
    pub entries: Vec<ScenarioEntry>,
}

impl ScenarioComparison {
    pub fn changes_winner(&self) -> bool {
        self.entries
            .first()
            .is_some_and(|entry| entry.baseline_position != 1)
    }

    pub fn movers(&self) -> impl Iterator<Item = &ScenarioEntry> {
        self.entries.iter().filter(|entry| entry.position_change != 0)
    }
}

/// Re-score a ranked field from its category scores under alternative category weights.
///
/// Applied weights are normalised by their total, so an unbalanced scenario still yields scores
/// on the 0–10 scale. Simulated scores are rounded to 2 decimals; ties keep baseline order.
pub fn simulate_scenario(
    baseline: &[RankingEntry],
    config: &ScoringConfiguration,
    alternative: &CategoryWeights,
    tolerance: f64,
) -> ScenarioComparison {
    let category_weights: CategoryWeights = config
        .categories
        .iter()
        .map(|category| {
            let weight = alternative
                .get(&category.id)
                .copied()
                .unwrap_or(category.weight);
            (category.id.clone(), non_negative(weight))
        })
        .collect();
    let total_weight: f64 = category_weights.values().sum();
    let divisor = if total_weight > 0.0 { total_weight } else { 1.0 };

    let mut simulated: Vec<(usize, &RankingEntry, f64)> = baseline
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let score = category_weights
                .iter()
                .map(|(category_id, weight)| {
                    let category_score = entry
                        .category_scores
                        .get(category_id)
                        .copied()
                        .filter(|score| score.is_finite())
                        .unwrap_or(0.0);
                    category_score * weight / divisor
                })
                .sum::<f64>();
            (index, entry, round_to_cents(score))
        })
        .collect();
    simulated.sort_by(|a, b| b.2.total_cmp(&a.2));

    let entries = simulated
        .into_iter()
        .enumerate()
        .map(|(position, (baseline_index, entry, simulated_score))| ScenarioEntry {
            provider_name: entry.provider_name.clone(),
            baseline_score: entry.overall_score,
            baseline_position: baseline_index + 1,
            simulated_score,
            simulated_position: position + 1,
            position_change: baseline_index as i64 - position as i64,
        })
        .collect();

    ScenarioComparison {
        category_weights,
        total_weight,
        balanced: (total_weight - 100.0).abs() < tolerance,
        entries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::domain::Category;

    fn entry(name: &str, overall: f64, scores: &[(&str, f64)]) -> RankingEntry {
        RankingEntry {
            provider_name: name.to_string(),
            overall_score: overall,
            category_scores: scores
                .iter()
                .map(|(id, score)| ((*id).to_string(), *score))
                .collect(),
            compliance_percentage: 80.0,
            rank: 0,
        }
    }

    fn config() -> ScoringConfiguration {
        let category = |id: &str, weight: f64| Category {
            id: id.to_string(),
            name: id.to_string(),
            weight,
            criteria: Vec::new(),
        };
        ScoringConfiguration {
            categories: vec![category("technical", 60.0), category("economic", 40.0)],
        }
    }

    #[test]
    fn configured_weights_reproduce_the_baseline() {
        let baseline = [
            entry("Acme", 7.6, &[("technical", 9.0), ("economic", 5.5)]),
            entry("Bravo", 6.4, &[("technical", 5.0), ("economic", 8.5)]),
        ];

        let scenario = simulate_scenario(&baseline, &config(), &CategoryWeights::new(), 0.5);

        assert!(scenario.balanced);
        assert!(!scenario.changes_winner());
        assert_eq!(scenario.movers().count(), 0);
        assert_eq!(scenario.entries[0].simulated_score, 7.6);
        assert_eq!(scenario.entries[1].simulated_score, 6.4);
    }

    #[test]
    fn reweighting_reports_position_changes() {
        let baseline = [
            entry("Acme", 7.6, &[("technical", 9.0), ("economic", 5.5)]),
            entry("Bravo", 6.4, &[("technical", 5.0), ("economic", 8.5)]),
        ];
        let alternative = CategoryWeights::from([
            ("technical".to_string(), 20.0),
            ("economic".to_string(), 80.0),
        ]);

        let scenario = simulate_scenario(&baseline, &config(), &alternative, 0.5);

        let moves: Vec<_> = scenario
            .entries
            .iter()
            .map(|entry| {
                (
                    entry.provider_name.as_str(),
                    entry.baseline_position,
                    entry.simulated_position,
                    entry.position_change,
                )
            })
            .collect();
        assert_eq!(moves, vec![("Bravo", 2, 1, 1), ("Acme", 1, 2, -1)]);
        assert_eq!(scenario.entries[0].simulated_score, 7.8);
        assert!(scenario.changes_winner());
    }

    #[test]
    fn unbalanced_weights_are_normalised_and_reported() {
        let baseline = [entry("Acme", 7.6, &[("technical", 9.0), ("economic", 5.5)])];
        let alternative = CategoryWeights::from([("economic".to_string(), 140.0)]);

        let scenario = simulate_scenario(&baseline, &config(), &alternative, 0.5);

        assert!(!scenario.balanced);
        assert_eq!(scenario.total_weight, 200.0);
        assert_eq!(scenario.category_weights["technical"], 60.0);
        assert_eq!(scenario.entries[0].simulated_score, 6.55);
    }

    #[test]
    fn zero_total_weight_scores_everyone_zero() {
        let baseline = [
            entry("Acme", 7.6, &[("technical", 9.0)]),
            entry("Bravo", 6.4, &[("technical", 5.0)]),
        ];
        let alternative = CategoryWeights::from([
            ("technical".to_string(), 0.0),
            ("economic".to_string(), 0.0),
        ]);

        let scenario = simulate_scenario(&baseline, &config(), &alternative, 0.5);

        assert!(scenario
            .entries
            .iter()
            .all(|entry| entry.simulated_score == 0.0 && entry.position_change == 0));
    }
}
