use serde::{Deserialize, Serialize};

use super::domain::ProviderEvaluation;

/// Criterion on which the winner leads the runner-up by a decision-relevant margin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifferentiatorEntry {
    pub criterion_id: String,
    pub winner_score: f64,
    pub runner_up_score: f64,
    pub diff: f64,
}

/// Criteria where the winner leads by more than `min_gap`, largest lead first.
///
/// Only criteria the winner was scored on are considered; a criterion missing from the
/// runner-up's scores counts as 0. Equal leads keep criterion-id order.
pub fn find_differentiators(
    winner: Option<&ProviderEvaluation>,
    runner_up: Option<&ProviderEvaluation>,
    min_gap: f64,
) -> Vec<DifferentiatorEntry> {
    let (Some(winner), Some(runner_up)) = (winner, runner_up) else {
        return Vec::new();
    };

    let mut entries: Vec<DifferentiatorEntry> = winner
        .individual_scores
        .keys()
        .filter_map(|criterion_id| {
            let winner_score = winner.score_for(criterion_id);
            let runner_up_score = runner_up.score_for(criterion_id);
            let diff = winner_score - runner_up_score;
            (diff > min_gap).then(|| DifferentiatorEntry {
                criterion_id: criterion_id.clone(),
                winner_score,
                runner_up_score,
                diff,
            })
        })
        .collect();

    entries.sort_by(|a, b| b.diff.total_cmp(&a.diff));
    entries
}
