use super::domain::RankingEntry;

/// Order entries by overall score, best first, and assign 1-based ranks.
///
/// The sort is stable: equal scores keep the order in which they were aggregated, which is the
/// order of the incoming evaluations. No secondary key breaks ties.
pub fn rank_entries(mut entries: Vec<RankingEntry>) -> Vec<RankingEntry> {
    entries.sort_by(|a, b| b.overall_score.total_cmp(&a.overall_score));
    for (index, entry) in entries.iter_mut().enumerate() {
        entry.rank = index + 1;
    }
    entries
}

pub fn winner(ranking: &[RankingEntry]) -> Option<&RankingEntry> {
    ranking.first()
}

pub fn runner_up(ranking: &[RankingEntry]) -> Option<&RankingEntry> {
    ranking.get(1)
}

/// Lead of the winner over the runner-up, when both exist.
pub fn winning_margin(ranking: &[RankingEntry]) -> Option<f64> {
    match (winner(ranking), runner_up(ranking)) {
        (Some(first), Some(second)) => Some(first.overall_score - second.overall_score),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn entry(name: &str, score: f64) -> RankingEntry {
        RankingEntry {
            provider_name: name.to_string(),
            overall_score: score,
            category_scores: BTreeMap::new(),
            compliance_percentage: 0.0,
            rank: 0,
        }
    }

    #[test]
    fn ties_keep_input_order() {
        let ranking = rank_entries(vec![
            entry("Low", 7.2),
            entry("First", 9.1),
            entry("Second", 9.1),
        ]);

        let names: Vec<_> = ranking.iter().map(|e| e.provider_name.as_str()).collect();
        assert_eq!(names, vec!["First", "Second", "Low"]);
        let ranks: Vec<_> = ranking.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
    }

    #[test]
    fn margin_requires_two_bidders() {
        let ranking = rank_entries(vec![entry("Solo", 6.0)]);
        assert!(runner_up(&ranking).is_none());
        assert!(winning_margin(&ranking).is_none());
        assert_eq!(winner(&ranking).map(|e| e.rank), Some(1));
    }
}
