use serde::{Deserialize, Serialize};

use super::domain::{display_name, EconomicOffer, ProviderKey, RankingEntry};
use super::economics::{offered_keys, EconomicComparisonRow};
use super::ranking::{runner_up, winner};
use super::thresholds::EngineThresholds;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskSeverity {
    High,
    Medium,
    Low,
}

impl RiskSeverity {
    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// Rule that produced a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskKind {
    MissingEconomicData,
    LowCompliance,
    CloseRace,
    CheapestIsWorst,
}

impl RiskKind {
    pub const fn severity(self) -> RiskSeverity {
        match self {
            Self::MissingEconomicData | Self::LowCompliance => RiskSeverity::High,
            Self::CloseRace | Self::CheapestIsWorst => RiskSeverity::Medium,
        }
    }
}

/// Warning a reviewer should see before committing to an award.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFinding {
    pub severity: RiskSeverity,
    pub kind: RiskKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_provider: Option<String>,
}

impl RiskFinding {
    fn new(kind: RiskKind, message: String, subject_provider: Option<&str>) -> Self {
        Self {
            severity: kind.severity(),
            kind,
            message,
            subject_provider: subject_provider.map(str::to_string),
        }
    }
}

/// Run every rule over the ranked bidders.
///
/// Findings are emitted in a fixed order: missing economic data per bidder, low compliance per
/// bidder (both in ranking order), then the close-race and cheapest-is-worst checks.
pub fn detect_risks(
    ranking: &[RankingEntry],
    offers: &[EconomicOffer],
    comparison: &[EconomicComparisonRow],
    thresholds: &EngineThresholds,
) -> Vec<RiskFinding> {
    let mut findings = Vec::new();
    if ranking.is_empty() {
        return findings;
    }

    let offered = offered_keys(offers);
    for entry in ranking {
        if !offered.contains(&ProviderKey::new(&entry.provider_name)) {
            findings.push(RiskFinding::new(
                RiskKind::MissingEconomicData,
                format!(
                    "No economic data for {}",
                    display_name(&entry.provider_name)
                ),
                Some(&entry.provider_name),
            ));
        }
    }

    for entry in ranking {
        let compliance = entry.compliance_percentage;
        if compliance > 0.0 && compliance < thresholds.low_compliance_threshold {
            findings.push(RiskFinding::new(
                RiskKind::LowCompliance,
                format!(
                    "{} covers only {:.0}% of requirements",
                    display_name(&entry.provider_name),
                    compliance
                ),
                Some(&entry.provider_name),
            ));
        }
    }

    if let (Some(first), Some(second)) = (winner(ranking), runner_up(ranking)) {
        let gap = first.overall_score - second.overall_score;
        if gap < thresholds.close_race_gap {
            findings.push(RiskFinding::new(
                RiskKind::CloseRace,
                format!(
                    "{} leads {} by only {:.2} points",
                    display_name(&first.provider_name),
                    display_name(&second.provider_name),
                    gap
                ),
                None,
            ));
        }
    }

    // A sole bidder with an offer is both cheapest and last.
    if let (Some(cheapest), Some(last)) = (comparison.first(), ranking.last()) {
        if ProviderKey::new(&cheapest.provider_name) == ProviderKey::new(&last.provider_name) {
            findings.push(RiskFinding::new(
                RiskKind::CheapestIsWorst,
                format!(
                    "Cheapest offer from {} has the lowest overall score",
                    display_name(&cheapest.provider_name)
                ),
                Some(&cheapest.provider_name),
            ));
        }
    }

    findings
}
