use crate::infra::{parse_date, parse_weight_override, EvaluationResponse};
use crate::report::{cli_config, render_evaluation};
use chrono::{Local, NaiveDate};
use clap::Args;
use tender_scoring::error::AppError;
use tender_scoring::import::EvaluationBundle;
use tender_scoring::scoring::{default_configuration, EconomicOffer, ProviderEvaluation};
use tender_scoring::service::EvaluationService;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Override the evaluation date (defaults to today).
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// What-if weight for the total price criterion, to show how the ranking reacts.
    #[arg(long)]
    pub(crate) price_weight: Option<f64>,
    /// What-if category weight (CATEGORY=WEIGHT), repeatable, e.g. `economic=60`.
    #[arg(long = "category-weight", value_parser = parse_weight_override)]
    pub(crate) category_weights: Vec<(String, f64)>,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        today,
        price_weight,
        category_weights,
    } = args;
    let config = cli_config()?;
    let today = today.unwrap_or_else(|| Local::now().date_naive());

    let mut bundle = demo_bundle();
    if let Some(weight) = price_weight {
        bundle
            .weight_overrides
            .insert("total_price".to_string(), weight);
    }
    bundle.category_weights.extend(category_weights);

    println!("Tender scoring demo: three bidders against the default five-category template");
    let service = EvaluationService::new(config.scoring.thresholds()?);
    let report = service.evaluate(&bundle)?;
    render_evaluation(
        &bundle.configuration,
        &EvaluationResponse {
            evaluated_on: today,
            report,
        },
    );

    Ok(())
}

pub(crate) fn demo_bundle() -> EvaluationBundle {
    let evaluations = vec![
        bidder(
            "Northwind Engineering",
            &[
                ("scope_facilities", 9.0),
                ("scope_work", 8.5),
                ("deliverables_quality", 8.0),
                ("total_price", 6.0),
                ("price_breakdown", 8.0),
                ("optionals_included", 7.0),
                ("capex_opex_methodology", 7.5),
                ("schedule", 8.0),
                ("resources_allocation", 8.5),
                ("exceptions", 7.0),
                ("safety_studies", 9.0),
                ("regulatory_compliance", 8.5),
                ("environmental_management", 7.0),
                ("social_responsibility", 6.5),
                ("governance_ethics", 8.0),
            ],
            88.0,
            Some(0.91),
        ),
        bidder(
            "Acme Corp",
            &[
                ("scope_facilities", 7.0),
                ("scope_work", 7.5),
                ("deliverables_quality", 6.5),
                ("total_price", 9.0),
                ("price_breakdown", 6.0),
                ("optionals_included", 5.0),
                ("capex_opex_methodology", 6.0),
                ("schedule", 7.0),
                ("resources_allocation", 6.5),
                ("exceptions", 6.0),
                ("safety_studies", 7.0),
                ("regulatory_compliance", 6.5),
                ("environmental_management", 6.0),
                ("social_responsibility", 7.0),
                ("governance_ethics", 6.0),
            ],
            72.0,
            Some(0.78),
        ),
        bidder(
            "Cobalt Partners",
            &[
                ("scope_facilities", 6.0),
                ("scope_work", 5.5),
                ("deliverables_quality", 6.0),
                ("total_price", 7.0),
                ("price_breakdown", 4.0),
                ("schedule", 5.0),
                ("resources_allocation", 5.5),
                ("safety_studies", 6.0),
                ("regulatory_compliance", 5.0),
                ("environmental_management", 4.0),
                ("governance_ethics", 5.0),
            ],
            54.0,
            None,
        ),
    ];

    let economic_offers = vec![
        EconomicOffer {
            provider_name: "NORTHWIND ENGINEERING".to_string(),
            net_price: 1_240_000.0,
            total_price: Some(1_310_000.0),
            discount_percentage: 5.3,
            extraction_confidence: Some(0.94),
        },
        EconomicOffer {
            provider_name: "Acme Corp".to_string(),
            net_price: 880_000.0,
            total_price: Some(1_600_000.0),
            discount_percentage: 45.0,
            extraction_confidence: Some(0.62),
        },
    ];

    EvaluationBundle {
        configuration: default_configuration(),
        evaluations,
        economic_offers,
        ..EvaluationBundle::default()
    }
}

fn bidder(
    name: &str,
    scores: &[(&str, f64)],
    compliance_percentage: f64,
    extraction_confidence: Option<f64>,
) -> ProviderEvaluation {
    let mut evaluation = ProviderEvaluation::new(name);
    evaluation.individual_scores = scores
        .iter()
        .map(|(criterion_id, score)| ((*criterion_id).to_string(), *score))
        .collect();
    evaluation.compliance_percentage = compliance_percentage;
    evaluation.extraction_confidence = extraction_confidence;
    evaluation
}

#[cfg(test)]
mod tests {
    use super::*;
    use tender_scoring::scoring::{
        validate_configuration, EconomicFlag, EngineThresholds, RiskKind,
    };

    #[test]
    fn demo_bundle_is_valid_and_complete() {
        let bundle = demo_bundle();
        assert!(validate_configuration(&bundle.configuration).is_valid());
        assert_eq!(bundle.evaluations.len(), 3);
    }

    #[test]
    fn demo_surfaces_missing_offer_and_discount_flag() {
        let service = EvaluationService::new(EngineThresholds::default());
        let report = service.evaluate(&demo_bundle()).expect("demo evaluates");

        assert_eq!(
            report.winner().map(|entry| entry.provider_name.as_str()),
            Some("Northwind Engineering")
        );
        assert!(report.risks.iter().any(|risk| {
            risk.kind == RiskKind::MissingEconomicData
                && risk.subject_provider.as_deref() == Some("Cobalt Partners")
        }));
        assert!(report.risks.iter().any(|risk| risk.kind == RiskKind::LowCompliance));
        assert!(report.economic_flags["Acme Corp"].contains(&EconomicFlag::UnusuallyHighDiscount));
        assert!(report.economic_flags["NORTHWIND ENGINEERING"].is_empty());
    }

    #[test]
    fn economic_only_scenario_swaps_the_top_two() {
        let mut bundle = demo_bundle();
        for (category_id, weight) in [
            ("technical", 0.0),
            ("economic", 100.0),
            ("execution", 0.0),
            ("hse_compliance", 0.0),
            ("esg_sustainability", 0.0),
        ] {
            bundle
                .category_weights
                .insert(category_id.to_string(), weight);
        }

        let service = EvaluationService::new(EngineThresholds::default());
        let report = service.evaluate(&bundle).expect("scenario evaluates");

        assert_eq!(
            report.winner().map(|entry| entry.provider_name.as_str()),
            Some("Northwind Engineering")
        );
        let scenario = report.scenario.expect("scenario attached");
        let moves: Vec<_> = scenario
            .entries
            .iter()
            .map(|entry| (entry.provider_name.as_str(), entry.position_change))
            .collect();
        assert_eq!(
            moves,
            vec![
                ("Acme Corp", 1),
                ("Northwind Engineering", -1),
                ("Cobalt Partners", 0)
            ]
        );
        assert!(scenario.changes_winner());
    }

    #[test]
    fn price_weight_override_can_change_the_winner() {
        let mut bundle = demo_bundle();
        bundle
            .weight_overrides
            .insert("total_price".to_string(), 200.0);

        let service = EvaluationService::new(EngineThresholds::default());
        let report = service.evaluate(&bundle).expect("what-if evaluates");

        assert_eq!(
            report.winner().map(|entry| entry.provider_name.as_str()),
            Some("Acme Corp")
        );
    }
}
