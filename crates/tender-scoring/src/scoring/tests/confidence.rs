use super::common::*;

use crate::scoring::confidence::ConfidenceLevel;
use crate::scoring::ScoringConfiguration;

#[test]
fn factors_stay_within_bounds() {
    let config = two_category_config();
    let mut leader = evaluation("Leader", &[("tech", 9.0), ("quality", 9.0), ("cost", 9.0)], 140.0);
    leader.extraction_confidence = Some(3.0);
    let trailer = evaluation("Trailer", &[("tech", 1.0)], 95.0);

    let report = engine().evaluate(&config, &[leader, trailer], &[], &no_overrides());
    let confidence = &report.confidence;

    for value in [
        confidence.coverage,
        confidence.extraction,
        confidence.completeness,
        confidence.differentiation,
        confidence.overall,
    ] {
        assert!((0.0..=100.0).contains(&value), "{value} out of range");
    }
    assert_eq!(confidence.coverage, 100.0);
    assert_eq!(confidence.extraction, 100.0);
}

#[test]
fn zero_bidders_yield_zero_confidence() {
    let report = engine().evaluate(&two_category_config(), &[], &[], &no_overrides());

    assert_eq!(report.confidence.overall, 0.0);
    assert_eq!(report.confidence.level, ConfidenceLevel::Low);
    assert!(report.ranking.is_empty());
    assert!(report.risks.is_empty());
    assert!(report.differentiators.is_empty());
}

#[test]
fn extraction_falls_back_to_neutral_without_samples() {
    let config = two_category_config();
    let bidders = [
        evaluation("Acme", &[("tech", 8.0), ("quality", 8.0), ("cost", 8.0)], 80.0),
        evaluation("Bravo", &[("tech", 2.0), ("quality", 2.0), ("cost", 2.0)], 80.0),
    ];

    let report = engine().evaluate(&config, &bidders, &[], &no_overrides());

    approx(report.confidence.extraction, 50.0);
}

#[test]
fn extraction_reads_matching_offer_when_evaluation_is_silent() {
    let config = two_category_config();
    let bidders = [
        evaluation("Acme Corp", &[("tech", 8.0)], 80.0),
        evaluation("Bravo", &[("tech", 2.0)], 80.0),
    ];
    let mut acme_offer = offer("ACME CORP", 100.0);
    acme_offer.extraction_confidence = Some(0.9);
    let mut bravo_offer = offer("Bravo", 120.0);
    bravo_offer.extraction_confidence = Some(0.7);

    let report = engine().evaluate(&config, &bidders, &[acme_offer, bravo_offer], &no_overrides());

    approx(report.confidence.extraction, 80.0);
}

#[test]
fn completeness_counts_filled_carried_scores() {
    let config = two_category_config();
    let bidders = [
        evaluation("Acme", &[("tech", 8.0), ("quality", 7.0), ("cost", 6.0)], 80.0),
        evaluation("Bravo", &[("tech", 5.0), ("quality", 0.0)], 80.0),
    ];

    let report = engine().evaluate(&config, &bidders, &[], &no_overrides());

    // Bravo was never scored on cost, so only 5 slots exist and 4 are filled.
    approx(report.confidence.completeness, 4.0 / 5.0 * 100.0);
}

#[test]
fn unscored_configured_criteria_are_not_slots() {
    let bidders = [evaluation("Acme", &[("tech", 8.0)], 80.0)];

    let report = engine().evaluate(&two_category_config(), &bidders, &[], &no_overrides());

    approx(report.confidence.completeness, 100.0);
}

#[test]
fn completeness_is_the_same_without_configuration() {
    let bidders = [
        evaluation("Acme", &[("a", 8.0), ("b", 0.0)], 80.0),
        evaluation("Bravo", &[("a", 5.0), ("b", 5.0)], 80.0),
    ];

    let report = engine().evaluate(
        &ScoringConfiguration::default(),
        &bidders,
        &[],
        &no_overrides(),
    );

    approx(report.confidence.completeness, 75.0);
}

#[test]
fn overall_combines_weighted_factors() {
    let config = two_category_config();
    let mut leader = evaluation("Leader", &[("tech", 9.0), ("quality", 9.0), ("cost", 9.0)], 80.0);
    leader.extraction_confidence = Some(0.8);
    let mut trailer = evaluation("Trailer", &[("tech", 5.0), ("quality", 5.0), ("cost", 5.0)], 60.0);
    trailer.extraction_confidence = Some(0.6);

    let report = engine().evaluate(&config, &[leader, trailer], &[], &no_overrides());
    let confidence = &report.confidence;

    approx(confidence.coverage, 70.0);
    approx(confidence.extraction, 70.0);
    approx(confidence.completeness, 100.0);
    assert_eq!(confidence.differentiation, 100.0);
    approx(
        confidence.overall,
        70.0 * 0.30 + 70.0 * 0.25 + 100.0 * 0.25 + 100.0 * 0.20,
    );
    assert_eq!(confidence.level, ConfidenceLevel::High);
}

#[test]
fn tied_field_gets_minimum_differentiation() {
    let config = two_category_config();
    let bidders = [
        evaluation("Acme", &[("tech", 6.0), ("quality", 6.0), ("cost", 6.0)], 80.0),
        evaluation("Bravo", &[("tech", 6.0), ("quality", 6.0), ("cost", 6.0)], 80.0),
    ];

    let report = engine().evaluate(&config, &bidders, &[], &no_overrides());

    assert_eq!(report.confidence.differentiation, 20.0);
}
