use super::common::*;

use crate::scoring::weights::{
    classify_weight_encoding, is_borderline_total, resolve_category, resolve_configuration,
    WeightEncoding,
};
use crate::scoring::{default_configuration, ScoringConfiguration};

#[test]
fn relative_weights_scale_by_category_weight() {
    let (weights, audit) = resolve_category(&category("k", 40.0, &[("A", 50.0), ("B", 50.0)]), 1.0);

    let values: Vec<_> = weights
        .iter()
        .map(|c| (c.criterion_id.as_str(), c.weight))
        .collect();
    assert_eq!(values, vec![("A", 20.0), ("B", 20.0)]);
    let audit = audit.expect("audit entry for populated category");
    assert_eq!(audit.encoding, WeightEncoding::Relative);
    assert!(!audit.borderline);
}

#[test]
fn weights_far_from_100_are_absolute() {
    let (weights, audit) = resolve_category(&category("k", 40.0, &[("A", 60.0), ("B", 10.0)]), 1.0);

    let values: Vec<_> = weights.iter().map(|c| c.weight).collect();
    assert_eq!(values, vec![60.0, 10.0]);
    assert_eq!(
        audit.map(|entry| entry.encoding),
        Some(WeightEncoding::Absolute)
    );
}

#[test]
fn absolute_weights_round_to_two_decimals() {
    let (weights, _) = resolve_category(&category("k", 30.0, &[("A", 12.346), ("B", 17.654)]), 1.0);
    let values: Vec<_> = weights.iter().map(|c| c.weight).collect();
    assert_eq!(values, vec![12.35, 17.65]);
}

#[test]
fn classification_boundary_is_strict() {
    assert_eq!(classify_weight_encoding(100.0, 1.0), WeightEncoding::Relative);
    assert_eq!(classify_weight_encoding(99.5, 1.0), WeightEncoding::Relative);
    assert_eq!(classify_weight_encoding(100.9, 1.0), WeightEncoding::Relative);
    assert_eq!(classify_weight_encoding(99.0, 1.0), WeightEncoding::Absolute);
    assert_eq!(classify_weight_encoding(101.0, 1.0), WeightEncoding::Absolute);
    assert_eq!(classify_weight_encoding(0.0, 1.0), WeightEncoding::Absolute);
}

#[test]
fn single_full_weight_criterion_resolves_as_relative() {
    let (weights, _) = resolve_category(&category("economic", 40.0, &[("cost", 100.0)]), 1.0);
    assert_eq!(weights[0].weight, 40.0);
}

#[test]
fn borderline_totals_are_audited() {
    assert!(is_borderline_total(99.5, 1.0));
    assert!(is_borderline_total(101.0, 1.0));
    assert!(!is_borderline_total(100.0, 1.0));
    assert!(!is_borderline_total(97.0, 1.0));

    let (_, audit) = resolve_category(&category("k", 50.0, &[("A", 49.7), ("B", 49.9)]), 1.0);
    let audit = audit.expect("audit entry");
    assert!(audit.borderline);
    assert_eq!(audit.encoding, WeightEncoding::Relative);
}

#[test]
fn empty_category_yields_nothing() {
    let (weights, audit) = resolve_category(&category("empty", 25.0, &[]), 1.0);
    assert!(weights.is_empty());
    assert!(audit.is_none());
}

#[test]
fn negative_and_non_finite_weights_contribute_zero() {
    let (weights, _) = resolve_category(
        &category("k", 30.0, &[("A", -5.0), ("B", f64::NAN), ("C", 10.0)]),
        1.0,
    );
    let values: Vec<_> = weights.iter().map(|c| c.weight).collect();
    assert_eq!(values, vec![0.0, 0.0, 10.0]);
    assert!(values.iter().all(|w| w.is_finite() && *w >= 0.0));
}

#[test]
fn default_template_resolves_to_full_scale() {
    let resolved = resolve_configuration(&default_configuration(), 1.0);
    assert!((resolved.total() - 100.0).abs() < 0.05);
    assert!(resolved
        .audit()
        .iter()
        .all(|entry| entry.encoding == WeightEncoding::Relative));
    assert_eq!(resolved.weight_of("total_price"), Some(12.86));
}

#[test]
fn unconfigured_configuration_resolves_empty() {
    let resolved = resolve_configuration(&ScoringConfiguration::default(), 1.0);
    assert!(resolved.is_empty());
    assert!(resolved.audit().is_empty());
}
