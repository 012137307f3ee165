use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::domain::ScoringConfiguration;

const CATEGORY_TOTAL_TOLERANCE: f64 = 0.01;
const CRITERIA_TOTAL_TOLERANCE: f64 = 0.1;

/// Part of the configuration a validation issue points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationScope {
    General,
    Category,
    Criterion,
    Weight,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub scope: ValidationScope,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criterion_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(
        &mut self,
        scope: ValidationScope,
        message: String,
        category_id: Option<&str>,
        criterion_id: Option<&str>,
    ) {
        self.errors.push(ValidationIssue {
            scope,
            message,
            category_id: category_id.map(str::to_string),
            criterion_id: criterion_id.map(str::to_string),
        });
    }
}

/// Check a configuration before it is saved. The scoring engine never calls this; it tolerates
/// invalid configurations and degrades instead.
pub fn validate_configuration(config: &ScoringConfiguration) -> ValidationReport {
    let mut report = ValidationReport::default();

    if config.categories.is_empty() {
        report.error(
            ValidationScope::General,
            "At least one category is required".to_string(),
            None,
            None,
        );
        return report;
    }

    let category_total = config.total_category_weight();
    if (category_total - 100.0).abs() > CATEGORY_TOTAL_TOLERANCE {
        report.error(
            ValidationScope::Weight,
            format!("Category weights must sum to 100% (currently {category_total:.2}%)"),
            None,
            None,
        );
    }

    let mut seen_criteria = BTreeSet::new();

    for (index, category) in config.categories.iter().enumerate() {
        let category_id = Some(category.id.as_str());
        let label = if category.name.trim().is_empty() {
            format!("#{}", index + 1)
        } else {
            category.name.clone()
        };

        if category.id.trim().is_empty() {
            report.error(
                ValidationScope::Category,
                format!("Category {} must have an id", index + 1),
                None,
                None,
            );
        }
        if category.name.trim().is_empty() {
            report.error(
                ValidationScope::Category,
                format!("Category {} must have a name", index + 1),
                category_id,
                None,
            );
        }

        if category.criteria.is_empty() {
            report.error(
                ValidationScope::Category,
                format!("Category \"{label}\" must have at least one criterion"),
                category_id,
                None,
            );
            continue;
        }

        let criteria_total: f64 = category.criteria.iter().map(|c| c.weight).sum();
        let sums_to_absolute = (criteria_total - category.weight).abs() <= CRITERIA_TOTAL_TOLERANCE;
        let sums_to_relative = (criteria_total - 100.0).abs() <= CRITERIA_TOTAL_TOLERANCE;
        if !sums_to_absolute && !sums_to_relative {
            report.error(
                ValidationScope::Weight,
                format!(
                    "Criteria weights in \"{label}\" must sum to {:.0}% or 100% (currently {criteria_total:.1}%)",
                    category.weight
                ),
                category_id,
                None,
            );
        }

        for (criterion_index, criterion) in category.criteria.iter().enumerate() {
            if criterion.id.trim().is_empty() {
                report.error(
                    ValidationScope::Criterion,
                    format!(
                        "Criterion {} in \"{label}\" must have an id",
                        criterion_index + 1
                    ),
                    category_id,
                    None,
                );
                continue;
            }

            if !seen_criteria.insert(criterion.id.as_str()) {
                report.error(
                    ValidationScope::Criterion,
                    format!("Criterion \"{}\" is declared more than once", criterion.id),
                    category_id,
                    Some(&criterion.id),
                );
            }

            if criterion.weight <= 0.0 {
                report
                    .warnings
                    .push(format!("Criterion \"{}\" has zero weight", criterion.id));
            }
        }
    }

    report
}
