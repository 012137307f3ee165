use super::domain::{Category, Criterion, ScoringConfiguration};

type CriterionSpec = (&'static str, f64);
type CategorySpec = (&'static str, &'static str, f64, &'static [CriterionSpec]);

const DEFAULT_TEMPLATE: &[CategorySpec] = &[
    (
        "technical",
        "Technical Completeness",
        30.0,
        &[
            ("scope_facilities", 33.33),
            ("scope_work", 33.33),
            ("deliverables_quality", 33.34),
        ],
    ),
    (
        "economic",
        "Economic Competitiveness",
        30.0,
        &[
            ("total_price", 42.86),
            ("price_breakdown", 22.86),
            ("optionals_included", 20.0),
            ("capex_opex_methodology", 14.28),
        ],
    ),
    (
        "execution",
        "Execution Capability",
        15.0,
        &[
            ("schedule", 40.0),
            ("resources_allocation", 30.0),
            ("exceptions", 30.0),
        ],
    ),
    (
        "hse_compliance",
        "HSE & Compliance",
        15.0,
        &[("safety_studies", 53.33), ("regulatory_compliance", 46.67)],
    ),
    (
        "esg_sustainability",
        "ESG & Sustainability",
        10.0,
        &[
            ("environmental_management", 40.0),
            ("social_responsibility", 30.0),
            ("governance_ethics", 30.0),
        ],
    ),
];

/// Five-category template used when a project has not customised its scoring yet.
/// Criterion weights are category-relative.
pub fn default_configuration() -> ScoringConfiguration {
    let categories = DEFAULT_TEMPLATE
        .iter()
        .map(|(id, name, weight, criteria)| Category {
            id: (*id).to_string(),
            name: (*name).to_string(),
            weight: *weight,
            criteria: criteria
                .iter()
                .map(|(criterion_id, criterion_weight)| Criterion {
                    id: (*criterion_id).to_string(),
                    category_id: (*id).to_string(),
                    weight: *criterion_weight,
                })
                .collect(),
        })
        .collect();

    ScoringConfiguration { categories }
}
