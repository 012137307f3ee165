use crate::infra::{parse_date, parse_weight_override, EvaluationResponse};
use chrono::{Local, NaiveDate};
use clap::Args;
use std::path::PathBuf;
use tender_scoring::config::AppConfig;
use tender_scoring::error::AppError;
use tender_scoring::import::EvaluationBundle;
use tender_scoring::scoring::{
    display_name, validate_configuration, EconomicFlag, EvaluationReport, ScenarioComparison,
    ScoringConfiguration, ValidationReport,
};
use tender_scoring::service::EvaluationService;
use tender_scoring::telemetry;

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// Evaluation bundle (JSON) with configuration, evaluations and optional offers
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Economic offers CSV export; replaces bundled offers for the same provider
    #[arg(long)]
    pub(crate) offers: Option<PathBuf>,
    /// What-if weight for a criterion (CRITERION=WEIGHT), repeatable
    #[arg(long = "weight", value_parser = parse_weight_override)]
    pub(crate) weights: Vec<(String, f64)>,
    /// What-if category weight (CATEGORY=WEIGHT), repeatable; the report compares the ranking
    /// under these weights with the baseline
    #[arg(long = "category-weight", value_parser = parse_weight_override)]
    pub(crate) category_weights: Vec<(String, f64)>,
    /// Evaluation date printed in the report header (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Print the JSON report instead of the text summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ValidateArgs {
    /// Evaluation bundle (JSON) whose configuration should be checked
    #[arg(long)]
    pub(crate) input: PathBuf,
}

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let EvaluateArgs {
        input,
        offers,
        weights,
        category_weights,
        today,
        json,
    } = args;

    let config = cli_config()?;
    let service = EvaluationService::new(config.scoring.thresholds()?);
    let (bundle, report) = service.evaluate_files(
        &input,
        offers.as_deref(),
        weights.into_iter().collect(),
        category_weights.into_iter().collect(),
    )?;

    let response = EvaluationResponse {
        evaluated_on: today.unwrap_or_else(|| Local::now().date_naive()),
        report,
    };

    if json {
        let stdout = std::io::stdout();
        serde_json::to_writer_pretty(stdout.lock(), &response).map_err(std::io::Error::from)?;
        println!();
    } else {
        render_evaluation(&bundle.configuration, &response);
    }

    Ok(())
}

pub(crate) fn run_validate(args: ValidateArgs) -> Result<(), AppError> {
    cli_config()?;
    let bundle = EvaluationBundle::from_path(&args.input)?;
    let report = validate_configuration(&bundle.configuration);
    render_validation(&report);
    Ok(())
}

pub(crate) fn render_evaluation(configuration: &ScoringConfiguration, response: &EvaluationResponse) {
    let report = &response.report;
    println!("Tender evaluation ({})", response.evaluated_on);

    if report.ranking.is_empty() {
        println!("No bidders to rank.");
        return;
    }

    println!("\nRanking");
    for entry in &report.ranking {
        let categories = entry
            .category_scores
            .iter()
            .map(|(id, score)| format!("{} {:.2}", category_label(configuration, id), score))
            .collect::<Vec<_>>()
            .join(" | ");
        println!(
            "  {}. {} {:.2} ({}) compliance {:.0}%",
            entry.rank,
            display_name(&entry.provider_name),
            entry.overall_score,
            if categories.is_empty() { "-".to_string() } else { categories },
            entry.compliance_percentage
        );
    }

    if let (Some(margin), Some(runner_up)) = (report.winning_margin(), report.runner_up()) {
        println!(
            "Winning margin: {:.2} points over {}",
            margin,
            display_name(&runner_up.provider_name)
        );
    }

    let confidence = &report.confidence;
    println!(
        "\nConfidence: {} ({:.1}/100) coverage {:.1} | extraction {:.1} | completeness {:.1} | differentiation {:.1}",
        confidence.level.label(),
        confidence.overall,
        confidence.coverage,
        confidence.extraction,
        confidence.completeness,
        confidence.differentiation
    );

    render_differentiators(report);
    render_risks(report);
    render_economics(report);
    if let Some(scenario) = &report.scenario {
        render_scenario(configuration, scenario);
    }

    for entry in report.weight_audit.iter().filter(|entry| entry.borderline) {
        println!(
            "Note: criteria weights in {} total {:.2}; read as {} weights.",
            category_label(configuration, &entry.category_id),
            entry.criteria_total,
            entry.encoding.label()
        );
    }
}

fn render_differentiators(report: &EvaluationReport) {
    if report.differentiators.is_empty() {
        return;
    }

    println!("\nKey differentiators");
    for entry in &report.differentiators {
        println!(
            "  - {}: {:.1} vs {:.1} (+{:.1})",
            entry.criterion_id, entry.winner_score, entry.runner_up_score, entry.diff
        );
    }
}

fn render_risks(report: &EvaluationReport) {
    if report.risks.is_empty() {
        println!("\nNo risks detected.");
        return;
    }

    println!("\nRisks");
    for risk in &report.risks {
        println!("  - [{}] {}", risk.severity.label(), risk.message);
    }
}

fn render_economics(report: &EvaluationReport) {
    if !report.economic_comparison.is_empty() {
        println!("\nEconomic comparison");
    }
    for row in &report.economic_comparison {
        let position = if row.is_cheapest {
            "cheapest".to_string()
        } else {
            format!("+{:.1}%", row.over_cheapest_pct)
        };
        let flags = report
            .economic_flags
            .get(&row.provider_name)
            .map(|flags| {
                flags
                    .iter()
                    .map(|flag| flag.label())
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();
        println!(
            "  {}. {} net {:.2} ({}){}",
            row.price_rank,
            display_name(&row.provider_name),
            row.net_price,
            position,
            if flags.is_empty() {
                String::new()
            } else {
                format!(" flags: {flags}")
            }
        );
    }

    let missing: Vec<String> = report
        .economic_flags
        .iter()
        .filter(|(_, flags)| flags.contains(&EconomicFlag::NoEconomicData))
        .map(|(name, _)| display_name(name))
        .collect();
    if !missing.is_empty() {
        println!("Without economic data: {}", missing.join(", "));
    }
}

fn render_scenario(configuration: &ScoringConfiguration, scenario: &ScenarioComparison) {
    let weights = scenario
        .category_weights
        .iter()
        .map(|(id, weight)| format!("{} {:.1}", category_label(configuration, id), weight))
        .collect::<Vec<_>>()
        .join(" | ");
    println!("\nWhat-if scenario ({weights})");
    if !scenario.balanced {
        println!(
            "  Category weights total {:.1}; scores are normalised to that total.",
            scenario.total_weight
        );
    }

    for entry in &scenario.entries {
        let movement = match entry.position_change {
            0 => "=".to_string(),
            change if change > 0 => format!("up {change}"),
            change => format!("down {}", -change),
        };
        println!(
            "  {}. {} {:.2} (baseline #{} {:.2}, {})",
            entry.simulated_position,
            display_name(&entry.provider_name),
            entry.simulated_score,
            entry.baseline_position,
            entry.baseline_score,
            movement
        );
    }

    if scenario.changes_winner() {
        println!("The scenario changes the winner.");
    }
}

fn render_validation(report: &ValidationReport) {
    if report.is_valid() {
        println!("Configuration is valid.");
    } else {
        println!("Configuration has {} error(s):", report.errors.len());
        for issue in &report.errors {
            println!("  - {}", issue.message);
        }
    }

    for warning in &report.warnings {
        println!("  warning: {warning}");
    }
}

/// Load settings for a one-shot command and route its logs to stderr, keeping stdout for the
/// report itself.
pub(crate) fn cli_config() -> Result<AppConfig, AppError> {
    let config = AppConfig::load()?;
    telemetry::init_stderr(&config.telemetry)?;
    Ok(config)
}

fn category_label<'a>(configuration: &'a ScoringConfiguration, category_id: &'a str) -> &'a str {
    configuration
        .categories
        .iter()
        .find(|category| category.id == category_id)
        .map(|category| category.name.as_str())
        .filter(|name| !name.trim().is_empty())
        .unwrap_or(category_id)
}
