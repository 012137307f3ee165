use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tender_scoring::scoring::EvaluationReport;
use tender_scoring::service::EvaluationService;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) service: EvaluationService,
}

/// Report plus the header shown to reviewers. The engine takes no clock input, so the date is
/// attached here.
#[derive(Debug, Serialize)]
pub(crate) struct EvaluationResponse {
    pub(crate) evaluated_on: NaiveDate,
    pub(crate) report: EvaluationReport,
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn deserialize_optional_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}

/// Parse an `id=weight` what-if weight for a criterion or a category.
pub(crate) fn parse_weight_override(raw: &str) -> Result<(String, f64), String> {
    let (criterion_id, weight) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected ID=WEIGHT, got '{raw}'"))?;

    let criterion_id = criterion_id.trim();
    if criterion_id.is_empty() {
        return Err(format!("missing id in '{raw}'"));
    }

    let weight: f64 = weight
        .trim()
        .parse()
        .map_err(|err| format!("failed to parse weight in '{raw}' ({err})"))?;
    if !weight.is_finite() || weight < 0.0 {
        return Err(format!("weight in '{raw}' must be a non-negative number"));
    }

    Ok((criterion_id.to_string(), weight))
}
