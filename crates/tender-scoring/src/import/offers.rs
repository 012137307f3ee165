use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};
use tracing::warn;

use super::ImportError;
use crate::scoring::economics::net_price_from_total;
use crate::scoring::EconomicOffer;

/// Reads economic offers from a CSV export with the columns
/// `provider_name,total_price,discount_percentage,net_price,extraction_confidence`.
///
/// Only `provider_name` is required. A blank net price is derived from the total price and the
/// discount; rows carrying neither price are skipped.
pub struct EconomicOfferImporter;

impl EconomicOfferImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<EconomicOffer>, ImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<EconomicOffer>, ImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut offers = Vec::new();

        for (index, record) in csv_reader.deserialize::<OfferRow>().enumerate() {
            let row = record?;
            // Header is line 1.
            let line = index + 2;
            if let Some(offer) = row.into_offer(line) {
                offers.push(offer);
            }
        }

        Ok(offers)
    }
}

#[derive(Debug, Deserialize)]
struct OfferRow {
    #[serde(default)]
    provider_name: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    total_price: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    discount_percentage: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    net_price: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    extraction_confidence: Option<String>,
}

impl OfferRow {
    fn into_offer(self, line: usize) -> Option<EconomicOffer> {
        if self.provider_name.is_empty() {
            warn!(line, "skipping economic offer without a provider name");
            return None;
        }

        let total_price = parse_amount(self.total_price.as_deref(), "total_price", line);
        let discount_percentage =
            parse_amount(self.discount_percentage.as_deref(), "discount_percentage", line)
                .unwrap_or(0.0);
        let net_price = parse_amount(self.net_price.as_deref(), "net_price", line).or_else(|| {
            total_price.map(|total| net_price_from_total(total, discount_percentage))
        });
        let extraction_confidence = parse_amount(
            self.extraction_confidence.as_deref(),
            "extraction_confidence",
            line,
        );

        let Some(net_price) = net_price else {
            warn!(
                line,
                provider = %self.provider_name,
                "skipping economic offer without a net or total price"
            );
            return None;
        };

        Some(EconomicOffer {
            provider_name: self.provider_name,
            net_price,
            total_price,
            discount_percentage,
            extraction_confidence,
        })
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// Parse a spreadsheet amount such as `1,250,000.00`, `€ 980000`, `EUR 1.31E+06` or `15%`.
/// Currency symbols, surrounding currency codes, whitespace, thousands separators and percent
/// signs are dropped; exponent markers are kept. Unparseable values are logged and treated as
/// missing.
fn parse_amount(value: Option<&str>, column: &str, line: usize) -> Option<f64> {
    let raw = value?;
    let stripped: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '+'))
        .collect();
    let cleaned = stripped.trim_matches(|c: char| c.is_ascii_alphabetic());

    match cleaned.parse::<f64>() {
        Ok(amount) if amount.is_finite() => Some(amount),
        _ => {
            warn!(line, column, value = raw, "ignoring unparseable amount");
            None
        }
    }
}
