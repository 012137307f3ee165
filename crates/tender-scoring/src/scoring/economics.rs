use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::domain::{EconomicOffer, ProviderKey, RankingEntry};
use super::thresholds::EngineThresholds;

/// One row of the price comparison, cheapest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomicComparisonRow {
    pub provider_name: String,
    pub total_price: Option<f64>,
    pub net_price: f64,
    pub discount_percentage: f64,
    pub price_rank: usize,
    pub over_cheapest_pct: f64,
    pub is_cheapest: bool,
}

/// Display annotation attached to a bidder's economic row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EconomicFlag {
    PriceOverTwiceCheapest,
    UnusuallyHighDiscount,
    LowExtractionConfidence,
    NoEconomicData,
}

impl EconomicFlag {
    pub const fn label(self) -> &'static str {
        match self {
            Self::PriceOverTwiceCheapest => "price over 2× cheapest",
            Self::UnusuallyHighDiscount => "unusually high discount",
            Self::LowExtractionConfidence => "low extraction confidence",
            Self::NoEconomicData => "no economic data",
        }
    }
}

/// Sort offers by net price (stable) and express each relative to the cheapest.
/// Offers with a non-finite net price are left out.
pub fn build_comparison(offers: &[EconomicOffer]) -> Vec<EconomicComparisonRow> {
    let mut priced: Vec<&EconomicOffer> = offers
        .iter()
        .filter(|offer| offer.net_price.is_finite())
        .collect();
    priced.sort_by(|a, b| a.net_price.total_cmp(&b.net_price));

    let cheapest = priced.first().map(|offer| offer.net_price).unwrap_or(0.0);

    priced
        .into_iter()
        .enumerate()
        .map(|(index, offer)| EconomicComparisonRow {
            provider_name: offer.provider_name.clone(),
            total_price: offer.total_price,
            net_price: offer.net_price,
            discount_percentage: offer.discount_percentage,
            price_rank: index + 1,
            over_cheapest_pct: if cheapest > 0.0 {
                (offer.net_price - cheapest) / cheapest * 100.0
            } else {
                0.0
            },
            is_cheapest: index == 0,
        })
        .collect()
}

/// Per-bidder anomaly labels. Offers are keyed by their own provider name; ranked bidders
/// without an offer are keyed by their evaluation name and get a single
/// [`EconomicFlag::NoEconomicData`].
pub fn flag_offers(
    ranking: &[RankingEntry],
    offers: &[EconomicOffer],
    comparison: &[EconomicComparisonRow],
    thresholds: &EngineThresholds,
) -> BTreeMap<String, Vec<EconomicFlag>> {
    let mut flags: BTreeMap<String, Vec<EconomicFlag>> = BTreeMap::new();
    let cheapest = comparison.first().map(|row| row.net_price).unwrap_or(0.0);

    for offer in offers {
        let entry = flags.entry(offer.provider_name.clone()).or_default();

        if cheapest > 0.0 && offer.net_price > cheapest * thresholds.price_outlier_multiplier {
            entry.push(EconomicFlag::PriceOverTwiceCheapest);
        }
        if offer.discount_percentage > thresholds.high_discount_percentage {
            entry.push(EconomicFlag::UnusuallyHighDiscount);
        }
        if offer
            .extraction_confidence
            .is_some_and(|confidence| confidence < thresholds.low_extraction_confidence)
        {
            entry.push(EconomicFlag::LowExtractionConfidence);
        }
    }

    let offered = offered_keys(offers);
    for entry in ranking {
        if !offered.contains(&ProviderKey::new(&entry.provider_name)) {
            flags
                .entry(entry.provider_name.clone())
                .or_default()
                .push(EconomicFlag::NoEconomicData);
        }
    }

    flags
}

pub(crate) fn offered_keys(offers: &[EconomicOffer]) -> BTreeSet<ProviderKey> {
    offers
        .iter()
        .map(|offer| ProviderKey::new(&offer.provider_name))
        .collect()
}

/// Net price after applying a percentage discount to a total price.
pub fn net_price_from_total(total_price: f64, discount_percentage: f64) -> f64 {
    total_price * (1.0 - discount_percentage / 100.0)
}
