use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::ImportError;
use crate::scoring::{
    CategoryWeights, EconomicOffer, ProviderEvaluation, ProviderKey, ScoringConfiguration,
    WeightOverrides,
};

/// Everything one scoring pass needs, as exported by the evaluation pipeline. Every field,
/// nested ones included, uses snake_case names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationBundle {
    #[serde(default)]
    pub configuration: ScoringConfiguration,
    #[serde(default)]
    pub evaluations: Vec<ProviderEvaluation>,
    #[serde(default)]
    pub economic_offers: Vec<EconomicOffer>,
    #[serde(default)]
    pub weight_overrides: WeightOverrides,
    /// What-if category weights compared against the ranking produced by the rest of the bundle.
    #[serde(default)]
    pub category_weights: CategoryWeights,
}

impl EvaluationBundle {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ImportError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Fold offers from a separate export into the bundle. An incoming offer replaces any bundled
    /// offer for the same provider; the rest are appended in their import order.
    pub fn merge_offers(&mut self, offers: Vec<EconomicOffer>) {
        for offer in offers {
            let key = ProviderKey::new(&offer.provider_name);
            match self
                .economic_offers
                .iter_mut()
                .find(|existing| ProviderKey::new(&existing.provider_name) == key)
            {
                Some(existing) => *existing = offer,
                None => self.economic_offers.push(offer),
            }
        }
    }
}
