//! Readers for the documents the scoring pass consumes: evaluation bundles exported as JSON and
//! economic offers exported as CSV.

mod bundle;
mod offers;

pub use bundle::EvaluationBundle;
pub use offers::EconomicOfferImporter;

#[derive(Debug)]
pub enum ImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::Io(err) => write!(f, "failed to read import file: {}", err),
            ImportError::Csv(err) => write!(f, "invalid economic offer CSV data: {}", err),
            ImportError::Json(err) => write!(f, "invalid evaluation bundle JSON: {}", err),
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::Io(err) => Some(err),
            ImportError::Csv(err) => Some(err),
            ImportError::Json(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<serde_json::Error> for ImportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}
