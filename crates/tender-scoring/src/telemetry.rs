use std::fmt;

use tracing_subscriber::filter::ParseError;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

use crate::config::TelemetryConfig;

#[derive(Debug)]
pub enum TelemetryError {
    EnvFilter { value: String, source: ParseError },
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::EnvFilter { value, .. } => {
                write!(f, "invalid log filter '{value}': unable to build EnvFilter")
            }
            TelemetryError::Subscriber(err) => write!(f, "telemetry error: {err}"),
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::EnvFilter { source, .. } => Some(source),
            TelemetryError::Subscriber(err) => Some(&**err),
        }
    }
}

/// Build the log filter: `RUST_LOG` wins, otherwise the configured level.
pub fn env_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.log_level).map_err(|source| {
            TelemetryError::EnvFilter {
                value: config.log_level.clone(),
                source,
            }
        }),
    }
}

/// Install the global subscriber, logging to stdout. Fails if one is already installed.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    install(config, std::io::stdout)
}

/// Same subscriber logging to stderr, for commands whose stdout is a report.
pub fn init_stderr(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    install(config, std::io::stderr)
}

fn install<W>(config: &TelemetryConfig, writer: W) -> Result<(), TelemetryError>
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let filter = env_filter(config)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .with_writer(writer)
        .try_init()
        .map_err(TelemetryError::Subscriber)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unparseable_level() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let config = TelemetryConfig {
            log_level: "tender_scoring=loudest".to_string(),
        };

        let error = env_filter(&config).expect_err("filter must not parse");
        assert!(matches!(error, TelemetryError::EnvFilter { .. }));
        assert!(error.to_string().contains("loudest"));
    }

    #[test]
    fn stderr_init_reports_bad_filters_before_installing() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let config = TelemetryConfig {
            log_level: "tender_scoring=loudest".to_string(),
        };

        let error = init_stderr(&config).expect_err("filter must not parse");
        assert!(matches!(error, TelemetryError::EnvFilter { .. }));
    }

    #[test]
    fn accepts_directive_lists() {
        let config = TelemetryConfig {
            log_level: "info,tender_scoring=debug".to_string(),
        };
        assert!(env_filter(&config).is_ok());
    }
}
