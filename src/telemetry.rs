//! Tracing subscriber setup

use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::LoggingConfig;

/// Builds the filter: `RUST_LOG` wins, otherwise the configured level for this
/// crate with HTTP tracing one step quieter.
pub fn env_filter(logging: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,wanderlens={},tower_http={}",
            logging.level,
            quieter(&logging.level)
        ))
    })
}

/// The next level down from `level`; `error` stays `error`.
fn quieter(level: &str) -> &'static str {
    match level.to_ascii_lowercase().as_str() {
        "trace" => "debug",
        "debug" => "info",
        "info" => "warn",
        _ => "error",
    }
}

/// Installs the global subscriber. Fails if one is already installed.
pub fn init(logging: &LoggingConfig) -> Result<()> {
    let filter = env_filter(logging);
    let builder = fmt().with_env_filter(filter).with_target(true);

    let installed = match logging.format.as_str() {
        "json" => builder.json().try_init(),
        "compact" => builder.compact().try_init(),
        _ => builder.pretty().try_init(),
    };

    installed.map_err(|e| anyhow!("Failed to install tracing subscriber: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_uses_configured_level() {
        let logging = LoggingConfig {
            level: "debug".to_string(),
            format: "compact".to_string(),
        };
        if std::env::var_os("RUST_LOG").is_none() {
            let filter = env_filter(&logging).to_string();
            assert!(filter.contains("wanderlens=debug"));
            assert!(filter.contains("tower_http=info"));
        }
    }

    #[test]
    fn test_http_tracing_is_one_level_quieter() {
        assert_eq!(quieter("trace"), "debug");
        assert_eq!(quieter("DEBUG"), "info");
        assert_eq!(quieter("info"), "warn");
        assert_eq!(quieter("warn"), "error");
        assert_eq!(quieter("error"), "error");
    }
}
