//! Logging setup
//!
//! `RUST_LOG` takes precedence over the configured level.

use tracing_subscriber::EnvFilter;

use crate::cli::{Error, Result};

/// Build the filter from `RUST_LOG` or `level`
pub fn build_filter(level: &str) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(level).map_err(|e| Error::Logging(e.to_string())),
    }
}

/// Install the global subscriber
pub fn init_logging(level: &str, json: bool) -> Result<()> {
    let filter = build_filter(level)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| Error::Logging(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_accepts_directives() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        assert!(build_filter("info").is_ok());
        assert!(build_filter("reflect_api=debug,tower_http=info").is_ok());
    }

    #[test]
    fn test_build_filter_rejects_garbage() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        assert!(matches!(build_filter("[[["), Err(Error::Logging(_))));
    }
}
