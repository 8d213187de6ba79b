//! Startup
//!
//! Loads configuration, applies CLI overrides, refuses to start without a
//! credential, and assembles the server.

use std::time::Duration;
use tracing::info;

use reflect_api::{ApiConfig, ApiServer, ApiState, SessionStore};
use reflect_core::{create_adapter, AppConfig, ConfigManager, FeedbackProvider};

use crate::cli::{Args, Error, Result};

/// Load configuration from the file and environment, then apply CLI flags
pub fn load_config(args: &Args) -> Result<AppConfig> {
    let manager = ConfigManager::load(args.config.as_deref())?;
    let mut config = manager.into_config();
    apply_cli_overrides(&mut config, args);
    Ok(config)
}

/// CLI flags win over file and environment
pub fn apply_cli_overrides(config: &mut AppConfig, args: &Args) {
    if let Some(host) = &args.host {
        config.server.host = host.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }
    if args.json_logs {
        config.logging.json = true;
    }
    if args.offline {
        config.feedback.provider = FeedbackProvider::Stub;
    }
}

/// Check the credential and build the server
///
/// A missing credential is reported before anything else is constructed.
pub fn build_server(config: &AppConfig) -> Result<ApiServer> {
    config.require_credential()?;

    let adapter = create_adapter(&config.feedback)?;
    let sessions = SessionStore::with_limits(
        Duration::from_secs(config.server.session_idle_secs),
        config.server.max_sessions,
    );
    let state = ApiState::with_store(adapter, config.session.clone(), sessions)
        .map_err(|e| Error::Render(e.to_string()))?;

    info!(
        min_chars = ?config.session.min_chars(),
        reset_scope = ?config.session.reset_scope,
        idle_secs = config.server.session_idle_secs,
        max_sessions = config.server.max_sessions,
        "session settings"
    );

    let api_config = ApiConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        version: env!("CARGO_PKG_VERSION").to_string(),
    };
    Ok(ApiServer::new(api_config, state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use reflect_core::ConfigError;

    #[test]
    fn test_cli_overrides() {
        let args = Args::try_parse_from([
            "reflect", "--host", "0.0.0.0", "--port", "9100", "--offline", "--json-logs",
        ])
        .unwrap();
        let mut config = AppConfig::default();
        apply_cli_overrides(&mut config, &args);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.feedback.provider, FeedbackProvider::Stub);
        assert!(config.logging.json);
    }

    #[test]
    fn test_build_server_without_credential_fails() {
        let config = AppConfig::default();
        let err = build_server(&config).err().unwrap();
        assert!(matches!(
            err,
            Error::Config(ConfigError::MissingCredential { .. })
        ));
        assert_eq!(err.exit_code(), crate::cli::EXIT_CONFIG_ERROR);
    }

    #[test]
    fn test_build_server_offline() {
        let mut config = AppConfig::default();
        config.feedback.provider = FeedbackProvider::Stub;
        config.server.port = 9200;
        config.server.max_sessions = 5;
        let server = build_server(&config).unwrap();
        assert_eq!(server.config().port, 9200);
        assert_eq!(server.state().sessions.max_sessions(), 5);
    }
}
