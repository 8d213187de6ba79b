//! CLI module
//!
//! Provides:
//! - Argument parsing
//! - Logging setup
//! - Startup: configuration, credential check, server construction

pub mod args;
pub mod bootstrap;
pub mod logging;

// Re-exports
pub use args::Args;
pub use bootstrap::{build_server, load_config};
pub use logging::init_logging;

/// CLI errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] reflect_core::ConfigError),

    #[error("Feedback service setup failed: {0}")]
    Adapter(#[from] reflect_core::AdapterError),

    #[error("Failed to prepare page templates: {0}")]
    Render(String),

    #[error("Failed to initialise logging: {0}")]
    Logging(String),
}

impl Error {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Config(_) => EXIT_CONFIG_ERROR,
            _ => EXIT_FAILURE,
        }
    }
}

/// Exit codes (deterministic)
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_CONFIG_ERROR: i32 = 2;

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, Error>;
