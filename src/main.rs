//! Reflect CLI
//!
//! Loads configuration, checks for a feedback credential and serves the
//! reflection page until Ctrl+C.

use clap::Parser;
use tracing::{error, info};

use reflect::cli::{self, bootstrap, Args, EXIT_FAILURE, EXIT_SUCCESS};
use reflect_core::{ConfigError, LlmAdapter};

fn main() {
    let args = Args::parse();
    std::process::exit(run(args));
}

fn run(args: Args) -> i32 {
    let config = match bootstrap::load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return e.exit_code();
        }
    };

    if let Err(e) = cli::init_logging(&config.logging.level, config.logging.json) {
        eprintln!("Error: {}", e);
        return e.exit_code();
    }

    let server = match bootstrap::build_server(&config) {
        Ok(server) => server,
        Err(e) => {
            if let cli::Error::Config(ConfigError::MissingCredential { variable }) = &e {
                error!(variable = *variable, "missing credential, refusing to start");
            }
            eprintln!("Error: {}", e);
            return e.exit_code();
        }
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to start runtime: {}", e);
            return EXIT_FAILURE;
        }
    };

    info!(
        provider = server.state().adapter.provider_name(),
        "starting reflect"
    );
    match runtime.block_on(server.start()) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            error!("server stopped: {:#}", e);
            eprintln!("Error: {:#}", e);
            EXIT_FAILURE
        }
    }
}
