//! Reflect: a mental wellness reflection companion
//!
//! The binary wires configuration, logging and the web server together.
//! Session logic lives in `reflect-core`, HTTP handling in `reflect-api`.

pub mod cli;

pub use cli::{build_server, init_logging, load_config, Args};
