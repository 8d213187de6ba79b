//! Reflect API Module
//!
//! HTTP surface for the reflection service: the server-rendered reflection
//! form and a JSON API over the same per-session state.

pub mod handlers;
pub mod models;
pub mod render;
pub mod server;
pub mod store;

pub use handlers::*;
pub use models::*;
pub use server::*;
pub use store::{SessionStore, SharedSession};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_config_creation() {
        let config = ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            version: "1.0.0".to_string(),
        };

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_server_addr() {
        let server = ApiServer::new(
            ApiConfig {
                host: "0.0.0.0".to_string(),
                port: 9001,
                version: "test".to_string(),
            },
            ApiState::new(
                reflect_core::Adapter::Stub(reflect_core::llm::stub::StubAdapter::new()),
                reflect_core::SessionSettings::default(),
            )
            .unwrap(),
        );
        assert_eq!(server.addr().unwrap().port(), 9001);
    }
}
