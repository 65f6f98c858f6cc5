// src/config/mod.rs
// Central configuration, loaded once from the environment

pub mod auth;
pub mod helpers;
pub mod server;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

lazy_static! {
    pub static ref CONFIG: AppConfig = AppConfig::from_env();
}

/// Main configuration structure - composes all domain configs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: server::ServerConfig,
    pub database: server::DatabaseConfig,
    pub logging: server::LoggingConfig,
    pub auth: auth::AuthConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        // A missing .env is fine; everything has a default
        dotenv::dotenv().ok();

        Self {
            server: server::ServerConfig::from_env(),
            database: server::DatabaseConfig::from_env(),
            logging: server::LoggingConfig::from_env(),
            auth: auth::AuthConfig::from_env(),
        }
    }

    pub fn bind_address(&self) -> String {
        self.server.bind_address()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
