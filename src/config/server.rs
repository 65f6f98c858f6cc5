// src/config/server.rs
// Server, database, and logging configuration

use serde::{Deserialize, Serialize};
use tracing::Level;

use super::helpers::{env_or, env_parsed_or};

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            host: env_or("PROJECT_HUB_HOST", "127.0.0.1"),
            port: env_parsed_or("PROJECT_HUB_PORT", 1337),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn from_env() -> Self {
        Self {
            url: env_or("DATABASE_URL", "sqlite://project_hub.db?mode=rwc"),
            max_connections: env_parsed_or("PROJECT_HUB_SQLITE_MAX_CONNECTIONS", 5),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        Self {
            level: env_or("PROJECT_HUB_LOG_LEVEL", "info"),
        }
    }

    /// Unknown level names fall back to INFO.
    pub fn tracing_level(&self) -> Level {
        self.level.parse().unwrap_or(Level::INFO)
    }
}
