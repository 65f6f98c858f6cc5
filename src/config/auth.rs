// src/config/auth.rs
// Session token and password hashing settings

use serde::{Deserialize, Serialize};

use super::helpers::{env_or, env_parsed_or};

/// Upper bound for `PROJECT_HUB_TOKEN_TTL_DAYS`.
pub const MAX_TOKEN_TTL_DAYS: i64 = 3650;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_days: i64,
    pub bcrypt_cost: u32,
}

impl AuthConfig {
    pub fn from_env() -> Self {
        Self {
            jwt_secret: env_or("JWT_SECRET", "project-hub-jwt-secret-change-in-production"),
            token_ttl_days: clamp_ttl_days(env_parsed_or("PROJECT_HUB_TOKEN_TTL_DAYS", 30)),
            bcrypt_cost: env_parsed_or("PROJECT_HUB_BCRYPT_COST", 10),
        }
    }

    /// Session lifetime in seconds, for the cookie `Max-Age`.
    pub fn token_ttl_secs(&self) -> i64 {
        clamp_ttl_days(self.token_ttl_days) * 24 * 60 * 60
    }
}

fn clamp_ttl_days(days: i64) -> i64 {
    days.clamp(1, MAX_TOKEN_TTL_DAYS)
}
