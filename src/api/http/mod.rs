// src/api/http/mod.rs

pub mod auth;
pub mod health;
pub mod project;
pub mod router;

pub use router::http_router;
