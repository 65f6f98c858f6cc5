// src/lib.rs

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod project;
pub mod state;
