// src/auth/mod.rs
pub mod error;
pub mod extract;
pub mod jwt;
pub mod models;
pub mod password;
pub mod service;

pub use error::{AuthFailure, AuthResult};
pub use extract::CurrentUser;
pub use models::{AuthResponse, Caller, LoginRequest, RegisterRequest, User};
pub use service::AuthService;
