// src/auth/service.rs

use anyhow::anyhow;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use super::error::{AuthFailure, AuthResult};
use super::jwt::{create_token, verify_token};
use super::models::{AuthResponse, Caller, LoginRequest, RegisterRequest, User, UserWithPassword};
use super::password::{hash_password, verify_password};

pub struct AuthService {
    db: SqlitePool,
}

impl AuthService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn login(&self, req: LoginRequest) -> AuthResult<AuthResponse> {
        let user = self
            .get_user_by_username(&req.username)
            .await?
            .ok_or(AuthFailure::InvalidCredentials)?;

        if !user.is_active {
            return Err(AuthFailure::AccountDisabled);
        }

        if !verify_password(&req.password, &user.password_hash)? {
            return Err(AuthFailure::InvalidCredentials);
        }

        let token = create_token(&user.id, &user.username)?;
        self.update_last_login(&user.id).await?;

        info!(user_id = %user.id, "User logged in: {}", user.username);

        Ok(AuthResponse {
            user: user.into(),
            token,
        })
    }

    pub async fn register(&self, req: RegisterRequest) -> AuthResult<AuthResponse> {
        let username = req.username.trim();
        if username.is_empty() {
            return Err(AuthFailure::Rejected("Username is required"));
        }
        if req.password.is_empty() {
            return Err(AuthFailure::Rejected("Password is required"));
        }
        if self.username_exists(username).await? {
            return Err(AuthFailure::Rejected("Username already exists"));
        }

        let user_id = Uuid::new_v4().to_string();
        let password_hash = hash_password(&req.password)?;
        let now = chrono::Utc::now().timestamp();

        sqlx::query(
            r#"
            INSERT INTO users (id, username, password_hash, created_at, updated_at, last_login_at, is_active)
            VALUES (?, ?, ?, ?, ?, ?, TRUE)
            "#,
        )
        .bind(&user_id)
        .bind(username)
        .bind(&password_hash)
        .bind(now)
        .bind(now)
        .bind(now)
        .execute(&self.db)
        .await?;

        let user = self
            .get_user_by_id(&user_id)
            .await?
            .ok_or_else(|| anyhow!("User {} missing after insert", user_id))?;
        let token = create_token(&user.id, &user.username)?;

        info!(user_id = %user.id, "Registered user: {}", user.username);

        Ok(AuthResponse {
            user: user.into(),
            token,
        })
    }

    /// The user with `user_id` if it exists and is active. Store failures
    /// are errors, never `None`.
    pub async fn find_active_user(&self, user_id: &str) -> AuthResult<Option<User>> {
        let user = self.get_user_by_id(user_id).await?;
        Ok(user.filter(|user| user.is_active).map(User::from))
    }

    /// Resolve a session token to its caller. Invalid or expired tokens and
    /// unknown or disabled users resolve to `None`; a failing user lookup
    /// is an error.
    pub async fn caller_from_token(&self, token: &str) -> AuthResult<Option<Caller>> {
        let claims = match verify_token(token) {
            Ok(claims) => claims,
            Err(e) => {
                debug!("Ignoring session token: {}", e);
                return Ok(None);
            }
        };

        let user = self.find_active_user(&claims.sub).await?;
        if user.is_none() {
            debug!(user_id = %claims.sub, "Ignoring session for unknown or disabled user");
        }

        Ok(user.as_ref().map(Caller::from))
    }

    async fn get_user_by_username(&self, username: &str) -> AuthResult<Option<UserWithPassword>> {
        let user = sqlx::query_as::<_, UserWithPassword>("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.db)
            .await?;

        Ok(user)
    }

    async fn get_user_by_id(&self, user_id: &str) -> AuthResult<Option<UserWithPassword>> {
        let user = sqlx::query_as::<_, UserWithPassword>("SELECT * FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.db)
            .await?;

        Ok(user)
    }

    async fn username_exists(&self, username: &str) -> AuthResult<bool> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE username = ?")
            .bind(username)
            .fetch_one(&self.db)
            .await?;

        Ok(count.0 > 0)
    }

    async fn update_last_login(&self, user_id: &str) -> AuthResult<()> {
        let now = chrono::Utc::now().timestamp();

        sqlx::query("UPDATE users SET last_login_at = ?, updated_at = ? WHERE id = ?")
            .bind(now)
            .bind(now)
            .bind(user_id)
            .execute(&self.db)
            .await?;

        Ok(())
    }
}
