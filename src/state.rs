// src/state.rs

use sqlx::SqlitePool;
use std::sync::Arc;

use crate::auth::AuthService;
use crate::project::{ProjectService, SqliteProjectStore};

#[derive(Clone)]
pub struct AppState {
    pub sqlite_pool: SqlitePool,
    pub project_service: Arc<ProjectService>,
    pub auth_service: Arc<AuthService>,
}

impl AppState {
    pub fn new(pool: SqlitePool) -> Self {
        let project_store = Arc::new(SqliteProjectStore::new(pool.clone()));

        Self {
            project_service: Arc::new(ProjectService::new(project_store)),
            auth_service: Arc::new(AuthService::new(pool.clone())),
            sqlite_pool: pool,
        }
    }
}
