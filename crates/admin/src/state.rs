//! Shared application state.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AdminConfig;
use crate::services::tokens::TokenService;

/// Cheaply cloneable handle to everything handlers need.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    pool: PgPool,
    tokens: TokenService,
}

impl AppState {
    /// Assemble the state from loaded config and an open pool.
    #[must_use]
    pub fn new(config: AdminConfig, pool: PgPool) -> Self {
        let tokens = TokenService::new(&config.jwt_secret);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                tokens,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    #[must_use]
    pub fn tokens(&self) -> &TokenService {
        &self.inner.tokens
    }
}
