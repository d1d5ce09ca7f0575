//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::StorefrontConfig;
use crate::services::oauth::OAuthClient;
use crate::services::payments::RazorpayClient;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    payments: RazorpayClient,
    oauth: Option<OAuthClient>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `pool` - `PostgreSQL` connection pool
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Self {
        let payments = RazorpayClient::new(&config.razorpay);
        let oauth = config.oauth.as_ref().map(OAuthClient::new);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                payments,
                oauth,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the payment gateway client.
    #[must_use]
    pub fn payments(&self) -> &RazorpayClient {
        &self.inner.payments
    }

    /// Get a reference to the federated login client, if configured.
    #[must_use]
    pub fn oauth(&self) -> Option<&OAuthClient> {
        self.inner.oauth.as_ref()
    }
}
