//! Federated login (OAuth 2.0 authorization code) client.
//!
//! Generic over the provider; endpoints come from configuration, so the same
//! flow serves Google, GitHub, or any standards-compliant provider.

use rand::Rng;
use rand::distr::Alphanumeric;
use secrecy::ExposeSecret;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::config::OAuthConfig;

/// Errors from the federated login flow.
#[derive(Debug, Error)]
pub enum OAuthError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider returned an error response.
    #[error("provider error: {status} - {message}")]
    Provider { status: u16, message: String },

    /// The `state` parameter did not match the session.
    #[error("state mismatch")]
    StateMismatch,

    /// Configured endpoint URL is invalid.
    #[error("invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The provider's userinfo response lacked an email.
    #[error("provider did not return an email address")]
    MissingEmail,
}

/// The identity a provider vouches for after a completed flow.
#[derive(Debug, Clone)]
pub struct FederatedIdentity {
    /// Provider-scoped stable subject identifier.
    pub subject: String,
    /// Verified email address.
    pub email: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct UserinfoResponse {
    sub: Option<String>,
    id: Option<serde_json::Value>,
    email: Option<String>,
}

/// OAuth 2.0 authorization-code client.
#[derive(Clone)]
pub struct OAuthClient {
    client: reqwest::Client,
    config: OAuthConfig,
}

impl OAuthClient {
    /// Create a client from provider configuration.
    #[must_use]
    pub fn new(config: &OAuthConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config: config.clone(),
        }
    }

    /// Generate a random `state` value to bind the flow to the session.
    #[must_use]
    pub fn generate_state() -> String {
        rand::rng()
            .sample_iter(&Alphanumeric)
            .take(32)
            .map(char::from)
            .collect()
    }

    /// Build the provider authorization URL to redirect the shopper to.
    ///
    /// # Errors
    ///
    /// Returns `OAuthError::InvalidUrl` if the configured endpoint is invalid.
    pub fn authorization_url(&self, redirect_uri: &str, state: &str) -> Result<Url, OAuthError> {
        let mut url = Url::parse(&self.config.auth_url)?;
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", redirect_uri)
            .append_pair("scope", "openid email")
            .append_pair("state", state);
        Ok(url)
    }

    /// Exchange an authorization code for the shopper's identity.
    ///
    /// # Errors
    ///
    /// Returns `OAuthError::Provider` if the provider rejects the exchange,
    /// `OAuthError::MissingEmail` if the userinfo response has no email.
    pub async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<FederatedIdentity, OAuthError> {
        let response = self
            .client
            .post(&self.config.token_url)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", redirect_uri),
                ("client_id", &self.config.client_id),
                ("client_secret", self.config.client_secret.expose_secret()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(OAuthError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let token: TokenResponse = response.json().await?;
        self.fetch_identity(&token.access_token).await
    }

    async fn fetch_identity(&self, access_token: &str) -> Result<FederatedIdentity, OAuthError> {
        let response = self
            .client
            .get(&self.config.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(OAuthError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let info: UserinfoResponse = response.json().await?;

        // Providers disagree on the subject field name (`sub` vs `id`).
        let subject = info
            .sub
            .or_else(|| {
                info.id.map(|v| match v {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                })
            })
            .ok_or(OAuthError::MissingEmail)?;

        let email = info.email.ok_or(OAuthError::MissingEmail)?;

        Ok(FederatedIdentity { subject, email })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn test_config() -> OAuthConfig {
        OAuthConfig {
            client_id: "client-1".to_string(),
            client_secret: SecretString::from("oauth-test-secret"),
            auth_url: "https://provider.test/authorize".to_string(),
            token_url: "https://provider.test/token".to_string(),
            userinfo_url: "https://provider.test/userinfo".to_string(),
        }
    }

    #[test]
    fn authorization_url_carries_state_and_client() {
        let client = OAuthClient::new(&test_config());
        let url = client
            .authorization_url("https://shop.test/auth/callback", "state-abc")
            .expect("url");

        let query: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(query.contains(&("client_id".to_owned(), "client-1".to_owned())));
        assert!(query.contains(&("state".to_owned(), "state-abc".to_owned())));
        assert!(query.contains(&("response_type".to_owned(), "code".to_owned())));
    }

    #[test]
    fn generated_state_is_long_enough() {
        let state = OAuthClient::generate_state();
        assert_eq!(state.len(), 32);
        assert_ne!(state, OAuthClient::generate_state());
    }
}
