//! Razorpay payment gateway client.
//!
//! Creates gateway orders ahead of payment capture and verifies the
//! HMAC-SHA256 signature Razorpay attaches to completed payments.

mod error;

pub use error::PaymentError;

use hmac::{Hmac, Mac};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use larkspur_core::Money;

use crate::config::RazorpayConfig;

type HmacSha256 = Hmac<Sha256>;

/// A gateway order created ahead of payment capture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayOrder {
    /// Gateway-assigned order ID (e.g. `order_Nxy...`).
    pub id: String,
    /// Amount in minor units (paise).
    pub amount: i64,
    /// ISO currency code.
    pub currency: String,
}

#[derive(Serialize)]
struct CreateOrderRequest<'a> {
    amount: i64,
    currency: &'a str,
    receipt: &'a str,
}

/// Razorpay API client.
#[derive(Clone)]
pub struct RazorpayClient {
    client: reqwest::Client,
    api_base: String,
    key_id: String,
    key_secret: secrecy::SecretString,
}

impl RazorpayClient {
    /// Create a new gateway client from configuration.
    #[must_use]
    pub fn new(config: &RazorpayConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: config.api_base.clone(),
            key_id: config.key_id.clone(),
            key_secret: config.key_secret.clone(),
        }
    }

    /// The public key ID, safe to hand to the browser widget.
    #[must_use]
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Create a gateway order for the given amount.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::InvalidAmount` if the amount has sub-paise
    /// precision. Returns `PaymentError::Http` or `PaymentError::Api` if the
    /// gateway call fails.
    pub async fn create_order(
        &self,
        amount: Money,
        receipt: &str,
    ) -> Result<GatewayOrder, PaymentError> {
        let minor = amount
            .to_minor_units()
            .ok_or_else(|| PaymentError::InvalidAmount(format!("{}", amount.amount)))?;

        let url = format!("{}/v1/orders", self.api_base);
        let response = self
            .client
            .post(&url)
            .basic_auth(&self.key_id, Some(self.key_secret.expose_secret()))
            .json(&CreateOrderRequest {
                amount: minor,
                currency: amount.currency.code(),
                receipt,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(PaymentError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<GatewayOrder>().await?)
    }

    /// Verify a completed payment's signature.
    ///
    /// The gateway signs `"{order_id}|{payment_id}"` with the key secret;
    /// verification is constant-time via the MAC implementation, so attackers
    /// learn nothing from response timing.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::InvalidSignature` if the signature is malformed
    /// or does not match.
    pub fn verify_signature(
        &self,
        order_id: &str,
        payment_id: &str,
        signature_hex: &str,
    ) -> Result<(), PaymentError> {
        let expected = hex::decode(signature_hex).map_err(|_| PaymentError::InvalidSignature)?;

        verify_payment_signature(
            self.key_secret.expose_secret().as_bytes(),
            order_id,
            payment_id,
            &expected,
        )
    }
}

fn verify_payment_signature(
    secret: &[u8],
    order_id: &str,
    payment_id: &str,
    signature: &[u8],
) -> Result<(), PaymentError> {
    let mut mac =
        HmacSha256::new_from_slice(secret).map_err(|_| PaymentError::InvalidSignature)?;
    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());
    mac.verify_slice(signature)
        .map_err(|_| PaymentError::InvalidSignature)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(secret: &[u8], order_id: &str, payment_id: &str) -> Vec<u8> {
        let mut mac = HmacSha256::new_from_slice(secret).expect("key");
        mac.update(format!("{order_id}|{payment_id}").as_bytes());
        mac.finalize().into_bytes().to_vec()
    }

    #[test]
    fn valid_signature_verifies() {
        let sig = sign(b"test-secret", "order_123", "pay_456");
        verify_payment_signature(b"test-secret", "order_123", "pay_456", &sig).expect("verify");
    }

    #[test]
    fn tampered_payment_id_fails() {
        let sig = sign(b"test-secret", "order_123", "pay_456");
        let err = verify_payment_signature(b"test-secret", "order_123", "pay_999", &sig)
            .expect_err("should fail");
        assert!(matches!(err, PaymentError::InvalidSignature));
    }

    #[test]
    fn wrong_secret_fails() {
        let sig = sign(b"other-secret", "order_123", "pay_456");
        let err = verify_payment_signature(b"test-secret", "order_123", "pay_456", &sig)
            .expect_err("should fail");
        assert!(matches!(err, PaymentError::InvalidSignature));
    }

    #[test]
    fn malformed_hex_is_rejected() {
        let config = RazorpayConfig::for_tests();
        let client = RazorpayClient::new(&config);
        let err = client
            .verify_signature("order_123", "pay_456", "not-hex")
            .expect_err("should fail");
        assert!(matches!(err, PaymentError::InvalidSignature));
    }
}
