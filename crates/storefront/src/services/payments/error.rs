//! Payment gateway error types.

use thiserror::Error;

/// Errors that can occur when talking to the payment gateway.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Gateway returned an error response.
    #[error("gateway error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The payment signature did not verify.
    #[error("payment signature verification failed")]
    InvalidSignature,

    /// The order amount cannot be represented in minor units.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
}
