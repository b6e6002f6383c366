//! Driven port delivering password-reset tokens to account owners.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use super::ResetToken;

/// A freshly issued reset token addressed to its owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetDelivery {
    /// Normalised email of the account owner.
    pub email: String,
    /// Token the owner submits to `POST /auth/reset-password`.
    pub token: ResetToken,
    /// Instant after which the token is refused.
    pub expires_at: DateTime<Utc>,
}

/// Errors surfaced by delivery adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResetDeliveryError {
    /// The delivery channel is unavailable.
    #[error("reset delivery channel is unavailable: {message}")]
    Unavailable {
        /// Adapter-specific detail.
        message: String,
    },
}

/// Hands reset tokens to an out-of-band channel (email, SMS, outbox).
#[async_trait]
pub trait ResetNotifier: Send + Sync {
    /// Deliver `delivery` to its owner.
    async fn deliver(&self, delivery: &ResetDelivery) -> Result<(), ResetDeliveryError>;
}
