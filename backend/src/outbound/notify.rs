//! [`ResetNotifier`] adapters.
//!
//! [`LoggingResetNotifier`] is the default channel until an email gateway is
//! wired in: the owner and expiry go to the `info` log, the token itself only
//! to `debug`. [`ResetOutbox`] keeps deliveries in memory for callers that
//! hand tokens over themselves.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::ports::{ResetDelivery, ResetDeliveryError, ResetNotifier, ResetToken};

/// Writes reset deliveries to the tracing log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingResetNotifier;

#[async_trait]
impl ResetNotifier for LoggingResetNotifier {
    async fn deliver(&self, delivery: &ResetDelivery) -> Result<(), ResetDeliveryError> {
        info!(
            email = %delivery.email,
            expires_at = %delivery.expires_at,
            "password reset token issued"
        );
        debug!(reset_token = delivery.token.as_str(), "reset token for manual delivery");
        Ok(())
    }
}

/// Records every delivery in arrival order.
///
/// # Examples
/// ```
/// use marketplace_api::outbound::ResetOutbox;
///
/// let outbox = ResetOutbox::default();
/// assert!(outbox.latest_for("kim@example.com").is_none());
/// ```
#[derive(Debug, Default)]
pub struct ResetOutbox {
    deliveries: Mutex<Vec<ResetDelivery>>,
}

impl ResetOutbox {
    /// Snapshot of the recorded deliveries.
    #[must_use]
    pub fn deliveries(&self) -> Vec<ResetDelivery> {
        self.deliveries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Most recent token delivered to `email`.
    #[must_use]
    pub fn latest_for(&self, email: &str) -> Option<ResetToken> {
        self.deliveries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .rev()
            .find(|delivery| delivery.email == email)
            .map(|delivery| delivery.token.clone())
    }
}

#[async_trait]
impl ResetNotifier for ResetOutbox {
    async fn deliver(&self, delivery: &ResetDelivery) -> Result<(), ResetDeliveryError> {
        self.deliveries
            .lock()
            .map_err(|_| ResetDeliveryError::Unavailable {
                message: "outbox lock poisoned".to_owned(),
            })?
            .push(delivery.clone());
        Ok(())
    }
}
