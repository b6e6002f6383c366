//! Domain ports: the business-logic collaborators inbound adapters call once
//! a payload has passed validation, and the outbound channels those
//! collaborators drive ([`ResetNotifier`]).
//!
//! Handlers depend on these traits only, so tests can swap in doubles and
//! production can back them with persistence without touching the adapters.

mod auth_service;
mod reset_notifier;
mod user_service;

pub use auth_service::{AuthService, ResetToken};
pub use reset_notifier::{ResetDelivery, ResetDeliveryError, ResetNotifier};
pub use user_service::UserService;
