//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{AuthService, UserService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Authentication use-cases.
    pub auth: Arc<dyn AuthService>,
    /// User management use-cases.
    pub users: Arc<dyn UserService>,
}

impl HttpState {
    /// Bundle the ports handlers call.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use marketplace_api::inbound::http::state::HttpState;
    /// use marketplace_api::outbound::InMemoryAccounts;
    ///
    /// let accounts = Arc::new(InMemoryAccounts::new());
    /// let state = HttpState::new(accounts.clone(), accounts);
    /// let _users = state.users.clone();
    /// ```
    pub fn new(auth: Arc<dyn AuthService>, users: Arc<dyn UserService>) -> Self {
        Self { auth, users }
    }
}
