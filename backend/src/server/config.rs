//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::web;
use marketplace_api::domain::validation::SchemaRegistry;
use marketplace_api::inbound::http::state::HttpState;

/// Everything [`super::create_server`] needs, resolved at start-up.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) registry: Arc<SchemaRegistry>,
    pub(crate) http_state: HttpState,
    pub(crate) docs_enabled: bool,
}

impl ServerConfig {
    /// Construct a server configuration from its resolved parts.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, registry: SchemaRegistry, http_state: HttpState) -> Self {
        Self {
            bind_addr,
            registry: Arc::new(registry),
            http_state,
            docs_enabled: false,
        }
    }

    /// Serve Swagger UI and the OpenAPI document.
    #[must_use]
    pub fn with_docs(mut self, enabled: bool) -> Self {
        self.docs_enabled = enabled;
        self
    }

    pub(crate) fn registry_data(&self) -> web::Data<SchemaRegistry> {
        web::Data::from(self.registry.clone())
    }
}
