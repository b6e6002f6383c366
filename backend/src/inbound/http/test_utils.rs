//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::{test, web};
use serde_json::Value;

use super::configure_api;
use super::state::HttpState;
use crate::domain::validation::SchemaRegistry;
use crate::outbound::InMemoryAccounts;

/// Register the API, the built-in schema registry and `state`.
pub fn configure_with_state(cfg: &mut web::ServiceConfig, state: HttpState) {
    let registry = SchemaRegistry::builtin().expect("built-in schemas compile");
    cfg.app_data(web::Data::new(registry))
        .app_data(web::Data::new(state));
    configure_api(cfg);
}

/// Register the API backed by `accounts` for both ports.
pub fn configure(cfg: &mut web::ServiceConfig, accounts: Arc<InMemoryAccounts>) {
    configure_with_state(cfg, HttpState::new(accounts.clone(), accounts));
}

/// Split a response into its status and JSON body.
pub async fn read_json(res: ServiceResponse) -> (StatusCode, Value) {
    let status = res.status();
    let body = test::read_body_json(res).await;
    (status, body)
}
