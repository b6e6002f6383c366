//! Backend entry-point: loads settings, checks the schema registry and
//! serves the REST API.

use std::io;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use marketplace_api::domain::ports::UserService;
use marketplace_api::domain::validation::SchemaRegistry;
use marketplace_api::inbound::http::state::HttpState;
use marketplace_api::outbound::InMemoryAccounts;
use marketplace_api::settings::ServerSettings;

mod server;

use server::{ServerConfig, create_server};

fn init_tracing(json: bool) {
    let builder = fmt().with_env_filter(EnvFilter::from_default_env());
    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(e) = result {
        warn!(error = %e, "tracing init failed");
    }
}

/// Build the schema registry and refuse to start if any operation lacks one.
fn load_registry() -> io::Result<SchemaRegistry> {
    let registry = SchemaRegistry::builtin().map_err(io::Error::other)?;
    registry.ensure_complete().map_err(io::Error::other)?;
    Ok(registry)
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    let settings = ServerSettings::load_from_args(std::env::args_os()).map_err(io::Error::other)?;
    init_tracing(settings.log_json);

    let registry = load_registry()?;
    info!(operations = registry.len(), "schema registry ready");

    let accounts = Arc::new(InMemoryAccounts::new());
    if let Some(seed) = settings.admin_seed(&registry).map_err(io::Error::other)? {
        let admin = accounts.create_user(seed).await.map_err(io::Error::other)?;
        info!(user_id = %admin.id, "admin account seeded");
    }

    let config = ServerConfig::new(
        settings.bind_addr().map_err(io::Error::other)?,
        registry,
        HttpState::new(accounts.clone(), accounts),
    )
    .with_docs(settings.docs_enabled());

    create_server(config)?.await
}
