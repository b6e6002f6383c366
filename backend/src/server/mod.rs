//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use marketplace_api::Trace;
use marketplace_api::doc::ApiDoc;
use marketplace_api::domain::validation::SchemaRegistry;
use marketplace_api::inbound::http::configure_api;
use marketplace_api::inbound::http::state::HttpState;

#[derive(Clone)]
struct AppDependencies {
    registry: web::Data<SchemaRegistry>,
    http_state: web::Data<HttpState>,
    docs_enabled: bool,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        registry,
        http_state,
        docs_enabled,
    } = deps;

    App::new()
        .app_data(registry)
        .app_data(http_state)
        .wrap(Trace)
        .configure(configure_api)
        .configure(|cfg| {
            if docs_enabled {
                cfg.service(
                    SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()),
                );
            }
        })
}

/// Construct an Actix HTTP server from a resolved [`ServerConfig`].
///
/// # Returns
/// A [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(config: ServerConfig) -> std::io::Result<Server> {
    let deps = AppDependencies {
        registry: config.registry_data(),
        http_state: web::Data::new(config.http_state),
        docs_enabled: config.docs_enabled,
    };
    let bind_addr = config.bind_addr;
    let docs_enabled = deps.docs_enabled;

    let server = HttpServer::new(move || build_app(deps.clone()))
        .bind(bind_addr)?
        .run();

    info!(%bind_addr, docs_enabled, "marketplace API listening");
    Ok(server)
}
