//! HTTP inbound adapter exposing REST endpoints.
//!
//! Every payload-bearing endpoint extracts its input through
//! [`extract::ValidJson`] or [`extract::ValidQuery`], so handlers only run
//! for payloads the schema registry accepted.

use actix_web::web;

pub mod auth;
pub mod error;
pub mod extract;
pub mod rejection;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;

pub use error::ApiResult;

/// Base path of the versioned API.
pub const API_PREFIX: &str = "/api/v1";

/// Register the versioned API routes and the extractor error handlers.
///
/// The application must also provide `web::Data<SchemaRegistry>` and
/// `web::Data<HttpState>`.
///
/// # Examples
/// ```no_run
/// use actix_web::App;
/// use marketplace_api::inbound::http::configure_api;
///
/// let app = App::new().configure(configure_api);
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(rejection::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(rejection::query_error_handler))
        .service(
            web::scope(API_PREFIX)
                .service(auth::register)
                .service(auth::login)
                .service(auth::change_password)
                .service(auth::forgot_password)
                .service(auth::reset_password)
                .service(users::create_user)
                .service(users::list_users)
                .service(users::get_user)
                .service(users::update_user),
        );
}
