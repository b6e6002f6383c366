//! Validating extractors.
//!
//! [`ValidJson`] and [`ValidQuery`] run the raw payload through the schema
//! registered for the target DTO before a handler sees it. Rejected payloads
//! short-circuit with a [`ValidationRejection`]; handlers only ever receive
//! values that passed validation.
//!
//! Per request: `Received -> Validating -> {Accepted | Rejected}`.

use std::collections::HashMap;

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use serde_json::{Map, Value};
use tracing::{debug, error};

use super::rejection::ValidationRejection;
use crate::domain::Error;
use crate::domain::validation::{SchemaRegistry, ValidatedPayload, ValidationResult, validate_as};

fn accept<T: ValidatedPayload>(req: &HttpRequest, raw: &Value) -> Result<T, actix_web::Error> {
    let operation = T::OPERATION;
    let Some(registry) = req.app_data::<web::Data<SchemaRegistry>>() else {
        error!(%operation, "schema registry missing from application data");
        return Err(Error::internal("schema registry is not configured").into());
    };
    debug!(%operation, "validating request payload");
    match validate_as::<T>(registry.get_ref(), raw) {
        Ok(ValidationResult::Valid(payload)) => {
            debug!(%operation, "request payload accepted");
            Ok(payload)
        }
        Ok(ValidationResult::Invalid(errors)) => {
            debug!(%operation, error_count = errors.len(), "request payload rejected");
            Err(ValidationRejection::from_field_errors(errors).into())
        }
        Err(unknown) => {
            error!(%operation, error = %unknown, "operation has no registered schema");
            Err(Error::internal(unknown.to_string()).into())
        }
    }
}

/// JSON body validated against `T`'s schema.
///
/// # Examples
/// ```no_run
/// use actix_web::HttpResponse;
/// use marketplace_api::domain::LoginRequest;
/// use marketplace_api::inbound::http::extract::ValidJson;
///
/// async fn login(ValidJson(request): ValidJson<LoginRequest>) -> HttpResponse {
///     HttpResponse::Ok().body(request.email)
/// }
/// ```
#[derive(Debug)]
pub struct ValidJson<T>(pub T);

impl<T> ValidJson<T> {
    /// Unwrap the validated payload.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: ValidatedPayload + 'static> FromRequest for ValidJson<T> {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        let body = web::Json::<Value>::from_request(&req, payload);
        Box::pin(async move {
            let raw = match body.await {
                Ok(json) => json.into_inner(),
                Err(err) => {
                    debug!(operation = %T::OPERATION, error = %err, "request body is not JSON");
                    return Err(ValidationRejection::malformed_body().into());
                }
            };
            accept::<T>(&req, &raw).map(Self)
        })
    }
}

/// Query string validated against `T`'s schema.
///
/// Every parameter arrives as a JSON string; schemas for query operations
/// declare string fields and constrain their format with patterns.
#[derive(Debug)]
pub struct ValidQuery<T>(pub T);

impl<T> ValidQuery<T> {
    /// Unwrap the validated query.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: ValidatedPayload> FromRequest for ValidQuery<T> {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let params = match web::Query::<HashMap<String, String>>::from_query(req.query_string()) {
            Ok(params) => params.into_inner(),
            Err(err) => {
                debug!(operation = %T::OPERATION, error = %err, "query string is not decodable");
                return ready(Err(ValidationRejection::malformed_query().into()));
            }
        };
        let raw = Value::Object(
            params
                .into_iter()
                .map(|(key, value)| (key, Value::String(value)))
                .collect::<Map<_, _>>(),
        );
        ready(accept::<T>(req, &raw).map(Self))
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test};
    use rstest::{fixture, rstest};
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::{LoginRequest, UserQuery};

    #[fixture]
    fn registry() -> web::Data<SchemaRegistry> {
        web::Data::new(SchemaRegistry::builtin().expect("built-in schemas compile"))
    }

    async fn login(ValidJson(request): ValidJson<LoginRequest>) -> HttpResponse {
        HttpResponse::Ok().body(request.email)
    }

    async fn list(ValidQuery(query): ValidQuery<UserQuery>) -> HttpResponse {
        HttpResponse::Ok().json(json!({"page": query.page(), "limit": query.limit()}))
    }

    async fn call(
        registry: Option<web::Data<SchemaRegistry>>,
        req: test::TestRequest,
    ) -> (StatusCode, Value) {
        let mut app = App::new()
            .route("/login", web::post().to(login))
            .route("/users", web::get().to(list));
        if let Some(registry) = registry {
            app = app.app_data(registry);
        }
        let app = test::init_service(app).await;
        let res = test::call_service(&app, req.to_request()).await;
        let status = res.status();
        let bytes = test::read_body(res).await;
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[rstest]
    #[actix_web::test]
    async fn valid_body_reaches_the_handler(registry: web::Data<SchemaRegistry>) {
        let req = test::TestRequest::post()
            .uri("/login")
            .set_json(json!({"email": "kim@example.com", "password": "secret1"}));
        let (status, _) = call(Some(registry), req).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[rstest]
    #[actix_web::test]
    async fn invalid_body_is_rejected(registry: web::Data<SchemaRegistry>) {
        let req = test::TestRequest::post()
            .uri("/login")
            .set_json(json!({"email": "not-an-email", "password": "abc"}));
        let (status, body) = call(Some(registry), req).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Validation failed");
        assert_eq!(body["errors"].as_array().map(Vec::len), Some(2));
    }

    #[rstest]
    #[actix_web::test]
    async fn malformed_json_yields_the_generic_body_error(registry: web::Data<SchemaRegistry>) {
        let req = test::TestRequest::post()
            .uri("/login")
            .insert_header(("content-type", "application/json"))
            .set_payload("{\"email\": ");
        let (status, body) = call(Some(registry), req).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["errors"],
            json!([{"field": "body", "message": "Request body must be a valid JSON object"}])
        );
    }

    #[rstest]
    #[actix_web::test]
    async fn array_body_is_a_root_type_mismatch(registry: web::Data<SchemaRegistry>) {
        let req = test::TestRequest::post().uri("/login").set_json(json!([1, 2]));
        let (status, body) = call(Some(registry), req).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["errors"],
            json!([{"field": "", "message": "Expected object, received array"}])
        );
    }

    #[rstest]
    #[actix_web::test]
    async fn missing_registry_is_a_server_error() {
        let req = test::TestRequest::post()
            .uri("/login")
            .set_json(json!({"email": "kim@example.com", "password": "secret1"}));
        let (status, body) = call(None, req).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "internal_error");
    }

    #[rstest]
    #[case("/users?page=2&limit=5", StatusCode::OK)]
    #[case("/users", StatusCode::OK)]
    #[case("/users?page=0", StatusCode::BAD_REQUEST)]
    #[case("/users?isActive=maybe", StatusCode::BAD_REQUEST)]
    #[case("/users?role=guest", StatusCode::BAD_REQUEST)]
    #[actix_web::test]
    async fn query_strings_are_validated(
        registry: web::Data<SchemaRegistry>,
        #[case] uri: &str,
        #[case] expected: StatusCode,
    ) {
        let (status, _) = call(Some(registry), test::TestRequest::get().uri(uri)).await;
        assert_eq!(status, expected);
    }
}
