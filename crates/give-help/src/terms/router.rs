use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde_json::json;
use tracing::error;

use super::domain::{TermId, UserId};
use super::repository::TermsRepository;
use super::service::{TermsService, TermsServiceError};

/// Header carrying the authenticated caller, set by the upstream auth layer.
pub const USER_ID_HEADER: &str = "x-user-id";
/// Body message for every domain failure; the cause is only logged.
pub const GENERIC_FAILURE_MESSAGE: &str = "An unexpected error occurred";

/// Router builder exposing terms listing and acceptance.
pub fn terms_router<R>(service: Arc<TermsService<R>>) -> Router
where
    R: TermsRepository + 'static,
{
    Router::new()
        .route("/api/v1/terms", get(get_terms_handler::<R>))
        .route(
            "/api/v1/terms/accepted",
            get(get_user_accepted_handler::<R>),
        )
        .route(
            "/api/v1/terms/:term_id/accept",
            put(put_user_accept_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn put_user_accept_handler<R>(
    State(service): State<Arc<TermsService<R>>>,
    Path(term_id): Path<String>,
    headers: HeaderMap,
) -> Response
where
    R: TermsRepository + 'static,
{
    const HANDLER: &str = "put_user_accept";
    let started = Instant::now();

    let response = match principal(&headers) {
        None => unauthorized(),
        Some(user_id) => match service.accept(&TermId(term_id), &user_id) {
            Ok(_) => (StatusCode::OK, Json(json!({}))).into_response(),
            Err(err) => internal_error(HANDLER, err),
        },
    };

    record_elapsed(HANDLER, started);
    response
}

pub(crate) async fn get_terms_handler<R>(State(service): State<Arc<TermsService<R>>>) -> Response
where
    R: TermsRepository + 'static,
{
    const HANDLER: &str = "get_terms";
    let started = Instant::now();

    let response = match service.list_terms() {
        Ok(terms) => (StatusCode::OK, Json(terms)).into_response(),
        Err(err) => internal_error(HANDLER, err),
    };

    record_elapsed(HANDLER, started);
    response
}

pub(crate) async fn get_user_accepted_handler<R>(
    State(service): State<Arc<TermsService<R>>>,
    headers: HeaderMap,
) -> Response
where
    R: TermsRepository + 'static,
{
    const HANDLER: &str = "get_user_accepted";
    let started = Instant::now();

    let response = match principal(&headers) {
        None => unauthorized(),
        Some(user_id) => match service.list_accepted(&user_id) {
            Ok(accepted) => (StatusCode::OK, Json(accepted)).into_response(),
            Err(err) => internal_error(HANDLER, err),
        },
    };

    record_elapsed(HANDLER, started);
    response
}

fn principal(headers: &HeaderMap) -> Option<UserId> {
    headers
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| UserId(value.to_string()))
}

fn unauthorized() -> Response {
    let payload = json!({ "message": "authentication required" });
    (StatusCode::UNAUTHORIZED, Json(payload)).into_response()
}

fn internal_error(handler: &'static str, err: TermsServiceError) -> Response {
    error!(handler, error = %err, "terms request failed");
    let payload = json!({ "message": GENERIC_FAILURE_MESSAGE });
    (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
}

fn record_elapsed(handler: &'static str, started: Instant) {
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
    metrics::histogram!("terms_handler_elapsed_ms", "handler" => handler).record(elapsed_ms);
}
