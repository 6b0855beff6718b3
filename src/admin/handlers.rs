//! Admin request handlers.
//!
//! Status codes and body texts form the operator-facing contract:
//! 201 on a mutation, 400 with a descriptive message on bad input, 200 with
//! the configuration rendering otherwise. Mutations additionally log the full
//! updated configuration.

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Method, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use url::Url;

use crate::admin::AdminState;

/// Cap on a urlencoded admin request body.
const FORM_BODY_LIMIT: usize = 64 * 1024;

pub async fn dispatch(State(state): State<AdminState>, req: Request<Body>) -> Response {
    let path = req.uri().path().to_string();
    if let Some(prefix) = path.strip_prefix("/use") {
        let prefix = prefix.to_string();
        use_route(&state, &prefix)
    } else if let Some(prefix) = path.strip_prefix("/develop") {
        let prefix = prefix.to_string();
        let at = at_param(req).await;
        develop_route(&state, &prefix, &at)
    } else {
        (
            StatusCode::OK,
            format!("Configuration: {}", state.routes.render()),
        )
            .into_response()
    }
}

/// `/use<prefix>`: restore the backed-up target, if any. Reports the
/// table's value for the prefix after any restore.
fn use_route(state: &AdminState, prefix: &str) -> Response {
    match state.routes.restore(prefix) {
        Ok(outcome) => {
            if outcome.restored {
                tracing::info!(
                    prefix,
                    configuration = %state.routes.render(),
                    "configuration updated"
                );
            }
            (
                StatusCode::CREATED,
                format!("Using {prefix} from {}", outcome.target),
            )
                .into_response()
        }
        Err(err) => (StatusCode::BAD_REQUEST, err.to_string()).into_response(),
    }
}

/// `/develop<prefix>?at=<url>`: override the prefix's target, capturing the
/// pre-override target the first time. The `at` URL is validated before the
/// prefix is checked, so a malformed URL answers 400 even for unknown routes.
fn develop_route(state: &AdminState, prefix: &str, at: &str) -> Response {
    let target = match Url::parse(at) {
        Ok(target) => target,
        Err(err) => return (StatusCode::BAD_REQUEST, err.to_string()).into_response(),
    };

    match state.routes.develop(prefix, target.clone()) {
        Ok(()) => {
            tracing::info!(
                prefix,
                configuration = %state.routes.render(),
                "configuration updated"
            );
            (
                StatusCode::CREATED,
                format!("Developing {prefix} at {target}"),
            )
                .into_response()
        }
        Err(err) => (StatusCode::BAD_REQUEST, err.to_string()).into_response(),
    }
}

/// The `at` parameter: form or query. A urlencoded POST/PUT/PATCH body takes
/// precedence over the query string, then the query string; absent either
/// way, the empty string (which fails URL parsing downstream).
async fn at_param(req: Request<Body>) -> String {
    let query = req.uri().query().unwrap_or("").to_string();

    let body_value = if has_urlencoded_body(&req) {
        match axum::body::to_bytes(req.into_body(), FORM_BODY_LIMIT).await {
            Ok(bytes) => form_param(&bytes, "at"),
            Err(_) => None,
        }
    } else {
        None
    };

    body_value
        .or_else(|| form_param(query.as_bytes(), "at"))
        .unwrap_or_default()
}

fn has_urlencoded_body(req: &Request<Body>) -> bool {
    let method = req.method();
    let method_carries_body =
        method == Method::POST || method == Method::PUT || method == Method::PATCH;
    method_carries_body
        && req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"))
}

/// First occurrence of `name` in a urlencoded string.
fn form_param(encoded: &[u8], name: &str) -> Option<String> {
    url::form_urlencoded::parse(encoded)
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}
