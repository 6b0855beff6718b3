//! Round-trip adapter: executes a directive and always yields a response.
//!
//! No route → synthesized 404. Transport failure → synthesized 502 carrying
//! the error text. Success → the backend response, untouched. Every exchange
//! is logged with method, URL, status, and a message; statuses under 400 log
//! at `info`, the rest at `warn`.

use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;

use crate::http::Directive;

/// Outbound transport shared by every proxied request.
pub type ProxyClient = Client<HttpConnector, Body>;

pub async fn round_trip(client: &ProxyClient, directive: Directive) -> Response<Body> {
    match directive {
        Directive::NoRoute { method, path } => {
            log_exchange(&method, &path, StatusCode::NOT_FOUND, "404 Not found");
            synthesize(StatusCode::NOT_FOUND, format!("No route for {path}"))
        }
        Directive::Forward(req) => forward(client, req).await,
    }
}

async fn forward(client: &ProxyClient, req: Request<Body>) -> Response<Body> {
    let method = req.method().clone();
    let url = req.uri().to_string();

    match client.request(req).await {
        Ok(response) => {
            let status = response.status();
            log_exchange(&method, &url, status, &status_line(status));
            let (parts, body) = response.into_parts();
            Response::from_parts(parts, Body::new(body))
        }
        Err(err) => {
            let message = error_chain(&err);
            log_exchange(&method, &url, StatusCode::BAD_GATEWAY, &message);
            synthesize(StatusCode::BAD_GATEWAY, format!("502 Proxy error {message}"))
        }
    }
}

/// Plain-text response built by the proxy itself.
pub(crate) fn synthesize(status: StatusCode, body: String) -> Response<Body> {
    Response::builder()
        .status(status)
        .header("content-type", "text/plain; charset=utf-8")
        .body(Body::from(body))
        .expect("static response parts are valid")
}

pub(crate) fn log_exchange(method: &Method, url: &str, status: StatusCode, message: &str) {
    if status.as_u16() < 400 {
        tracing::info!(%method, url, status = status.as_u16(), "{message}");
    } else {
        tracing::warn!(%method, url, status = status.as_u16(), "{message}");
    }
}

fn status_line(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {reason}", status.as_u16()),
        None => status.as_u16().to_string(),
    }
}

/// Full cause chain, so a 502 body names the underlying failure
/// ("connection refused") and not just the client wrapper.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
