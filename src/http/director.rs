//! Request director: turns an inbound request into a backend-addressed one.
//!
//! # Responsibilities
//! - Match the request path against the route table
//! - Inject x-forwarded-host / x-forwarded-proto / x-forwarded-port
//! - Swap scheme, authority, and Host header to the target's
//! - Rewrite path (strip the matched prefix once, prepend the target path)
//! - Merge the target's query with the request's
//!
//! # Design Decisions
//! - Two-valued result: a rewritten request or an explicit NoRoute marker,
//!   never a magic sentinel on the request itself
//! - Matching consults only the path; query and fragment are ignored
//! - forwarded-proto/port are fixed per proxy instance (the scheme and port
//!   this proxy terminates), not derived per request

use std::sync::Arc;

use axum::body::Body;
use axum::http::uri::{Authority, InvalidUri, InvalidUriParts, PathAndQuery, Scheme};
use axum::http::{header, HeaderValue, Method, Request, Uri};
use thiserror::Error;
use url::Url;

use crate::routing::Routes;

/// Rewrite failures. Targets are validated URLs, so these only fire on
/// pathological header or URI fragments; callers absorb them as a 502.
#[derive(Debug, Error)]
pub enum DirectError {
    #[error("invalid rewritten URI: {0}")]
    Uri(#[from] InvalidUri),

    #[error("invalid rewritten URI: {0}")]
    UriParts(#[from] InvalidUriParts),

    #[error("invalid forwarded header value: {0}")]
    Header(#[from] header::InvalidHeaderValue),
}

/// What to do with an inbound request.
#[derive(Debug)]
pub enum Directive {
    /// Rewritten and ready to execute against the backend.
    Forward(Request<Body>),
    /// No registered prefix matched the path.
    NoRoute { method: Method, path: String },
}

/// Per-instance rewrite engine. Shares the route table with the admin
/// surface; lookups read a consistent snapshot.
#[derive(Debug, Clone)]
pub struct Director {
    routes: Arc<Routes>,
    /// Scheme this proxy terminates, e.g. "https" for the TLS listener.
    forwarded_proto: String,
    /// Port this proxy listens on.
    forwarded_port: u16,
}

impl Director {
    pub fn new(routes: Arc<Routes>, forwarded_proto: impl Into<String>, forwarded_port: u16) -> Self {
        Self {
            routes,
            forwarded_proto: forwarded_proto.into(),
            forwarded_port,
        }
    }

    pub fn direct(&self, req: Request<Body>) -> Result<Directive, DirectError> {
        let path = req.uri().path().to_string();
        let Some(entry) = self.routes.lookup(&path) else {
            return Ok(Directive::NoRoute {
                method: req.method().clone(),
                path,
            });
        };

        let (mut parts, body) = req.into_parts();
        let authority = authority_of(&entry.target);

        // Forwarding headers carry the caller-facing host/scheme/port.
        if let Some(original_host) = parts.headers.get(header::HOST).cloned() {
            parts.headers.append("x-forwarded-host", original_host);
        }
        parts
            .headers
            .append("x-forwarded-proto", HeaderValue::from_str(&self.forwarded_proto)?);
        parts
            .headers
            .append("x-forwarded-port", HeaderValue::from(self.forwarded_port));
        parts
            .headers
            .insert(header::HOST, HeaderValue::from_str(&authority)?);

        // Strip the matched prefix once; later occurrences stay untouched.
        let suffix = path.replacen(&entry.prefix, "", 1);
        let base = match entry.target.path() {
            "/" => "",
            other => other,
        };
        let mut new_path = format!("{base}{suffix}");
        if new_path.is_empty() {
            new_path.push('/');
        }

        let query = merge_query(entry.target.query(), parts.uri.query());
        let path_and_query = if query.is_empty() {
            new_path
        } else {
            format!("{new_path}?{query}")
        };

        let mut uri_parts = parts.uri.clone().into_parts();
        uri_parts.scheme = Some(Scheme::try_from(entry.target.scheme())?);
        uri_parts.authority = Some(Authority::try_from(authority.as_str())?);
        uri_parts.path_and_query = Some(PathAndQuery::try_from(path_and_query.as_str())?);
        parts.uri = Uri::from_parts(uri_parts)?;

        Ok(Directive::Forward(Request::from_parts(parts, body)))
    }
}

/// `host[:port]` of a target URL.
fn authority_of(target: &Url) -> String {
    let host = target.host_str().unwrap_or("");
    match target.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    }
}

/// Concatenate the non-empty queries, joined with `&` when both are present.
/// Keys are not deduplicated.
fn merge_query(target: Option<&str>, request: Option<&str>) -> String {
    match (target.unwrap_or(""), request.unwrap_or("")) {
        ("", request) => request.to_string(),
        (target, "") => target.to_string(),
        (target, request) => format!("{target}&{request}"),
    }
}
