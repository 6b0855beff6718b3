//! Proxy-side HTTP server.
//!
//! # Responsibilities
//! - Build the axum app: catch-all route → director → round trip
//! - Wire middleware (request timeout, tracing, request IDs)
//! - Serve plain (tests, non-TLS deployments) or behind rustls

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, Response, StatusCode};
use axum::routing::any;
use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use tokio::sync::broadcast;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::http::round_trip::{log_exchange, round_trip, synthesize, ProxyClient};
use crate::http::Director;
use crate::observability::metrics;

/// State injected into the proxy handler.
#[derive(Clone)]
pub struct AppState {
    pub director: Arc<Director>,
    pub client: ProxyClient,
}

/// The proxied-traffic server.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(director: Director, request_timeout: Duration) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        let state = AppState {
            director: Arc::new(director),
            client,
        };

        let router = Router::new()
            .route("/", any(proxy_handler))
            .route("/{*path}", any(proxy_handler))
            .with_state(state)
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TimeoutLayer::new(request_timeout))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

        Self { router }
    }

    /// Serve plain HTTP on an already-bound listener until shutdown fires.
    pub async fn run(
        self,
        listener: tokio::net::TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> std::io::Result<()> {
        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await
    }

    /// Serve HTTPS on an already-bound listener. The caller keeps the handle
    /// to trigger graceful shutdown with a grace period.
    pub async fn run_tls(
        self,
        listener: std::net::TcpListener,
        tls: RustlsConfig,
        handle: axum_server::Handle,
    ) -> std::io::Result<()> {
        listener.set_nonblocking(true)?;
        axum_server::from_tcp_rustls(listener, tls)
            .handle(handle)
            .serve(self.router.into_make_service())
            .await
    }
}

/// One proxied exchange: direct, execute, record. A rewrite failure is
/// absorbed as a synthesized 502, like any transport failure; nothing here
/// terminates the process or another in-flight request.
async fn proxy_handler(State(state): State<AppState>, req: Request<Body>) -> Response<Body> {
    let start = Instant::now();
    let method = req.method().clone();
    let original_uri = req.uri().to_string();

    let response = match state.director.direct(req) {
        Ok(directive) => round_trip(&state.client, directive).await,
        Err(err) => {
            log_exchange(&method, &original_uri, StatusCode::BAD_GATEWAY, &err.to_string());
            synthesize(StatusCode::BAD_GATEWAY, format!("502 Proxy error {err}"))
        }
    };

    metrics::record_request(method.as_str(), response.status().as_u16(), start);
    response
}
