//! Process entry point: flags, config, the two listeners, timed shutdown.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use devproxy::admin::{self, AdminState};
use devproxy::config;
use devproxy::http::Director;
use devproxy::lifecycle::{signals, Shutdown};
use devproxy::observability::{logging, metrics};
use devproxy::{net, HttpServer, Routes};

#[derive(Parser)]
#[command(name = "devproxy")]
#[command(about = "Development-time HTTPS reverse proxy with runtime route overrides")]
struct Args {
    /// Proxy listener port (https)
    #[arg(long, default_value_t = 443)]
    port: u16,

    /// Admin API port (http)
    #[arg(long, default_value_t = 8008)]
    api: u16,

    /// Route configuration file
    #[arg(long, default_value = "devproxy.conf")]
    config: PathBuf,

    /// TLS certificate (PEM)
    #[arg(long, default_value = "devproxy.crt")]
    cert: PathBuf,

    /// TLS private key (PEM)
    #[arg(long, default_value = "devproxy.key")]
    key: PathBuf,

    /// Per-request timeout in seconds, applied to both listeners
    #[arg(long, default_value_t = 5)]
    timeout_secs: u64,

    /// Grace period for in-flight requests on shutdown, in seconds
    #[arg(long, default_value_t = 3)]
    grace_secs: u64,

    /// Optional Prometheus exporter address (e.g. 127.0.0.1:9100)
    #[arg(long)]
    metrics: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();
    let args = Args::parse();

    // Configuration errors are fatal: the proxy never serves a partial table.
    let pairs = config::load_routes(&args.config)?;
    let routes = Arc::new(Routes::from_pairs(pairs));
    tracing::info!(configuration = %routes.render(), "routes loaded");

    if let Some(addr) = args.metrics {
        metrics::init_metrics(addr);
    }

    let timeout = Duration::from_secs(args.timeout_secs);
    let grace = Duration::from_secs(args.grace_secs);

    // Bind both listeners up front so failures halt startup.
    let tls = net::tls::load_tls_config(&args.cert, &args.key).await?;
    let proxy_listener = std::net::TcpListener::bind((Ipv4Addr::UNSPECIFIED, args.port))?;
    let admin_listener =
        tokio::net::TcpListener::bind((Ipv4Addr::UNSPECIFIED, args.api)).await?;

    let director = Director::new(routes.clone(), "https", args.port);
    let server = HttpServer::new(director, timeout);
    let admin_app = admin::router(AdminState { routes }, timeout);

    let shutdown = Shutdown::new();
    let proxy_handle = axum_server::Handle::new();

    let proxy_task = {
        let handle = proxy_handle.clone();
        tokio::spawn(async move {
            if let Err(err) = server.run_tls(proxy_listener, tls, handle).await {
                tracing::error!(error = %err, "proxy server failed");
            }
        })
    };
    let admin_task = {
        let mut rx = shutdown.subscribe();
        tokio::spawn(async move {
            let serve = axum::serve(admin_listener, admin_app)
                .with_graceful_shutdown(async move {
                    let _ = rx.recv().await;
                });
            if let Err(err) = serve.await {
                tracing::error!(error = %err, "admin server failed");
            }
        })
    };

    tracing::info!(
        proxy_port = args.port,
        api_port = args.api,
        "started proxy server (https) and admin API (http)"
    );

    signals::shutdown_requested().await;
    tracing::info!(grace_secs = args.grace_secs, "shutting down");

    proxy_handle.graceful_shutdown(Some(grace));
    shutdown.trigger();

    let drain = async {
        let _ = proxy_task.await;
        let _ = admin_task.await;
    };
    match tokio::time::timeout(grace + Duration::from_secs(2), drain).await {
        Ok(()) => tracing::info!("shutdown complete"),
        Err(_) => tracing::warn!("graceful shutdown timed out, exiting anyway"),
    }

    Ok(())
}
