//! Shared utilities for integration testing.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use devproxy::http::Director;
use devproxy::{HttpServer, Routes, Shutdown};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Start a backend on an ephemeral port that echoes the request line and the
/// proxy-relevant headers back in the body, prefixed with `tag`. The body
/// looks like:
///
/// ```text
/// tag GET /base/foo?b=2
/// host: backend:3000
/// x-forwarded-proto: https
/// ```
pub async fn start_echo_backend(tag: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                let mut buf = vec![0u8; 8192];
                let mut head = String::new();
                // Read until the end of the header block.
                loop {
                    let Ok(n) = socket.read(&mut buf).await else {
                        return;
                    };
                    if n == 0 {
                        break;
                    }
                    head.push_str(&String::from_utf8_lossy(&buf[..n]));
                    if head.contains("\r\n\r\n") {
                        break;
                    }
                }

                let mut lines = head.lines();
                let request_line = lines.next().unwrap_or_default();
                // "GET /path HTTP/1.1" -> "GET /path"
                let method_and_path = request_line
                    .rsplit_once(' ')
                    .map(|(front, _)| front)
                    .unwrap_or(request_line);

                let mut body = format!("{tag} {method_and_path}\n");
                for line in lines {
                    let lowered = line.to_lowercase();
                    if lowered.starts_with("host:") || lowered.starts_with("x-forwarded-") {
                        body.push_str(&lowered);
                        body.push('\n');
                    }
                }

                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// Spawn the proxy (plain HTTP, for tests) over the given routes, returning
/// its address. The server runs until the test process exits.
pub async fn start_proxy(routes: Arc<Routes>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let director = Director::new(routes, "https", addr.port());
    let server = HttpServer::new(director, Duration::from_secs(5));
    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    // Leak the coordinator so the receiver never observes a close.
    std::mem::forget(shutdown);

    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    addr
}

/// Serve the admin API (plain HTTP) over the given routes on an ephemeral
/// port.
pub async fn start_admin(routes: Arc<Routes>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let app = devproxy::admin::router(
        devproxy::admin::AdminState { routes },
        Duration::from_secs(5),
    );
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    addr
}

/// Plain client that never reuses pooled connections between tests.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
