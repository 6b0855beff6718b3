//! devproxy: a development-time reverse proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────┐
//!                         │                  DEVPROXY                    │
//!   Client (https) ───────┼─▶ http::server ─▶ http::director ──┐         │
//!                         │                       │            ▼         │
//!                         │                routing::RouteTable │         │
//!                         │                       ▲            │         │
//!   Operator (http) ──────┼─▶ admin ─────────────-┘   http::round_trip ──┼──▶ Backend
//!                         │        │                          │         │
//!                         │   routing::OverrideStore          ▼         │
//!   Client response ◀─────┼───────────────────── pass-through / 404/502 │
//!                         └──────────────────────────────────────────────┘
//! ```
//!
//! The route table is the single synchronization point between proxied
//! traffic (reads) and the admin surface (writes). Lookups read copy-on-write
//! snapshots; admin mutations serialize on a writer mutex so the override
//! capture/restore protocol stays consistent under concurrency.

// Core subsystems
pub mod admin;
pub mod config;
pub mod http;
pub mod routing;

// Cross-cutting concerns
pub mod lifecycle;
pub mod net;
pub mod observability;

pub use http::{Director, HttpServer};
pub use lifecycle::Shutdown;
pub use routing::Routes;
