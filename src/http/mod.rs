//! HTTP proxying subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → director.rs (route lookup, rewrite toward the target, or NoRoute)
//!     → round_trip.rs (execute against the backend; synthesize 404/502)
//!     → response back to the caller
//! ```
//!
//! The proxy never fails an exchange: every request produces some response,
//! and every outcome is logged with method, URL, and status.

pub mod director;
pub mod round_trip;
pub mod server;

pub use director::{DirectError, Directive, Director};
pub use server::HttpServer;
