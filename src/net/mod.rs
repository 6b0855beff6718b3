//! Network layer: TLS material for the proxied listener.
//!
//! The listeners themselves are plain `TcpListener`s bound in `main` so that
//! bind failures are fatal at startup; this module only loads certificates.

pub mod tls;
