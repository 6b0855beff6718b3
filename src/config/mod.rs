//! Route configuration loading.
//!
//! The config file is line-oriented:
//!
//! ```text
//! # comment
//! /api    http://localhost:3000/base
//! /       https://prod.example.net
//! ```
//!
//! File order fixes the table's match order.

pub mod loader;

pub use loader::{load_routes, ConfigError};
