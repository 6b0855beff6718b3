//! Lifecycle management.
//!
//! Startup order: config, routing state, listeners. Shutdown order: stop
//! accepting, give in-flight requests the grace period, exit regardless.
//! SIGINT/SIGTERM both trigger the same cooperative shutdown.

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
