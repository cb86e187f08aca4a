//! Dirmux Core Library
//!
//! Core types, configuration, and errors for the dirmux directory
//! proxy.

pub mod config;
pub mod error;
pub mod types;

pub use config::ProxyConfig;
pub use error::{Error, Result};

/// Dirmux version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default affinity cache TTL (30 days)
pub const DEFAULT_CACHE_TTL_SECONDS: u64 = 2_592_000;

/// Default backend connection timeout
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
