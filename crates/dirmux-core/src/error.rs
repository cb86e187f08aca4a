//! Error types for Dirmux

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    // Configuration Errors
    #[error("No directory server is configured")]
    NoServersConfigured,

    #[error("Duplicate configuration prefix: {0}")]
    DuplicatePrefix(String),

    #[error("Unknown configuration prefix: {0}")]
    UnknownPrefix(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Local user store Errors
    #[error("Local user store error: {0}")]
    LocalStore(String),

    // Internal Errors
    #[error("Internal error: {0}")]
    InternalError(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
