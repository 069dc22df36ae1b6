//! Error types for the enforcement layer.

use thiserror::Error;

/// Result type alias for enforcer operations.
pub type KudosResult<T> = Result<T, KudosError>;

/// Errors surfaced to whoever embeds the enforcer.
///
/// Per-event failures (provider queries, disconnects) never show up here; they
/// are contained where they happen and turned into denials or log lines.
#[derive(Error, Debug)]
pub enum KudosError {
    /// A required collaborator is missing. Fatal: the enforcer stays disabled.
    #[error("required dependency unavailable: {0}")]
    ConfigurationAbsent(String),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("failed to write default configuration: {0}")]
    ConfigWrite(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure answering a proficiency query.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The actor's profile has not been loaded by the provider yet.
    #[error("profile not loaded")]
    NotLoaded,

    #[error("query failed: {0}")]
    Query(String),
}
