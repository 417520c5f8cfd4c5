//! # DomainError
//!
//! Centralized error handling for the cityboard core.
//! Every service operation reports failures through this one type; the
//! boundary layer decides how each variant is surfaced.

use std::fmt::Display;

use thiserror::Error;

/// The primary error type for all service operations.
#[derive(Error, Debug)]
pub enum DomainError {
    /// A referenced comment, reply, user or group is absent.
    ///
    /// Also reported when a reply exists but belongs to someone else, so
    /// callers cannot probe for replies they do not own.
    #[error("{0}")]
    NotFound(String),

    /// Input rejected before anything was persisted (blank or oversized text).
    #[error("validation error: {0}")]
    Validation(String),

    /// The asset upload collaborator failed; nothing was persisted.
    #[error("upload failed: {0}")]
    Upstream(String),

    /// A store collaborator failed.
    #[error("storage error: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn not_found(entity: &str, key: impl Display) -> Self {
        Self::NotFound(format!("{entity} not found: {key}"))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Adapter for `map_err` on store calls.
    pub fn storage(err: anyhow::Error) -> Self {
        Self::Storage(format!("{err:#}"))
    }

    /// Adapter for `map_err` on upload calls.
    pub fn upstream(err: anyhow::Error) -> Self {
        Self::Upstream(format!("{err:#}"))
    }
}

/// A specialized Result type for cityboard logic.
pub type DomainResult<T> = std::result::Result<T, DomainError>;
