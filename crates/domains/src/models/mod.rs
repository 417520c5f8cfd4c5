//! # Domain Models
//!
//! These structs represent the core entities of cityboard. Identities are
//! opaque strings generated from UUID v4 at creation time.

pub mod comment;
pub mod media;
pub mod notification;
pub mod popularity;
pub mod user;

pub use comment::*;
pub use media::*;
pub use notification::*;
pub use popularity::*;
pub use user::*;

use crate::errors::{DomainError, DomainResult};

/// Rejects empty or whitespace-only values for a named field.
pub fn require_non_blank(field: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} must not be blank")));
    }
    Ok(())
}

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
