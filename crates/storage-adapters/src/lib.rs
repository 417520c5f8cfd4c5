//! # storage-adapters
//!
//! Concrete implementations of the persistence and upload ports.
//!
//! - `memory`: process-local stores backed by `DashMap`, preserving
//!   insertion order for "storage order" queries.
//! - `media` (feature `media-local`): content-addressed image storage on the
//!   local filesystem.

#[cfg(feature = "media-local")]
pub mod media;
pub mod memory;

#[cfg(feature = "media-local")]
pub use media::LocalMediaStorage;
pub use memory::{InMemoryCommentRepository, InMemoryNotificationRepository, InMemoryUserRepository};
