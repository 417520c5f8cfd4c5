//! cityboard/crates/domains/src/lib.rs
//!
//! The entities, validation rules and port definitions shared by every
//! cityboard crate. Nothing in here performs I/O.

pub mod errors;
pub mod models;
pub mod ports;

// Re-exporting for easier access in other crates
pub use errors::*;
pub use models::*;
pub use ports::*;
