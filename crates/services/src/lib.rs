//! cityboard/crates/services/src/lib.rs
//!
//! Application services: the comment interaction engine, the notification
//! service and the favorites & popularity engine. They depend on ports only;
//! concrete adapters are chosen by the binary.

pub mod comment;
pub mod favorites;
mod locks;
pub mod notification;

pub use comment::CommentService;
pub use favorites::FavoritesService;
pub use notification::NotificationService;
