//! Core domain layer. No external I/O dependencies.
//!
//! Entities and business rules live here. Dependencies flow inward.

pub mod entities;
pub mod errors;

pub use entities::{GalleryItem, Identity, Notification, PendingUpload, Severity};
pub use errors::{AuthError, GatewayError, RepositoryError, SessionError, UploadError};
