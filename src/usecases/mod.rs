//! Application use cases. Orchestrate domain logic via ports.

pub mod gallery_repository;
pub mod notification_bus;
pub mod session_store;
pub mod upload_pipeline;

pub use gallery_repository::GalleryRepository;
pub use notification_bus::NotificationBus;
pub use session_store::SessionStore;
pub use upload_pipeline::{UploadPipeline, UploadStage};
