mod media_service;

pub use media_service::{FileBackedMediaService, MediaService};
