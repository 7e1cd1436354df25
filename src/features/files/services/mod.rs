mod file_service;
mod hasher;

pub use file_service::{FileService, UploadedFile};
pub use hasher::ContentHasher;
