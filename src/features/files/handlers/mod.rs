mod file_handler;

// Glob re-export keeps the utoipa-generated path items visible to ApiDoc
pub use file_handler::*;
