use axum::{
    extract::DefaultBodyLimit,
    routing::get,
    Router,
};
use std::sync::Arc;

use crate::features::files::handlers::{
    delete_file, download_file, get_file, get_stats, list_files, rename_file, upload_file,
};
use crate::features::files::services::FileService;

/// Create routes for the files feature
pub fn routes(file_service: Arc<FileService>, max_upload_size: usize) -> Router {
    Router::new()
        .route("/api/files", get(list_files).post(upload_file))
        .route("/api/files/stats", get(get_stats))
        .route(
            "/api/files/{id}",
            get(get_file).put(rename_file).delete(delete_file),
        )
        .route("/api/files/{id}/download", get(download_file))
        // Allow body size up to the configured limit + buffer for multipart overhead
        .layer(DefaultBodyLimit::max(max_upload_size + 1024 * 1024))
        .with_state(file_service)
}
