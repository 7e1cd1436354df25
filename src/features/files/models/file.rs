use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for file records. One row per upload; a duplicate row
/// shares the original's storage_path and owns no bytes of its own.
#[derive(Debug, Clone, FromRow)]
pub struct FileRecord {
    pub id: Uuid,
    pub storage_path: String,
    pub original_filename: String,
    pub file_type: String,
    pub size: i64,
    pub uploaded_at: DateTime<Utc>,
    pub content_hash: Option<String>,
    pub is_duplicate: bool,
    pub duplicate_of: Option<Uuid>,
}

/// Insert payload for a file record; id and uploaded_at are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewFileRecord {
    pub storage_path: String,
    pub original_filename: String,
    pub file_type: String,
    pub size: i64,
    pub content_hash: Option<String>,
    pub is_duplicate: bool,
    pub duplicate_of: Option<Uuid>,
}
