use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::features::files::models::FileRecord;

/// Upload file request DTO for OpenAPI documentation
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler uses axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadFileDto {
    /// The file to upload
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
}

/// Response DTO for file records
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FileResponseDto {
    /// Unique identifier for the record
    pub id: Uuid,
    /// URL of the stored payload (shared with the original for duplicates)
    pub file: String,
    /// Original filename as uploaded
    pub original_filename: String,
    /// Client-supplied content type (may be empty)
    pub file_type: String,
    /// Size of the file in bytes
    pub size: i64,
    /// Timestamp when the record was created
    pub uploaded_at: DateTime<Utc>,
    /// SHA-256 hex digest of the content
    pub content_hash: Option<String>,
    /// True iff these bytes were already stored under another record
    pub is_duplicate: bool,
    /// Id of the original record sharing this content, when is_duplicate
    pub duplicate_of: Option<Uuid>,
}

impl FileResponseDto {
    pub fn from_record(record: FileRecord, file_url: String) -> Self {
        Self {
            id: record.id,
            file: file_url,
            original_filename: record.original_filename,
            file_type: record.file_type,
            size: record.size,
            uploaded_at: record.uploaded_at,
            content_hash: record.content_hash,
            is_duplicate: record.is_duplicate,
            duplicate_of: record.duplicate_of,
        }
    }
}

/// Query params for listing files. Numeric and date bounds arrive as raw
/// strings: a malformed value drops that one filter instead of failing the
/// request.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct FileQueryParams {
    /// Case-insensitive substring match on original_filename
    pub search: Option<String>,
    /// Case-insensitive substring match on file_type
    pub file_type: Option<String>,
    /// Inclusive lower bound on size in bytes
    pub size_min: Option<String>,
    /// Inclusive upper bound on size in bytes
    pub size_max: Option<String>,
    /// Inclusive lower bound on upload date (YYYY-MM-DD)
    pub date_from: Option<String>,
    /// Inclusive upper bound on upload date (YYYY-MM-DD)
    pub date_to: Option<String>,
}

/// Typed filter applied by the record store. All fields optional, ANDed.
#[derive(Debug, Clone, Default)]
pub struct FileFilter {
    pub search: Option<String>,
    pub file_type: Option<String>,
    pub size_min: Option<i64>,
    pub size_max: Option<i64>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl FileFilter {
    /// Lenient conversion from raw query params. Unparseable numeric or
    /// date values are ignored, matching the recover-by-skipping contract.
    pub fn from_query(params: FileQueryParams) -> Self {
        Self {
            search: params.search.filter(|s| !s.is_empty()),
            file_type: params.file_type.filter(|s| !s.is_empty()),
            size_min: params
                .size_min
                .as_deref()
                .and_then(|raw| parse_size("size_min", raw)),
            size_max: params
                .size_max
                .as_deref()
                .and_then(|raw| parse_size("size_max", raw)),
            date_from: params
                .date_from
                .as_deref()
                .and_then(|raw| parse_date("date_from", raw)),
            date_to: params
                .date_to
                .as_deref()
                .and_then(|raw| parse_date("date_to", raw)),
        }
    }
}

fn parse_size(field: &str, raw: &str) -> Option<i64> {
    match raw.parse::<i64>() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::debug!("Ignoring malformed {} filter: {:?}", field, raw);
            None
        }
    }
}

fn parse_date(field: &str, raw: &str) -> Option<NaiveDate> {
    match raw.parse::<NaiveDate>() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::debug!("Ignoring malformed {} filter: {:?}", field, raw);
            None
        }
    }
}

/// Request DTO for renaming a file record
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RenameFileDto {
    /// New value for original_filename
    pub original_filename: String,
}

/// Storage savings stats over the whole record store
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StorageStatsDto {
    /// Count of all records
    pub total_files: i64,
    /// Count of non-duplicate records
    pub unique_files: i64,
    /// Count of duplicate records
    pub duplicates: i64,
    /// Sum of size over all records (what users believe is stored)
    pub storage_logical_bytes: i64,
    /// Sum of size over non-duplicate records (bytes actually in the bucket)
    pub storage_physical_bytes: i64,
    /// storage_logical_bytes - storage_physical_bytes
    pub savings_bytes: i64,
}

/// Response DTO for delete operations
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteFileResponseDto {
    /// Confirmation that the record was deleted
    pub deleted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(size_min: Option<&str>, date_from: Option<&str>) -> FileQueryParams {
        FileQueryParams {
            size_min: size_min.map(String::from),
            date_from: date_from.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn parses_well_formed_bounds() {
        let filter = FileFilter::from_query(params(Some("100"), Some("2026-01-15")));
        assert_eq!(filter.size_min, Some(100));
        assert_eq!(
            filter.date_from,
            Some(NaiveDate::from_ymd_opt(2026, 1, 15).unwrap())
        );
    }

    #[test]
    fn malformed_size_is_ignored_not_fatal() {
        let filter = FileFilter::from_query(params(Some("abc"), None));
        assert_eq!(filter.size_min, None);
    }

    #[test]
    fn malformed_date_is_ignored_not_fatal() {
        let filter = FileFilter::from_query(params(None, Some("15/01/2026")));
        assert_eq!(filter.date_from, None);
    }

    #[test]
    fn empty_search_is_dropped() {
        let query = FileQueryParams {
            search: Some(String::new()),
            ..Default::default()
        };
        assert!(FileFilter::from_query(query).search.is_none());
    }
}
