use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::core::error::AppError;
use crate::features::files::dtos::{
    DeleteFileResponseDto, FileQueryParams, FileResponseDto, RenameFileDto, StorageStatsDto,
    UploadFileDto,
};
use crate::features::files::services::{FileService, UploadedFile};
use crate::shared::types::{ApiResponse, Meta};

/// Upload a file
///
/// Accepts multipart/form-data with a single `file` field. Content already
/// stored under another record is linked, not written again.
#[utoipa::path(
    post,
    path = "/api/files",
    tag = "files",
    request_body(
        content = UploadFileDto,
        content_type = "multipart/form-data",
        description = "File upload form",
    ),
    responses(
        (status = 201, description = "Record created", body = ApiResponse<FileResponseDto>),
        (status = 400, description = "No file provided"),
        (status = 413, description = "File too large")
    )
)]
pub async fn upload_file(
    State(service): State<Arc<FileService>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<FileResponseDto>>), AppError> {
    let mut upload: Option<UploadedFile> = None;

    // Process multipart fields
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "file" => {
                let file_type = field.content_type().map(|s| s.to_string()).unwrap_or_default();

                let original_filename = field
                    .file_name()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "unnamed".to_string());

                let data = field.bytes().await.map_err(|e| {
                    debug!("Failed to read file bytes: {}", e);
                    AppError::BadRequest(format!("Failed to read file data: {}", e))
                })?;

                upload = Some(UploadedFile {
                    data: data.to_vec(),
                    original_filename,
                    file_type,
                });
            }
            _ => {
                // Ignore unknown fields
                debug!("Ignoring unknown field: {}", field_name);
            }
        }
    }

    let upload = upload.ok_or_else(|| AppError::Validation("No file provided".to_string()))?;

    let response = service.ingest(upload).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(response), None, None)),
    ))
}

/// List file records
///
/// Filters combine with AND; malformed size/date bounds are ignored rather
/// than rejected. Results are ordered by upload time, newest first.
#[utoipa::path(
    get,
    path = "/api/files",
    tag = "files",
    params(FileQueryParams),
    responses(
        (status = 200, description = "Matching records", body = ApiResponse<Vec<FileResponseDto>>),
    )
)]
pub async fn list_files(
    State(service): State<Arc<FileService>>,
    Query(params): Query<FileQueryParams>,
) -> Result<Json<ApiResponse<Vec<FileResponseDto>>>, AppError> {
    let files = service.list(params).await?;
    let total = files.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(files),
        None,
        Some(Meta { total }),
    )))
}

/// Storage savings stats
#[utoipa::path(
    get,
    path = "/api/files/stats",
    tag = "files",
    responses(
        (status = 200, description = "Aggregate stats", body = ApiResponse<StorageStatsDto>),
    )
)]
pub async fn get_stats(
    State(service): State<Arc<FileService>>,
) -> Result<Json<ApiResponse<StorageStatsDto>>, AppError> {
    let stats = service.stats().await?;
    Ok(Json(ApiResponse::success(Some(stats), None, None)))
}

/// Get a file record by ID
#[utoipa::path(
    get,
    path = "/api/files/{id}",
    tag = "files",
    params(
        ("id" = Uuid, Path, description = "File record ID")
    ),
    responses(
        (status = 200, description = "Record found", body = ApiResponse<FileResponseDto>),
        (status = 404, description = "Record not found")
    )
)]
pub async fn get_file(
    State(service): State<Arc<FileService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<FileResponseDto>>, AppError> {
    let file = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(file), None, None)))
}

/// Download the stored payload
///
/// Duplicates serve the same bytes as their original.
#[utoipa::path(
    get,
    path = "/api/files/{id}/download",
    tag = "files",
    params(
        ("id" = Uuid, Path, description = "File record ID")
    ),
    responses(
        (status = 200, description = "Raw payload bytes"),
        (status = 404, description = "Record not found")
    )
)]
pub async fn download_file(
    State(service): State<Arc<FileService>>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let (record, data) = service.download(id).await?;

    let content_type = if record.file_type.is_empty() {
        "application/octet-stream".to_string()
    } else {
        record.file_type
    };
    let disposition = format!(
        "attachment; filename=\"{}\"",
        record.original_filename.replace('"', "")
    );

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        data,
    )
        .into_response())
}

/// Rename a file record
#[utoipa::path(
    put,
    path = "/api/files/{id}",
    tag = "files",
    request_body = RenameFileDto,
    params(
        ("id" = Uuid, Path, description = "File record ID")
    ),
    responses(
        (status = 200, description = "Record updated", body = ApiResponse<FileResponseDto>),
        (status = 400, description = "Empty filename"),
        (status = 404, description = "Record not found")
    )
)]
pub async fn rename_file(
    State(service): State<Arc<FileService>>,
    Path(id): Path<Uuid>,
    Json(dto): Json<RenameFileDto>,
) -> Result<Json<ApiResponse<FileResponseDto>>, AppError> {
    let file = service.rename(id, &dto.original_filename).await?;
    Ok(Json(ApiResponse::success(Some(file), None, None)))
}

/// Delete a file record
///
/// Removes the record only; the stored payload is left in place because
/// duplicates may still reference it.
#[utoipa::path(
    delete,
    path = "/api/files/{id}",
    tag = "files",
    params(
        ("id" = Uuid, Path, description = "File record ID")
    ),
    responses(
        (status = 200, description = "Record deleted", body = ApiResponse<DeleteFileResponseDto>),
        (status = 404, description = "Record not found")
    )
)]
pub async fn delete_file(
    State(service): State<Arc<FileService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<DeleteFileResponseDto>>, AppError> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        Some(DeleteFileResponseDto { deleted: true }),
        Some("File deleted successfully".to_string()),
        None,
    )))
}
