//! File handlers.

use axum::{
    body::Body,
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use std::sync::Arc;
use utoipa;

use crate::file::{Cascade, FileRepository, FolderRepository, NewFile};
use crate::web::dto::{
    validation::validate_name, ApiResponse, FileListQuery, FileResponse, MessageResponse,
};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::AuthUser;

/// Generate a safe Content-Disposition header value for file downloads.
///
/// This function sanitizes the filename to prevent header injection attacks
/// and uses RFC 5987 encoding for non-ASCII filenames.
///
/// # Security
///
/// The function:
/// - Removes control characters (including CR, LF which could cause header injection)
/// - Escapes double quotes and backslashes
/// - Uses RFC 5987 filename* parameter for proper Unicode support
fn content_disposition_header(filename: &str) -> String {
    // Sanitize filename for the basic filename parameter (ASCII fallback)
    let sanitized: String = filename
        .chars()
        .filter(|c| !c.is_control()) // Remove control characters (CR, LF, etc.)
        .map(|c| match c {
            '"' => '_',  // Replace double quotes
            '\\' => '_', // Replace backslashes
            _ => c,
        })
        .collect();

    // For ASCII-only filenames, use simple format
    if filename.is_ascii() && !filename.chars().any(|c| c.is_control() || c == '"' || c == '\\') {
        return format!("attachment; filename=\"{}\"", filename);
    }

    // Use RFC 5987 encoding for non-ASCII or special characters
    // filename* parameter with UTF-8 encoding
    let encoded = urlencoding::encode(filename);

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        sanitized, encoded
    )
}

/// POST /api/files - Upload a file.
///
/// Request body: multipart/form-data with a "file" field and an
/// optional "folder_id" field.
#[utoipa::path(
    post,
    path = "/files",
    tag = "files",
    responses(
        (status = 201, description = "File uploaded", body = FileResponse),
        (status = 400, description = "Invalid input or file too large"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Folder not found"),
        (status = 422, description = "Invalid filename")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<FileResponse>>), ApiError> {
    // Extract fields from multipart
    let mut filename: Option<String> = None;
    let mut content: Option<Vec<u8>> = None;
    let mut folder_id: Option<i64> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::error!("Failed to read multipart field: {}", e);
        ApiError::bad_request("Invalid multipart data")
    })? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                filename = field.file_name().map(|s| s.to_string());
                content = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| {
                            tracing::error!("Failed to read file content: {}", e);
                            ApiError::bad_request("Failed to read file")
                        })?
                        .to_vec(),
                );
            }
            "folder_id" => {
                let text = field.text().await.map_err(|e| {
                    tracing::error!("Failed to read folder_id: {}", e);
                    ApiError::bad_request("Invalid folder_id")
                })?;
                folder_id = Some(
                    text.parse()
                        .map_err(|_| ApiError::bad_request("folder_id must be an integer"))?,
                );
            }
            _ => {}
        }
    }

    let filename = filename.ok_or_else(|| ApiError::bad_request("No file provided"))?;
    let content = content.ok_or_else(|| ApiError::bad_request("No file content"))?;

    validate_name(&filename).map_err(ApiError::unprocessable)?;

    // Check file size
    if content.len() as u64 > state.max_upload_size {
        let max_mb = state.max_upload_size / 1024 / 1024;
        return Err(ApiError::bad_request(format!(
            "File too large (max {}MB)",
            max_mb
        )));
    }

    // The target folder must exist and belong to the caller
    if let Some(id) = folder_id {
        let folder_repo = FolderRepository::new(state.db.pool());
        folder_repo
            .get_by_id(id, claims.sub)
            .await?
            .ok_or_else(|| ApiError::not_found("Folder not found"))?;
    }

    // Blob first, metadata second. If the metadata insert fails the
    // blob is orphaned, not dangling, and gets cleaned up best-effort.
    let blob_key = state.storage.save(&filename, &content).map_err(|e| {
        tracing::error!("Failed to save blob: {}", e);
        ApiError::internal("Failed to save file")
    })?;

    let content_type = mime_guess::from_path(&filename)
        .first_or_octet_stream()
        .to_string();

    let file = {
        let file_repo = FileRepository::new(state.db.pool());

        let mut new_file = NewFile::new(
            &filename,
            &blob_key,
            content.len() as i64,
            &content_type,
            claims.sub,
        );
        if let Some(id) = folder_id {
            new_file = new_file.in_folder(id);
        }

        file_repo.create(&new_file).await.map_err(|e| {
            tracing::error!("Failed to create file metadata: {}", e);
            // Try to clean up the stored blob
            let _ = state.storage.delete(&blob_key);
            ApiError::internal("Failed to create file")
        })?
    };

    tracing::info!(
        file_id = file.id,
        user_id = claims.sub,
        size = file.size,
        "file uploaded"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(FileResponse::from(&file))),
    ))
}

/// GET /api/files - List files at one level.
#[utoipa::path(
    get,
    path = "/files",
    tag = "files",
    params(FileListQuery),
    responses(
        (status = 200, description = "Files at the requested level", body = Vec<FileResponse>),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_files(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Query(query): Query<FileListQuery>,
) -> Result<Json<ApiResponse<Vec<FileResponse>>>, ApiError> {
    let file_repo = FileRepository::new(state.db.pool());
    let files = file_repo.list(claims.sub, query.folder_id).await?;

    let responses: Vec<FileResponse> = files.iter().map(FileResponse::from).collect();

    Ok(Json(ApiResponse::new(responses)))
}

/// GET /api/files/:id - File metadata.
#[utoipa::path(
    get,
    path = "/files/{id}",
    tag = "files",
    params(
        ("id" = i64, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "File metadata", body = FileResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "File not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_file(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(file_id): Path<i64>,
) -> Result<Json<ApiResponse<FileResponse>>, ApiError> {
    let file_repo = FileRepository::new(state.db.pool());

    let file = file_repo
        .get_by_id(file_id, claims.sub)
        .await?
        .ok_or_else(|| ApiError::not_found("File not found"))?;

    Ok(Json(ApiResponse::new(FileResponse::from(&file))))
}

/// GET /api/files/:id/download - Download file content.
#[utoipa::path(
    get,
    path = "/files/{id}/download",
    tag = "files",
    params(
        ("id" = i64, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "File content", content_type = "application/octet-stream"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "File not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn download_file(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(file_id): Path<i64>,
) -> Result<Response<Body>, ApiError> {
    let file_repo = FileRepository::new(state.db.pool());

    let file = file_repo
        .get_by_id(file_id, claims.sub)
        .await?
        .ok_or_else(|| ApiError::not_found("File not found"))?;

    // Metadata whose blob has vanished is treated as missing
    let content = state.storage.load(&file.blob_key).map_err(|e| {
        tracing::warn!(file_id, blob_key = %file.blob_key, "blob missing: {}", e);
        ApiError::not_found("File not found")
    })?;

    let response = Response::builder()
        .header(header::CONTENT_TYPE, file.content_type)
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition_header(&file.name),
        )
        .header(header::CONTENT_LENGTH, content.len())
        .body(Body::from(content))
        .map_err(|e| {
            tracing::error!("Failed to build response: {}", e);
            ApiError::internal("Failed to build response")
        })?;

    Ok(response)
}

/// DELETE /api/files/:id - Delete a file.
#[utoipa::path(
    delete,
    path = "/files/{id}",
    tag = "files",
    params(
        ("id" = i64, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "File deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "File not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(file_id): Path<i64>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let cascade = Cascade::new(state.db.pool(), &state.storage);
    cascade.delete_file(file_id, claims.sub).await?;

    tracing::info!(file_id, user_id = claims.sub, "file deleted");

    Ok(Json(ApiResponse::new(MessageResponse::new("File deleted"))))
}
