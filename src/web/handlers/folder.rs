//! Folder handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use utoipa;

use crate::file::{Cascade, FolderRepository, NewFolder};
use crate::web::dto::{
    validation::validate_name, ApiResponse, CascadeResponse, CreateFolderRequest,
    FolderDetailResponse, FolderListQuery, FolderResponse, ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::AuthUser;

/// POST /api/folders - Create a folder.
#[utoipa::path(
    post,
    path = "/folders",
    tag = "folders",
    request_body = CreateFolderRequest,
    responses(
        (status = 201, description = "Folder created", body = FolderResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Parent folder not found"),
        (status = 422, description = "Validation failed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_folder(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateFolderRequest>,
) -> Result<(StatusCode, Json<ApiResponse<FolderResponse>>), ApiError> {
    validate_name(&payload.name).map_err(ApiError::unprocessable)?;

    let folder_repo = FolderRepository::new(state.db.pool());

    let mut new_folder = NewFolder::new(payload.name.trim(), claims.sub);
    if let Some(parent_id) = payload.parent_id {
        // Parent must exist and belong to the caller
        folder_repo
            .get_by_id(parent_id, claims.sub)
            .await?
            .ok_or_else(|| ApiError::not_found("Parent folder not found"))?;
        new_folder = new_folder.with_parent(parent_id);
    }

    let folder = folder_repo.create(&new_folder).await?;

    tracing::info!(folder_id = folder.id, user_id = claims.sub, "folder created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(FolderResponse::from(&folder))),
    ))
}

/// GET /api/folders - List folders at one level.
#[utoipa::path(
    get,
    path = "/folders",
    tag = "folders",
    params(FolderListQuery),
    responses(
        (status = 200, description = "Folders at the requested level", body = Vec<FolderResponse>),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_folders(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Query(query): Query<FolderListQuery>,
) -> Result<Json<ApiResponse<Vec<FolderResponse>>>, ApiError> {
    let folder_repo = FolderRepository::new(state.db.pool());
    let folders = folder_repo.list(claims.sub, query.parent_id).await?;

    let responses: Vec<FolderResponse> = folders.iter().map(FolderResponse::from).collect();

    Ok(Json(ApiResponse::new(responses)))
}

/// GET /api/folders/:id - Folder details.
#[utoipa::path(
    get,
    path = "/folders/{id}",
    tag = "folders",
    params(
        ("id" = i64, Path, description = "Folder ID")
    ),
    responses(
        (status = 200, description = "Folder details", body = FolderDetailResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Folder not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_folder(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(folder_id): Path<i64>,
) -> Result<Json<ApiResponse<FolderDetailResponse>>, ApiError> {
    let folder_repo = FolderRepository::new(state.db.pool());

    let folder = folder_repo
        .get_by_id(folder_id, claims.sub)
        .await?
        .ok_or_else(|| ApiError::not_found("Folder not found"))?;

    let file_count = folder_repo.count_files(folder_id, claims.sub).await?;

    Ok(Json(ApiResponse::new(FolderDetailResponse {
        id: folder.id,
        name: folder.name,
        parent_id: folder.parent_id,
        file_count,
        created_at: folder.created_at,
    })))
}

/// DELETE /api/folders/:id - Delete a folder and its entire subtree.
#[utoipa::path(
    delete,
    path = "/folders/{id}",
    tag = "folders",
    params(
        ("id" = i64, Path, description = "Folder ID")
    ),
    responses(
        (status = 200, description = "Subtree deleted", body = CascadeResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Folder not found"),
        (status = 422, description = "Hierarchy is corrupt")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_folder(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(folder_id): Path<i64>,
) -> Result<Json<ApiResponse<CascadeResponse>>, ApiError> {
    let cascade = Cascade::new(state.db.pool(), &state.storage);
    let summary = cascade.delete_folder(folder_id, claims.sub).await?;

    tracing::info!(
        folder_id,
        user_id = claims.sub,
        folders_removed = summary.folders_removed,
        files_removed = summary.files_removed,
        "folder deleted"
    );

    Ok(Json(ApiResponse::new(CascadeResponse::from(summary))))
}
