//! Response DTOs for the Web API.

use serde::Serialize;
use utoipa::ToSchema;

use crate::db::User;
use crate::file::{CascadeSummary, FileMetadata, Folder};

// ============================================================================
// Generic Response Wrappers
// ============================================================================

/// Generic API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a new API response.
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Plain message response.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    /// Human-readable message.
    pub message: String,
}

impl MessageResponse {
    /// Create a new message response.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ============================================================================
// Auth Responses
// ============================================================================

/// Login response.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    /// Access token (JWT).
    pub token: String,
    /// Token expiry in seconds.
    pub expires_in: u64,
    /// User information.
    pub user: UserInfo,
}

/// User information in responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserInfo {
    /// User ID.
    pub id: i64,
    /// Email address.
    pub email: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
        }
    }
}

// ============================================================================
// Folder Responses
// ============================================================================

/// Folder information in responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct FolderResponse {
    /// Folder ID.
    pub id: i64,
    /// Folder name.
    pub name: String,
    /// Parent folder ID (None for root-level folders).
    pub parent_id: Option<i64>,
    /// Creation timestamp.
    pub created_at: String,
}

impl From<&Folder> for FolderResponse {
    fn from(folder: &Folder) -> Self {
        Self {
            id: folder.id,
            name: folder.name.clone(),
            parent_id: folder.parent_id,
            created_at: folder.created_at.clone(),
        }
    }
}

/// Detailed folder information including its direct file count.
#[derive(Debug, Serialize, ToSchema)]
pub struct FolderDetailResponse {
    /// Folder ID.
    pub id: i64,
    /// Folder name.
    pub name: String,
    /// Parent folder ID (None for root-level folders).
    pub parent_id: Option<i64>,
    /// Number of files directly inside the folder.
    pub file_count: i64,
    /// Creation timestamp.
    pub created_at: String,
}

/// Result of a recursive folder deletion.
#[derive(Debug, Serialize, ToSchema)]
pub struct CascadeResponse {
    /// Number of folders removed.
    pub folders_removed: u64,
    /// Number of files removed.
    pub files_removed: u64,
}

impl From<CascadeSummary> for CascadeResponse {
    fn from(summary: CascadeSummary) -> Self {
        Self {
            folders_removed: summary.folders_removed,
            files_removed: summary.files_removed,
        }
    }
}

// ============================================================================
// File Responses
// ============================================================================

/// File information in responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct FileResponse {
    /// File ID.
    pub id: i64,
    /// Original filename.
    pub name: String,
    /// File size in bytes.
    pub size: i64,
    /// MIME content type.
    pub content_type: String,
    /// Folder ID (None for root-level files).
    pub folder_id: Option<i64>,
    /// Upload timestamp.
    pub created_at: String,
}

impl From<&FileMetadata> for FileResponse {
    fn from(file: &FileMetadata) -> Self {
        Self {
            id: file.id,
            name: file.name.clone(),
            size: file.size,
            content_type: file.content_type.clone(),
            folder_id: file.folder_id,
            created_at: file.created_at.clone(),
        }
    }
}
