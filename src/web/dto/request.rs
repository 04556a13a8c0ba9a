//! Request DTOs for the Web API.

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// User registration request.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// Email address.
    #[validate(email(message = "Must be a valid email address"))]
    pub email: String,
    /// Password (validated separately against the password policy).
    #[validate(length(min = 8, max = 128, message = "Must be 8-128 characters"))]
    pub password: String,
    /// First name.
    #[validate(length(min = 1, max = 100, message = "Must be 1-100 characters"))]
    pub first_name: String,
    /// Last name.
    #[validate(length(min = 1, max = 100, message = "Must be 1-100 characters"))]
    pub last_name: String,
}

/// Login request.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// Email address.
    #[validate(email(message = "Must be a valid email address"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Must not be empty"))]
    pub password: String,
}

/// Password reset initiation request.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ForgotPasswordRequest {
    /// Email address to send the reset link for.
    #[validate(email(message = "Must be a valid email address"))]
    pub email: String,
}

/// Password reset completion request.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ResetPasswordRequest {
    /// New password.
    #[validate(length(min = 8, max = 128, message = "Must be 8-128 characters"))]
    pub password: String,
}

/// Folder creation request.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateFolderRequest {
    /// Folder name.
    #[validate(length(min = 1, max = 255, message = "Must be 1-255 characters"))]
    pub name: String,
    /// Parent folder ID (omit for a root-level folder).
    #[serde(default)]
    pub parent_id: Option<i64>,
}

/// Query parameters for folder listing.
#[derive(Debug, Deserialize, IntoParams)]
pub struct FolderListQuery {
    /// Parent folder ID (omit to list root-level folders).
    #[serde(default)]
    pub parent_id: Option<i64>,
}

/// Query parameters for file listing.
#[derive(Debug, Deserialize, IntoParams)]
pub struct FileListQuery {
    /// Folder ID (omit to list root-level files).
    #[serde(default)]
    pub folder_id: Option<i64>,
}
