//! Validation utilities for Web API DTOs.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::file::MAX_NAME_LENGTH;
use crate::web::error::ApiError;

/// A JSON extractor that validates the request body.
///
/// This extractor deserializes the request body as JSON and then validates it
/// using the `validator` crate. If validation fails, it returns a detailed
/// error response with field-level error information.
///
/// # Example
///
/// ```ignore
/// use stratus::web::dto::ValidatedJson;
///
/// async fn create_folder(
///     ValidatedJson(payload): ValidatedJson<CreateFolderRequest>,
/// ) -> Result<Json<FolderResponse>, ApiError> {
///     // payload is already validated
///     // ...
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        // First, extract the JSON body
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ApiError::bad_request(format!("Invalid JSON: {}", e)))?;

        // Then, validate the deserialized value
        value.validate().map_err(ApiError::from_validation_errors)?;

        Ok(ValidatedJson(value))
    }
}

// ============================================================================
// Custom Validators
// ============================================================================

/// Validate that a string is not empty after trimming whitespace.
pub fn not_empty_trimmed(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("not_empty_trimmed")
            .with_message("Must not be empty".into()));
    }
    Ok(())
}

/// Validate a file or folder name for API use.
///
/// Names must be non-empty after trimming, at most [`MAX_NAME_LENGTH`]
/// characters, and free of control characters, including tabs and
/// newlines. Path separators are rejected so a display name can never
/// double as a filesystem path.
pub fn validate_name(value: &str) -> Result<(), String> {
    if not_empty_trimmed(value).is_err() {
        return Err("Name must not be empty".to_string());
    }
    if value.chars().count() > MAX_NAME_LENGTH {
        return Err(format!(
            "Name must be at most {} characters",
            MAX_NAME_LENGTH
        ));
    }
    if value.chars().any(|c| c.is_control()) {
        return Err("Name must not contain control characters".to_string());
    }
    if value.contains('/') || value.contains('\\') {
        return Err("Name must not contain path separators".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_empty_trimmed_valid() {
        assert!(not_empty_trimmed("Hello").is_ok());
        assert!(not_empty_trimmed("  Hello  ").is_ok());
    }

    #[test]
    fn test_not_empty_trimmed_invalid() {
        assert!(not_empty_trimmed("").is_err());
        assert!(not_empty_trimmed("   ").is_err());
        assert!(not_empty_trimmed("\t\n").is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("My Documents").is_ok());
        assert!(validate_name("photo (1).jpg").is_ok());

        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
        assert!(validate_name("bad\x00name").is_err());
        assert!(validate_name("path/name").is_err());
        assert!(validate_name("path\\name").is_err());
    }

    #[test]
    fn test_validate_name_rejects_whitespace_controls() {
        assert!(validate_name("two\nlines").is_err());
        assert!(validate_name("tab\tname").is_err());
        assert!(validate_name("return\rname").is_err());
    }

    #[test]
    fn test_validate_name_enforces_length_cap() {
        assert!(validate_name(&"a".repeat(MAX_NAME_LENGTH)).is_ok());
        assert!(validate_name(&"a".repeat(MAX_NAME_LENGTH + 1)).is_err());
        assert!(validate_name(&"a".repeat(10_200)).is_err());

        // The cap counts characters, not bytes
        assert!(validate_name(&"é".repeat(MAX_NAME_LENGTH)).is_ok());
    }
}
