//! API handlers for the Stratus Web API.

pub mod auth;
pub mod file;
pub mod folder;

use std::sync::Arc;

use crate::config::Config;
use crate::db::Database;
use crate::file::BlobStore;

/// Shared application state for handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database handle.
    pub db: Arc<Database>,
    /// Blob store for file content.
    pub storage: BlobStore,
    /// JWT signing secret.
    pub jwt_secret: String,
    /// JWT lifetime in seconds.
    pub jwt_expiry_secs: u64,
    /// Activation token lifetime in seconds.
    pub activation_token_expiry_secs: u64,
    /// Password-reset token lifetime in seconds.
    pub reset_token_expiry_secs: u64,
    /// Maximum upload size in bytes.
    pub max_upload_size: u64,
    /// Public base URL, used when rendering account links.
    pub base_url: String,
}

impl AppState {
    /// Build the application state from configuration.
    pub fn new(db: Arc<Database>, storage: BlobStore, config: &Config) -> Self {
        Self {
            db,
            storage,
            jwt_secret: config.auth.jwt_secret.clone(),
            jwt_expiry_secs: config.auth.jwt_token_expiry_secs,
            activation_token_expiry_secs: config.auth.activation_token_expiry_secs,
            reset_token_expiry_secs: config.auth.reset_token_expiry_secs,
            max_upload_size: config.storage.max_upload_size_mb * 1024 * 1024,
            base_url: config.server.base_url.clone(),
        }
    }
}
