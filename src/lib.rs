//! Stratus - cloud file storage server
//!
//! A personal file storage backend: users register and verify their
//! email, then organize uploaded files in nested folders. File content
//! lives in a sharded on-disk blob store; folder and file metadata live
//! in SQLite.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod file;
pub mod logging;
pub mod web;

pub use auth::{hash_password, validate_password, verify_password, PasswordError};
pub use config::Config;
pub use db::{Database, NewUser, User, UserRepository, UserUpdate};
pub use error::{Result, StratusError};
pub use file::{BlobStore, Cascade, CascadeSummary, FileRepository, FolderRepository};
pub use web::WebServer;
