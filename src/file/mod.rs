//! File and folder management for Stratus.
//!
//! This module provides:
//! - Hierarchical, owner-scoped folder structure
//! - File metadata management
//! - Blob storage with UUID naming
//! - Recursive subtree deletion

mod cascade;
mod folder;
mod metadata;
mod storage;

pub use cascade::{Cascade, CascadeSummary};
pub use folder::{Folder, FolderRepository, NewFolder};
pub use metadata::{FileMetadata, FileRepository, NewFile};
pub use storage::BlobStore;

/// Maximum length for file and folder names (in characters).
pub const MAX_NAME_LENGTH: usize = 255;
