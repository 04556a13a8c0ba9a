//! File metadata types and repository.
//!
//! A file row pairs a display name with the blob key under which its
//! bytes live in the [`BlobStore`](super::BlobStore). Like folders,
//! every query is scoped by owner.

use sqlx::{QueryBuilder, Sqlite};

use crate::db::DbPool;
use crate::{Result, StratusError};

const FILE_COLUMNS: &str =
    "id, name, blob_key, size, content_type, owner_id, folder_id, created_at";

/// Metadata for a stored file.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FileMetadata {
    /// Unique file ID.
    pub id: i64,
    /// Original filename (display name).
    pub name: String,
    /// Key of the blob in the object store.
    pub blob_key: String,
    /// File size in bytes.
    pub size: i64,
    /// MIME content type.
    pub content_type: String,
    /// Owning user ID.
    pub owner_id: i64,
    /// Folder ID (None for files at the root of the user's space).
    pub folder_id: Option<i64>,
    /// When the file was uploaded.
    pub created_at: String,
}

/// Data for creating a new file entry.
#[derive(Debug, Clone)]
pub struct NewFile {
    /// Original filename (display name).
    pub name: String,
    /// Key of the blob in the object store.
    pub blob_key: String,
    /// File size in bytes.
    pub size: i64,
    /// MIME content type.
    pub content_type: String,
    /// Owning user ID.
    pub owner_id: i64,
    /// Folder ID (None for files at the root of the user's space).
    pub folder_id: Option<i64>,
}

impl NewFile {
    /// Create a new root-level NewFile.
    pub fn new(
        name: impl Into<String>,
        blob_key: impl Into<String>,
        size: i64,
        content_type: impl Into<String>,
        owner_id: i64,
    ) -> Self {
        Self {
            name: name.into(),
            blob_key: blob_key.into(),
            size,
            content_type: content_type.into(),
            owner_id,
            folder_id: None,
        }
    }

    /// Place the file inside a folder.
    pub fn in_folder(mut self, folder_id: i64) -> Self {
        self.folder_id = Some(folder_id);
        self
    }
}

/// Repository for file metadata operations.
pub struct FileRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> FileRepository<'a> {
    /// Create a new FileRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new file entry.
    pub async fn create(&self, file: &NewFile) -> Result<FileMetadata> {
        let result = sqlx::query(
            "INSERT INTO files (name, blob_key, size, content_type, owner_id, folder_id)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&file.name)
        .bind(&file.blob_key)
        .bind(file.size)
        .bind(&file.content_type)
        .bind(file.owner_id)
        .bind(file.folder_id)
        .execute(self.pool)
        .await
        .map_err(|e| StratusError::Database(e.to_string()))?;

        let id = result.last_insert_rowid();
        self.get_by_id(id, file.owner_id)
            .await?
            .ok_or_else(|| StratusError::NotFound("file".to_string()))
    }

    /// Get a file by ID, scoped to its owner.
    pub async fn get_by_id(&self, id: i64, owner_id: i64) -> Result<Option<FileMetadata>> {
        let file = sqlx::query_as::<_, FileMetadata>(&format!(
            "SELECT {FILE_COLUMNS} FROM files WHERE id = ? AND owner_id = ?"
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| StratusError::Database(e.to_string()))?;

        Ok(file)
    }

    /// List files at one level of a user's space.
    ///
    /// `folder_id = None` lists root-level files with an explicit
    /// `folder_id IS NULL` filter.
    pub async fn list(&self, owner_id: i64, folder_id: Option<i64>) -> Result<Vec<FileMetadata>> {
        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {FILE_COLUMNS} FROM files WHERE owner_id = "));
        query.push_bind(owner_id);

        match folder_id {
            Some(folder) => {
                query.push(" AND folder_id = ");
                query.push_bind(folder);
            }
            None => {
                query.push(" AND folder_id IS NULL");
            }
        }
        query.push(" ORDER BY name, id");

        let files = query
            .build_query_as::<FileMetadata>()
            .fetch_all(self.pool)
            .await
            .map_err(|e| StratusError::Database(e.to_string()))?;

        Ok(files)
    }

    /// List all files directly inside a folder, scoped to the owner.
    pub async fn list_by_folder(&self, owner_id: i64, folder_id: i64) -> Result<Vec<FileMetadata>> {
        let files = sqlx::query_as::<_, FileMetadata>(&format!(
            "SELECT {FILE_COLUMNS} FROM files WHERE owner_id = ? AND folder_id = ? ORDER BY id"
        ))
        .bind(owner_id)
        .bind(folder_id)
        .fetch_all(self.pool)
        .await
        .map_err(|e| StratusError::Database(e.to_string()))?;

        Ok(files)
    }

    /// Delete a file record, scoped to its owner.
    ///
    /// Returns true if a row was deleted, false if it was already gone
    /// or belongs to a different user.
    pub async fn delete(&self, id: i64, owner_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM files WHERE id = ? AND owner_id = ?")
            .bind(id)
            .bind(owner_id)
            .execute(self.pool)
            .await
            .map_err(|e| StratusError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}
