//! Folder types and repository for the Stratus hierarchy.
//!
//! Every query is scoped by owner: a folder id is only meaningful in
//! combination with the user it belongs to, so one user's requests can
//! never see or touch another user's tree.

use sqlx::{QueryBuilder, Sqlite};

use crate::db::DbPool;
use crate::{Result, StratusError};

/// A folder in a user's hierarchy.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Folder {
    /// Unique folder ID.
    pub id: i64,
    /// Folder name.
    pub name: String,
    /// Owning user ID.
    pub owner_id: i64,
    /// Parent folder ID (None for root-level folders).
    pub parent_id: Option<i64>,
    /// When the folder was created.
    pub created_at: String,
}

/// Data for creating a new folder.
#[derive(Debug, Clone)]
pub struct NewFolder {
    /// Folder name.
    pub name: String,
    /// Owning user ID.
    pub owner_id: i64,
    /// Parent folder ID (None for root-level folders).
    pub parent_id: Option<i64>,
}

impl NewFolder {
    /// Create a new root-level NewFolder.
    pub fn new(name: impl Into<String>, owner_id: i64) -> Self {
        Self {
            name: name.into(),
            owner_id,
            parent_id: None,
        }
    }

    /// Set the parent folder.
    pub fn with_parent(mut self, parent_id: i64) -> Self {
        self.parent_id = Some(parent_id);
        self
    }
}

/// Repository for folder operations.
pub struct FolderRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> FolderRepository<'a> {
    /// Create a new FolderRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new folder.
    pub async fn create(&self, folder: &NewFolder) -> Result<Folder> {
        let result = sqlx::query(
            "INSERT INTO folders (name, owner_id, parent_id) VALUES (?, ?, ?)",
        )
        .bind(&folder.name)
        .bind(folder.owner_id)
        .bind(folder.parent_id)
        .execute(self.pool)
        .await
        .map_err(|e| StratusError::Database(e.to_string()))?;

        let id = result.last_insert_rowid();
        self.get_by_id(id, folder.owner_id)
            .await?
            .ok_or_else(|| StratusError::NotFound("folder".to_string()))
    }

    /// Get a folder by ID, scoped to its owner.
    ///
    /// Returns None both when the folder does not exist and when it
    /// belongs to a different user.
    pub async fn get_by_id(&self, id: i64, owner_id: i64) -> Result<Option<Folder>> {
        let folder = sqlx::query_as::<_, Folder>(
            "SELECT id, name, owner_id, parent_id, created_at
             FROM folders WHERE id = ? AND owner_id = ?",
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| StratusError::Database(e.to_string()))?;

        Ok(folder)
    }

    /// List folders at one level of a user's hierarchy.
    ///
    /// `parent_id = None` lists root-level folders with an explicit
    /// `parent_id IS NULL` filter, so nested folders never leak into a
    /// root listing.
    pub async fn list(&self, owner_id: i64, parent_id: Option<i64>) -> Result<Vec<Folder>> {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT id, name, owner_id, parent_id, created_at FROM folders WHERE owner_id = ",
        );
        query.push_bind(owner_id);

        match parent_id {
            Some(parent) => {
                query.push(" AND parent_id = ");
                query.push_bind(parent);
            }
            None => {
                query.push(" AND parent_id IS NULL");
            }
        }
        query.push(" ORDER BY name, id");

        let folders = query
            .build_query_as::<Folder>()
            .fetch_all(self.pool)
            .await
            .map_err(|e| StratusError::Database(e.to_string()))?;

        Ok(folders)
    }

    /// List direct child folders of a parent, scoped to the owner.
    pub async fn list_children(&self, owner_id: i64, parent_id: i64) -> Result<Vec<Folder>> {
        let folders = sqlx::query_as::<_, Folder>(
            "SELECT id, name, owner_id, parent_id, created_at
             FROM folders WHERE owner_id = ? AND parent_id = ? ORDER BY id",
        )
        .bind(owner_id)
        .bind(parent_id)
        .fetch_all(self.pool)
        .await
        .map_err(|e| StratusError::Database(e.to_string()))?;

        Ok(folders)
    }

    /// Delete a folder record, scoped to its owner.
    ///
    /// Returns true if a row was deleted, false if it was already gone
    /// or belongs to a different user.
    pub async fn delete(&self, id: i64, owner_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM folders WHERE id = ? AND owner_id = ?")
            .bind(id)
            .bind(owner_id)
            .execute(self.pool)
            .await
            .map_err(|e| StratusError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    /// Count files directly inside a folder, scoped to the owner.
    pub async fn count_files(&self, id: i64, owner_id: i64) -> Result<i64> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM files WHERE folder_id = ? AND owner_id = ?")
                .bind(id)
                .bind(owner_id)
                .fetch_one(self.pool)
                .await
                .map_err(|e| StratusError::Database(e.to_string()))?;

        Ok(count.0)
    }
}
