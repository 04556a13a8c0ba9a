//! Recursive folder deletion for the Stratus hierarchy.
//!
//! Deleting a folder removes its entire subtree: every descendant
//! folder, every file inside them, and every backing blob. The walk is
//! driven by owner-scoped queries at every step, so a subtree can never
//! cross into another user's space, and children are removed before
//! their parents so a crash mid-way leaves only deeper, still
//! reachable-by-retry remnants behind.

use std::collections::HashSet;

use tracing::{debug, warn};

use super::folder::FolderRepository;
use super::metadata::FileRepository;
use super::storage::BlobStore;
use crate::db::DbPool;
use crate::{Result, StratusError};

/// Outcome of a recursive folder deletion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeSummary {
    /// Number of folder records removed.
    pub folders_removed: u64,
    /// Number of file records removed.
    pub files_removed: u64,
}

/// Recursive deletion engine for folders and files.
///
/// Holds no state between calls; all decisions are made against the
/// current database content, which keeps the operation idempotent
/// under retry.
pub struct Cascade<'a> {
    pool: &'a DbPool,
    store: &'a BlobStore,
}

impl<'a> Cascade<'a> {
    /// Create a new Cascade over the given pool and blob store.
    pub fn new(pool: &'a DbPool, store: &'a BlobStore) -> Self {
        Self { pool, store }
    }

    /// Delete a folder and its entire subtree.
    ///
    /// The subtree is first collected without mutating anything. If the
    /// walk revisits a folder, the parent chain is corrupt (a cycle);
    /// the operation fails before touching a single row or blob.
    /// Deletion then proceeds bottom-up, and within each folder the
    /// blob is removed before its metadata row, so the database never
    /// claims a file whose content is already gone.
    ///
    /// Returns `NotFound` if the folder does not exist or belongs to a
    /// different user, which also makes a retried delete land harmlessly.
    pub async fn delete_folder(&self, folder_id: i64, owner_id: i64) -> Result<CascadeSummary> {
        let folders = FolderRepository::new(self.pool);
        let files = FileRepository::new(self.pool);

        folders
            .get_by_id(folder_id, owner_id)
            .await?
            .ok_or_else(|| StratusError::NotFound("folder".to_string()))?;

        // Collection phase: walk the subtree without mutating anything.
        // `ordered` ends up in pre-order, every parent before its
        // descendants.
        let mut ordered = Vec::new();
        let mut visited = HashSet::new();
        let mut stack = vec![folder_id];

        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                return Err(StratusError::InvariantViolation(format!(
                    "folder {id} reachable twice during subtree walk"
                )));
            }
            ordered.push(id);
            for child in folders.list_children(owner_id, id).await? {
                stack.push(child.id);
            }
        }

        debug!(
            folder_id,
            subtree_size = ordered.len(),
            "collected folder subtree for deletion"
        );

        // Deletion phase: reversed pre-order removes every folder after
        // all of its descendants.
        let mut summary = CascadeSummary::default();
        for &id in ordered.iter().rev() {
            for file in files.list_by_folder(owner_id, id).await? {
                if !self.store.delete(&file.blob_key)? {
                    warn!(file_id = file.id, blob_key = %file.blob_key, "blob already absent");
                }
                if files.delete(file.id, owner_id).await? {
                    summary.files_removed += 1;
                }
            }
            if folders.delete(id, owner_id).await? {
                summary.folders_removed += 1;
            }
        }

        debug!(
            folder_id,
            folders_removed = summary.folders_removed,
            files_removed = summary.files_removed,
            "folder subtree deleted"
        );

        Ok(summary)
    }

    /// Delete a single file: blob first, then the metadata row.
    ///
    /// Returns `NotFound` if the file does not exist or belongs to a
    /// different user.
    pub async fn delete_file(&self, file_id: i64, owner_id: i64) -> Result<()> {
        let files = FileRepository::new(self.pool);

        let file = files
            .get_by_id(file_id, owner_id)
            .await?
            .ok_or_else(|| StratusError::NotFound("file".to_string()))?;

        if !self.store.delete(&file.blob_key)? {
            warn!(file_id, blob_key = %file.blob_key, "blob already absent");
        }
        files.delete(file.id, owner_id).await?;

        Ok(())
    }
}
