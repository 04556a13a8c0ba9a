//! Database schema and migrations for Stratus.
//!
//! This module contains all database migrations that will be applied
//! sequentially when the database is first opened or upgraded.

/// Database migrations.
///
/// Each migration is a SQL script that will be executed in order.
/// The schema_version table tracks which migrations have been applied.
pub const MIGRATIONS: &[&str] = &[
    // v1: Initial schema - users table
    r#"
-- Users table for account management
CREATE TABLE users (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    email       TEXT NOT NULL UNIQUE COLLATE NOCASE,
    password    TEXT NOT NULL,           -- Argon2 hash
    first_name  TEXT NOT NULL,
    last_name   TEXT NOT NULL,
    is_active   INTEGER NOT NULL DEFAULT 0,  -- 0 until the account is verified
    created_at  TEXT NOT NULL DEFAULT (datetime('now')),
    last_login  TEXT
);

CREATE INDEX idx_users_email ON users(email);
"#,
    // v2: Folders table for the nested hierarchy
    r#"
-- Folders table. parent_id is NULL for root-level folders.
-- parent_id deliberately has no cascading delete: subtree removal is
-- done by the application so blobs are deleted before their metadata.
CREATE TABLE folders (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    owner_id    INTEGER NOT NULL REFERENCES users(id),
    parent_id   INTEGER REFERENCES folders(id),
    created_at  TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_folders_owner_id ON folders(owner_id);
CREATE INDEX idx_folders_parent_id ON folders(parent_id);
"#,
    // v3: Files table for blob metadata
    r#"
-- File metadata. blob_key references the object in the blob store and
-- is unique: no two records ever share a stored object.
CREATE TABLE files (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    name          TEXT NOT NULL,
    blob_key      TEXT NOT NULL UNIQUE,
    size          INTEGER NOT NULL,
    content_type  TEXT NOT NULL,
    owner_id      INTEGER NOT NULL REFERENCES users(id),
    folder_id     INTEGER REFERENCES folders(id),  -- NULL for root-level files
    created_at    TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_files_owner_id ON files(owner_id);
CREATE INDEX idx_files_folder_id ON files(folder_id);
"#,
    // v4: Account tokens for activation and password reset
    r#"
-- Single-use account tokens (activation, password reset)
CREATE TABLE account_tokens (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id     INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    token       TEXT NOT NULL UNIQUE,
    purpose     TEXT NOT NULL,  -- 'activation' or 'password_reset'
    expires_at  TEXT NOT NULL,
    created_at  TEXT NOT NULL DEFAULT (datetime('now')),
    used_at     TEXT
);

CREATE INDEX idx_account_tokens_token ON account_tokens(token);
CREATE INDEX idx_account_tokens_user_id ON account_tokens(user_id);
"#,
];
