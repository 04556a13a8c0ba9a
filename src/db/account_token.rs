//! Account token repository for activation and password-reset links.
//!
//! Account tokens are single-use tokens sent to a user out-of-band. They
//! are consumed atomically so a token can never be redeemed twice, even
//! under concurrent requests.

use super::DbPool;
use crate::Result;

#[cfg(feature = "sqlite")]
const SQL_NOW: &str = "datetime('now')";
#[cfg(feature = "postgres")]
const SQL_NOW: &str = "TO_CHAR(NOW(), 'YYYY-MM-DD HH24:MI:SS')";

/// Token purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenPurpose {
    /// Account activation after registration.
    Activation,
    /// Password reset.
    PasswordReset,
}

impl TokenPurpose {
    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenPurpose::Activation => "activation",
            TokenPurpose::PasswordReset => "password_reset",
        }
    }

    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "activation" => Some(TokenPurpose::Activation),
            "password_reset" => Some(TokenPurpose::PasswordReset),
            _ => None,
        }
    }
}

/// Account token entity.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AccountToken {
    /// Token ID.
    pub id: i64,
    /// User ID.
    pub user_id: i64,
    /// Token string.
    pub token: String,
    /// Token purpose.
    pub purpose: String,
    /// Expiration timestamp.
    pub expires_at: String,
    /// Creation timestamp.
    pub created_at: String,
    /// Used timestamp (None if not used).
    pub used_at: Option<String>,
}

impl AccountToken {
    /// Get the token purpose as enum.
    pub fn purpose(&self) -> Option<TokenPurpose> {
        TokenPurpose::from_str(&self.purpose)
    }

    /// Check if the token has been used.
    pub fn is_used(&self) -> bool {
        self.used_at.is_some()
    }
}

/// New account token for creation.
pub struct NewAccountToken {
    /// User ID.
    pub user_id: i64,
    /// Token string.
    pub token: String,
    /// Token purpose.
    pub purpose: TokenPurpose,
    /// Expiration timestamp.
    pub expires_at: String,
}

/// Repository for account token operations.
pub struct AccountTokenRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> AccountTokenRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new account token.
    pub async fn create(&self, new_token: &NewAccountToken) -> Result<AccountToken> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO account_tokens (user_id, token, purpose, expires_at)
             VALUES (?, ?, ?, ?) RETURNING id",
        )
        .bind(new_token.user_id)
        .bind(&new_token.token)
        .bind(new_token.purpose.as_str())
        .bind(&new_token.expires_at)
        .fetch_one(self.pool)
        .await
        .map_err(|e| crate::StratusError::Database(e.to_string()))?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| crate::StratusError::NotFound("account token".into()))
    }

    /// Get an account token by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<AccountToken>> {
        let token = sqlx::query_as::<_, AccountToken>(
            "SELECT id, user_id, token, purpose, expires_at, created_at, used_at
             FROM account_tokens WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| crate::StratusError::Database(e.to_string()))?;

        Ok(token)
    }

    /// Get a valid (not expired, not used) token and mark it as used atomically.
    ///
    /// Returns the token if it was valid and successfully marked as used.
    /// This ensures the token can only be redeemed once even with
    /// concurrent requests.
    pub async fn consume(
        &self,
        token: &str,
        purpose: TokenPurpose,
    ) -> Result<Option<AccountToken>> {
        // UPDATE ... RETURNING atomically marks the token as used
        let sql = format!(
            "UPDATE account_tokens
             SET used_at = {SQL_NOW}
             WHERE token = ?
               AND purpose = ?
               AND used_at IS NULL
               AND expires_at > {SQL_NOW}
             RETURNING id, user_id, token, purpose, expires_at, created_at, used_at"
        );

        let result = sqlx::query_as::<_, AccountToken>(&sql)
            .bind(token)
            .bind(purpose.as_str())
            .fetch_optional(self.pool)
            .await
            .map_err(|e| crate::StratusError::Database(e.to_string()))?;

        Ok(result)
    }

    /// Delete expired and used tokens (cleanup).
    pub async fn cleanup(&self) -> Result<u64> {
        let sql = format!(
            "DELETE FROM account_tokens WHERE expires_at < {SQL_NOW} OR used_at IS NOT NULL"
        );
        let result = sqlx::query(&sql)
            .execute(self.pool)
            .await
            .map_err(|e| crate::StratusError::Database(e.to_string()))?;

        Ok(result.rows_affected())
    }

    /// Delete all tokens for a user.
    pub async fn delete_all_for_user(&self, user_id: i64) -> Result<u64> {
        let result = sqlx::query("DELETE FROM account_tokens WHERE user_id = ?")
            .bind(user_id)
            .execute(self.pool)
            .await
            .map_err(|e| crate::StratusError::Database(e.to_string()))?;

        Ok(result.rows_affected())
    }
}
