//! Domain service for accounts and credentials.
//!
//! Accounts are the owners the inventory is scoped by.

use serde::Serialize;
use thiserror::Error;

use crate::domain::OwnerId;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// User info DTO for responses.
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    pub id: OwnerId,
    pub username: String,
    pub created_at: String,
}

/// Login result containing the owner and their API key.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    pub id: OwnerId,
    pub username: String,
    pub api_key: String,
}

#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Creates an account and its default containers.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Conflict`] when the username is taken.
    async fn register(&self, username: &str, password: &str) -> Result<LoginResult, AuthError>;

    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if login fails.
    async fn login(&self, username: &str, password: &str) -> Result<LoginResult, AuthError>;

    /// Owner holding the API key, if any.
    async fn verify_api_key(&self, api_key: &str) -> Result<Option<OwnerId>, AuthError>;

    async fn get_user_info(&self, owner: OwnerId) -> Result<UserInfo, AuthError>;

    async fn regenerate_api_key(&self, owner: OwnerId) -> Result<String, AuthError>;
}
