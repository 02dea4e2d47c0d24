//! `SeaORM` implementation of the `AuthService` trait.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::db::Store;
use crate::domain::{Clock, OwnerId};
use crate::services::auth_service::{AuthError, AuthService, LoginResult, UserInfo};

const MIN_PASSWORD_LEN: usize = 8;

pub struct SeaOrmAuthService {
    store: Store,
    clock: Arc<dyn Clock>,
}

impl SeaOrmAuthService {
    #[must_use]
    pub fn new(store: Store, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn register(&self, username: &str, password: &str) -> Result<LoginResult, AuthError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AuthError::Validation("Username cannot be empty".to_string()));
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(AuthError::Validation(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        if self.store.get_user_by_username(username).await?.is_some() {
            return Err(AuthError::Conflict(format!("User '{username}' already exists")));
        }

        let user = self.store.create_user(username, password).await?;

        let now = self.clock.now().to_rfc3339();
        let created = self.store.containers().ensure_defaults(user.id, &now).await?;
        info!(
            "Registered user '{}' with {} default containers",
            user.username,
            created.len()
        );

        Ok(LoginResult {
            id: user.id,
            username: user.username,
            api_key: user.api_key,
        })
    }

    async fn login(&self, username: &str, password: &str) -> Result<LoginResult, AuthError> {
        let user = self
            .store
            .verify_user_password(username, password)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        Ok(LoginResult {
            id: user.id,
            username: user.username,
            api_key: user.api_key,
        })
    }

    async fn verify_api_key(&self, api_key: &str) -> Result<Option<OwnerId>, AuthError> {
        let user = self.store.verify_api_key(api_key).await?;
        Ok(user.map(|u| u.id))
    }

    async fn get_user_info(&self, owner: OwnerId) -> Result<UserInfo, AuthError> {
        let user = self
            .store
            .users()
            .get_by_id(owner)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(UserInfo {
            id: user.id,
            username: user.username,
            created_at: user.created_at,
        })
    }

    async fn regenerate_api_key(&self, owner: OwnerId) -> Result<String, AuthError> {
        Ok(self.store.users().regenerate_api_key(owner).await?)
    }
}
