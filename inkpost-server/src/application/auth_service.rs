use std::sync::Arc;

use tracing::instrument;
use uuid::Uuid;

use crate::data::user_repository::UserRepository;
use crate::domain::{error::DomainError, user::User};
use crate::infrastructure::security::{JwtKeys, hash_password, verify_password};
use crate::presentation::dto::{LoginRequest, RegisterRequest, UpdateProfileRequest};

#[derive(Clone)]
pub struct AuthService<R: UserRepository + 'static> {
    repo: Arc<R>,
    keys: JwtKeys,
}

impl<R> AuthService<R>
where
    R: UserRepository + 'static,
{
    pub fn new(repo: Arc<R>, keys: JwtKeys) -> Self {
        Self { repo, keys }
    }

    pub fn keys(&self) -> &JwtKeys {
        &self.keys
    }

    pub async fn get_user(&self, id: Uuid) -> Result<User, DomainError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(id.to_string()))
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<User, DomainError> {
        self.repo
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(username.to_owned()))
    }

    #[instrument(skip(self, req))]
    pub async fn register(&self, req: &RegisterRequest) -> Result<User, DomainError> {
        if req.username.trim().is_empty() {
            return Err(DomainError::Validation("username must not be empty".into()));
        }
        if !req.email.contains('@') {
            return Err(DomainError::Validation("invalid email address".into()));
        }
        if req.password.is_empty() {
            return Err(DomainError::Validation("password must not be empty".into()));
        }

        let hash =
            hash_password(&req.password).map_err(|err| DomainError::Internal(err.to_string()))?;
        let user = User::new(req.username.clone(), req.email.to_lowercase(), hash);
        self.repo.create(user).await
    }

    #[instrument(skip(self, req))]
    pub async fn login(&self, req: &LoginRequest) -> Result<String, DomainError> {
        let user = self
            .repo
            .find_by_email(&req.email.to_lowercase())
            .await?
            .ok_or(DomainError::Unauthorized)?;

        let valid = verify_password(&req.password, &user.password_hash)
            .map_err(|_| DomainError::Unauthorized)?;
        if !valid {
            return Err(DomainError::Unauthorized);
        }

        self.keys
            .generate_token(user.id)
            .map_err(|err| DomainError::Internal(err.to_string()))
    }

    #[instrument(skip(self, update))]
    pub async fn update_profile(
        &self,
        id: Uuid,
        update: UpdateProfileRequest,
    ) -> Result<User, DomainError> {
        if update.email.as_deref().is_some_and(|e| !e.contains('@')) {
            return Err(DomainError::Validation("invalid email address".into()));
        }
        self.repo
            .update_profile(id, update)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(id.to_string()))
    }
}
