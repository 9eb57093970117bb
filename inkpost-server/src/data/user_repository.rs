use crate::domain::error::DomainError;
use crate::domain::user::User;
use crate::presentation::dto::UpdateProfileRequest;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: User) -> Result<User, DomainError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;
    async fn update_profile(
        &self,
        id: Uuid,
        update: UpdateProfileRequest,
    ) -> Result<Option<User>, DomainError>;
}

#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const USER_COLUMNS: &str = "id, username, email, password_hash, first_name, last_name, created_at";

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: User) -> Result<User, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to create user: {}", e);
            match e.as_database_error().and_then(|db| db.constraint()) {
                Some(c) if c.contains("users_email") => {
                    DomainError::UserAlreadyExists("email already registered".to_string())
                }
                Some(c) if c.contains("users_username") => {
                    DomainError::UserAlreadyExists("username already taken".to_string())
                }
                _ => DomainError::Internal(format!("database error: {}", e)),
            }
        })?;

        info!(user_id = %user.id, username = %user.username, "user created");
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to find user by email {}: {}", email, e);
            DomainError::Internal(format!("database error: {}", e))
        })
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE username = $1",
            USER_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to find user by username {}: {}", username, e);
            DomainError::Internal(format!("database error: {}", e))
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("failed to find user by id {}: {}", id, e);
                DomainError::Internal(format!("database error: {}", e))
            })
    }

    async fn update_profile(
        &self,
        id: Uuid,
        update: UpdateProfileRequest,
    ) -> Result<Option<User>, DomainError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET
                email = COALESCE($1, email),
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name)
            WHERE id = $4
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(update.email.map(|e| e.to_lowercase()))
        .bind(update.first_name)
        .bind(update.last_name)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to update profile {}: {}", id, e);
            DomainError::Internal(e.to_string())
        })?;

        if user.is_some() {
            info!(user_id = %id, "profile updated");
        }
        Ok(user)
    }
}
