//! User profile lookups for email personalization.

use sqlx::PgPool;

use crate::error::{AppError, Result};

/// The slice of the user row email dispatch needs.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserProfile {
    pub id: i64,
    pub name: String,
    pub email: String,
}

#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_by_email(&self, email: &str) -> Result<UserProfile> {
        let profile = sqlx::query_as::<_, UserProfile>(
            r#"
            SELECT id, name, email FROM users WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        profile.ok_or_else(|| AppError::NotFound(format!("no user with email {}", email)))
    }
}
