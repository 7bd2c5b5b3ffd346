use chrono::Utc;
use sqlx::sqlite::SqliteRow;

use shedquote_core::domain::user::{User, UserId, UserProfile};

use super::{decode_timestamp, RepositoryError, UserRepository};
use crate::DbPool;

/// Login-time profile upserts from the auth integration. Quoting logic never
/// touches this table.
pub struct SqlUserRepository {
    pool: DbPool,
}

impl SqlUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl UserRepository for SqlUserRepository {
    async fn upsert(&self, profile: UserProfile) -> Result<User, RepositoryError> {
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO users (id, email, first_name, last_name, profile_image_url, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                email = excluded.email,
                first_name = excluded.first_name,
                last_name = excluded.last_name,
                profile_image_url = excluded.profile_image_url,
                updated_at = excluded.updated_at",
        )
        .bind(&profile.id.0)
        .bind(&profile.email)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(&profile.profile_image_url)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        self.find_by_id(&profile.id).await?.ok_or_else(|| {
            RepositoryError::Decode(format!("user `{}` missing after upsert", profile.id))
        })
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, email, first_name, last_name, profile_image_url, created_at, updated_at
             FROM users WHERE id = ?",
        )
        .bind(&id.0)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| decode_user(&row)).transpose()
    }
}

fn decode_user(row: &SqliteRow) -> Result<User, RepositoryError> {
    use sqlx::Row;

    Ok(User {
        id: UserId(row.try_get("id")?),
        email: row.try_get("email")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        profile_image_url: row.try_get("profile_image_url")?,
        created_at: decode_timestamp(row, "created_at")?,
        updated_at: decode_timestamp(row, "updated_at")?,
    })
}
