use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// A row in the `users` table.
///
/// `password_hash` is NULL for accounts created through Google sign-in;
/// `google_id` is NULL for accounts created with email + password. Email
/// uniqueness is enforced by a unique index, not checked in application code.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub google_id: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl User {
    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, google_id, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, google_id, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_google_id(db: &PgPool, google_id: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, google_id, created_at
            FROM users
            WHERE google_id = $1
            "#,
        )
        .bind(google_id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn list_all(db: &PgPool) -> anyhow::Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, google_id, created_at
            FROM users
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(users)
    }

    /// Create a user with a hashed password. A duplicate email surfaces as a
    /// unique-violation error from the database.
    pub async fn create(
        db: &PgPool,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, password_hash, google_id, created_at
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    /// Create a user from a Google profile. No password is stored.
    pub async fn create_from_google(
        db: &PgPool,
        google_id: &str,
        name: &str,
        email: &str,
    ) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, google_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, password_hash, google_id, created_at
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(google_id)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    /// Partial update: absent fields keep their current value. Returns None
    /// when no such user exists.
    pub async fn update(
        db: &PgPool,
        id: Uuid,
        name: Option<&str>,
        email: Option<&str>,
        password_hash: Option<&str>,
    ) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                password_hash = COALESCE($4, password_hash)
            WHERE id = $1
            RETURNING id, name, email, password_hash, google_id, created_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Delete by id. Returns false when no row was removed.
    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
