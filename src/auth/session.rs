use sha2::{Digest, Sha512};
use sqlx::{FromRow, PgPool};
use time::{Duration, OffsetDateTime};
use tower_cookies::{
    cookie::SameSite,
    Cookie, Key,
};
use uuid::Uuid;

/// Name of the signed cookie carrying the session token.
pub const SESSION_COOKIE: &str = "vestibule_session";

/// Sessions live for 24 hours from creation, like the cookie itself.
pub const SESSION_TTL: Duration = Duration::hours(24);

/// Derive the cookie signing key from the configured session secret.
/// SHA-512 stretches a secret of any length to the 64 bytes the key needs.
pub fn signing_key(secret: &str) -> Key {
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(digest.as_slice())
}

/// Server-side session: an opaque token mapped to the user it belongs to.
/// The user record itself is never embedded; identity is re-resolved from
/// the users table on every request.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub token: String,
    pub user_id: Uuid,
    pub created_at: OffsetDateTime,
    pub expires_at: OffsetDateTime,
}

impl Session {
    /// Issue a new session for a user.
    pub async fn create(db: &PgPool, user_id: Uuid) -> anyhow::Result<Session> {
        let token = Uuid::new_v4().to_string();
        let expires_at = OffsetDateTime::now_utc() + SESSION_TTL;
        let session = sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (token, user_id, expires_at)
            VALUES ($1, $2, $3)
            RETURNING token, user_id, created_at, expires_at
            "#,
        )
        .bind(&token)
        .bind(user_id)
        .bind(expires_at)
        .fetch_one(db)
        .await?;
        Ok(session)
    }

    /// Look up a session that has not yet expired. Expired rows are treated
    /// as absent; the purge task removes them later.
    pub async fn find_live(db: &PgPool, token: &str) -> anyhow::Result<Option<Session>> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            SELECT token, user_id, created_at, expires_at
            FROM sessions
            WHERE token = $1 AND expires_at > now()
            "#,
        )
        .bind(token)
        .fetch_optional(db)
        .await?;
        Ok(session)
    }

    /// Destroy a session. Deleting a token that does not exist is not an error.
    pub async fn delete(db: &PgPool, token: &str) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(token)
            .execute(db)
            .await?;
        Ok(())
    }

    /// Remove every expired session row. Returns the number of rows removed.
    pub async fn purge_expired(db: &PgPool) -> anyhow::Result<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= now()")
            .execute(db)
            .await?;
        Ok(result.rows_affected())
    }
}

/// Build the session cookie for a freshly issued token.
pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, token);
    cookie.set_http_only(true);
    cookie.set_path("/");
    cookie.set_secure(secure);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_max_age(SESSION_TTL);
    cookie
}

/// Cookie used to clear the session on logout. Name and path must match the
/// cookie set at login for the browser to drop it.
pub fn clear_session_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, "");
    cookie.set_path("/");
    cookie
}
