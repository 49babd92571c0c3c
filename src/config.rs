use anyhow::Context;
use serde::Deserialize;

/// Google OAuth application credentials.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
}

/// Static credential pair guarding the admin surface.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub session_secret: String,
    /// Set the Secure attribute on cookies (APP_ENV=production).
    pub secure_cookies: bool,
    pub google: GoogleConfig,
    pub admin: AdminConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let session_secret =
            std::env::var("SESSION_SECRET").context("SESSION_SECRET must be set")?;
        let secure_cookies = std::env::var("APP_ENV")
            .map(|v| v == "production")
            .unwrap_or(false);
        let google = GoogleConfig {
            client_id: std::env::var("GOOGLE_CLIENT_ID").context("GOOGLE_CLIENT_ID must be set")?,
            client_secret: std::env::var("GOOGLE_CLIENT_SECRET")
                .context("GOOGLE_CLIENT_SECRET must be set")?,
            redirect_url: std::env::var("GOOGLE_REDIRECT_URL")
                .unwrap_or_else(|_| "http://localhost:8080/auth/google/callback".into()),
        };
        let admin = AdminConfig {
            username: std::env::var("ADMIN_USERNAME").context("ADMIN_USERNAME must be set")?,
            password: std::env::var("ADMIN_PASSWORD").context("ADMIN_PASSWORD must be set")?,
        };
        Ok(Self {
            database_url,
            session_secret,
            secure_cookies,
            google,
            admin,
        })
    }
}
