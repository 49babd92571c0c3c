use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use base64ct::{Base64, Encoding};
use tower_cookies::Cookies;
use tracing::warn;

use crate::{
    auth::session::{Session, SESSION_COOKIE},
    config::AdminConfig,
    error::ApiError,
    state::AppState,
    users::repo::User,
};

/// Resolves the requester's identity from the session cookie.
///
/// The cookie holds an opaque token; the token maps to a session row; the
/// session row holds only the user id, and the user record is fetched fresh
/// from the store on every request. A deleted user or an expired session
/// both reject with 401.
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let cookies = Cookies::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::Unauthorized("Not authenticated"))?;

        let token = cookies
            .signed(&state.cookie_key)
            .get(SESSION_COOKIE)
            .map(|c| c.value().to_string())
            .ok_or(ApiError::Unauthorized("Not authenticated"))?;

        let session = Session::find_live(&state.db, &token)
            .await?
            .ok_or(ApiError::Unauthorized("Not authenticated"))?;

        let user = User::find_by_id(&state.db, session.user_id)
            .await?
            .ok_or_else(|| {
                warn!(user_id = %session.user_id, "session points at a missing user");
                ApiError::Unauthorized("Not authenticated")
            })?;

        Ok(CurrentUser(user))
    }
}

/// Admin gate: one shared Basic credential for the whole admin surface,
/// checked against the environment-configured pair. No session, no per-user
/// identity.
pub struct AdminBasic;

#[async_trait]
impl FromRequestParts<AppState> for AdminBasic {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthorized("Unauthorized"))?;

        if !basic_credentials_match(header, &state.config.admin) {
            warn!("admin basic auth rejected");
            return Err(ApiError::Unauthorized("Unauthorized"));
        }

        Ok(AdminBasic)
    }
}

/// Check an `Authorization: Basic <base64>` header against the configured
/// admin username/password pair.
fn basic_credentials_match(header: &str, admin: &AdminConfig) -> bool {
    let encoded = match header.strip_prefix("Basic ") {
        Some(rest) => rest,
        None => return false,
    };
    let decoded = match Base64::decode_vec(encoded.trim()) {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };
    let decoded = match String::from_utf8(decoded) {
        Ok(s) => s,
        Err(_) => return false,
    };
    match decoded.split_once(':') {
        Some((user, pass)) => user == admin.username && pass == admin.password,
        None => false,
    }
}
