use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tower_cookies::Cookies;
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, MessageResponse, PublicUser},
        password::verify_password,
        session::{clear_session_cookie, session_cookie, Session, SESSION_COOKIE},
    },
    error::ApiError,
    state::AppState,
    users::repo::User,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", get(logout))
}

#[instrument(skip(state, cookies, payload))]
async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let (email, password) = match (payload.email, payload.password) {
        (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
            (email, password)
        }
        _ => return Err(ApiError::Validation("Email and password are required")),
    };

    let email = email.trim().to_lowercase();

    let user = match User::find_by_email(&state.db, &email).await? {
        Some(user) => user,
        None => {
            warn!("login with unknown email");
            return Err(ApiError::Unauthorized("Invalid email or password"));
        }
    };

    // Google-only accounts carry no password hash and cannot log in this way.
    let Some(hash) = user.password_hash.as_deref() else {
        warn!(user_id = %user.id, "login against passwordless account");
        return Err(ApiError::Unauthorized("Invalid email or password"));
    };

    if !verify_password(&password, hash)? {
        warn!(user_id = %user.id, "login with wrong password");
        return Err(ApiError::Unauthorized("Invalid email or password"));
    }

    let session = Session::create(&state.db, user.id).await?;
    cookies.signed(&state.cookie_key).add(session_cookie(
        session.token,
        state.config.secure_cookies,
    ));

    info!(user_id = %user.id, "user logged in");
    Ok(Json(AuthResponse {
        message: "Login successful",
        user: PublicUser::from(user),
    }))
}

/// Logout never fails: the session row is deleted best-effort and the cookie
/// is cleared regardless, so a stale or already-removed session cannot strand
/// the client half logged in.
#[instrument(skip(state, cookies))]
async fn logout(State(state): State<AppState>, cookies: Cookies) -> Json<MessageResponse> {
    if let Some(cookie) = cookies.signed(&state.cookie_key).get(SESSION_COOKIE) {
        if let Err(e) = Session::delete(&state.db, cookie.value()).await {
            error!(error = %e, "failed to delete session row on logout");
        }
    }

    cookies.remove(clear_session_cookie());

    info!("user logged out");
    Json(MessageResponse {
        message: "Logged out successfully",
    })
}
