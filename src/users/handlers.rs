use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tower_cookies::Cookies;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{
        extractors::{AdminBasic, CurrentUser},
        password::hash_password,
        session::{session_cookie, Session},
        AuthResponse, MessageResponse, PublicUser,
    },
    error::{is_unique_violation, ApiError},
    state::AppState,
    users::{
        dto::{CreateUserRequest, UpdateUserRequest},
        repo::User,
    },
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user).get(list_users))
        .route("/users/profile", get(profile))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Signup. The new user is logged in right away, same as a successful login.
#[instrument(skip(state, cookies, payload))]
async fn create_user(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let (name, email, password) = match (payload.name, payload.email, payload.password) {
        (Some(name), Some(email), Some(password))
            if !name.is_empty() && !email.is_empty() && !password.is_empty() =>
        {
            (name, email, password)
        }
        _ => {
            return Err(ApiError::Validation(
                "Name, email and password are required",
            ))
        }
    };

    let email = email.trim().to_lowercase();
    if !is_valid_email(&email) {
        warn!("signup with invalid email");
        return Err(ApiError::Validation("Invalid email"));
    }

    let hash = hash_password(&password)?;
    let user = match User::create(&state.db, &name, &email, &hash).await {
        Ok(user) => user,
        Err(e) if is_unique_violation(&e) => {
            warn!("signup with already-registered email");
            return Err(ApiError::Conflict("User with this email already exists"));
        }
        Err(e) => return Err(e.into()),
    };

    let session = Session::create(&state.db, user.id).await?;
    cookies.signed(&state.cookie_key).add(session_cookie(
        session.token,
        state.config.secure_cookies,
    ));

    info!(user_id = %user.id, "user created");
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User created successfully",
            user: PublicUser::from(user),
        }),
    ))
}

#[instrument(skip(current))]
async fn profile(current: CurrentUser) -> Json<PublicUser> {
    Json(PublicUser::from(current.0))
}

#[instrument(skip(state, _admin))]
async fn list_users(
    State(state): State<AppState>,
    _admin: AdminBasic,
) -> Result<Json<Vec<User>>, ApiError> {
    let users = User::list_all(&state.db).await?;
    Ok(Json(users))
}

#[instrument(skip(state, _admin))]
async fn get_user(
    State(state): State<AppState>,
    _admin: AdminBasic,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, ApiError> {
    match User::find_by_id(&state.db, id).await? {
        Some(user) => Ok(Json(user)),
        None => Err(ApiError::NotFound("User not found")),
    }
}

/// Partial update; a supplied password is re-hashed before storage.
#[instrument(skip(state, _admin, payload))]
async fn update_user(
    State(state): State<AppState>,
    _admin: AdminBasic,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<User>, ApiError> {
    let email = payload.email.map(|e| e.trim().to_lowercase());
    let password_hash = match payload.password.as_deref() {
        Some(password) => Some(hash_password(password)?),
        None => None,
    };

    let updated = User::update(
        &state.db,
        id,
        payload.name.as_deref(),
        email.as_deref(),
        password_hash.as_deref(),
    )
    .await;

    match updated {
        Ok(Some(user)) => {
            info!(user_id = %user.id, "user updated");
            Ok(Json(user))
        }
        Ok(None) => Err(ApiError::NotFound("User not found")),
        Err(e) if is_unique_violation(&e) => {
            warn!(user_id = %id, "update to already-registered email");
            Err(ApiError::Conflict("User with this email already exists"))
        }
        Err(e) => Err(e.into()),
    }
}

#[instrument(skip(state, _admin))]
async fn delete_user(
    State(state): State<AppState>,
    _admin: AdminBasic,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !User::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("User not found"));
    }

    info!(user_id = %id, "user deleted");
    Ok(Json(MessageResponse {
        message: "User deleted",
    }))
}
