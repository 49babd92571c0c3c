use anyhow::Context;
use axum::{
    extract::{Query, State},
    response::Redirect,
    routing::get,
    Router,
};
use oauth2::{AuthorizationCode, CsrfToken, Scope, TokenResponse};
use time::Duration;
use tower_cookies::{cookie::SameSite, Cookie, Cookies};
use tracing::{info, instrument, warn};

use crate::{
    auth::session::{session_cookie, Session},
    oauth::{client::fetch_profile, dto::CallbackQuery},
    state::AppState,
    users::repo::User,
};

/// Signed cookie holding the CSRF state between redirect and callback.
pub const STATE_COOKIE: &str = "vestibule_oauth_state";
const STATE_TTL: Duration = Duration::minutes(10);

/// Where the browser lands when any step of the flow fails.
const FAILURE_REDIRECT: &str = "/login.html";

pub fn oauth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/google", get(google_login))
        .route("/auth/google/callback", get(google_callback))
}

#[instrument(skip(state, cookies))]
async fn google_login(State(state): State<AppState>, cookies: Cookies) -> Redirect {
    let (auth_url, csrf_state) = state
        .oauth
        .authorize_url(CsrfToken::new_random)
        .add_scope(Scope::new("openid".to_string()))
        .add_scope(Scope::new("email".to_string()))
        .add_scope(Scope::new("profile".to_string()))
        .url();

    cookies.signed(&state.cookie_key).add(state_cookie(
        csrf_state.secret().clone(),
        state.config.secure_cookies,
    ));

    info!("redirecting to google consent screen");
    Redirect::to(auth_url.as_str())
}

/// Callback target for the consent screen. Success establishes a session and
/// lands on the app root; every failure ends at the login page instead of an
/// error response, since the caller here is a redirected browser.
#[instrument(skip(state, cookies, query))]
async fn google_callback(
    State(state): State<AppState>,
    cookies: Cookies,
    Query(query): Query<CallbackQuery>,
) -> Redirect {
    match run_callback(&state, &cookies, query).await {
        Ok(user) => {
            info!(user_id = %user.id, "google login succeeded");
            Redirect::to("/")
        }
        Err(e) => {
            warn!(error = %e, "google login failed");
            Redirect::to(FAILURE_REDIRECT)
        }
    }
}

async fn run_callback(
    state: &AppState,
    cookies: &Cookies,
    query: CallbackQuery,
) -> anyhow::Result<User> {
    // One-shot state cookie: read and drop it no matter how the rest goes.
    let stored_state = cookies
        .signed(&state.cookie_key)
        .get(STATE_COOKIE)
        .map(|cookie| cookie.value().to_string());
    cookies.remove(clear_state_cookie());

    if let Some(error) = query.error {
        anyhow::bail!("provider returned error: {error}");
    }
    let code = query.code.context("callback missing authorization code")?;
    let returned_state = query.state.context("callback missing state")?;
    let stored_state = stored_state.context("no state cookie for this callback")?;
    if returned_state != stored_state {
        anyhow::bail!("state does not match the state cookie");
    }

    let token = state
        .oauth
        .exchange_code(AuthorizationCode::new(code))
        .request_async(oauth2::reqwest::async_http_client)
        .await
        .context("token exchange failed")?;

    let profile = fetch_profile(&state.http, token.access_token().secret()).await?;

    let email = profile.email.as_deref().context("profile has no email")?;
    if !profile.verified_email {
        anyhow::bail!("profile email is not verified");
    }

    let user = match User::find_by_google_id(&state.db, &profile.id).await? {
        Some(user) => user,
        None => {
            let name = profile.name.clone().unwrap_or_default();
            let email = email.trim().to_lowercase();
            User::create_from_google(&state.db, &profile.id, &name, &email).await?
        }
    };

    let session = Session::create(&state.db, user.id).await?;
    cookies.signed(&state.cookie_key).add(session_cookie(
        session.token,
        state.config.secure_cookies,
    ));

    Ok(user)
}

fn state_cookie(value: String, secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::new(STATE_COOKIE, value);
    cookie.set_http_only(true);
    cookie.set_path("/");
    cookie.set_secure(secure);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_max_age(STATE_TTL);
    cookie
}

fn clear_state_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::new(STATE_COOKIE, "");
    cookie.set_path("/");
    cookie
}
