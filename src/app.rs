use std::net::SocketAddr;

use axum::{response::Html, routing::get, Router};
use tokio::signal::unix::{signal, SignalKind};
use tower_cookies::CookieManagerLayer;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use crate::{auth, oauth, users};

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { Html("vestibule") }))
        .route("/health", get(|| async { "ok" }))
        .merge(auth::router())
        .merge(oauth::router())
        .merge(users::router())
        .with_state(state)
        .layer(CookieManagerLayer::new())
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri, status = tracing::field::Empty)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router) -> anyhow::Result<()> {
    let addr: SocketAddr = format!(
        "{}:{}",
        std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
        std::env::var("APP_PORT").unwrap_or_else(|_| "8080".into())
    )
    .parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let mut sigterm = signal(SignalKind::terminate()).expect("failed to set up SIGTERM handler");
    let mut sigint = signal(SignalKind::interrupt()).expect("failed to set up SIGINT handler");

    tokio::select! {
        _ = sigterm.recv() => tracing::info!("received SIGTERM, shutting down"),
        _ = sigint.recv() => tracing::info!("received SIGINT, shutting down"),
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use base64ct::{Base64, Encoding};
    use tower::ServiceExt;

    use super::*;

    fn app() -> Router {
        build_app(AppState::fake())
    }

    async fn body_json(res: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(res.into_body(), 1024 * 1024)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn landing_and_health_are_open() {
        let res = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let res = app()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(res.into_body(), 1024).await.unwrap();
        assert_eq!(&bytes[..], b"ok");
    }

    #[tokio::test]
    async fn login_rejects_missing_fields() {
        let res = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"email": "ada@example.com"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let json = body_json(res).await;
        assert_eq!(json["error"], "Email and password are required");
    }

    #[tokio::test]
    async fn login_rejects_empty_fields() {
        let res = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"email": "", "password": ""}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn signup_rejects_missing_fields() {
        let res = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/users")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"name": "Ada", "email": "ada@example.com"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let json = body_json(res).await;
        assert_eq!(json["error"], "Name, email and password are required");
    }

    #[tokio::test]
    async fn signup_rejects_invalid_email() {
        let res = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/users")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"name": "Ada", "email": "not-an-email", "password": "p"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let json = body_json(res).await;
        assert_eq!(json["error"], "Invalid email");
    }

    #[tokio::test]
    async fn profile_requires_session() {
        let res = app()
            .oneshot(
                Request::builder()
                    .uri("/users/profile")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(res).await;
        assert_eq!(json["error"], "Not authenticated");
    }

    #[tokio::test]
    async fn profile_rejects_tampered_cookie() {
        let res = app()
            .oneshot(
                Request::builder()
                    .uri("/users/profile")
                    .header(header::COOKIE, "vestibule_session=forged-token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn admin_routes_require_basic_auth() {
        let res = app()
            .oneshot(Request::builder().uri("/users").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(res).await;
        assert_eq!(json["error"], "Unauthorized");
    }

    #[tokio::test]
    async fn admin_routes_reject_wrong_credentials() {
        let header_value = format!("Basic {}", Base64::encode_string(b"admin:wrong"));
        let res = app()
            .oneshot(
                Request::builder()
                    .uri("/users")
                    .header(header::AUTHORIZATION, header_value)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn admin_gate_runs_before_body_handling() {
        // A garbage body must not matter when credentials are absent.
        let res = app()
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/users/6f2b1a34-7f07-4c1e-9a57-2f5f2f1f0a11")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn logout_without_cookie_still_succeeds() {
        let res = app()
            .oneshot(
                Request::builder()
                    .uri("/logout")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        let cleared = res
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .any(|v| v.to_str().unwrap().starts_with("vestibule_session="));
        assert!(cleared, "logout must clear the session cookie");

        let json = body_json(res).await;
        assert_eq!(json["message"], "Logged out successfully");
    }

    #[tokio::test]
    async fn logout_with_garbage_cookie_still_succeeds() {
        let res = app()
            .oneshot(
                Request::builder()
                    .uri("/logout")
                    .header(header::COOKIE, "vestibule_session=forged-token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn google_login_redirects_to_consent_screen() {
        let res = app()
            .oneshot(
                Request::builder()
                    .uri("/auth/google")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::SEE_OTHER);

        let location = res
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap();
        assert!(location.starts_with("https://accounts.google.com/o/oauth2/v2/auth"));
        assert!(location.contains("client_id=test-client-id"));
        assert!(location.contains("scope=openid"));

        let state_cookie_set = res
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .any(|v| v.to_str().unwrap().starts_with("vestibule_oauth_state="));
        assert!(state_cookie_set, "consent redirect must set the state cookie");
    }

    #[tokio::test]
    async fn google_callback_without_params_fails_to_login_page() {
        let res = app()
            .oneshot(
                Request::builder()
                    .uri("/auth/google/callback")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            res.headers().get(header::LOCATION).unwrap(),
            "/login.html"
        );
    }

    #[tokio::test]
    async fn google_callback_rejects_mismatched_state() {
        // No state cookie was issued to this client, so any state must fail.
        let res = app()
            .oneshot(
                Request::builder()
                    .uri("/auth/google/callback?code=abc&state=xyz")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            res.headers().get(header::LOCATION).unwrap(),
            "/login.html"
        );
    }

    #[tokio::test]
    async fn google_callback_denial_fails_to_login_page() {
        let res = app()
            .oneshot(
                Request::builder()
                    .uri("/auth/google/callback?error=access_denied")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            res.headers().get(header::LOCATION).unwrap(),
            "/login.html"
        );
    }
}
