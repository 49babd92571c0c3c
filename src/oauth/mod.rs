use crate::state::AppState;
use axum::Router;

pub mod client;
mod dto;
pub mod handlers;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::oauth_routes())
}
