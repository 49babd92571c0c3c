use crate::state::AppState;
use axum::Router;

mod dto;
pub(crate) mod extractors;
pub mod handlers;
pub mod password;
pub mod session;

pub use dto::{AuthResponse, MessageResponse, PublicUser};

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::auth_routes())
}
