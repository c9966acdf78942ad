use crate::state::AppState;
use axum::Router;

pub mod dto;
pub mod flash;
pub mod handlers;
pub mod password;
pub mod services;
pub mod session;

pub fn router() -> Router<AppState> {
    handlers::auth_routes()
}
