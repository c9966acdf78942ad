use crate::state::AppState;
use axum::Router;

pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    handlers::user_routes()
}

/// Path of a user's profile page.
pub fn profile_path(username: &str) -> String {
    format!("/users/{username}")
}
