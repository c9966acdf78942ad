use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Router,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        flash::{self, Level},
        session::{CurrentUser, SessionKeys},
    },
    error::AppError,
    state::AppState,
    views::{render, Layout, ProfilePage},
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/:username", get(show_user))
        .route("/users/:username/delete", post(remove_user))
}

#[instrument(skip(state, jar))]
pub async fn show_user(
    State(state): State<AppState>,
    current: CurrentUser,
    jar: CookieJar,
    Path(username): Path<String>,
) -> Result<Response, AppError> {
    current.require_owner(&username)?;

    let user = state
        .users
        .find_user(&username)
        .await?
        .ok_or(AppError::NotFound)?;
    let feedback = state.feedback.list_feedback_for(&user.username).await?;

    let keys = SessionKeys::from_ref(&state);
    let (jar, layout) = Layout::take(&keys, jar, &current);
    let html = render(&ProfilePage {
        layout,
        user,
        feedback,
    })?;
    Ok((jar, html).into_response())
}

#[instrument(skip(state, jar))]
pub async fn remove_user(
    State(state): State<AppState>,
    current: CurrentUser,
    jar: CookieJar,
    Path(username): Path<String>,
) -> Result<Response, AppError> {
    current.require_owner(&username)?;

    if !state.users.delete_user(&username).await? {
        warn!(%username, "delete requested for missing user");
        return Err(AppError::NotFound);
    }
    info!(%username, "user deleted");

    let keys = SessionKeys::from_ref(&state);
    let jar = keys.logout(jar);
    let jar = flash::push(&keys, jar, Level::Info, "Your account has been deleted.")?;
    Ok((jar, Redirect::to("/login")).into_response())
}
