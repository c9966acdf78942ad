use axum::{
    async_trait,
    extract::{rejection::FormRejection, FromRef, FromRequestParts, Path, State},
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, instrument};

use crate::{
    auth::{
        flash::{self, Level},
        session::{CurrentUser, SessionKeys},
    },
    error::AppError,
    feedback::{dto::FeedbackForm, repo::Feedback},
    forms::FieldErrors,
    state::AppState,
    users::profile_path,
    views::{render, EditFeedbackPage, Layout, NewFeedbackPage},
};

pub fn feedback_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/users/:username/feedback/new",
            get(new_feedback_page).post(new_feedback),
        )
        .route(
            "/feedback/:id/update",
            get(edit_feedback_page).post(update_feedback),
        )
        .route("/feedback/:id/delete", post(delete_feedback))
}

/// The `:id` segment of a feedback route. Anything that is not an
/// integer matches no feedback, so it is a 404 like any unknown id.
#[derive(Debug, Clone, Copy)]
pub struct FeedbackId(pub i32);

#[async_trait]
impl<S> FromRequestParts<S> for FeedbackId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i32>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::NotFound)?;
        Ok(Self(id))
    }
}

#[instrument(skip(state, jar))]
pub async fn new_feedback_page(
    State(state): State<AppState>,
    current: CurrentUser,
    jar: CookieJar,
    Path(username): Path<String>,
) -> Result<Response, AppError> {
    current.require_owner(&username)?;
    let keys = SessionKeys::from_ref(&state);
    render_new(&keys, jar, &current, username, FeedbackForm::default(), FieldErrors::new())
}

#[instrument(skip(state, jar, form))]
pub async fn new_feedback(
    State(state): State<AppState>,
    current: CurrentUser,
    jar: CookieJar,
    Path(username): Path<String>,
    form: Result<Form<FeedbackForm>, FormRejection>,
) -> Result<Response, AppError> {
    current.require_owner(&username)?;
    let Form(form) = match form {
        Ok(form) => form,
        Err(rejection) => return Ok(rejection.into_response()),
    };
    let keys = SessionKeys::from_ref(&state);

    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => return render_new(&keys, jar, &current, username, form, errors),
    };

    let feedback = state.feedback.create_feedback(&username, &input).await?;
    info!(id = feedback.id, username = %feedback.username, "feedback created");

    let jar = flash::push(&keys, jar, Level::Success, "Feedback added successfully!")?;
    Ok((jar, Redirect::to(&profile_path(&feedback.username))).into_response())
}

fn render_new(
    keys: &SessionKeys,
    jar: CookieJar,
    current: &CurrentUser,
    username: String,
    form: FeedbackForm,
    errors: FieldErrors,
) -> Result<Response, AppError> {
    let (jar, layout) = Layout::take(keys, jar, current);
    let html = render(&NewFeedbackPage {
        layout,
        username,
        form,
        errors,
    })?;
    Ok((jar, html).into_response())
}

/// Loads the feedback (404 when absent) and checks the session owns it.
async fn owned_feedback(
    state: &AppState,
    current: &CurrentUser,
    id: i32,
) -> Result<Feedback, AppError> {
    let feedback = state
        .feedback
        .find_feedback(id)
        .await?
        .ok_or(AppError::NotFound)?;
    current.require_owner(&feedback.username)?;
    Ok(feedback)
}

#[instrument(skip(state, jar))]
pub async fn edit_feedback_page(
    State(state): State<AppState>,
    current: CurrentUser,
    jar: CookieJar,
    FeedbackId(id): FeedbackId,
) -> Result<Response, AppError> {
    let feedback = owned_feedback(&state, &current, id).await?;
    let keys = SessionKeys::from_ref(&state);
    let form = FeedbackForm::from(&feedback);
    render_edit(&keys, jar, &current, feedback, form, FieldErrors::new())
}

#[instrument(skip(state, jar, form))]
pub async fn update_feedback(
    State(state): State<AppState>,
    current: CurrentUser,
    jar: CookieJar,
    FeedbackId(id): FeedbackId,
    form: Result<Form<FeedbackForm>, FormRejection>,
) -> Result<Response, AppError> {
    let feedback = owned_feedback(&state, &current, id).await?;
    let Form(form) = match form {
        Ok(form) => form,
        Err(rejection) => return Ok(rejection.into_response()),
    };
    let keys = SessionKeys::from_ref(&state);

    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => return render_edit(&keys, jar, &current, feedback, form, errors),
    };

    let updated = state
        .feedback
        .update_feedback(id, &input)
        .await?
        .ok_or(AppError::NotFound)?;
    info!(id, username = %updated.username, "feedback updated");

    let jar = flash::push(&keys, jar, Level::Success, "Feedback updated successfully!")?;
    Ok((jar, Redirect::to(&profile_path(&updated.username))).into_response())
}

fn render_edit(
    keys: &SessionKeys,
    jar: CookieJar,
    current: &CurrentUser,
    feedback: Feedback,
    form: FeedbackForm,
    errors: FieldErrors,
) -> Result<Response, AppError> {
    let (jar, layout) = Layout::take(keys, jar, current);
    let html = render(&EditFeedbackPage {
        layout,
        feedback,
        form,
        errors,
    })?;
    Ok((jar, html).into_response())
}

#[instrument(skip(state, jar))]
pub async fn delete_feedback(
    State(state): State<AppState>,
    current: CurrentUser,
    jar: CookieJar,
    FeedbackId(id): FeedbackId,
) -> Result<Response, AppError> {
    let feedback = owned_feedback(&state, &current, id).await?;

    if !state.feedback.delete_feedback(id).await? {
        return Err(AppError::NotFound);
    }
    info!(id, username = %feedback.username, "feedback deleted");

    let keys = SessionKeys::from_ref(&state);
    let jar = flash::push(&keys, jar, Level::Info, "Feedback deleted.")?;
    Ok((jar, Redirect::to(&profile_path(&feedback.username))).into_response())
}
