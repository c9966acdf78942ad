use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, instrument};

use crate::{
    auth::{
        dto::{LoginForm, RegisterForm},
        flash::{self, Level},
        services,
        session::{CurrentUser, SessionKeys},
    },
    error::AppError,
    forms::FieldErrors,
    state::AppState,
    users::{profile_path, repo::CreateUserError},
    views::{render, Layout, LoginPage, RegisterPage},
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", get(register_page).post(register))
        .route("/login", get(login_page).post(login))
        .route("/logout", get(logout))
}

#[instrument(skip(state, jar))]
pub async fn register_page(
    State(state): State<AppState>,
    current: CurrentUser,
    jar: CookieJar,
) -> Result<Response, AppError> {
    if let Some(name) = current.username() {
        return Ok(Redirect::to(&profile_path(name)).into_response());
    }
    let keys = SessionKeys::from_ref(&state);
    render_register(&keys, jar, &current, RegisterForm::default(), FieldErrors::new())
}

#[instrument(skip(state, jar, form))]
pub async fn register(
    State(state): State<AppState>,
    current: CurrentUser,
    jar: CookieJar,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    if let Some(name) = current.username() {
        return Ok(Redirect::to(&profile_path(name)).into_response());
    }
    let keys = SessionKeys::from_ref(&state);

    let errors = match form.validate() {
        Err(errors) => errors,
        Ok(()) => match services::register(state.users.as_ref(), &form).await {
            Ok(user) => {
                let jar = keys.login(jar, &user.username)?;
                let jar = flash::push(
                    &keys,
                    jar,
                    Level::Success,
                    format!("Account created for {}!", user.username),
                )?;
                return Ok((jar, Redirect::to(&profile_path(&user.username))).into_response());
            }
            Err(CreateUserError::UsernameTaken) => {
                info!(username = %form.username, "registration with taken username");
                let mut errors = FieldErrors::new();
                errors.add("username", "Username already taken.");
                errors
            }
            Err(CreateUserError::Other(e)) => return Err(e.into()),
        },
    };

    render_register(&keys, jar, &current, form, errors)
}

fn render_register(
    keys: &SessionKeys,
    jar: CookieJar,
    current: &CurrentUser,
    mut form: RegisterForm,
    errors: FieldErrors,
) -> Result<Response, AppError> {
    form.password.clear();
    let (jar, layout) = Layout::take(keys, jar, current);
    let html = render(&RegisterPage {
        layout,
        form,
        errors,
    })?;
    Ok((jar, html).into_response())
}

#[instrument(skip(state, jar))]
pub async fn login_page(
    State(state): State<AppState>,
    current: CurrentUser,
    jar: CookieJar,
) -> Result<Response, AppError> {
    if let Some(name) = current.username() {
        return Ok(Redirect::to(&profile_path(name)).into_response());
    }
    let keys = SessionKeys::from_ref(&state);
    render_login(&keys, jar, &current, LoginForm::default(), FieldErrors::new())
}

#[instrument(skip(state, jar, form))]
pub async fn login(
    State(state): State<AppState>,
    current: CurrentUser,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    if let Some(name) = current.username() {
        return Ok(Redirect::to(&profile_path(name)).into_response());
    }
    let keys = SessionKeys::from_ref(&state);

    let errors = match form.validate() {
        Err(errors) => errors,
        Ok(()) => {
            match services::authenticate(state.users.as_ref(), &form.username, &form.password)
                .await?
            {
                Some(user) => {
                    info!(username = %user.username, "user logged in");
                    let jar = keys.login(jar, &user.username)?;
                    let jar = flash::push(
                        &keys,
                        jar,
                        Level::Success,
                        format!("Welcome back, {}!", user.username),
                    )?;
                    return Ok((jar, Redirect::to(&profile_path(&user.username))).into_response());
                }
                None => {
                    let mut errors = FieldErrors::new();
                    errors.add("username", "Invalid username or password.");
                    errors
                }
            }
        }
    };

    render_login(&keys, jar, &current, form, errors)
}

fn render_login(
    keys: &SessionKeys,
    jar: CookieJar,
    current: &CurrentUser,
    mut form: LoginForm,
    errors: FieldErrors,
) -> Result<Response, AppError> {
    form.password.clear();
    let (jar, layout) = Layout::take(keys, jar, current);
    let html = render(&LoginPage {
        layout,
        form,
        errors,
    })?;
    Ok((jar, html).into_response())
}

#[instrument(skip(state, jar))]
pub async fn logout(
    State(state): State<AppState>,
    current: CurrentUser,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let username = current.username().ok_or(AppError::Unauthorized)?;
    let keys = SessionKeys::from_ref(&state);

    let jar = keys.logout(jar);
    let jar = flash::push(&keys, jar, Level::Info, "You have been logged out.")?;
    info!(%username, "user logged out");
    Ok((jar, Redirect::to("/login")).into_response())
}
