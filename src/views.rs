//! Askama templates for every rendered page.

use askama::Template;
use axum::response::Html;
use axum_extra::extract::cookie::CookieJar;

use crate::{
    auth::{
        dto::{LoginForm, RegisterForm},
        flash::{self, FlashMessage},
        session::{CurrentUser, SessionKeys},
    },
    error::AppError,
    feedback::{dto::FeedbackForm, repo::Feedback},
    forms::FieldErrors,
    users::repo::User,
};

/// Data every page's base layout needs.
#[derive(Debug, Default)]
pub struct Layout {
    pub current_user: Option<String>,
    pub flashes: Vec<FlashMessage>,
}

impl Layout {
    /// Consumes pending flash messages; the returned jar clears them.
    pub fn take(keys: &SessionKeys, jar: CookieJar, current: &CurrentUser) -> (CookieJar, Self) {
        let (jar, flashes) = flash::take(keys, jar);
        (
            jar,
            Self {
                current_user: current.0.clone(),
                flashes,
            },
        )
    }
}

#[derive(Template)]
#[template(path = "users/register.html")]
pub struct RegisterPage {
    pub layout: Layout,
    pub form: RegisterForm,
    pub errors: FieldErrors,
}

#[derive(Template)]
#[template(path = "users/login.html")]
pub struct LoginPage {
    pub layout: Layout,
    pub form: LoginForm,
    pub errors: FieldErrors,
}

#[derive(Template)]
#[template(path = "users/show.html")]
pub struct ProfilePage {
    pub layout: Layout,
    pub user: User,
    pub feedback: Vec<Feedback>,
}

#[derive(Template)]
#[template(path = "feedback/new.html")]
pub struct NewFeedbackPage {
    pub layout: Layout,
    pub username: String,
    pub form: FeedbackForm,
    pub errors: FieldErrors,
}

#[derive(Template)]
#[template(path = "feedback/edit.html")]
pub struct EditFeedbackPage {
    pub layout: Layout,
    pub feedback: Feedback,
    pub form: FeedbackForm,
    pub errors: FieldErrors,
}

pub fn render<T: Template>(page: &T) -> Result<Html<String>, AppError> {
    Ok(Html(page.render()?))
}
