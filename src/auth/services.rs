use tracing::{error, info, warn};

use super::dto::RegisterForm;
use super::password::{hash_password, verify_password};
use crate::users::repo::{CreateUserError, NewUser, User, UserRepository};

/// Hash the password and insert a new user.
pub async fn register(
    repo: &dyn UserRepository,
    form: &RegisterForm,
) -> Result<User, CreateUserError> {
    if repo.find_user(&form.username).await?.is_some() {
        return Err(CreateUserError::UsernameTaken);
    }

    let password = hash_password(&form.password)?;
    let user = repo
        .create_user(&NewUser {
            username: form.username.clone(),
            password,
            email: form.email.clone(),
            first_name: form.first_name.clone(),
            last_name: form.last_name.clone(),
        })
        .await?;

    info!(username = %user.username, "user registered");
    Ok(user)
}

/// `Ok(None)` for an unknown user or a wrong password.
pub async fn authenticate(
    repo: &dyn UserRepository,
    username: &str,
    password: &str,
) -> anyhow::Result<Option<User>> {
    let Some(user) = repo.find_user(username).await? else {
        warn!(%username, "login unknown user");
        return Ok(None);
    };

    match verify_password(password, &user.password) {
        Ok(true) => Ok(Some(user)),
        Ok(false) => {
            warn!(%username, "login invalid password");
            Ok(None)
        }
        Err(e) => {
            error!(error = %e, %username, "stored password hash is malformed");
            Ok(None)
        }
    }
}
