use async_trait::async_trait;
use sqlx::FromRow;

/// User record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub username: String,
    pub password: String, // Argon2 PHC string
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// Fields for a user about to be inserted; `password` is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateUserError {
    #[error("username already taken")]
    UsernameTaken,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, user: &NewUser) -> Result<User, CreateUserError>;
    async fn find_user(&self, username: &str) -> anyhow::Result<Option<User>>;
    /// Removes the user together with all of their feedback.
    async fn delete_user(&self, username: &str) -> anyhow::Result<bool>;
}
