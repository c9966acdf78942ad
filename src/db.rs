use anyhow::Context;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    config::AppConfig,
    feedback::repo::{Feedback, FeedbackInput, FeedbackRepository},
    users::repo::{CreateUserError, NewUser, User, UserRepository},
};

/// PostgreSQL-backed implementation of both repositories.
#[derive(Clone)]
pub struct PgStore {
    pub pool: PgPool,
}

impl PgStore {
    pub async fn connect(config: &AppConfig) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;
        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("run migrations")?;
        Ok(())
    }
}

#[async_trait]
impl UserRepository for PgStore {
    async fn create_user(&self, user: &NewUser) -> Result<User, CreateUserError> {
        let res = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password, email, first_name, last_name)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING username, password, email, first_name, last_name
            "#,
        )
        .bind(&user.username)
        .bind(&user.password)
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .fetch_one(&self.pool)
        .await;

        match res {
            Ok(u) => Ok(u),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(CreateUserError::UsernameTaken)
            }
            Err(e) => Err(anyhow::Error::new(e).context("insert user").into()),
        }
    }

    async fn find_user(&self, username: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT username, password, email, first_name, last_name
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .context("find user")?;
        Ok(user)
    }

    async fn delete_user(&self, username: &str) -> anyhow::Result<bool> {
        let mut tx = self.pool.begin().await.context("begin tx")?;
        // Feedback rows, then the user row, in one transaction.
        sqlx::query("DELETE FROM feedback WHERE username = $1")
            .bind(username)
            .execute(&mut *tx)
            .await
            .context("delete user feedback")?;
        let res = sqlx::query("DELETE FROM users WHERE username = $1")
            .bind(username)
            .execute(&mut *tx)
            .await
            .context("delete user")?;
        tx.commit().await.context("commit tx")?;
        Ok(res.rows_affected() > 0)
    }
}

#[async_trait]
impl FeedbackRepository for PgStore {
    async fn create_feedback(
        &self,
        username: &str,
        input: &FeedbackInput,
    ) -> anyhow::Result<Feedback> {
        let feedback = sqlx::query_as::<_, Feedback>(
            r#"
            INSERT INTO feedback (title, content, username)
            VALUES ($1, $2, $3)
            RETURNING id, title, content, username
            "#,
        )
        .bind(&input.title)
        .bind(&input.content)
        .bind(username)
        .fetch_one(&self.pool)
        .await
        .context("insert feedback")?;
        Ok(feedback)
    }

    async fn find_feedback(&self, id: i32) -> anyhow::Result<Option<Feedback>> {
        let feedback = sqlx::query_as::<_, Feedback>(
            r#"SELECT id, title, content, username FROM feedback WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("find feedback")?;
        Ok(feedback)
    }

    async fn list_feedback_for(&self, username: &str) -> anyhow::Result<Vec<Feedback>> {
        let rows = sqlx::query_as::<_, Feedback>(
            r#"
            SELECT id, title, content, username
            FROM feedback
            WHERE username = $1
            ORDER BY id ASC
            "#,
        )
        .bind(username)
        .fetch_all(&self.pool)
        .await
        .context("list feedback by user")?;
        Ok(rows)
    }

    async fn update_feedback(
        &self,
        id: i32,
        input: &FeedbackInput,
    ) -> anyhow::Result<Option<Feedback>> {
        let feedback = sqlx::query_as::<_, Feedback>(
            r#"
            UPDATE feedback
               SET title = $2, content = $3
             WHERE id = $1
            RETURNING id, title, content, username
            "#,
        )
        .bind(id)
        .bind(&input.title)
        .bind(&input.content)
        .fetch_optional(&self.pool)
        .await
        .context("update feedback")?;
        Ok(feedback)
    }

    async fn delete_feedback(&self, id: i32) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM feedback WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("delete feedback")?;
        Ok(res.rows_affected() > 0)
    }
}
