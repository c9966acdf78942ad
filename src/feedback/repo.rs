use async_trait::async_trait;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct Feedback {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub username: String,
}

#[derive(Debug, Clone)]
pub struct FeedbackInput {
    pub title: String,
    pub content: String,
}

#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    async fn create_feedback(
        &self,
        username: &str,
        input: &FeedbackInput,
    ) -> anyhow::Result<Feedback>;
    async fn find_feedback(&self, id: i32) -> anyhow::Result<Option<Feedback>>;
    /// All feedback owned by `username`, oldest first.
    async fn list_feedback_for(&self, username: &str) -> anyhow::Result<Vec<Feedback>>;
    async fn update_feedback(
        &self,
        id: i32,
        input: &FeedbackInput,
    ) -> anyhow::Result<Option<Feedback>>;
    async fn delete_feedback(&self, id: i32) -> anyhow::Result<bool>;
}
