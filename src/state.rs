use crate::config::AppConfig;
use crate::db::PgStore;
use crate::feedback::repo::FeedbackRepository;
use crate::users::repo::UserRepository;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub feedback: Arc<dyn FeedbackRepository>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let store = PgStore::connect(&config).await?;
        store.migrate().await?;
        tracing::info!(max_connections = config.max_connections, "database ready");

        let store = Arc::new(store);
        Ok(Self::from_parts(store.clone(), store, config))
    }

    pub fn from_parts(
        users: Arc<dyn UserRepository>,
        feedback: Arc<dyn FeedbackRepository>,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            users,
            feedback,
            config,
        }
    }
}
