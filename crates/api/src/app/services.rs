use std::sync::Arc;

use anyhow::Context;
use postboard_infra::{AppConfig, InMemoryPostStore, PostStore, PostgresPostStore};

/// Shared, request-independent dependencies of the handlers.
#[derive(Clone)]
pub struct AppServices {
    posts: Arc<dyn PostStore>,
}

impl AppServices {
    pub fn new(posts: Arc<dyn PostStore>) -> Self {
        Self { posts }
    }

    pub fn posts(&self) -> &dyn PostStore {
        self.posts.as_ref()
    }
}

/// Pick the post store from configuration: Postgres when `DATABASE_URL` is
/// set, otherwise an empty in-memory store (dev only).
pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    let posts: Arc<dyn PostStore> = match config.database_url.as_deref() {
        Some(url) => {
            let store = PostgresPostStore::connect(url, config.database_max_connections)
                .await
                .context("failed to connect to Postgres")?;
            tracing::info!(
                max_connections = config.database_max_connections,
                "using Postgres post store"
            );
            Arc::new(store)
        }
        None => {
            tracing::warn!("DATABASE_URL not set; serving posts from an empty in-memory store");
            Arc::new(InMemoryPostStore::new())
        }
    };

    Ok(AppServices::new(posts))
}
