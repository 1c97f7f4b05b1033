//! Read-only post persistence boundary.
//!
//! Handlers depend on the [`PostStore`] trait; the binary picks the Postgres
//! implementation when a database is configured and the in-memory one
//! otherwise.

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryPostStore;
pub use postgres::PostgresPostStore;

use postboard_core::{Post, PostId, PostListQuery};
use thiserror::Error;

/// Post store operation error.
///
/// These are **infrastructure errors** (connectivity, SQL, row decoding). A
/// missing record is not an error here: lookups return `Ok(None)`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(String),

    #[error("failed to decode row: {0}")]
    Decode(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait::async_trait]
pub trait PostStore: Send + Sync {
    /// One page of eligible posts matching `query`, newest first, at most
    /// `query.limit` long. Each post has its author attached; categories are
    /// not loaded.
    async fn list_posts(&self, query: PostListQuery) -> Result<Vec<Post>, StoreError>;

    /// A single post by id with its author and categories attached.
    ///
    /// Eligibility (`online`/`visible`) is not checked: any existing post is
    /// returned.
    async fn find_post(&self, id: PostId) -> Result<Option<Post>, StoreError>;
}
