//! Postgres-backed post store.
//!
//! Each operation is a single SQL statement. The detail lookup folds the
//! post's categories into a JSON array column so the post, its author and its
//! categories come back in one round trip.
//!
//! ## Error Mapping
//!
//! | SQLx Error | StoreError | Scenario |
//! |------------|------------|----------|
//! | Database | `Database` | SQL error reported by the server |
//! | PoolTimedOut / PoolClosed / Io / Tls | `Unavailable` | No usable connection |
//! | ColumnNotFound / ColumnDecode / Decode | `Decode` | Row does not match the expected shape |
//! | Other | `Database` | Anything else raised by the driver |

use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{FromRow, PgPool, Row};
use std::sync::Arc;
use tracing::{Span, instrument};

use postboard_core::{Category, Post, PostId, PostListQuery, User, UserId};

use super::{PostStore, StoreError};

const LIST_POSTS_SQL: &str = r#"
    SELECT
        p.id,
        p.title,
        p.content,
        p.online,
        p.visible,
        p.created,
        p.user_id,
        u.username AS user_username,
        u.created AS user_created
    FROM posts p
    JOIN users u ON u.id = p.user_id
    WHERE p.online = TRUE
        AND p.visible = TRUE
        AND ($1::bigint IS NULL OR p.id < $1)
    ORDER BY p.created DESC
    LIMIT $2
"#;

const FIND_POST_SQL: &str = r#"
    SELECT
        p.id,
        p.title,
        p.content,
        p.online,
        p.visible,
        p.created,
        p.user_id,
        u.username AS user_username,
        u.created AS user_created,
        COALESCE(
            (
                SELECT json_agg(
                    json_build_object('id', c.id, 'name', c.name, 'slug', c.slug)
                    ORDER BY c.id
                )
                FROM categories c
                JOIN post_categories pc ON pc.category_id = c.id
                WHERE pc.post_id = p.id
            ),
            '[]'::json
        ) AS categories
    FROM posts p
    JOIN users u ON u.id = p.user_id
    WHERE p.id = $1
"#;

/// Postgres-backed read-only post store.
///
/// Uses the SQLx connection pool, which is `Send + Sync`; the store is shared
/// across request handlers behind an `Arc`.
#[derive(Debug, Clone)]
pub struct PostgresPostStore {
    pool: Arc<PgPool>,
}

impl PostgresPostStore {
    /// Create a store over an existing connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Open a pool against `database_url` and wrap it.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }
}

#[async_trait::async_trait]
impl PostStore for PostgresPostStore {
    #[instrument(
        skip(self, query),
        fields(before = ?query.before, limit = query.limit, post_count)
    )]
    async fn list_posts(&self, query: PostListQuery) -> Result<Vec<Post>, StoreError> {
        let rows = sqlx::query(LIST_POSTS_SQL)
            .bind(query.before.map(|id| id.get()))
            .bind(i64::from(query.limit))
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_posts", e))?;

        let mut posts = Vec::with_capacity(rows.len());
        for row in rows {
            let post = PostRow::from_row(&row).map_err(|e| map_sqlx_error("list_posts", e))?;
            posts.push(post.into_post());
        }

        Span::current().record("post_count", posts.len());
        Ok(posts)
    }

    #[instrument(skip(self), fields(post_id = %id))]
    async fn find_post(&self, id: PostId) -> Result<Option<Post>, StoreError> {
        let row = sqlx::query(FIND_POST_SQL)
            .bind(id.get())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_post", e))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let post = PostRow::from_row(&row).map_err(|e| map_sqlx_error("find_post", e))?;
        let categories_json: serde_json::Value = row
            .try_get("categories")
            .map_err(|e| map_sqlx_error("find_post", e))?;
        let categories: Vec<Category> = serde_json::from_value(categories_json)
            .map_err(|e| StoreError::Decode(format!("categories of post {id}: {e}")))?;

        Ok(Some(post.into_post().with_categories(categories)))
    }
}

/// Map SQLx errors to `StoreError`, tagging the message with the operation.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            StoreError::Database(format!("{operation}: {}", db_err.message()))
        }
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
            StoreError::Unavailable(format!("{operation}: connection pool exhausted or closed"))
        }
        sqlx::Error::Io(e) => StoreError::Unavailable(format!("{operation}: {e}")),
        sqlx::Error::Tls(e) => StoreError::Unavailable(format!("{operation}: {e}")),
        e @ (sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::Decode(_)) => StoreError::Decode(format!("{operation}: {e}")),
        e => StoreError::Database(format!("{operation}: {e}")),
    }
}

/// Post row joined with its author columns.
struct PostRow {
    id: i64,
    title: String,
    content: String,
    online: bool,
    visible: bool,
    created: DateTime<Utc>,
    user_id: i64,
    user_username: String,
    user_created: DateTime<Utc>,
}

impl<'r> FromRow<'r, PgRow> for PostRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(PostRow {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            content: row.try_get("content")?,
            online: row.try_get("online")?,
            visible: row.try_get("visible")?,
            created: row.try_get("created")?,
            user_id: row.try_get("user_id")?,
            user_username: row.try_get("user_username")?,
            user_created: row.try_get("user_created")?,
        })
    }
}

impl PostRow {
    fn into_post(self) -> Post {
        let user_id = UserId::new(self.user_id);
        Post {
            id: PostId::new(self.id),
            title: self.title,
            content: self.content,
            online: self.online,
            visible: self.visible,
            created: self.created,
            user_id,
            user: Some(User {
                id: user_id,
                username: self.user_username,
                created: self.user_created,
            }),
            categories: None,
        }
    }
}
