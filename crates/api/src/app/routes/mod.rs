use axum::{routing::get, Router};

pub mod posts;
pub mod system;

/// Router for the post endpoints.
///
/// The listing cursor is an optional trailing segment, so the listing handler
/// is mounted on `/posts`, `/posts/` and `/posts/:lastId`.
pub fn router() -> Router {
    Router::new()
        .route("/posts", get(posts::list_posts))
        .route("/posts/", get(posts::list_posts))
        .route("/posts/:lastId", get(posts::list_posts))
        .route("/post/:id", get(posts::view_post))
}
