use std::sync::Arc;

use axum::{
    extract::{rejection::PathRejection, Extension, Path},
    Json,
};

use postboard_core::{DomainError, Post, PostId, PostListQuery};

use crate::app::errors::ApiError;
use crate::app::services::AppServices;

/// Parse a listing cursor from its leading integer (`"12abc"` is 12).
/// Anything without one means "no cursor", so a malformed `lastId` yields the
/// first page instead of an error.
pub fn parse_cursor(raw: Option<&str>) -> Option<PostId> {
    raw.and_then(|s| PostId::parse_leading(s).ok())
}

/// `GET /posts[/:lastId]`: one page of eligible posts with their authors.
///
/// An empty page is reported as 404.
pub async fn list_posts(
    Extension(services): Extension<Arc<AppServices>>,
    last_id: Option<Path<String>>,
) -> Result<Json<Vec<Post>>, ApiError> {
    let cursor = parse_cursor(last_id.as_deref().map(String::as_str));
    let query = PostListQuery::from_cursor(cursor);

    let posts = services.posts().list_posts(query).await?;
    if posts.is_empty() {
        return Err(DomainError::not_found().into());
    }

    Ok(Json(posts))
}

/// `GET /post/:id`: one post with its categories and author.
///
/// The id is read from the leading integer of the segment (`/post/7-my-slug`
/// is post 7) before the store is queried; a segment that cannot be decoded or
/// has no leading integer is a 404. Eligibility is not checked, so direct links
/// to offline or hidden posts resolve.
pub async fn view_post(
    Extension(services): Extension<Arc<AppServices>>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<Post>, ApiError> {
    let Path(raw) = id.map_err(|rejection| {
        tracing::debug!(%rejection, "undecodable post id segment");
        ApiError::NotFound
    })?;
    let id = PostId::parse_leading(&raw)?;

    let post = services
        .posts()
        .find_post(id)
        .await?
        .ok_or_else(DomainError::not_found)?;

    Ok(Json(post))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use chrono::{TimeZone, Utc};
    use postboard_core::{User, UserId};
    use postboard_infra::InMemoryPostStore;
    use tracing_subscriber::layer::SubscriberExt;

    use crate::app::errors::testing::ErrorCounter;

    #[test]
    fn cursor_parsing_is_lenient() {
        assert_eq!(parse_cursor(None), None);
        assert_eq!(parse_cursor(Some("12")), Some(PostId::new(12)));
        assert_eq!(parse_cursor(Some("12abc")), Some(PostId::new(12)));
        assert_eq!(parse_cursor(Some("7.5")), Some(PostId::new(7)));
        assert_eq!(parse_cursor(Some(" 7")), Some(PostId::new(7)));
        assert_eq!(parse_cursor(Some("abc")), None);
        assert_eq!(parse_cursor(Some("")), None);
    }

    fn store_with_one_post() -> Arc<InMemoryPostStore> {
        let store = Arc::new(InMemoryPostStore::new());
        let created = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        store.insert_user(User {
            id: UserId::new(1),
            username: "ada".into(),
            created,
        });
        store.insert_post(Post {
            id: PostId::new(3),
            title: "hello".into(),
            content: "first".into(),
            online: true,
            visible: true,
            created,
            user_id: UserId::new(1),
            user: None,
            categories: None,
        });
        store
    }

    fn services(store: &Arc<InMemoryPostStore>) -> Extension<Arc<AppServices>> {
        Extension(Arc::new(AppServices::new(store.clone())))
    }

    async fn list(store: &Arc<InMemoryPostStore>, last_id: Option<&str>) -> Result<Vec<Post>, ApiError> {
        let last_id = last_id.map(|raw| Path(raw.to_string()));
        list_posts(services(store), last_id).await.map(|Json(posts)| posts)
    }

    #[tokio::test]
    async fn listing_with_and_without_cursor() {
        let store = store_with_one_post();
        assert_eq!(list(&store, None).await.unwrap().len(), 1);
        assert_eq!(list(&store, Some("10")).await.unwrap().len(), 1);
        assert_eq!(list(&store, Some("junk")).await.unwrap().len(), 1);
        assert!(matches!(list(&store, Some("3")).await, Err(ApiError::NotFound)));
    }

    async fn view(store: &Arc<InMemoryPostStore>, raw: &str) -> Result<Json<Post>, ApiError> {
        view_post(services(store), Ok(Path(raw.to_string()))).await
    }

    #[tokio::test]
    async fn unparsable_id_never_reaches_the_store() {
        let store = store_with_one_post();
        assert!(matches!(view(&store, "abc").await, Err(ApiError::NotFound)));
        assert_eq!(store.query_count(), 0);

        let Json(post) = view(&store, "3").await.unwrap();
        assert_eq!(post.id, PostId::new(3));
        assert_eq!(post.categories, Some(vec![]));
        assert_eq!(store.query_count(), 1);
    }

    #[tokio::test]
    async fn id_with_trailing_text_resolves_by_its_number() {
        let store = store_with_one_post();
        let Json(post) = view(&store, "3-hello").await.unwrap();
        assert_eq!(post.id, PostId::new(3));
    }

    #[tokio::test]
    async fn store_failure_is_internal() {
        let store = store_with_one_post();
        store.fail_with("boom");
        assert!(matches!(list(&store, None).await, Err(ApiError::Internal(_))));
        assert!(matches!(view(&store, "3").await, Err(ApiError::Internal(_))));
    }

    #[tokio::test]
    async fn store_failure_logs_one_error_per_request() {
        let store = store_with_one_post();
        store.fail_with("boom");
        let counter = ErrorCounter::default();
        let _guard =
            tracing::subscriber::set_default(tracing_subscriber::registry().with(counter.clone()));

        let res = list_posts(services(&store), None).await.into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(counter.count(), 1);

        let res = list_posts(services(&store), Some(Path("10".to_string())))
            .await
            .into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(counter.count(), 2);

        let res = view(&store, "3").await.into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(counter.count(), 3);

        store.recover();
        assert_eq!(view(&store, "3").await.into_response().status(), StatusCode::OK);
        assert_eq!(view(&store, "42").await.into_response().status(), StatusCode::NOT_FOUND);
        assert_eq!(counter.count(), 3);
    }
}
