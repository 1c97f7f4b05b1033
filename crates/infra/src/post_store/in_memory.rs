use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};

use postboard_core::{Category, CategoryId, Post, PostId, PostListQuery, User, UserId};

use super::{PostStore, StoreError};

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<UserId, User>,
    categories: BTreeMap<CategoryId, Category>,
    posts: BTreeMap<PostId, Post>,
    post_categories: BTreeSet<(PostId, CategoryId)>,
}

/// In-memory post store.
///
/// Intended for tests/dev. Follows the same join semantics as the Postgres
/// store: a post whose author is missing is never returned.
#[derive(Debug, Default)]
pub struct InMemoryPostStore {
    tables: RwLock<Tables>,
    failure: RwLock<Option<String>>,
    queries: AtomicUsize,
}

impl InMemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_user(&self, user: User) {
        self.write().users.insert(user.id, user);
    }

    pub fn insert_category(&self, category: Category) {
        self.write().categories.insert(category.id, category);
    }

    /// Insert or replace a post. Association fields on `post` are ignored;
    /// they are rebuilt from the user/category tables on read.
    pub fn insert_post(&self, post: Post) {
        let post = Post {
            user: None,
            categories: None,
            ..post
        };
        self.write().posts.insert(post.id, post);
    }

    pub fn attach_category(&self, post_id: PostId, category_id: CategoryId) {
        self.write().post_categories.insert((post_id, category_id));
    }

    /// Make every subsequent query fail with `StoreError::Unavailable`.
    pub fn fail_with(&self, reason: impl Into<String>) {
        *self.failure.write().unwrap_or_else(PoisonError::into_inner) = Some(reason.into());
    }

    pub fn recover(&self) {
        *self.failure.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Number of queries issued against the store so far.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin_query(&self) -> Result<std::sync::RwLockReadGuard<'_, Tables>, StoreError> {
        self.queries.fetch_add(1, Ordering::SeqCst);

        let failure = self
            .failure
            .read()
            .map_err(|_| StoreError::Unavailable("failure switch lock poisoned".to_string()))?;
        if let Some(reason) = failure.as_ref() {
            return Err(StoreError::Unavailable(reason.clone()));
        }

        self.tables
            .read()
            .map_err(|_| StoreError::Unavailable("post tables lock poisoned".to_string()))
    }
}

#[async_trait::async_trait]
impl PostStore for InMemoryPostStore {
    async fn list_posts(&self, query: PostListQuery) -> Result<Vec<Post>, StoreError> {
        let tables = self.begin_query()?;

        let mut page: Vec<Post> = tables
            .posts
            .values()
            .filter(|post| query.matches(post))
            .filter_map(|post| {
                let user = tables.users.get(&post.user_id)?;
                Some(post.clone().with_user(user.clone()))
            })
            .collect();

        page.sort_by(|a, b| b.created.cmp(&a.created).then(b.id.cmp(&a.id)));
        page.truncate(query.limit as usize);
        Ok(page)
    }

    async fn find_post(&self, id: PostId) -> Result<Option<Post>, StoreError> {
        let tables = self.begin_query()?;

        let Some(post) = tables.posts.get(&id) else {
            return Ok(None);
        };
        let Some(user) = tables.users.get(&post.user_id) else {
            return Ok(None);
        };

        let categories = tables
            .post_categories
            .range((id, CategoryId::new(i64::MIN))..=(id, CategoryId::new(i64::MAX)))
            .filter_map(|(_, category_id)| tables.categories.get(category_id).cloned())
            .collect();

        Ok(Some(
            post.clone()
                .with_user(user.clone())
                .with_categories(categories),
        ))
    }
}
