//! Post, author and category entities as served by the read API.
//!
//! Association fields (`User`, `Categories`) are attached by the store that
//! loaded the post and serialize under the association names clients expect.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{CategoryId, PostId, UserId};

/// Maximum number of posts returned by one listing page.
pub const PAGE_SIZE: u32 = 10;

/// Author of a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub created: DateTime<Utc>,
}

/// Tag attached to posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
}

/// A post record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub online: bool,
    pub visible: bool,
    pub created: DateTime<Utc>,
    pub user_id: UserId,

    #[serde(rename = "User", default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,

    #[serde(rename = "Categories", default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<Category>>,
}

impl Post {
    /// Eligible posts are both online and visible; only those are listed.
    pub fn is_eligible(&self) -> bool {
        self.online && self.visible
    }

    pub fn with_user(mut self, user: User) -> Self {
        self.user = Some(user);
        self
    }

    pub fn with_categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = Some(categories);
        self
    }
}

/// Filter for one page of the post listing.
///
/// Pagination is cursor based: `before` is the id of the last post the client
/// has seen, and the next page holds eligible posts with a strictly smaller id,
/// newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostListQuery {
    pub before: Option<PostId>,
    pub limit: u32,
}

impl Default for PostListQuery {
    fn default() -> Self {
        Self::first_page()
    }
}

impl PostListQuery {
    pub fn first_page() -> Self {
        Self {
            before: None,
            limit: PAGE_SIZE,
        }
    }

    pub fn after(cursor: PostId) -> Self {
        Self {
            before: Some(cursor),
            limit: PAGE_SIZE,
        }
    }

    pub fn from_cursor(cursor: Option<PostId>) -> Self {
        cursor.map_or_else(Self::first_page, Self::after)
    }

    /// Whether `post` belongs to the result set (ignoring ordering and limit).
    pub fn matches(&self, post: &Post) -> bool {
        post.is_eligible() && self.before.is_none_or(|cursor| post.id < cursor)
    }
}
