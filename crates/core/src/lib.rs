//! `postboard-core` — read-side domain model for posts.
//!
//! This crate contains **pure domain** types (no infrastructure concerns): the
//! entities served by the API, their identifiers, and the listing filter.

pub mod error;
pub mod id;
pub mod post;

pub use error::{DomainError, DomainResult};
pub use id::{CategoryId, PostId, UserId};
pub use post::{Category, PAGE_SIZE, Post, PostListQuery, User};
