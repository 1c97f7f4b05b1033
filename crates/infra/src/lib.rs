//! Infrastructure layer: post persistence and process configuration.

pub mod config;
pub mod post_store;

pub use config::{AppConfig, ConfigError};
pub use post_store::{InMemoryPostStore, PostStore, PostgresPostStore, StoreError};
