//! Failure → HTTP status translation shared by all handlers.
//!
//! Handlers return `Result<_, ApiError>` and propagate with `?`. Responses
//! carry a status code only; no error body is ever sent.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use postboard_core::DomainError;
use postboard_infra::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing record, unparsable identifier, or empty listing page.
    #[error("not found")]
    NotFound,

    /// Anything else. Logged once when turned into a response.
    #[error("internal error: {0:#}")]
    Internal(#[from] anyhow::Error),
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound | DomainError::InvalidId(_) => ApiError::NotFound,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Internal(err.into())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(err) = &self {
            tracing::error!(error = %format!("{err:#}"), "request failed");
        }
        self.status().into_response()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::Context;
    use tracing_subscriber::Layer;

    /// Counts ERROR-level events.
    #[derive(Clone, Default)]
    pub(crate) struct ErrorCounter(Arc<AtomicUsize>);

    impl ErrorCounter {
        pub(crate) fn count(&self) -> usize {
            self.0.load(Ordering::SeqCst)
        }
    }

    impl<S: Subscriber> Layer<S> for ErrorCounter {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == Level::ERROR {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }
}
