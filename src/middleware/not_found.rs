use axum::extract::State;

use crate::error::{ApiError, ErrorVerbosityProvider, NotFoundError};

/// Fallback handler for unknown routes.
pub async fn not_found<S: ErrorVerbosityProvider>(State(state): State<S>) -> ApiError {
    tracing::warn!("Route not found");

    NotFoundError::new(state.error_verbosity()).into()
}
