use axum::extract::FromRequest;

use crate::error::ApiError;

/// An extractor that exposes the value it extracted.
pub trait ExtractorFromRequest<S>: FromRequest<S, Rejection = ApiError> {
    type Extracted;

    fn extracted(&self) -> &Self::Extracted;
}
