use axum::{
    extract::rejection::PathRejection,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use derive_more::From;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::ValidationErrors;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ErrorVerbosity {
    /// Server returns an empty response with [`StatusCode::NO_CONTENT`] for all errors.
    None,
    /// Server returns only the appropriate status code.
    StatusCode,
    /// Server returns only the message with the appropriate status code.
    Message,
    /// Server returns the message, the error type with cleared error content and the appropriate status code.
    Type,
    /// Server returns the message, the error type with the error content and the appropriate status code.
    Full,
}

impl ErrorVerbosity {
    pub fn should_generate_message(&self) -> bool {
        matches!(
            self,
            ErrorVerbosity::Message | ErrorVerbosity::Type | ErrorVerbosity::Full
        )
    }

    pub fn should_generate_error_reason(&self) -> bool {
        matches!(self, ErrorVerbosity::Full)
    }
}

pub trait ErrorVerbosityProvider {
    fn error_verbosity(&self) -> ErrorVerbosity;
}

/// Creates a closure mapping any error into an [`ApiError::InternalServerError`].
///
/// `state` must implement [`ErrorVerbosityProvider`].
#[macro_export]
macro_rules! server_error {
    ($state:expr) => {
        |err| {
            $crate::error::ApiError::from($crate::error::InternalServerError::from_generic_error(
                $crate::error::ErrorVerbosityProvider::error_verbosity(&$state),
                err,
            ))
        }
    };
}

#[derive(Debug, Serialize)]
struct ApiErrorResponse {
    #[serde(flatten)]
    error: ApiError,
    message: &'static str,
}

#[derive(Debug, Serialize)]
struct ApiErrorMessage {
    message: &'static str,
}

/// Renders an error body according to the given verbosity.
fn verbose_response<B: Serialize>(
    verbosity: ErrorVerbosity,
    status_code: StatusCode,
    headers: HeaderMap,
    message: &'static str,
    body: B,
) -> Response {
    match verbosity {
        ErrorVerbosity::None => StatusCode::NO_CONTENT.into_response(),
        ErrorVerbosity::StatusCode => (status_code, headers).into_response(),
        ErrorVerbosity::Message => {
            (status_code, headers, Json(ApiErrorMessage { message })).into_response()
        }
        ErrorVerbosity::Type | ErrorVerbosity::Full => {
            (status_code, headers, Json(body)).into_response()
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        let verbosity = self.error.verbosity();
        let status_code = self.error.status_code();
        let message = self.message;

        verbose_response(verbosity, status_code, HeaderMap::new(), message, self)
    }
}

#[derive(Debug, From, Serialize, ToSchema)]
#[serde(tag = "error_type", content = "error")]
/// API error
pub enum ApiError {
    /// Internal server error
    ///
    /// This error is returned when an internal server error occurs.
    InternalServerError(InternalServerError),
    /// Body error
    ///
    /// This error is returned when the body is not as expected.
    Body(BodyError),
    /// Path error
    ///
    /// This error is returned when the path is not as expected.
    Path(PathError),
    /// Validation error
    ///
    /// This error is returned when the extracted data violates its validation rules.
    Validation(ValidationError),
    /// Method not allowed
    ///
    /// This error is returned when the method is not allowed.
    MethodNotAllowed(MethodNotAllowedError),
    /// Not found error
    ///
    /// This error is returned when the requested route is not found.
    NotFound(NotFoundError),
}

impl ApiError {
    fn verbosity(&self) -> ErrorVerbosity {
        match self {
            ApiError::InternalServerError(err) => err.verbosity,
            ApiError::Body(err) => err.verbosity,
            ApiError::Path(err) => err.verbosity,
            ApiError::Validation(err) => err.verbosity,
            ApiError::MethodNotAllowed(err) => err.verbosity,
            ApiError::NotFound(err) => err.verbosity,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            ApiError::InternalServerError(_) => "An internal server error has occurred",
            ApiError::Body(_) => "Failed to parse request body",
            ApiError::Path(_) => "Failed to parse path parameters",
            ApiError::Validation(_) => "Validation failed",
            ApiError::MethodNotAllowed(_) => "Method not allowed",
            ApiError::NotFound(_) => "The requested resource was not found",
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Body(_) | ApiError::Path(_) | ApiError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl From<ApiError> for ApiErrorResponse {
    fn from(error: ApiError) -> Self {
        let message = match error.verbosity().should_generate_message() {
            true => error.message(),
            false => "",
        };

        ApiErrorResponse { error, message }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        ApiErrorResponse::from(self).into_response()
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InternalServerError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
    internal_server_error: Option<String>,
}

impl InternalServerError {
    pub fn from_generic_error<E: Into<anyhow::Error>>(verbosity: ErrorVerbosity, err: E) -> Self {
        let err: anyhow::Error = err.into();
        let err = format!("{err:#}");
        tracing::error!(%err, "Internal server error");

        let internal_server_error = verbosity.should_generate_error_reason().then_some(err);

        InternalServerError {
            verbosity,
            internal_server_error,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BodyError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
    body_error_reason: Option<String>,
    body_expected_schema: Option<String>,
}

impl BodyError {
    pub fn new(
        verbosity: ErrorVerbosity,
        body_error_reason: String,
        body_expected_schema: String,
    ) -> Self {
        let (body_error_reason, body_expected_schema) =
            match verbosity.should_generate_error_reason() {
                true => (Some(body_error_reason), Some(body_expected_schema)),
                false => (None, None),
            };

        BodyError {
            verbosity,
            body_error_reason,
            body_expected_schema,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PathError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
    path_error_reason: Option<String>,
}

impl PathError {
    pub fn new(verbosity: ErrorVerbosity, path_error_reason: String) -> Self {
        let path_error_reason = verbosity
            .should_generate_error_reason()
            .then_some(path_error_reason);

        PathError {
            verbosity,
            path_error_reason,
        }
    }

    pub fn from_path_rejection(verbosity: ErrorVerbosity, rejection: PathRejection) -> ApiError {
        PathError::new(verbosity, rejection.body_text()).into()
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ValidationError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
    #[schema(value_type = Option<Object>)]
    validation_errors: Option<ValidationErrors>,
}

impl ValidationError {
    pub fn from_validation_errors(verbosity: ErrorVerbosity, errors: ValidationErrors) -> Self {
        let validation_errors = verbosity.should_generate_error_reason().then_some(errors);

        ValidationError {
            verbosity,
            validation_errors,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MethodNotAllowedError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
}

impl MethodNotAllowedError {
    pub fn new(verbosity: ErrorVerbosity) -> Self {
        MethodNotAllowedError { verbosity }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NotFoundError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
}

impl NotFoundError {
    pub fn new(verbosity: ErrorVerbosity) -> Self {
        NotFoundError { verbosity }
    }
}

/// Describes the errors a single resource can produce.
///
/// Implemented by a route's error type enum, which is serialized (flattened) into the response.
pub trait ResourceErrorProvider {
    type Context: Serialize;

    fn headers(&self) -> Option<HeaderMap>;

    fn status_code(&self) -> StatusCode;

    fn message(&self) -> &'static str;

    fn context(&self) -> Self::Context;
}

#[derive(Debug, Serialize)]
pub struct ResourceError<T, C> {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
    #[serde(flatten)]
    error: T,
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<C>,
}

impl<T, C> ResourceError<T, C>
where
    T: ResourceErrorProvider<Context = C>,
{
    pub fn new(verbosity: ErrorVerbosity, error: T) -> Self {
        let message = match verbosity.should_generate_message() {
            true => error.message(),
            false => "",
        };

        let context = verbosity
            .should_generate_error_reason()
            .then(|| error.context());

        ResourceError {
            verbosity,
            error,
            message,
            context,
        }
    }
}

impl<T, C> IntoResponse for ResourceError<T, C>
where
    T: ResourceErrorProvider<Context = C> + Serialize,
    C: Serialize,
{
    fn into_response(self) -> Response {
        let verbosity = self.verbosity;
        let status_code = self.error.status_code();
        let headers = self.error.headers().unwrap_or_default();
        let message = self.message;

        verbose_response(verbosity, status_code, headers, message, self)
    }
}

/// The error returned by a resource handler.
///
/// Either a generic [`ApiError`] or an error specific to the resource.
#[derive(Debug)]
pub enum RouteError<T, C> {
    Api(ApiError),
    Resource(ResourceError<T, C>),
}

impl<T, C> From<ApiError> for RouteError<T, C> {
    fn from(err: ApiError) -> Self {
        RouteError::Api(err)
    }
}

impl<T, C> From<ResourceError<T, C>> for RouteError<T, C> {
    fn from(err: ResourceError<T, C>) -> Self {
        RouteError::Resource(err)
    }
}

impl<T, C> IntoResponse for RouteError<T, C>
where
    T: ResourceErrorProvider<Context = C> + Serialize,
    C: Serialize,
{
    fn into_response(self) -> Response {
        match self {
            RouteError::Api(err) => err.into_response(),
            RouteError::Resource(err) => err.into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_full_verbosity_generates_reasons() {
        assert!(ErrorVerbosity::Full.should_generate_error_reason());
        assert!(!ErrorVerbosity::Type.should_generate_error_reason());
        assert!(!ErrorVerbosity::Message.should_generate_error_reason());
    }

    #[test]
    fn none_verbosity_has_no_message() {
        assert!(!ErrorVerbosity::None.should_generate_message());
        assert!(!ErrorVerbosity::StatusCode.should_generate_message());
        assert!(ErrorVerbosity::Message.should_generate_message());
    }

    #[test]
    fn api_error_status_codes() {
        let not_found = ApiError::from(NotFoundError::new(ErrorVerbosity::Full));
        assert_eq!(not_found.into_response().status(), StatusCode::NOT_FOUND);

        let body = ApiError::from(BodyError::new(
            ErrorVerbosity::Full,
            "reason".to_string(),
            "schema".to_string(),
        ));
        assert_eq!(body.into_response().status(), StatusCode::BAD_REQUEST);

        let internal = ApiError::from(InternalServerError::from_generic_error(
            ErrorVerbosity::StatusCode,
            anyhow::anyhow!("boom"),
        ));
        assert_eq!(
            internal.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn none_verbosity_hides_the_status_code() {
        let err = ApiError::from(NotFoundError::new(ErrorVerbosity::None));
        assert_eq!(err.into_response().status(), StatusCode::NO_CONTENT);
    }

    #[test]
    fn full_verbosity_serializes_error_type_and_reason() {
        let err = ApiErrorResponse::from(ApiError::from(PathError::new(
            ErrorVerbosity::Full,
            "bad path".to_string(),
        )));

        let value = serde_json::to_value(&err).expect("serializable");
        assert_eq!(value["error_type"], "Path");
        assert_eq!(value["error"]["path_error_reason"], "bad path");
        assert_eq!(value["message"], "Failed to parse path parameters");
    }

    #[test]
    fn type_verbosity_clears_reason() {
        let err = ApiErrorResponse::from(ApiError::from(PathError::new(
            ErrorVerbosity::Type,
            "bad path".to_string(),
        )));

        let value = serde_json::to_value(&err).expect("serializable");
        assert_eq!(value["error_type"], "Path");
        assert!(value["error"]["path_error_reason"].is_null());
    }
}
