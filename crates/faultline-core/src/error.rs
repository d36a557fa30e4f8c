use http::StatusCode;
use strum::{Display, EnumIter, IntoStaticStr};
use thiserror::Error;

/// Trait for errors that can be translated into an HTTP error response
///
/// The dispatcher only needs the error's kind and its `Display` text, so any
/// feature crate can plug its own error type in without depending on axum.
/// The status always comes from [`ErrorKind::status_code`].
pub trait HttpError: std::error::Error {
    /// Category used for status lookup and logging
    fn kind(&self) -> ErrorKind;
}

/// Closed set of error categories a handler can raise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr, EnumIter)]
pub enum ErrorKind {
    BadRequest,
    InvalidRequest,
    ResourceNotFound,
    Conflict,
    ForbiddenAccess,
    TooManyRequests,
    ServiceUnavailable,
    /// Anything not classified by the application
    Internal,
}

impl ErrorKind {
    /// Fixed status table
    pub const fn status_code(self) -> StatusCode {
        match self {
            Self::BadRequest | Self::InvalidRequest => StatusCode::BAD_REQUEST,
            Self::ForbiddenAccess => StatusCode::FORBIDDEN,
            Self::ResourceNotFound => StatusCode::NOT_FOUND,
            Self::Conflict => StatusCode::CONFLICT,
            Self::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            Self::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Name used in log lines (e.g. `ResourceNotFound`)
    pub fn name(self) -> &'static str {
        self.into()
    }
}

/// Error raised by request handlers
///
/// Handlers return this instead of building an error payload themselves;
/// the dispatcher turns it into the uniform JSON body. Any other error type
/// converts into [`ApiError::Internal`] through `?`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed request (unparseable body, bad path parameter)
    #[error("{0}")]
    BadRequest(String),

    /// Well-formed request that fails an application check
    #[error("{0}")]
    InvalidRequest(String),

    /// Requested resource does not exist
    #[error("{0}")]
    ResourceNotFound(String),

    /// Request conflicts with existing state
    #[error("{0}")]
    Conflict(String),

    /// Caller may not perform the operation
    #[error("{0}")]
    ForbiddenAccess(String),

    /// Caller exceeded a rate limit
    #[error("{0}")]
    TooManyRequests(String),

    /// A dependency is temporarily unavailable
    #[error("{0}")]
    ServiceUnavailable(String),

    /// Unclassified failure
    #[error("{0:#}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// Build an error of the given kind
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        match kind {
            ErrorKind::BadRequest => Self::BadRequest(message),
            ErrorKind::InvalidRequest => Self::InvalidRequest(message),
            ErrorKind::ResourceNotFound => Self::ResourceNotFound(message),
            ErrorKind::Conflict => Self::Conflict(message),
            ErrorKind::ForbiddenAccess => Self::ForbiddenAccess(message),
            ErrorKind::TooManyRequests => Self::TooManyRequests(message),
            ErrorKind::ServiceUnavailable => Self::ServiceUnavailable(message),
            ErrorKind::Internal => Self::Internal(anyhow::Error::msg(message)),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::ResourceNotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::ForbiddenAccess(message.into())
    }

    pub fn too_many_requests(message: impl Into<String>) -> Self {
        Self::TooManyRequests(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        self.kind().status_code()
    }

    /// The message the error was raised with
    ///
    /// For [`ApiError::Internal`] this is the full cause chain, which is
    /// meant for logs, not for clients.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl HttpError for ApiError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::BadRequest(_) => ErrorKind::BadRequest,
            Self::InvalidRequest(_) => ErrorKind::InvalidRequest,
            Self::ResourceNotFound(_) => ErrorKind::ResourceNotFound,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::ForbiddenAccess(_) => ErrorKind::ForbiddenAccess,
            Self::TooManyRequests(_) => ErrorKind::TooManyRequests,
            Self::ServiceUnavailable(_) => ErrorKind::ServiceUnavailable,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }
}

#[cfg(feature = "axum")]
mod into_response {
    use std::sync::Arc;

    use axum::response::{IntoResponse, Response};

    use super::ApiError;

    /// Marker carried in response extensions by a response built from an
    /// [`ApiError`]
    ///
    /// The error boundary middleware looks for it and replaces the bodiless
    /// response with the dispatched one.
    #[derive(Debug, Clone)]
    pub struct RaisedError(Arc<ApiError>);

    impl RaisedError {
        pub fn error(&self) -> &ApiError {
            &self.0
        }
    }

    impl IntoResponse for ApiError {
        fn into_response(self) -> Response {
            let mut response = self.status_code().into_response();
            response.extensions_mut().insert(RaisedError(Arc::new(self)));
            response
        }
    }
}

#[cfg(feature = "axum")]
pub use into_response::RaisedError;
