//! Central translation of raised errors into HTTP responses

use axum::response::{IntoResponse, Response};
use faultline_config::ErrorHandlingConfig;
use faultline_core::{ErrorKind, ErrorResponse, HttpError, TraceId};
use http::StatusCode;
use http::header::CONTENT_TYPE;

use crate::trace_id;

/// Maps an error to its status and uniform body, and logs it
///
/// Holds only immutable settings and is shared across requests behind an
/// `Arc`.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    expose_internal_messages: bool,
    internal_message: String,
}

impl Dispatcher {
    pub fn new(config: &ErrorHandlingConfig) -> Self {
        Self {
            expose_internal_messages: config.expose_internal_messages,
            internal_message: config.internal_message.clone(),
        }
    }

    /// Build the status and body for `error` raised while serving `path`
    ///
    /// The trace id is read from the current request scope. Logs at `error`
    /// for 5xx and `warn` otherwise, always with the raw message.
    pub fn dispatch<E>(&self, error: &E, path: &str) -> (StatusCode, ErrorResponse)
    where
        E: HttpError + ?Sized,
    {
        let kind = error.kind();
        let status = kind.status_code();
        let raw_message = error.to_string();
        let trace_id = trace_id::current();

        log_handled(kind, status, path, &raw_message, trace_id.as_ref());

        let message = if kind == ErrorKind::Internal && !self.expose_internal_messages {
            self.internal_message.clone()
        } else {
            raw_message
        };

        (status, ErrorResponse::new(status, message, path, trace_id))
    }

    /// Dispatch `error` and render the result as a JSON response
    pub fn respond<E>(&self, error: &E, path: &str) -> Response
    where
        E: HttpError + ?Sized,
    {
        let (status, body) = self.dispatch(error, path);
        self.render(status, &body)
    }

    /// Serialize `body`, degrading to a fixed 500 body if that fails
    pub fn render(&self, status: StatusCode, body: &ErrorResponse) -> Response {
        match serde_json::to_vec(body) {
            Ok(bytes) => (status, [(CONTENT_TYPE, "application/json")], bytes).into_response(),
            Err(e) => {
                tracing::error!(error = %e, path = %body.path, "failed to serialize error response");
                self.fallback(&body.path, body.trace_id.as_ref())
            }
        }
    }

    fn fallback(&self, path: &str, trace_id: Option<&TraceId>) -> Response {
        let status = StatusCode::INTERNAL_SERVER_ERROR;
        let body = serde_json::json!({
            "timestamp": jiff::Timestamp::now().to_string(),
            "status": status.as_u16(),
            "error": status.canonical_reason(),
            "message": self.internal_message,
            "path": path,
            "traceId": trace_id.map(TraceId::as_str),
        });

        (status, [(CONTENT_TYPE, "application/json")], body.to_string()).into_response()
    }
}

fn log_handled(kind: ErrorKind, status: StatusCode, path: &str, message: &str, trace_id: Option<&TraceId>) {
    let trace_id = trace_id.map_or("-", TraceId::as_str);

    if status.is_server_error() {
        tracing::error!(kind = kind.name(), status = status.as_u16(), path, detail = message, trace_id, "handled error");
    } else {
        tracing::warn!(kind = kind.name(), status = status.as_u16(), path, detail = message, trace_id, "handled error");
    }
}
