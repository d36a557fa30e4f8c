use http::StatusCode;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::TraceId;

/// Uniform error body returned for every handled error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Instant the error was dispatched
    pub timestamp: Timestamp,
    /// Numeric HTTP status
    pub status: u16,
    /// Standard reason phrase for `status`
    pub error: String,
    /// Client-facing message (may be empty, never omitted)
    pub message: String,
    /// Path of the request that failed
    pub path: String,
    /// Trace id of the request, `null` outside a traced request
    pub trace_id: Option<TraceId>,
}

impl ErrorResponse {
    /// Build a response stamped with the current time
    pub fn new(status: StatusCode, message: impl Into<String>, path: impl Into<String>, trace_id: Option<TraceId>) -> Self {
        Self {
            timestamp: Timestamp::now(),
            status: status.as_u16(),
            error: status.canonical_reason().unwrap_or("Unknown").to_owned(),
            message: message.into(),
            path: path.into(),
            trace_id,
        }
    }

    /// Replace the timestamp
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = timestamp;
        self
    }
}
