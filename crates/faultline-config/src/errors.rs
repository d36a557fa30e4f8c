use serde::Deserialize;

/// Central error handling configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ErrorHandlingConfig {
    /// Install the trace id middleware and the error dispatcher
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Send the raw message of unclassified errors to clients
    ///
    /// Off by default: internal failures may carry file paths, SQL or other
    /// details that only belong in logs.
    #[serde(default)]
    pub expose_internal_messages: bool,
    /// Message returned for unclassified errors when they are not exposed
    #[serde(default = "default_internal_message")]
    pub internal_message: String,
    /// Response header carrying the request's trace id
    #[serde(default = "default_trace_header")]
    pub trace_header: String,
    /// Set `trace_header` on every response
    #[serde(default = "default_true")]
    pub echo_trace_header: bool,
}

impl Default for ErrorHandlingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            expose_internal_messages: false,
            internal_message: default_internal_message(),
            trace_header: default_trace_header(),
            echo_trace_header: true,
        }
    }
}

#[allow(clippy::missing_const_for_fn)]
fn default_true() -> bool {
    true
}

fn default_internal_message() -> String {
    "An unexpected error occurred".to_string()
}

fn default_trace_header() -> String {
    "x-trace-id".to_string()
}
