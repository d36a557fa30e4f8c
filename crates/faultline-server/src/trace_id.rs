//! Per-request trace id propagation
//!
//! The middleware is the only writer: it generates an id, installs it in a
//! task-local slot for the lifetime of the request future and removes it
//! when that future finishes, whether it returned, panicked or was dropped.
//! Application code can only read the slot through [`current`].

use std::future::Future;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use faultline_config::ErrorHandlingConfig;
use faultline_core::TraceId;
use http::{HeaderName, HeaderValue};
use tracing::Instrument;

tokio::task_local! {
    static CURRENT: TraceId;
}

/// Trace id of the request being handled by the current task
///
/// Returns `None` outside a request. Tasks spawned from a handler do not
/// inherit the id; wrap them with [`scope`] if they need it.
pub fn current() -> Option<TraceId> {
    CURRENT.try_with(Clone::clone).ok()
}

/// Run `future` with `trace_id` installed as the current id
pub async fn scope<F: Future>(trace_id: TraceId, future: F) -> F::Output {
    CURRENT.scope(trace_id, future).await
}

/// Settings for [`trace_id_middleware`]
#[derive(Debug, Clone)]
pub struct TraceIdState {
    header: Option<HeaderName>,
}

impl TraceIdState {
    /// Build from the error handling section of the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configured response header name is invalid
    pub fn from_config(config: &ErrorHandlingConfig) -> anyhow::Result<Self> {
        let header = if config.echo_trace_header {
            Some(
                HeaderName::try_from(config.trace_header.as_str())
                    .map_err(|e| anyhow::anyhow!("invalid trace header '{}': {e}", config.trace_header))?,
            )
        } else {
            None
        };

        Ok(Self { header })
    }

    /// Response header carrying the id, if echoing is enabled
    pub const fn header(&self) -> Option<&HeaderName> {
        self.header.as_ref()
    }
}

/// Middleware that assigns a fresh trace id to every request
///
/// The id is also inserted in request extensions (handlers can take
/// `Extension<TraceId>`) and recorded on a `request` span so every log line
/// of the request carries it.
pub async fn trace_id_middleware(State(state): State<TraceIdState>, mut request: Request, next: Next) -> Response {
    let trace_id = TraceId::generate();
    request.extensions_mut().insert(trace_id.clone());

    let span = tracing::info_span!(
        "request",
        trace_id = %trace_id,
        method = %request.method(),
        path = %request.uri().path(),
    );

    let mut response = scope(trace_id.clone(), next.run(request)).instrument(span).await;

    if let Some(name) = state.header
        && let Ok(value) = HeaderValue::from_str(trace_id.as_str())
    {
        response.headers_mut().insert(name, value);
    }

    response
}
