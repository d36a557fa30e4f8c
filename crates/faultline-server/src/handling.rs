use std::sync::Arc;

use axum::Router;
use faultline_config::ErrorHandlingConfig;
use faultline_core::ApiError;
use http::{Method, Uri};

use crate::boundary::error_boundary;
use crate::dispatcher::Dispatcher;
use crate::trace_id::{TraceIdState, trace_id_middleware};

/// Installs global error handling on a router
pub trait ErrorHandlingExt: Sized {
    /// Wrap every route with the trace id middleware (outermost) and the
    /// error boundary
    ///
    /// Layers added afterwards sit outside both and see neither the trace
    /// id nor the dispatched body. A no-op when `config.enabled` is false.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured trace header name is invalid
    fn with_error_handling(self, config: &ErrorHandlingConfig) -> anyhow::Result<Self>;
}

impl<S> ErrorHandlingExt for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_error_handling(self, config: &ErrorHandlingConfig) -> anyhow::Result<Self> {
        if !config.enabled {
            tracing::info!("global error handling disabled");
            return Ok(self);
        }

        let dispatcher = Arc::new(Dispatcher::new(config));
        tracing::info!(
            expose_internal_messages = config.expose_internal_messages,
            "registering error dispatcher"
        );

        let trace_state = TraceIdState::from_config(config)?;
        tracing::info!(
            header = trace_state.header().map_or("-", |h| h.as_str()),
            "registering trace id middleware"
        );

        Ok(self
            .layer(axum::middleware::from_fn_with_state(dispatcher, error_boundary))
            .layer(axum::middleware::from_fn_with_state(trace_state, trace_id_middleware)))
    }
}

/// Fallback handler for requests no route matched
pub async fn route_not_found(method: Method, uri: Uri) -> ApiError {
    ApiError::not_found(format!("No route for {method} {}", uri.path()))
}

/// Fallback for a known path requested with a method it does not serve
pub async fn method_not_allowed(method: Method, uri: Uri) -> ApiError {
    ApiError::bad_request(format!("Method {method} is not supported for {}", uri.path()))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::extract::Request;
    use axum::routing::{delete, get};
    use faultline_core::ErrorResponse;
    use http::StatusCode;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;
    use crate::trace_id;

    async fn bulk_delete() -> Result<&'static str, ApiError> {
        Err(ApiError::forbidden("Bulk delete is not allowed"))
    }

    async fn lookup() -> Result<String, ApiError> {
        let id = trace_id::current().ok_or_else(|| ApiError::internal("no trace id"))?;
        Ok(id.to_string())
    }

    fn app(config: &ErrorHandlingConfig) -> Router {
        Router::new()
            .route("/api/users/all", delete(bulk_delete))
            .route("/api/lookup", get(lookup))
            .fallback(route_not_found)
            .method_not_allowed_fallback(method_not_allowed)
            .with_error_handling(config)
            .unwrap()
    }

    async fn send(app: Router, method: Method, uri: &str) -> (StatusCode, Option<String>, Vec<u8>) {
        let response = app
            .oneshot(Request::builder().method(method).uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let header = response
            .headers()
            .get("x-trace-id")
            .map(|v| v.to_str().unwrap().to_owned());
        let bytes = response.into_body().collect().await.unwrap().to_bytes().to_vec();

        (status, header, bytes)
    }

    #[tokio::test]
    async fn error_body_carries_the_request_trace_id() {
        let (status, header, bytes) =
            send(app(&ErrorHandlingConfig::default()), Method::DELETE, "/api/users/all").await;
        let body: ErrorResponse = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body.message, "Bulk delete is not allowed");
        assert_eq!(body.path, "/api/users/all");
        assert_eq!(body.trace_id.map(|id| id.to_string()), header);
        assert!(trace_id::current().is_none());
    }

    #[tokio::test]
    async fn handlers_can_read_the_trace_id() {
        let (status, header, bytes) = send(app(&ErrorHandlingConfig::default()), Method::GET, "/api/lookup").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(Some(String::from_utf8(bytes).unwrap()), header);
    }

    #[tokio::test]
    async fn unknown_routes_are_dispatched_as_not_found() {
        let (status, _, bytes) = send(app(&ErrorHandlingConfig::default()), Method::GET, "/nope").await;
        let body: ErrorResponse = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.message, "No route for GET /nope");
    }

    #[tokio::test]
    async fn unsupported_methods_get_the_uniform_body() {
        let (status, header, bytes) = send(app(&ErrorHandlingConfig::default()), Method::POST, "/api/users/all").await;
        let body: ErrorResponse = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "Bad Request");
        assert_eq!(body.message, "Method POST is not supported for /api/users/all");
        assert_eq!(body.trace_id.map(|id| id.to_string()), header);
    }

    #[tokio::test]
    async fn disabled_handling_leaves_the_router_alone() {
        let config = ErrorHandlingConfig {
            enabled: false,
            ..ErrorHandlingConfig::default()
        };

        let (status, header, bytes) = send(app(&config), Method::DELETE, "/api/users/all").await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(header.is_none());
        assert!(bytes.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_requests_never_share_ids() {
        let app = app(&ErrorHandlingConfig::default());

        let handles: Vec<_> = (0..64)
            .map(|_| {
                let app = app.clone();
                tokio::spawn(async move { send(app, Method::DELETE, "/api/users/all").await })
            })
            .collect();

        let mut ids = std::collections::HashSet::new();
        for handle in handles {
            let (_, header, bytes) = handle.await.unwrap();
            let body: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
            let id = body.trace_id.unwrap();

            assert_eq!(Some(id.to_string()), header);
            assert!(ids.insert(id));
        }

        assert_eq!(ids.len(), 64);
    }
}
