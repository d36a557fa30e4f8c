use http::StatusCode;

/// Liveness probe; sits behind the trace id middleware like any route
pub async fn health_handler() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}
