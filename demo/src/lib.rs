#![allow(clippy::must_use_candidate)]

//! Demo user API
//!
//! Every handler raises typed [`ApiError`](faultline_core::ApiError)s and
//! leaves status codes, error bodies and logging to the error handling layer.

pub mod extract;
pub mod users;

use axum::Router;

/// All demo routes, ready to hand to [`faultline_server::Server::new`]
pub fn router() -> Router {
    Router::new().nest("/api/users", users::router())
}
