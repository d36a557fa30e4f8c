use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use faultline_core::{ApiError, RaisedError};
use futures_util::FutureExt;

use crate::dispatcher::Dispatcher;

/// Final catch point for everything raised while handling a request
///
/// Responses produced from an [`ApiError`] carry a [`RaisedError`] marker
/// and are replaced with the dispatcher's response. A panicking handler is
/// dispatched as an internal error. Anything else passes through untouched.
pub async fn error_boundary(State(dispatcher): State<Arc<Dispatcher>>, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();

    match AssertUnwindSafe(next.run(request)).catch_unwind().await {
        Ok(mut response) => match response.extensions_mut().remove::<RaisedError>() {
            Some(raised) => dispatcher.respond(raised.error(), &path),
            None => response,
        },
        Err(payload) => {
            let error = ApiError::internal(panic_message(payload.as_ref()));
            dispatcher.respond(&error, &path)
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "handler panicked".to_owned()
    }
}
