//! Shared building blocks for Faultline
//!
//! The error taxonomy raised by request handlers, the structured body the
//! dispatcher turns it into, and the per-request trace identifier.

mod error;
mod response;
mod trace_id;

#[cfg(feature = "axum")]
pub use error::RaisedError;
pub use error::{ApiError, ErrorKind, HttpError};
pub use response::ErrorResponse;
pub use trace_id::TraceId;
