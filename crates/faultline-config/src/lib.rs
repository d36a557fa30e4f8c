#![allow(clippy::must_use_candidate)]

mod env;
pub mod errors;
pub mod health;
mod loader;
pub mod server;
pub mod telemetry;

use serde::Deserialize;

pub use errors::*;
pub use health::*;
pub use server::*;
pub use telemetry::*;

/// Top-level Faultline configuration
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Listener and built-in routes
    #[serde(default)]
    pub server: ServerConfig,
    /// Error dispatching and trace id propagation
    #[serde(default)]
    pub errors: ErrorHandlingConfig,
    /// Logging setup
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}
