//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;

use faultline_config::{Config, ErrorHandlingConfig, HealthConfig, ServerConfig};

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with minimal defaults
    pub fn new() -> Self {
        Self {
            config: Config {
                server: ServerConfig {
                    listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
                    health: HealthConfig::default(),
                },
                errors: ErrorHandlingConfig::default(),
                telemetry: None,
            },
        }
    }

    /// Disable health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Put raw internal error messages in response bodies
    pub fn exposing_internal_messages(mut self) -> Self {
        self.config.errors.expose_internal_messages = true;
        self
    }

    /// Replace the generic message used for internal errors
    pub fn with_internal_message(mut self, message: &str) -> Self {
        message.clone_into(&mut self.config.errors.internal_message);
        self
    }

    /// Echo the trace id under a different response header
    pub fn with_trace_header(mut self, header: &str) -> Self {
        header.clone_into(&mut self.config.errors.trace_header);
        self
    }

    /// Stop echoing the trace id in a response header
    pub fn without_trace_header(mut self) -> Self {
        self.config.errors.echo_trace_header = false;
        self
    }

    /// Turn off global error handling entirely
    pub fn without_error_handling(mut self) -> Self {
        self.config.errors.enabled = false;
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config
    }
}
