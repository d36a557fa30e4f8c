//! Faultline server: centralized error handling for axum
//!
//! Handlers return [`ApiError`](faultline_core::ApiError); the error
//! boundary hands it to the [`Dispatcher`], which picks the status from a
//! fixed table, builds the uniform JSON body with the request's trace id and
//! logs the event. [`ErrorHandlingExt`] wires both middlewares onto any
//! router; [`Server`] adds the health route and serves it.

mod boundary;
pub mod dispatcher;
mod handling;
mod health;
pub mod trace_id;

use std::net::SocketAddr;

use axum::Router;
use faultline_config::Config;
use tower_http::trace::TraceLayer;

pub use boundary::error_boundary;
pub use dispatcher::Dispatcher;
pub use handling::{ErrorHandlingExt, method_not_allowed, route_not_found};

/// Assembled server with all routes and middleware
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
}

impl Server {
    /// Build the server around the application's routes
    ///
    /// # Errors
    ///
    /// Returns an error if the error handling configuration is unusable
    pub fn new(config: &Config, routes: Router) -> anyhow::Result<Self> {
        let listen_address = config
            .server
            .listen_address
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 8080)));

        let mut app = Router::new();

        // Health check
        if config.server.health.enabled {
            app = app.route(&config.server.health.path, axum::routing::get(health::health_handler));
        }

        app = app.merge(routes).fallback(route_not_found);

        // Must follow the merge so every method router picks it up
        if config.errors.enabled {
            app = app.method_not_allowed_fallback(method_not_allowed);
        }

        // Tracing (inside the trace id span so its events carry the id)
        app = app.layer(TraceLayer::new_for_http());

        // Trace id + error boundary (outermost)
        app = app.with_error_handling(&config.errors)?;

        Ok(Self {
            router: app,
            listen_address,
        })
    }

    /// Get the configured listen address
    #[must_use]
    pub const fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    /// Consume the server and return the inner router
    ///
    /// Useful for testing when the caller manages the listener
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Start serving requests
    ///
    /// Blocks until the cancellation token is triggered.
    ///
    /// # Errors
    ///
    /// Returns an error if binding the TCP listener or serving fails
    pub async fn serve(self, shutdown: tokio_util::sync::CancellationToken) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                tracing::info!("graceful shutdown initiated");
            })
            .await?;

        Ok(())
    }
}
