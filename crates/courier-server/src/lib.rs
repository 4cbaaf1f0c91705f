#![allow(clippy::missing_errors_doc, clippy::must_use_candidate)]

mod api;
mod auth;
mod boundary;
mod extract;
mod fallback;
mod health;
mod panic;
mod rate_limit;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use courier_config::{Config, ServerConfig};
use courier_errors::{DebugMode, ErrorHandler, LogSink, TracingSink};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Assembled server with all routes and middleware
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
}

impl Server {
    /// Build the server from configuration, logging failures through `tracing`
    ///
    /// # Errors
    ///
    /// Returns an error if rate-limiter construction fails
    pub fn new(config: Config) -> anyhow::Result<Self> {
        Self::with_log_sink(config, Arc::new(TracingSink))
    }

    /// Build the server with a custom failure log sink
    ///
    /// # Errors
    ///
    /// Returns an error if rate-limiter construction fails
    pub fn with_log_sink(config: Config, sink: Arc<dyn LogSink>) -> anyhow::Result<Self> {
        let listen_address = config
            .server
            .listen_address
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

        let debug = DebugMode::from(config.app.debug);
        if debug.is_enabled() {
            tracing::warn!(environment = %config.app.environment, "debug mode is on, failure responses include diagnostics");
        }

        panic::install_hook();

        let handler = ErrorHandler::with_sink(debug, sink);
        let state = AppState::from_config(&config);
        let partners = auth::PartnerDirectory::from_config(&config.auth);

        let mut app = Router::new();

        if config.server.health.enabled {
            app = app.route(&config.server.health.path, axum::routing::get(health::health_handler));
        }

        app = app.nest(&config.server.api_prefix, api::router(state, partners));

        let router = with_boundary(app, &config.server, handler)?;

        Ok(Self {
            router,
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
    /// Useful for testing when the caller manages the listener. Serve it with
    /// connect info so per-IP limits can see the peer address.
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

        axum::serve(listener, self.router.into_make_service_with_connect_info::<SocketAddr>())
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                tracing::info!("graceful shutdown initiated");
            })
            .await?;

        Ok(())
    }
}

/// Add the fallbacks and wrap `app` in the failure-handling middleware stack
fn with_boundary(app: Router, config: &ServerConfig, handler: ErrorHandler) -> anyhow::Result<Router> {
    let mut app = app
        .fallback(fallback::route_not_found)
        .method_not_allowed_fallback(fallback::method_not_allowed);

    // Apply middleware layers (innermost first)

    // Rate limiting
    if let Some(ref rl_config) = config.rate_limit {
        let limiter = Arc::new(courier_ratelimit::create_request_limiter(rl_config)?);
        let hops = rl_config.trusted_proxy_hops;
        app = app.layer(axum::middleware::from_fn(move |req, next| {
            let limiter = Arc::clone(&limiter);
            async move { rate_limit::rate_limit_middleware(limiter, hops, req, next).await }
        }));
    }

    // Panics become unclassified failures for the boundary below
    app = app.layer(CatchPanicLayer::custom(panic::panic_response));

    // Failure boundary
    let boundary = boundary::Boundary::new(handler, &config.api_prefix);
    app = app.layer(axum::middleware::from_fn(move |req, next| {
        let boundary = boundary.clone();
        async move { boundary::error_boundary(boundary, req, next).await }
    }));

    // Tracing
    Ok(app.layer(TraceLayer::new_for_http()))
}
