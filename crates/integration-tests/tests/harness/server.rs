//! Test server wrapper that starts Courier on a random port

use std::net::SocketAddr;
use std::sync::Arc;

use courier_config::Config;
use courier_server::Server;
use tokio_util::sync::CancellationToken;

use super::sink::RecordingSink;

/// A running test server instance
pub struct TestServer {
    addr: SocketAddr,
    shutdown: CancellationToken,
    client: reqwest::Client,
    sink: RecordingSink,
}

impl TestServer {
    /// Start a test server with the given configuration
    ///
    /// Binds to port 0 for automatic port assignment. Failure log records
    /// are captured and available through [`TestServer::logs`].
    pub async fn start(config: Config) -> anyhow::Result<Self> {
        let sink = RecordingSink::default();
        let server = Server::with_log_sink(config, Arc::new(sink.clone()))?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        // Bind the listener here so we know the actual port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        tokio::spawn(async move {
            axum::serve(
                listener,
                server.into_router().into_make_service_with_connect_info::<SocketAddr>(),
            )
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        let client = reqwest::Client::new();

        Ok(Self {
            addr,
            shutdown,
            client,
            sink,
        })
    }

    /// Base URL of the running test server
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Get a reference to the HTTP client
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// GET with a partner bearer token
    pub fn get_as(&self, token: &str, path: &str) -> reqwest::RequestBuilder {
        self.client.get(self.url(path)).bearer_auth(token)
    }

    /// POST with a partner bearer token
    pub fn post_as(&self, token: &str, path: &str) -> reqwest::RequestBuilder {
        self.client.post(self.url(path)).bearer_auth(token)
    }

    /// Failure log records written so far
    pub fn logs(&self) -> Vec<courier_errors::LogRecord> {
        self.sink.records()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
