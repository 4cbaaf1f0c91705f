#![allow(clippy::must_use_candidate)]

pub mod app;
pub mod auth;
pub mod company;
mod env;
pub mod health;
mod loader;
pub mod orders;
pub mod rate_limit;
pub mod server;
pub mod telemetry;

use serde::Deserialize;

pub use app::*;
pub use auth::*;
pub use company::*;
pub use health::*;
pub use orders::*;
pub use rate_limit::*;
pub use server::*;
pub use telemetry::*;

/// Top-level Courier configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Application identity and debug switch
    #[serde(default)]
    pub app: AppConfig,
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Delivery partner credentials
    #[serde(default)]
    pub auth: AuthConfig,
    /// Company information served to partner apps
    #[serde(default)]
    pub company: CompanyConfig,
    /// Orders seeded into the in-memory order book
    #[serde(default)]
    pub orders: Vec<OrderConfig>,
    /// Logging configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}
