//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;

use courier_config::{
    CompanyConfig, Config, HealthConfig, OrderConfig, OrderStatus, PartnerConfig, RateLimitConfig, RequestRateLimit,
    ServerConfig,
};
use secrecy::SecretString;

/// Token of the active partner every builder starts with
pub const ASHA: &str = "asha-token";
/// Token of the second, active partner added by [`ConfigBuilder::with_second_partner`]
pub const RAVI: &str = "ravi-token";
/// Token of the inactive partner added by [`ConfigBuilder::with_inactive_partner`]
pub const MEERA: &str = "meera-token";

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Minimal config: one active partner (id 1) owning pending order 100
    pub fn new() -> Self {
        let mut config = Config {
            server: ServerConfig {
                listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
                health: HealthConfig {
                    enabled: true,
                    ..HealthConfig::default()
                },
                ..ServerConfig::default()
            },
            company: CompanyConfig {
                name: "Courier Logistics".to_owned(),
                email: "support@courier.example".to_owned(),
                ..CompanyConfig::default()
            },
            ..Config::default()
        };

        config.auth.partners.push(partner(1, "Asha", ASHA, true));
        config.orders.push(order(100, 1, OrderStatus::Pending));

        Self { config }
    }

    /// Add partner 2, who owns no orders
    pub fn with_second_partner(mut self) -> Self {
        self.config.auth.partners.push(partner(2, "Ravi", RAVI, true));
        self
    }

    /// Add inactive partner 3 owning pending order 300
    pub fn with_inactive_partner(mut self) -> Self {
        self.config.auth.partners.push(partner(3, "Meera", MEERA, false));
        self.config.orders.push(order(300, 3, OrderStatus::Pending));
        self
    }

    /// Add an order in the given state
    pub fn with_order(mut self, id: u64, partner_id: u64, status: OrderStatus) -> Self {
        self.config.orders.push(order(id, partner_id, status));
        self
    }

    pub fn with_debug(mut self, enabled: bool) -> Self {
        self.config.app.debug = enabled;
        self
    }

    /// Allow `requests` per minute from each client IP, trusting
    /// `trusted_proxy_hops` forwarding proxies
    pub fn with_per_ip_limit(mut self, requests: u32, trusted_proxy_hops: usize) -> Self {
        self.config.server.rate_limit = Some(RateLimitConfig {
            global: None,
            per_ip: Some(RequestRateLimit {
                requests,
                window: "1m".to_owned(),
            }),
            trusted_proxy_hops,
        });
        self
    }

    /// Disable health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config.validate().expect("test config must be valid");
        self.config
    }
}

fn partner(id: u64, name: &str, token: &str, active: bool) -> PartnerConfig {
    PartnerConfig {
        id,
        name: name.to_owned(),
        phone: format!("+91 90000 0000{id}"),
        token: SecretString::from(token),
        active,
    }
}

fn order(id: u64, partner_id: u64, status: OrderStatus) -> OrderConfig {
    OrderConfig {
        id,
        partner_id,
        pickup_address: format!("{id} MG Road"),
        drop_address: format!("{id} Park Street"),
        status,
    }
}
