use std::collections::HashSet;
use std::path::Path;

use secrecy::ExposeSecret;

use crate::{Config, RequestRateLimit};

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or [`Config::from_toml`]
    /// rejects its contents
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::from_toml(&raw)
    }

    /// Parse configuration text
    ///
    /// Expands `{{ env.VAR }}` placeholders, deserializes, then validates.
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing or validation fails
    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error describing the first inconsistency found
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_server()?;
        self.validate_partners()?;
        self.validate_orders()?;
        Ok(())
    }

    fn validate_server(&self) -> anyhow::Result<()> {
        if !self.server.api_prefix.starts_with('/') {
            anyhow::bail!("server.api_prefix must start with '/'");
        }

        if self.server.api_prefix.len() < 2 || self.server.api_prefix.ends_with('/') {
            anyhow::bail!("server.api_prefix must name a path segment and must not end with '/'");
        }

        if self.server.health.enabled && !self.server.health.path.starts_with('/') {
            anyhow::bail!("server.health.path must start with '/'");
        }

        if let Some(ref rate_limit) = self.server.rate_limit {
            if let Some(ref global) = rate_limit.global {
                validate_rate_limit("global", global)?;
            }
            if let Some(ref per_ip) = rate_limit.per_ip {
                validate_rate_limit("per_ip", per_ip)?;
            }
        }

        Ok(())
    }

    fn validate_partners(&self) -> anyhow::Result<()> {
        let mut ids = HashSet::new();
        let mut tokens = HashSet::new();

        for partner in &self.auth.partners {
            if !ids.insert(partner.id) {
                anyhow::bail!("duplicate partner id {}", partner.id);
            }

            let token = partner.token.expose_secret();
            if token.is_empty() {
                anyhow::bail!("partner {} has an empty token", partner.id);
            }
            if !tokens.insert(token) {
                anyhow::bail!("partner {} reuses another partner's token", partner.id);
            }
        }

        Ok(())
    }

    fn validate_orders(&self) -> anyhow::Result<()> {
        let partners: HashSet<u64> = self.auth.partners.iter().map(|p| p.id).collect();
        let mut ids = HashSet::new();

        for order in &self.orders {
            if !ids.insert(order.id) {
                anyhow::bail!("duplicate order id {}", order.id);
            }
            if !partners.contains(&order.partner_id) {
                anyhow::bail!("order {} is assigned to unknown partner {}", order.id, order.partner_id);
            }
        }

        Ok(())
    }
}

fn validate_rate_limit(name: &str, limit: &RequestRateLimit) -> anyhow::Result<()> {
    if limit.requests == 0 {
        anyhow::bail!("server.rate_limit.{name}.requests must be greater than 0");
    }

    let window = duration_str::parse(&limit.window)
        .map_err(|e| anyhow::anyhow!("invalid server.rate_limit.{name}.window '{}': {e}", limit.window))?;
    if window.is_zero() {
        anyhow::bail!("server.rate_limit.{name}.window must be greater than 0");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::{Config, LogFormat, OrderStatus};

    const SAMPLE: &str = r#"
[app]
name = "courier-staging"
debug = true

[server]
listen_address = "127.0.0.1:8080"

[server.rate_limit]
trusted_proxy_hops = 1

[server.rate_limit.per_ip]
requests = 60
window = "1m"

[[auth.partners]]
id = 1
name = "Asha"
phone = "+91 90000 00001"
token = "partner-one"

[[auth.partners]]
id = 2
name = "Ravi"
token = "partner-two"
active = false

[company]
name = "Courier Logistics"
email = "support@courier.example"

[[orders]]
id = 100
partner_id = 1
pickup_address = "12 MG Road"
drop_address = "4 Park Street"

[telemetry]
format = "json"
"#;

    #[test]
    fn parses_full_config() {
        let config = Config::from_toml(SAMPLE).unwrap();

        assert!(config.app.debug);
        assert_eq!(config.app.environment, "production");
        assert_eq!(config.server.api_prefix, "/api");
        assert!(config.server.health.enabled);
        assert_eq!(config.server.rate_limit.as_ref().unwrap().trusted_proxy_hops, 1);
        assert_eq!(config.auth.partners.len(), 2);
        assert!(!config.auth.partners[1].active);
        assert_eq!(config.orders[0].status, OrderStatus::Pending);
        assert_eq!(config.telemetry.format, LogFormat::Json);
        assert_eq!(config.telemetry.filter, "info");
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert!(!config.app.debug);
        assert_eq!(config.server.health.path, "/health");
        assert!(config.server.rate_limit.is_none());
    }

    #[test]
    fn rejects_unknown_fields() {
        let err = Config::from_toml("[app]\nverbose = true\n").unwrap_err();
        assert!(err.to_string().contains("failed to parse config"));
    }

    #[test]
    fn rejects_duplicate_tokens() {
        let raw = r#"
[[auth.partners]]
id = 1
name = "Asha"
token = "same"

[[auth.partners]]
id = 2
name = "Ravi"
token = "same"
"#;
        let err = Config::from_toml(raw).unwrap_err();
        assert!(err.to_string().contains("reuses another partner's token"));
    }

    #[test]
    fn rejects_orders_for_unknown_partners() {
        let raw = r#"
[[orders]]
id = 5
partner_id = 9
pickup_address = "a"
drop_address = "b"
"#;
        let err = Config::from_toml(raw).unwrap_err();
        assert!(err.to_string().contains("unknown partner 9"));
    }

    #[test]
    fn rejects_bad_rate_limit_window() {
        let raw = "[server.rate_limit.global]\nrequests = 10\nwindow = \"soon\"\n";
        let err = Config::from_toml(raw).unwrap_err();
        assert!(err.to_string().contains("server.rate_limit.global.window"));
    }

    #[test]
    fn rejects_root_api_prefix() {
        let err = Config::from_toml("[server]\napi_prefix = \"/\"\n").unwrap_err();
        assert!(err.to_string().contains("server.api_prefix"));

        let err = Config::from_toml("[server]\napi_prefix = \"/api/\"\n").unwrap_err();
        assert!(err.to_string().contains("must not end with '/'"));
    }

    #[test]
    fn debug_flag_can_come_from_environment() {
        temp_env::with_var("COURIER_APP_DEBUG", Some("true"), || {
            let config = Config::from_toml("[app]\ndebug = {{ env.COURIER_APP_DEBUG | default(\"false\") }}\n").unwrap();
            assert!(config.app.debug);
        });
    }
}
