use secrecy::SecretString;
use serde::Deserialize;

/// Delivery partner bearer-token authentication
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    #[serde(default)]
    pub partners: Vec<PartnerConfig>,
}

/// A delivery partner and the API token issued to them
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartnerConfig {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub phone: String,
    pub token: SecretString,
    /// Inactive partners can sign in but cannot work orders
    #[serde(default = "default_active")]
    pub active: bool,
}

#[allow(clippy::missing_const_for_fn)]
fn default_active() -> bool {
    true
}
