use serde::Deserialize;

/// Application identity
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default = "default_name")]
    pub name: String,
    /// Deployment environment label (e.g. `production`, `local`)
    #[serde(default = "default_environment")]
    pub environment: String,
    /// Expose raw error messages and origin details in error responses.
    /// Never enable in production.
    #[serde(default)]
    pub debug: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            environment: default_environment(),
            debug: false,
        }
    }
}

fn default_name() -> String {
    "courier".to_owned()
}

fn default_environment() -> String {
    "production".to_owned()
}
