use config::{Config, ConfigError};
use serde::Deserialize;
use std::fmt;

const DEFAULT_API_URL: &str = "https://api.cloudflare.com/client/v4";
const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:5000";

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    cloudflare: Cloudflare,
    #[serde(default)]
    web: Web,
}

impl AppConfig {
    /// Layers `config.toml`, `config_local.toml` and the environment (`CLOUDFLARE__AUTH_KEY`, ...).
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::File::with_name("config_local").required(false))
            .add_source(config::Environment::default().separator("__"))
            .build()?
            .try_deserialize()
    }

    pub fn cloudflare(&self) -> &Cloudflare {
        &self.cloudflare
    }

    pub fn web(&self) -> &Web {
        &self.web
    }
}

#[derive(Deserialize)]
pub struct Cloudflare {
    #[serde(default = "default_api_url")]
    api_url: String,
    account_id: String,
    auth_email: String,
    auth_key: String,
}

impl Cloudflare {
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn auth_email(&self) -> &str {
        &self.auth_email
    }

    pub fn auth_key(&self) -> &str {
        &self.auth_key
    }

    /// Base URL of every account scoped endpoint.
    pub fn account_url(&self) -> String {
        format!("{}/accounts/{}", self.api_url().trim_end_matches('/'), self.account_id)
    }
}

impl fmt::Debug for Cloudflare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cloudflare")
            .field("api_url", &self.api_url)
            .field("account_id", &self.account_id)
            .field("auth_email", &self.auth_email)
            .field("auth_key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Deserialize)]
pub struct Web {
    #[serde(default = "default_bind_address")]
    bind_address: String,
}

impl Web {
    pub fn bind_address(&self) -> &str {
        &self.bind_address
    }
}

impl Default for Web {
    fn default() -> Self {
        Web {
            bind_address: default_bind_address(),
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_bind_address() -> String {
    DEFAULT_BIND_ADDRESS.to_string()
}

#[cfg(test)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

#[cfg(test)]
impl AppConfigBuilder {
    pub fn new() -> Self {
        AppConfigBuilder {
            config: AppConfig {
                cloudflare: Cloudflare {
                    api_url: "https://cloudflare.url".to_string(),
                    account_id: "account".to_string(),
                    auth_email: "operator@example.com".to_string(),
                    auth_key: "key".to_string(),
                },
                web: Web::default(),
            },
        }
    }

    pub fn api_url(mut self, url: String) -> Self {
        self.config.cloudflare.api_url = url;
        self
    }

    pub fn auth_key(mut self, key: String) -> Self {
        self.config.cloudflare.auth_key = key;
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;
    use pretty_assertions::assert_eq;

    fn from_toml(toml: &str) -> Result<AppConfig, ConfigError> {
        Config::builder()
            .add_source(config::File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    #[test]
    fn applies_defaults_for_optional_keys() -> Result<(), ConfigError> {
        let config = from_toml(
            r#"
            [cloudflare]
            account_id = "abc"
            auth_email = "ops@example.com"
            auth_key = "secret"
            "#,
        )?;

        assert_eq!(config.cloudflare().api_url(), DEFAULT_API_URL);
        assert_eq!(config.web().bind_address(), DEFAULT_BIND_ADDRESS);
        assert_eq!(config.cloudflare().account_url(), "https://api.cloudflare.com/client/v4/accounts/abc");
        Ok(())
    }

    #[test]
    fn account_url_ignores_a_trailing_slash() {
        let config = AppConfigBuilder::new().api_url("http://127.0.0.1:1234/".to_string()).build();

        assert_eq!(config.cloudflare().account_url(), "http://127.0.0.1:1234/accounts/account");
    }

    #[test]
    fn fails_when_a_credential_is_missing() {
        let result = from_toml(
            r#"
            [cloudflare]
            account_id = "abc"
            auth_email = "ops@example.com"
            "#,
        );

        let error = result.expect_err("auth_key is required");
        assert!(error.to_string().contains("auth_key"), "unexpected error: {error}");
    }

    #[test]
    fn debug_output_redacts_the_auth_key() {
        let config = AppConfigBuilder::new().build();

        let debug = format!("{:?}", config);

        assert!(!debug.contains("\"key\""));
        assert!(debug.contains("<redacted>"));
    }
}
