//! Service configuration types and loading logic.

use std::time::Duration;

use figment::providers::{Env, Format, Toml};
use figment::Figment;
use protocol_tracing::TracingConfig;
use serde::Deserialize;

use crate::options::{DispatchOption, ErrorDisclosure, SameSite};

/// Top-level service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub cookie: CookieConfig,

    /// Send adapter error text to clients. When false, adapter failures
    /// answer the generic 500 status text.
    #[serde(default = "default_true")]
    pub expose_adapter_errors: bool,

    #[serde(default)]
    pub tracing: TracingConfig,
}

/// Server listen configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen_address")]
    pub listen_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: default_listen_address(),
        }
    }
}

/// Identity cookie attributes as they appear in the config file.
#[derive(Debug, Clone, Deserialize)]
pub struct CookieConfig {
    #[serde(default = "default_cookie_name")]
    pub name: String,

    #[serde(default)]
    pub path: String,

    #[serde(default)]
    pub domain: String,

    /// Zero (the default) issues session cookies.
    #[serde(default)]
    pub ttl_secs: u64,

    #[serde(default)]
    pub secure: bool,

    /// "strict", "lax" or "none"; absent leaves the attribute off.
    #[serde(default)]
    pub same_site: Option<SameSite>,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: default_cookie_name(),
            path: String::new(),
            domain: String::new(),
            ttl_secs: 0,
            secure: false,
            same_site: None,
        }
    }
}

fn default_listen_address() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_cookie_name() -> String {
    "user".to_string()
}

fn default_true() -> bool {
    true
}

impl ServiceConfig {
    /// Load configuration from TOML file and environment variables.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (PROTOCOL_ prefix, __ for nesting)
    /// 2. TOML config file
    /// 3. Defaults
    pub fn load(config_path: &str) -> anyhow::Result<Self> {
        Self::from_figment(
            Figment::new()
                .merge(Toml::file(config_path))
                .merge(Env::prefixed("PROTOCOL_").split("__")),
        )
    }

    pub fn from_figment(figment: Figment) -> anyhow::Result<Self> {
        Ok(figment.extract()?)
    }

    /// Dispatcher options for the cookie and error settings, in the order
    /// they are applied.
    pub fn dispatch_options(&self) -> Vec<DispatchOption> {
        let disclosure = if self.expose_adapter_errors {
            ErrorDisclosure::Verbatim
        } else {
            ErrorDisclosure::Generic
        };

        vec![
            DispatchOption::CookieName(self.cookie.name.clone()),
            DispatchOption::CookiePath(self.cookie.path.clone()),
            DispatchOption::CookieDomain(self.cookie.domain.clone()),
            DispatchOption::CookieTtl(Duration::from_secs(self.cookie.ttl_secs)),
            DispatchOption::CookieSecure(self.cookie.secure),
            DispatchOption::CookieSameSite(self.cookie.same_site),
            DispatchOption::ErrorDisclosure(disclosure),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::DispatcherConfig;

    fn parse(toml: &str) -> ServiceConfig {
        ServiceConfig::from_figment(Figment::from(Toml::string(toml))).unwrap()
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = parse("");
        assert_eq!(config.server.listen_address, "0.0.0.0:8080");
        assert_eq!(config.cookie.name, "user");
        assert!(config.expose_adapter_errors);
        assert!(config.tracing.otlp_endpoint.is_none());
    }

    #[test]
    fn test_cookie_section_becomes_options() {
        let config = parse(
            r#"
            expose_adapter_errors = false

            [cookie]
            name = "uid"
            path = "/"
            domain = "collector.example"
            ttl_secs = 86400
            secure = true
            same_site = "lax"
            "#,
        );

        let dispatcher = DispatcherConfig::from_options(config.dispatch_options());
        assert_eq!(dispatcher.cookie.name, "uid");
        assert_eq!(dispatcher.cookie.path, "/");
        assert_eq!(dispatcher.cookie.domain, "collector.example");
        assert_eq!(dispatcher.cookie.ttl, Duration::from_secs(86400));
        assert!(dispatcher.cookie.secure);
        assert_eq!(dispatcher.cookie.same_site, Some(SameSite::Lax));
        assert_eq!(dispatcher.error_disclosure, ErrorDisclosure::Generic);
    }

    #[test]
    fn test_unknown_same_site_rejected() {
        let result = ServiceConfig::from_figment(Figment::from(Toml::string(
            "[cookie]\nsame_site = \"sometimes\"\n",
        )));
        assert!(result.is_err());
    }
}
