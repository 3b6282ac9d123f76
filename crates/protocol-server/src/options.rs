//! Dispatcher configuration and the options that assemble it.
//!
//! Options are applied strictly in the order given; when two options touch
//! the same field the later one wins. Each option writes exactly one field.
//! Building never fails: keeping the cookie name non-empty is the caller's
//! responsibility.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;

use crate::adapter::{Adapter, AdapterSlots, Binding, Operation};

/// `SameSite` attribute of the identity cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// How adapter failures are reported to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorDisclosure {
    /// Send the adapter's error text as the 500 body.
    #[default]
    Verbatim,
    /// Send the standard status text and keep the error in the logs only.
    Generic,
}

/// Attributes of the identity cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieSettings {
    pub name: String,
    /// Omitted from `Set-Cookie` when empty.
    pub path: String,
    /// Omitted from `Set-Cookie` when empty.
    pub domain: String,
    /// Zero issues a session cookie.
    pub ttl: Duration,
    pub secure: bool,
    /// `None` leaves the browser default in place.
    pub same_site: Option<SameSite>,
}

impl Default for CookieSettings {
    fn default() -> Self {
        Self {
            name: "user".to_string(),
            path: String::new(),
            domain: String::new(),
            ttl: Duration::ZERO,
            secure: false,
            same_site: None,
        }
    }
}

/// Immutable dispatcher configuration, shared read-only by every request.
#[derive(Debug, Clone, Default)]
pub struct DispatcherConfig {
    pub cookie: CookieSettings,
    pub adapters: AdapterSlots,
    pub error_disclosure: ErrorDisclosure,
}

impl DispatcherConfig {
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::default()
    }

    /// Apply `options` in order on top of the defaults.
    pub fn from_options(options: impl IntoIterator<Item = DispatchOption>) -> Self {
        options
            .into_iter()
            .fold(Self::builder(), DispatcherBuilder::option)
            .build()
    }
}

/// A single configuration write.
pub enum DispatchOption {
    CookieName(String),
    CookiePath(String),
    CookieDomain(String),
    CookieTtl(Duration),
    CookieSecure(bool),
    CookieSameSite(Option<SameSite>),
    ErrorDisclosure(ErrorDisclosure),
    Bind(Operation, Binding),
}

impl DispatchOption {
    pub fn bind(operation: Operation, adapter: impl Adapter) -> Self {
        DispatchOption::Bind(operation, Binding::bound(adapter))
    }

    fn apply(self, config: &mut DispatcherConfig) {
        match self {
            DispatchOption::CookieName(name) => config.cookie.name = name,
            DispatchOption::CookiePath(path) => config.cookie.path = path,
            DispatchOption::CookieDomain(domain) => config.cookie.domain = domain,
            DispatchOption::CookieTtl(ttl) => config.cookie.ttl = ttl,
            DispatchOption::CookieSecure(secure) => config.cookie.secure = secure,
            DispatchOption::CookieSameSite(same_site) => config.cookie.same_site = same_site,
            DispatchOption::ErrorDisclosure(policy) => config.error_disclosure = policy,
            DispatchOption::Bind(operation, binding) => *config.adapters.get_mut(operation) = binding,
        }
    }
}

impl fmt::Debug for DispatchOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchOption::CookieName(v) => f.debug_tuple("CookieName").field(v).finish(),
            DispatchOption::CookiePath(v) => f.debug_tuple("CookiePath").field(v).finish(),
            DispatchOption::CookieDomain(v) => f.debug_tuple("CookieDomain").field(v).finish(),
            DispatchOption::CookieTtl(v) => f.debug_tuple("CookieTtl").field(v).finish(),
            DispatchOption::CookieSecure(v) => f.debug_tuple("CookieSecure").field(v).finish(),
            DispatchOption::CookieSameSite(v) => f.debug_tuple("CookieSameSite").field(v).finish(),
            DispatchOption::ErrorDisclosure(v) => f.debug_tuple("ErrorDisclosure").field(v).finish(),
            DispatchOption::Bind(op, binding) => f.debug_tuple("Bind").field(op).field(binding).finish(),
        }
    }
}

/// Collects options and produces a [`DispatcherConfig`].
#[derive(Debug, Default)]
pub struct DispatcherBuilder {
    config: DispatcherConfig,
}

impl DispatcherBuilder {
    pub fn option(mut self, option: DispatchOption) -> Self {
        option.apply(&mut self.config);
        self
    }

    pub fn cookie_name(self, name: impl Into<String>) -> Self {
        self.option(DispatchOption::CookieName(name.into()))
    }

    pub fn cookie_path(self, path: impl Into<String>) -> Self {
        self.option(DispatchOption::CookiePath(path.into()))
    }

    pub fn cookie_domain(self, domain: impl Into<String>) -> Self {
        self.option(DispatchOption::CookieDomain(domain.into()))
    }

    pub fn cookie_ttl(self, ttl: Duration) -> Self {
        self.option(DispatchOption::CookieTtl(ttl))
    }

    pub fn cookie_secure(self, secure: bool) -> Self {
        self.option(DispatchOption::CookieSecure(secure))
    }

    pub fn cookie_same_site(self, same_site: SameSite) -> Self {
        self.option(DispatchOption::CookieSameSite(Some(same_site)))
    }

    pub fn error_disclosure(self, policy: ErrorDisclosure) -> Self {
        self.option(DispatchOption::ErrorDisclosure(policy))
    }

    pub fn probe(self, adapter: impl Adapter) -> Self {
        self.option(DispatchOption::bind(Operation::Probe, adapter))
    }

    pub fn register(self, adapter: impl Adapter) -> Self {
        self.option(DispatchOption::bind(Operation::Register, adapter))
    }

    pub fn submit(self, adapter: impl Adapter) -> Self {
        self.option(DispatchOption::bind(Operation::Submit, adapter))
    }

    pub fn query(self, adapter: impl Adapter) -> Self {
        self.option(DispatchOption::bind(Operation::Query, adapter))
    }

    pub fn purge(self, adapter: impl Adapter) -> Self {
        self.option(DispatchOption::bind(Operation::Purge, adapter))
    }

    pub fn build(self) -> DispatcherConfig {
        self.config
    }
}
