//! Static client settings and the credentials helper.

use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::error::{ConfigError, Result};

/// Failover policy applied when a candidate endpoint does not succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MultipleUriStrategy {
    /// Try the next candidate on every non-success outcome.
    #[default]
    Always,
    /// Only connection failures and read timeouts move on to the next
    /// candidate; any received error response aborts the failover loop.
    ConnectionTimeoutOnly,
}

/// Settings for locating the config server through service discovery.
#[derive(Debug, Clone)]
pub struct DiscoverySettings {
    /// Whether discovery is consulted at all.
    pub enabled: bool,
    /// Service id to look up.
    pub service_id: String,
}

/// Static settings for the retrieval client.
///
/// Built once via [`ClientSettings::builder`]; timeout validation happens at
/// build time, never at request time.
///
/// # Examples
///
/// ```rust
/// use cascade_config::prelude::*;
///
/// # fn example() -> Result<()> {
/// let settings = ClientSettings::builder()
///     .with_uris(["http://config-a:8888", "http://config-b:8888"])
///     .with_name("myapp")
///     .with_profile("production")
///     .with_label("main")
///     .with_fail_fast(true)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Candidate base addresses, attempted in order.
    pub uris: Vec<String>,
    /// Application name to resolve configuration for.
    pub name: String,
    /// Profile comma-list.
    pub profile: String,
    /// Label comma-list; entries are tried in order. `None` omits the label
    /// path segment.
    pub label: Option<String>,
    /// Username for basic authentication.
    pub username: Option<String>,
    /// Password for basic authentication. Conflicts with `authorization`.
    pub password: Option<String>,
    /// Explicit `Authorization` header value, used verbatim.
    pub authorization: Option<String>,
    /// Value for the `X-Config-Token` header, forwarded to token-guarded
    /// backing stores.
    pub token: Option<String>,
    /// Read timeout. Zero disables the timeout.
    pub timeout: Duration,
    /// Connect timeout. Zero disables the timeout.
    pub connect_timeout: Duration,
    /// Whether exhausting all candidates raises an error instead of
    /// returning nothing.
    pub fail_fast: bool,
    /// Failover policy.
    pub multiple_uri_strategy: MultipleUriStrategy,
    /// `Accept` header sent with every request.
    pub accept: String,
    /// Optional discovery settings.
    pub discovery: Option<DiscoverySettings>,
}

impl ClientSettings {
    /// Create a new builder with default settings.
    pub fn builder() -> ClientSettingsBuilder {
        ClientSettingsBuilder::new()
    }

    /// Compute the `Authorization` header value from the configured
    /// credentials.
    ///
    /// An explicit `authorization` value wins verbatim; otherwise a
    /// username/password pair produces a basic-auth header. A username
    /// without a password contributes nothing.
    ///
    /// # Errors
    ///
    /// Configuring both a password and an explicit authorization value is a
    /// static [`ConfigError::ConfigurationConflict`], surfaced here before
    /// any network attempt.
    pub fn authorization_header(&self) -> Result<Option<String>> {
        if self.password.is_some() && self.authorization.is_some() {
            return Err(ConfigError::ConfigurationConflict(
                "you must set either 'password' or 'authorization', not both".to_string(),
            ));
        }
        if let Some(authorization) = &self.authorization {
            return Ok(Some(authorization.clone()));
        }
        if let Some(password) = &self.password {
            let username = self.username.as_deref().unwrap_or("user");
            return Ok(Some(basic_auth(username, password)));
        }
        Ok(None)
    }

    /// The label entries to try, in caller order. Empty when no label is
    /// configured.
    pub fn labels(&self) -> Vec<String> {
        self.label
            .as_deref()
            .map(crate::environment::split_comma_list)
            .unwrap_or_default()
    }
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            uris: vec!["http://localhost:8888".to_string()],
            name: "application".to_string(),
            profile: "default".to_string(),
            label: None,
            username: None,
            password: None,
            authorization: None,
            token: None,
            timeout: Duration::from_millis(DEFAULT_READ_TIMEOUT_MILLIS as u64),
            connect_timeout: Duration::from_millis(DEFAULT_CONNECT_TIMEOUT_MILLIS as u64),
            fail_fast: false,
            multiple_uri_strategy: MultipleUriStrategy::Always,
            accept: "application/json".to_string(),
            discovery: None,
        }
    }
}

/// Compute a standard basic-auth header value.
pub(crate) fn basic_auth(username: &str, password: &str) -> String {
    format!("Basic {}", BASE64.encode(format!("{username}:{password}")))
}

const DEFAULT_READ_TIMEOUT_MILLIS: i64 = 185_000;
const DEFAULT_CONNECT_TIMEOUT_MILLIS: i64 = 10_000;

/// Builder for [`ClientSettings`].
pub struct ClientSettingsBuilder {
    settings: ClientSettings,
    timeout_millis: i64,
    connect_timeout_millis: i64,
}

impl ClientSettingsBuilder {
    fn new() -> Self {
        Self {
            settings: ClientSettings::default(),
            timeout_millis: DEFAULT_READ_TIMEOUT_MILLIS,
            connect_timeout_millis: DEFAULT_CONNECT_TIMEOUT_MILLIS,
        }
    }

    /// Set the candidate base addresses, attempted in order.
    pub fn with_uris<I, S>(mut self, uris: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.settings.uris = uris.into_iter().map(Into::into).collect();
        self
    }

    /// Set the application name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.settings.name = name.into();
        self
    }

    /// Set the profile comma-list.
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.settings.profile = profile.into();
        self
    }

    /// Set the label comma-list. Entries are tried in order.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.settings.label = Some(label.into());
        self
    }

    /// Set basic-auth credentials.
    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.settings.username = Some(username.into());
        self.settings.password = Some(password.into());
        self
    }

    /// Set an explicit `Authorization` header value, used verbatim.
    pub fn with_authorization(mut self, authorization: impl Into<String>) -> Self {
        self.settings.authorization = Some(authorization.into());
        self
    }

    /// Set the `X-Config-Token` header value.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.settings.token = Some(token.into());
        self
    }

    /// Set the read timeout in milliseconds. Zero disables it.
    pub fn with_timeout_millis(mut self, millis: i64) -> Self {
        self.timeout_millis = millis;
        self
    }

    /// Set the connect timeout in milliseconds. Zero disables it.
    pub fn with_connect_timeout_millis(mut self, millis: i64) -> Self {
        self.connect_timeout_millis = millis;
        self
    }

    /// Set fail-fast mode.
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.settings.fail_fast = fail_fast;
        self
    }

    /// Set the failover policy.
    pub fn with_multiple_uri_strategy(mut self, strategy: MultipleUriStrategy) -> Self {
        self.settings.multiple_uri_strategy = strategy;
        self
    }

    /// Set the `Accept` header value.
    pub fn with_accept(mut self, accept: impl Into<String>) -> Self {
        self.settings.accept = accept.into();
        self
    }

    /// Enable discovery of the config server under the given service id.
    pub fn with_discovery(mut self, service_id: impl Into<String>) -> Self {
        self.settings.discovery = Some(DiscoverySettings {
            enabled: true,
            service_id: service_id.into(),
        });
        self
    }

    /// Build the settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTimeout`] when either timeout is
    /// negative.
    pub fn build(mut self) -> Result<ClientSettings> {
        if self.timeout_millis < 0 {
            return Err(ConfigError::InvalidTimeout {
                name: "read",
                millis: self.timeout_millis,
            });
        }
        if self.connect_timeout_millis < 0 {
            return Err(ConfigError::InvalidTimeout {
                name: "connect",
                millis: self.connect_timeout_millis,
            });
        }
        self.settings.timeout = Duration::from_millis(self.timeout_millis as u64);
        self.settings.connect_timeout = Duration::from_millis(self.connect_timeout_millis as u64);
        Ok(self.settings)
    }
}

impl Default for ClientSettingsBuilder {
    fn default() -> Self {
        Self::new()
    }
}
