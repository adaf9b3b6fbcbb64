//! Configuration structures for AppQoS clients.
//!
//! Credentials, TLS trust and timeouts are always supplied by the caller,
//! either programmatically, deserialised from a config file, or read from the
//! process environment with [`AppQosConfig::from_env`].

use crate::Error;
use secrecy::SecretString;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use validator::Validate;

/// Environment variable holding the basic-auth username.
pub const ENV_USERNAME: &str = "APPQOS_USERNAME";
/// Environment variable holding the basic-auth password.
pub const ENV_PASSWORD: &str = "APPQOS_PASSWORD";
/// Environment variable pointing at a PEM CA bundle.
pub const ENV_CA_CERT: &str = "APPQOS_CA_CERT";
/// Environment variable controlling certificate verification; `false`
/// enables strict verification.
pub const ENV_INSECURE_SKIP_VERIFY: &str = "APPQOS_INSECURE_SKIP_VERIFY";
/// Environment variable overriding the request timeout in seconds.
pub const ENV_TIMEOUT_SECS: &str = "APPQOS_TIMEOUT_SECS";

/// Default request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
/// Default connect timeout in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Basic-auth credentials sent with every request.
///
/// The password is held as a [`SecretString`] and is redacted from `Debug`
/// output.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Credentials {
    /// Basic-auth username
    #[validate(length(min = 1))]
    pub username: String,

    /// Basic-auth password
    pub password: SecretString,
}

impl Credentials {
    /// Create new credentials.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }
}

/// Which server certificates the client trusts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(tag = "mode", content = "ca_cert", rename_all = "snake_case")]
pub enum TlsPolicy {
    /// System/webpki roots (strict).
    Verify,
    /// Strict verification that additionally trusts a PEM CA bundle.
    CustomCa(PathBuf),
    /// Trust any server certificate.
    ///
    /// **Unsafe for production**: traffic, including basic-auth credentials,
    /// is open to interception. AppQoS ships with a self-signed certificate,
    /// so this is the default for local development setups.
    #[default]
    AcceptInvalidCerts,
}

impl TlsPolicy {
    /// Returns true if certificate verification is disabled.
    #[must_use]
    pub const fn is_insecure(&self) -> bool {
        matches!(self, Self::AcceptInvalidCerts)
    }
}

/// Configuration for an AppQoS client instance.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AppQosConfig {
    /// Basic-auth credentials
    #[validate(nested)]
    pub credentials: Credentials,

    /// TLS trust policy
    #[serde(default)]
    pub tls: TlsPolicy,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300))]
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Connect timeout in seconds
    #[validate(range(min = 1, max = 60))]
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

const fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

const fn default_connect_timeout_secs() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

impl AppQosConfig {
    /// Create a new client configuration with the given credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails (for example an empty username).
    pub fn new(credentials: Credentials) -> Result<Self, Error> {
        let config = Self {
            credentials,
            tls: TlsPolicy::default(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        };

        config
            .validate()
            .map_err(|e| Error::Config(format!("Invalid configuration: {e}")))?;

        Ok(config)
    }

    /// Build a configuration from `APPQOS_*` environment variables.
    ///
    /// `APPQOS_USERNAME` and `APPQOS_PASSWORD` are required. `APPQOS_CA_CERT`
    /// selects [`TlsPolicy::CustomCa`], `APPQOS_INSECURE_SKIP_VERIFY=false`
    /// selects [`TlsPolicy::Verify`], and `APPQOS_TIMEOUT_SECS` overrides the request
    /// timeout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a required variable is missing or a value
    /// cannot be parsed.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| Error::Config(format!("{key} is not set")))
        };

        let credentials = Credentials::new(required(ENV_USERNAME)?, required(ENV_PASSWORD)?);
        let mut config = Self::new(credentials)?;

        if let Some(path) = lookup(ENV_CA_CERT).filter(|value| !value.is_empty()) {
            config.tls = TlsPolicy::CustomCa(PathBuf::from(path));
        } else if let Some(skip) = lookup(ENV_INSECURE_SKIP_VERIFY) {
            let skip = parse_bool(&skip).ok_or_else(|| {
                Error::Config(format!("{ENV_INSECURE_SKIP_VERIFY} must be true or false"))
            })?;
            config.tls = if skip {
                TlsPolicy::AcceptInvalidCerts
            } else {
                TlsPolicy::Verify
            };
        }

        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            config.request_timeout_secs = secs.parse().map_err(|e| {
                Error::Config(format!("{ENV_TIMEOUT_SECS} is not a number of seconds: {e}"))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Set the TLS trust policy.
    #[must_use]
    pub fn with_tls_policy(mut self, tls: TlsPolicy) -> Self {
        self.tls = tls;
        self
    }

    /// Set request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = seconds;
        self
    }

    /// Set connect timeout in seconds.
    #[must_use]
    pub const fn with_connect_timeout(mut self, seconds: u64) -> Self {
        self.connect_timeout_secs = seconds;
        self
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Get the connect timeout as a Duration.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}
