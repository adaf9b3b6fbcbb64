//! Shared HTTP transport for AppQoS requests.
//!
//! [`HttpTransport`] wraps a configured `reqwest::Client` together with the
//! basic-auth credentials. It performs exactly one round trip per call and
//! always reads the whole response body before handing it back, so the
//! connection is returned to the pool on every exit path.

use crate::config::{AppQosConfig, Credentials, TlsPolicy};
use crate::{Error, Result};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Certificate, Client, ClientBuilder, Method, StatusCode};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;
use validator::Validate;

const USER_AGENT: &str = concat!("appqos-core/", env!("CARGO_PKG_VERSION"));
const JSON: &str = "application/json";

/// Status code and full body text of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status returned by the service
    pub status: StatusCode,
    /// Response body, read to completion
    pub body: String,
}

impl RawResponse {
    /// Decode the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if the body does not match `T`.
    pub fn json<T>(&self) -> Result<T>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(&self.body).map_err(Error::from)
    }
}

/// Reusable, cloneable HTTP client with basic auth and a TLS trust policy.
///
/// Clones share one connection pool, so a single transport can serve every
/// call site in a process.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
    credentials: Credentials,
    request_timeout: Option<Duration>,
}

impl HttpTransport {
    /// Build a transport from the configuration.
    ///
    /// No network I/O happens here.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if validation fails, the CA bundle cannot be
    /// read or parsed, or the TLS backend cannot be initialised.
    pub fn new(config: &AppQosConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = ClientBuilder::new()
            .user_agent(USER_AGENT)
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout());

        match &config.tls {
            TlsPolicy::Verify => {}
            TlsPolicy::CustomCa(path) => {
                debug!("loading AppQoS CA certificate from {}", path.display());
                let bytes = std::fs::read(path).map_err(|err| {
                    Error::Config(format!(
                        "Failed to read AppQoS CA certificate {}: {err}",
                        path.display()
                    ))
                })?;
                let cert = Certificate::from_pem(&bytes).map_err(|err| {
                    Error::Config(format!("Invalid AppQoS CA certificate: {err}"))
                })?;
                builder = builder.add_root_certificate(cert);
            }
            TlsPolicy::AcceptInvalidCerts => {
                warn!("TLS verification disabled for AppQoS client; not safe for production");
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        let http = builder.build().map_err(|err| {
            Error::Config(format!("Failed to build AppQoS HTTP client: {err}"))
        })?;

        Ok(Self {
            http,
            credentials: config.credentials.clone(),
            request_timeout: None,
        })
    }

    /// Return a transport sharing this connection pool whose requests use
    /// `timeout` instead of the configured default.
    #[must_use]
    pub fn with_request_timeout(&self, timeout: Duration) -> Self {
        Self {
            request_timeout: Some(timeout),
            ..self.clone()
        }
    }

    /// Username sent with every request.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.credentials.username
    }

    /// Send one request and read the full response.
    ///
    /// A body, when given, is serialised as JSON and sent with
    /// `Content-Type: application/json`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encode`] if the body cannot be serialised,
    /// [`Error::Timeout`] if the deadline elapses and [`Error::Transport`] on
    /// connection or IO failures. The response status is not inspected.
    pub async fn send<B>(&self, method: Method, url: Url, body: Option<&B>) -> Result<RawResponse>
    where
        B: Serialize + ?Sized,
    {
        let mut request = self
            .http
            .request(method.clone(), url.clone())
            .basic_auth(
                &self.credentials.username,
                Some(self.credentials.password.expose_secret()),
            )
            .header(ACCEPT, JSON);

        if let Some(timeout) = self.request_timeout {
            request = request.timeout(timeout);
        }

        if let Some(payload) = body {
            let bytes = serde_json::to_vec(payload).map_err(|err| Error::Encode(err.to_string()))?;
            request = request.header(CONTENT_TYPE, JSON).body(bytes);
        }

        info!(%method, %url, "Sending AppQoS request");

        let response = request.send().await.map_err(|err| {
            debug!(%method, %url, error = %err, "AppQoS request failed");
            Error::from(err)
        })?;

        let status = response.status();
        let body = response.text().await?;

        debug!(%method, %url, %status, bytes = body.len(), "AppQoS response");

        Ok(RawResponse { status, body })
    }
}
