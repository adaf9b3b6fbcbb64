//! Asynchronous AppQoS client implementation.

use crate::models::{App, Pool, PowerProfile, Resource};
use crate::Result;
use appqos_core::client::{HttpTransport, RawResponse};
use appqos_core::config::{AppQosConfig, Credentials};
use appqos_core::Error;
use reqwest::{Method, StatusCode};
use std::fmt;
use std::time::Duration;
use tracing::warn;
use url::Url;

/// Successful write acknowledged by the service.
///
/// Renders as `Success: <status>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Confirmation {
    status: StatusCode,
}

impl Confirmation {
    /// Status code the service answered with.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }
}

impl fmt::Display for Confirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Success: {}", self.status.as_u16())
    }
}

/// Asynchronous AppQoS client.
///
/// The AppQoS address is passed to every call, so one client can drive the
/// AppQoS instances of many nodes. Every operation is a single round trip and
/// none of them retry.
#[derive(Debug, Clone)]
pub struct AppQosClient {
    transport: HttpTransport,
}

impl AppQosClient {
    /// Construct a client from the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration is invalid or the HTTP
    /// client cannot be built.
    pub fn new(config: &AppQosConfig) -> Result<Self> {
        Ok(Self::from_transport(HttpTransport::new(config)?))
    }

    /// Construct a client that trusts any server certificate.
    ///
    /// Matches the out-of-the-box AppQoS setup with a self-signed certificate.
    /// Not safe for production.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the credentials fail validation.
    pub fn insecure_default(credentials: Credentials) -> Result<Self> {
        Self::new(&AppQosConfig::new(credentials)?)
    }

    /// Wrap an existing transport.
    #[must_use]
    pub const fn from_transport(transport: HttpTransport) -> Self {
        Self { transport }
    }

    /// Return a client sharing this connection pool whose requests time out
    /// after `timeout`.
    ///
    /// Dropping an operation's future cancels the request.
    #[must_use]
    pub fn with_request_timeout(&self, timeout: Duration) -> Self {
        Self {
            transport: self.transport.with_request_timeout(timeout),
        }
    }

    /// `GET /pools`
    pub async fn list_pools(&self, base_url: &str) -> Result<Vec<Pool>> {
        self.list(base_url).await
    }

    /// `GET /pools/{id}`
    pub async fn get_pool(&self, base_url: &str, id: u32) -> Result<Pool> {
        self.get(base_url, id).await
    }

    /// `POST /pools`
    pub async fn create_pool(&self, base_url: &str, pool: &Pool) -> Result<Confirmation> {
        self.create(base_url, pool).await
    }

    /// `PUT /pools/{id}`
    pub async fn replace_pool(&self, base_url: &str, pool: &Pool, id: u32) -> Result<Confirmation> {
        self.replace(base_url, pool, id).await
    }

    /// `DELETE /pools/{id}`
    pub async fn delete_pool(&self, base_url: &str, id: u32) -> Result<()> {
        self.delete::<Pool>(base_url, id).await
    }

    /// `GET /power_profiles`
    pub async fn list_power_profiles(&self, base_url: &str) -> Result<Vec<PowerProfile>> {
        self.list(base_url).await
    }

    /// `GET /power_profiles/{id}`
    pub async fn get_power_profile(&self, base_url: &str, id: u32) -> Result<PowerProfile> {
        self.get(base_url, id).await
    }

    /// `POST /power_profiles`
    pub async fn create_power_profile(
        &self,
        base_url: &str,
        profile: &PowerProfile,
    ) -> Result<Confirmation> {
        self.create(base_url, profile).await
    }

    /// `PUT /power_profiles/{id}`
    pub async fn replace_power_profile(
        &self,
        base_url: &str,
        profile: &PowerProfile,
        id: u32,
    ) -> Result<Confirmation> {
        self.replace(base_url, profile, id).await
    }

    /// `DELETE /power_profiles/{id}`
    pub async fn delete_power_profile(&self, base_url: &str, id: u32) -> Result<()> {
        self.delete::<PowerProfile>(base_url, id).await
    }

    /// `GET /apps`
    pub async fn list_apps(&self, base_url: &str) -> Result<Vec<App>> {
        self.list(base_url).await
    }

    /// `GET /apps/{id}`
    pub async fn get_app(&self, base_url: &str, id: u32) -> Result<App> {
        self.get(base_url, id).await
    }

    /// `POST /apps`
    pub async fn create_app(&self, base_url: &str, app: &App) -> Result<Confirmation> {
        self.create(base_url, app).await
    }

    /// `PUT /apps/{id}`
    pub async fn replace_app(&self, base_url: &str, app: &App, id: u32) -> Result<Confirmation> {
        self.replace(base_url, app, id).await
    }

    /// `DELETE /apps/{id}`
    pub async fn delete_app(&self, base_url: &str, id: u32) -> Result<()> {
        self.delete::<App>(base_url, id).await
    }

    /// List every resource in `R`'s collection.
    ///
    /// The body is decoded only on `200 OK`.
    pub async fn list<R: Resource>(&self, base_url: &str) -> Result<Vec<R>> {
        let url = build_url(base_url, R::COLLECTION, None)?;
        let response = self.transport.send::<()>(Method::GET, url, None).await?;
        expect_read(response, R::KIND)?.json()
    }

    /// Fetch a single resource by id.
    ///
    /// `404` maps to [`Error::NotFound`], other non-`200` statuses to
    /// [`Error::RequestRejected`].
    pub async fn get<R: Resource>(&self, base_url: &str, id: u32) -> Result<R> {
        let url = build_url(base_url, R::COLLECTION, Some(id))?;
        let response = self.transport.send::<()>(Method::GET, url, None).await?;
        expect_read(response, R::KIND)?.json()
    }

    /// Create a resource; the service must answer `201 Created`.
    pub async fn create<R: Resource>(&self, base_url: &str, resource: &R) -> Result<Confirmation> {
        let url = build_url(base_url, R::COLLECTION, None)?;
        let response = self
            .transport
            .send(Method::POST, url, Some(resource))
            .await?;
        expect_status(response, StatusCode::CREATED, R::KIND)
    }

    /// Replace a resource; the service must answer `200 OK`.
    ///
    /// The response body is not decoded.
    pub async fn replace<R: Resource>(
        &self,
        base_url: &str,
        resource: &R,
        id: u32,
    ) -> Result<Confirmation> {
        let url = build_url(base_url, R::COLLECTION, Some(id))?;
        let response = self
            .transport
            .send(Method::PUT, url, Some(resource))
            .await?;
        expect_status(response, StatusCode::OK, R::KIND)
    }

    /// Delete a resource; the service must answer `200 OK`.
    pub async fn delete<R: Resource>(&self, base_url: &str, id: u32) -> Result<()> {
        let url = build_url(base_url, R::COLLECTION, Some(id))?;
        let response = self.transport.send::<()>(Method::DELETE, url, None).await?;
        expect_status(response, StatusCode::OK, R::KIND).map(|_| ())
    }
}

fn build_url(base_url: &str, collection: &str, id: Option<u32>) -> Result<Url> {
    let mut url = Url::parse(base_url).map_err(|err| {
        Error::InvalidEndpoint(format!("Invalid AppQoS base URL `{base_url}`: {err}"))
    })?;

    {
        let mut segments = url.path_segments_mut().map_err(|()| {
            Error::InvalidEndpoint(format!("AppQoS base URL `{base_url}` cannot carry a path"))
        })?;
        segments.pop_if_empty().push(collection);
        if let Some(id) = id {
            segments.push(&id.to_string());
        }
    }

    Ok(url)
}

fn expect_read(response: RawResponse, kind: &str) -> Result<RawResponse> {
    let status = response.status;
    match status {
        StatusCode::OK => Ok(response),
        StatusCode::NOT_FOUND => {
            warn!(kind, "AppQoS {kind} not found");
            let message = if response.body.is_empty() {
                format!("AppQoS {kind} not found")
            } else {
                response.body
            };
            Err(Error::NotFound(message))
        }
        _ => Err(rejected(status, response.body, kind)),
    }
}

fn expect_status(response: RawResponse, expected: StatusCode, kind: &str) -> Result<Confirmation> {
    if response.status == expected {
        Ok(Confirmation {
            status: response.status,
        })
    } else {
        Err(rejected(response.status, response.body, kind))
    }
}

fn rejected(status: StatusCode, body: String, kind: &str) -> Error {
    warn!(kind, %status, "AppQoS rejected {kind} request");
    Error::RequestRejected {
        status: status.as_u16(),
        body,
    }
}
