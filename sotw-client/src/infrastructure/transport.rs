use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use reqwest::{Client, Method};
use serde_json::Value;
use sotw_config::ClientConfig;
use thiserror::Error;
use url::Url;

/// Everything needed to (re)issue one API call.
///
/// Errors carry the config back to the caller so a request can be replayed
/// with [`crate::infrastructure::api_client::ApiClient::resend`]; `retried`
/// records whether the 401 policy has already been applied to it.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestConfig {
    pub method: Method,
    /// Path relative to the API root, e.g. `sotw/42`.
    pub path: String,
    pub body: Option<RequestBody>,
    pub retried: bool,
}

impl RequestConfig {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            retried: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn with_json(mut self, body: Value) -> Self {
        self.body = Some(RequestBody::Json(body));
        self
    }

    pub fn with_form(mut self, fields: Vec<(String, String)>) -> Self {
        self.body = Some(RequestBody::Form(fields));
        self
    }

    pub fn mark_retried(mut self) -> Self {
        self.retried = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(Value),
    /// `application/x-www-form-urlencoded`, used by the login endpoint.
    Form(Vec<(String, String)>),
}

/// Status and undecoded body of a completed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The request never produced an HTTP status.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct TransportError(pub String);

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self(err.to_string())
    }
}

/// HTTP exchange seam between [`crate::infrastructure::api_client::ApiClient`]
/// and the network.
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    async fn send(&self, request: &RequestConfig) -> Result<RawResponse, TransportError>;
}

/// Production transport over a cookie-carrying reqwest client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    api_root: Url,
}

impl ReqwestTransport {
    pub fn new(
        api_root: Url,
        timeout: Option<Duration>,
        accept_invalid_certs: bool,
    ) -> Result<Self, TransportError> {
        let mut builder = Client::builder()
            .cookie_store(true)
            .danger_accept_invalid_certs(accept_invalid_certs);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        info!("[ApiClient] Creating transport with API root: {}", api_root);

        Ok(Self { client, api_root })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, TransportError> {
        let api_root = config
            .api_root()
            .map_err(|err| TransportError(format!("invalid API root: {err}")))?;
        Self::new(api_root, config.request_timeout, config.accept_invalid_certs)
    }

    pub fn api_root(&self) -> &Url {
        &self.api_root
    }

    fn build_url(&self, path: &str) -> Result<Url, TransportError> {
        self.api_root
            .join(path.trim_start_matches('/'))
            .map_err(|err| TransportError(format!("invalid request path {path:?}: {err}")))
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &RequestConfig) -> Result<RawResponse, TransportError> {
        let url = self.build_url(&request.path)?;
        debug!("[ApiClient] {} {}", request.method, url);

        let mut builder = self.client.request(request.method.clone(), url);
        builder = match &request.body {
            Some(RequestBody::Json(body)) => builder.json(body),
            Some(RequestBody::Form(fields)) => builder.form(fields),
            None => builder,
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        Ok(RawResponse { status, body })
    }
}
