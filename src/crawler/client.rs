//! Upstream API client
//!
//! This module issues single logical API calls:
//! - Building the method URL with protocol version, token and parameters
//! - Waiting on the job's rate limiter before every request
//! - Routing through an optional proxy
//! - Decoding the `response` envelope into typed pages

use crate::config::ClientConfig;
use crate::crawler::limiter::RateLimiter;
use crate::model::schema::Envelope;
use crate::HarvestError;
use reqwest::{Client, Proxy};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `timeout` - Per-request timeout
/// * `proxy` - Optional proxy URL applied to every request
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client or parse the proxy
pub fn build_http_client(timeout: Duration, proxy: Option<&str>) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .user_agent(concat!("vk-harvest/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true);

    if let Some(proxy) = proxy {
        builder = builder.proxy(Proxy::all(proxy)?);
    }

    builder.build()
}

/// Client for one crawl job: a single endpoint, token and rate limiter
#[derive(Debug)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    version: String,
    token: String,
    limiter: RateLimiter,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self, HarvestError> {
        let http = build_http_client(config.timeout, config.proxy.as_deref())?;
        Ok(Self {
            http,
            base_url: config.api_base.trim_end_matches('/').to_string(),
            version: config.api_version.clone(),
            token: config.token.clone(),
            limiter: RateLimiter::new(config.min_interval),
        })
    }

    /// Calls an API method and returns the raw response body
    ///
    /// Transport failures and non-success HTTP statuses surface as
    /// [`HarvestError::RequestFailed`].
    pub async fn call(&self, method: &str, params: &[(&str, String)]) -> Result<String, HarvestError> {
        let url = self.method_url(method, params)?;

        self.limiter.acquire().await;
        tracing::debug!("Calling {} ({})", method, describe_params(params));

        let response = self
            .http
            .post(url)
            .send()
            .await
            .map_err(|e| transport_failed(method, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(request_failed(method, format!("HTTP {}", status)));
        }

        response
            .text()
            .await
            .map_err(|e| transport_failed(method, e))
    }

    /// Calls an API method and decodes the `response` payload
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        method: &str,
        params: &[(&str, String)],
    ) -> Result<T, HarvestError> {
        let body = self.call(method, params).await?;
        decode_response(method, &body)
    }

    fn method_url(&self, method: &str, params: &[(&str, String)]) -> Result<Url, HarvestError> {
        let mut url = Url::parse(&format!("{}/{}", self.base_url, method))
            .map_err(|e| request_failed(method, format!("invalid method URL: {}", e)))?;

        url.query_pairs_mut()
            .append_pair("v", &self.version)
            .append_pair("access_token", &self.token)
            .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())));

        Ok(url)
    }
}

/// Decodes a response body into its `response` payload
///
/// A body that is not valid JSON for `T` is a [`HarvestError::RequestFailed`];
/// a well-formed body without `response` is a [`HarvestError::Api`] carrying the
/// raw body.
pub fn decode_response<T: DeserializeOwned>(method: &str, body: &str) -> Result<T, HarvestError> {
    let envelope: Envelope<T> = serde_json::from_str(body)
        .map_err(|e| request_failed(method, format!("malformed response: {}", e)))?;

    match envelope.response {
        Some(payload) => Ok(payload),
        None => {
            if let Some(error) = envelope.error {
                tracing::warn!(
                    "{} returned API error {}: {}",
                    method,
                    error.error_code,
                    error.error_msg
                );
            }
            Err(HarvestError::Api {
                method: method.to_string(),
                body: body.to_string(),
            })
        }
    }
}

fn request_failed(method: &str, message: String) -> HarvestError {
    HarvestError::RequestFailed {
        method: method.to_string(),
        message,
    }
}

/// Wraps a transport error without the request URL, which carries the token
fn transport_failed(method: &str, error: reqwest::Error) -> HarvestError {
    request_failed(method, error.without_url().to_string())
}

/// Formats call parameters for logging; the token is never part of them
fn describe_params(params: &[(&str, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}
