//! The HTTP client handle shared by every API area.

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::config::GatewayConfig;
use crate::error::{GatewayError, Result};

/// Handle to the remote storefront API.
///
/// Cheap to clone; the underlying `reqwest::Client` pools connections.
#[derive(Debug, Clone)]
pub struct Gateway {
    base_url: String,
    http: Client,
}

impl Gateway {
    /// Build a gateway client from the given configuration.
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        let http = Client::builder().timeout(config.request_timeout).build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) fn get(&self, path: &str) -> RequestBuilder {
        self.http.get(self.url(path))
    }

    pub(crate) fn post(&self, path: &str) -> RequestBuilder {
        self.http.post(self.url(path))
    }

    pub(crate) fn put(&self, path: &str) -> RequestBuilder {
        self.http.put(self.url(path))
    }

    pub(crate) fn delete(&self, path: &str) -> RequestBuilder {
        self.http.delete(self.url(path))
    }
}

/// Decode a JSON response body, or turn a non-success status into a
/// [`GatewayError::Rejected`] carrying the server's message.
pub(crate) async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T> {
    let status = resp.status();
    if status.is_success() {
        resp.json::<T>().await.map_err(GatewayError::Decode)
    } else {
        let body = resp.bytes().await.unwrap_or_default();
        Err(GatewayError::rejected(status, &body))
    }
}

/// Like [`decode`], for endpoints whose success body carries nothing the
/// client needs.
pub(crate) async fn unit(resp: Response) -> Result<()> {
    let status = resp.status();
    if status.is_success() {
        Ok(())
    } else {
        let body = resp.bytes().await.unwrap_or_default();
        Err(GatewayError::rejected(status, &body))
    }
}
