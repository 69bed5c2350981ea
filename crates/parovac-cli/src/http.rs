//! HTTPS transport adapter for the invoicing service.

use reqwest::blocking::Client;
use tracing::debug;

use parovac_core::{PairingConfig, PairingError, Transport, TransportError};

/// Blocking HTTPS transport with basic authentication.
///
/// No request timeout is configured: a hung call blocks the run until the
/// service answers or the connection drops.
pub struct HttpTransport {
    client: Client,
    base_url: String,
    account: String,
    api_key: String,
}

impl HttpTransport {
    /// Build a transport from configuration.
    ///
    /// Missing credentials are rejected here, before any request is made.
    pub fn from_config(config: &PairingConfig) -> Result<Self, PairingError> {
        config.validate_service_access()?;
        let client = Client::builder()
            .build()
            .map_err(|e| PairingError::Config(e.to_string()))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            account: config.account.clone(),
            api_key: config.api_key.clone(),
        })
    }

    fn url(&self, resource: &str) -> String {
        format!("{}/{}", self.base_url, resource)
    }

    fn read_success(
        response: reqwest::blocking::Response,
        resource: &str,
    ) -> Result<Vec<u8>, TransportError> {
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                code: status.as_u16(),
                resource: resource.to_string(),
            });
        }
        let bytes = response
            .bytes()
            .map_err(|e| TransportError::Http(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

impl Transport for HttpTransport {
    fn fetch(&self, resource: &str) -> Result<Vec<u8>, TransportError> {
        let url = self.url(resource);
        debug!("GET {}", url);
        let response = self
            .client
            .get(&url)
            .basic_auth(&self.account, Some(&self.api_key))
            .send()
            .map_err(|e| TransportError::Http(e.to_string()))?;
        Self::read_success(response, resource)
    }

    fn fire(&self, resource: &str, event: &str) -> Result<Vec<u8>, TransportError> {
        let url = self.url(resource);
        debug!("POST {}?event={}", url, event);
        let response = self
            .client
            .post(&url)
            .query(&[("event", event)])
            .basic_auth(&self.account, Some(&self.api_key))
            .header("Accept", "application/xml")
            .header("Content-Type", "application/xml")
            .send()
            .map_err(|e| TransportError::Http(e.to_string()))?;
        Self::read_success(response, resource)
    }
}
