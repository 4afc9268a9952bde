use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::client::provider::CertificateApi;
use crate::client::wire::{error_from_response, CreateCertificateRequest, Envelope};
use crate::config::BackendConfig;
use crate::error::Error;
use crate::types::{Certificate, CertificateUpdate, NewCertificate, Result};

/// API key header expected by the certificate manager service
const API_KEY_HEADER: &str = "x-api-key";

/// Client for the certificate manager REST API
#[derive(Debug, Clone)]
pub struct RestClient {
    /// HTTP client for API requests
    client: Client,
    /// Base URL of the certificate service
    base_url: String,
}

impl RestClient {
    /// Create a new REST client
    ///
    /// A missing or unparsable base URL is a startup configuration error. A
    /// missing API key is only a warning here; the backend will reject the
    /// requests if it requires one.
    pub fn new(config: &BackendConfig) -> Result<Self> {
        if config.base_url.is_empty() {
            return Err(Error::Config("Backend base URL not configured".into()));
        }
        Url::parse(&config.base_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if config.api_key.is_empty() {
            warn!("No API key configured, requests may be rejected by the backend");
        } else {
            let value = HeaderValue::from_str(&config.api_key)
                .map_err(|e| Error::Config(format!("Invalid API key: {}", e)))?;
            headers.insert(HeaderName::from_static(API_KEY_HEADER), value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Unwrap a `{data: ...}` envelope, mapping non-2xx responses onto the
    /// error taxonomy.
    async fn parse_data<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error_from_response(status, &body));
        }

        let envelope: Envelope<T> = response.json().await?;
        Ok(envelope.data)
    }

    /// Check status only, for endpoints whose success body carries no data.
    async fn check_ack(response: Response) -> Result<()> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error_from_response(status, &body));
        }
        Ok(())
    }
}

#[async_trait]
impl CertificateApi for RestClient {
    async fn list(&self) -> Result<Vec<Certificate>> {
        debug!("GET /certificates");
        let response = self
            .client
            .get(self.endpoint("/certificates"))
            .send()
            .await?;
        Self::parse_data(response).await
    }

    async fn get(&self, id: &str) -> Result<Certificate> {
        debug!("GET /certificates/{}", id);
        let response = self
            .client
            .get(self.endpoint(&format!("/certificates/{}", id)))
            .send()
            .await?;
        Self::parse_data(response).await
    }

    async fn create(&self, input: &NewCertificate) -> Result<Certificate> {
        debug!("POST /certificates for {}", input.domain_name);
        let payload = CreateCertificateRequest::from(input);
        let response = self
            .client
            .post(self.endpoint("/certificates"))
            .json(&payload)
            .send()
            .await?;
        Self::parse_data(response).await
    }

    async fn update(&self, id: &str, update: &CertificateUpdate) -> Result<Certificate> {
        debug!("PUT /certificates/{}", id);
        let response = self
            .client
            .put(self.endpoint(&format!("/certificates/{}", id)))
            .json(update)
            .send()
            .await?;
        Self::parse_data(response).await
    }

    async fn remove(&self, id: &str) -> Result<()> {
        debug!("DELETE /certificates/{}", id);
        let response = self
            .client
            .delete(self.endpoint(&format!("/certificates/{}", id)))
            .send()
            .await?;
        Self::check_ack(response).await
    }

    async fn rotate(&self, id: &str) -> Result<Certificate> {
        // Reissuance is a real cryptographic operation on the backend side;
        // only the transport-level timeout bounds it.
        debug!("POST /certificates/{}/rotate", id);
        let response = self
            .client
            .post(self.endpoint(&format!("/certificates/{}/rotate", id)))
            .send()
            .await?;
        Self::parse_data(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend_config(base_url: &str, api_key: &str) -> BackendConfig {
        BackendConfig {
            mode: "rest".to_string(),
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
            timeout_seconds: 30,
        }
    }

    #[test]
    fn test_new_rejects_empty_base_url() {
        let result = RestClient::new(&backend_config("", "key-123"));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_new_rejects_invalid_base_url() {
        let result = RestClient::new(&backend_config("not a url", "key-123"));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_new_accepts_missing_api_key() {
        // Only a startup warning, not an error
        let result = RestClient::new(&backend_config("https://api.example.com", ""));
        assert!(result.is_ok());
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let client = RestClient::new(&backend_config("https://api.example.com/", "k")).unwrap();
        assert_eq!(
            client.endpoint("/certificates/abc/rotate"),
            "https://api.example.com/certificates/abc/rotate"
        );
    }

    #[tokio::test]
    async fn test_list_against_unreachable_backend_is_transport_error() {
        // Reserved TEST-NET-1 address, nothing listens there
        let mut config = backend_config("http://192.0.2.1:9/", "k");
        config.timeout_seconds = 1;
        let client = RestClient::new(&config).unwrap();
        let err = client.list().await.unwrap_err();
        assert_eq!(err.kind(), "transport");
    }
}
