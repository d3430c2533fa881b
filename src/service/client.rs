//! Reasoning service HTTP client

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use super::types::*;
use super::Answerer;
use crate::config::ServiceConfig;

/// HTTP client for the reasoning service
#[derive(Debug, Clone)]
pub struct ServiceClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl ServiceClient {
    /// Create new client from service config
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        let url = config.url.as_ref().ok_or_else(|| {
            anyhow::anyhow!("Service URL not configured. Set service.url in config or use --service-url.")
        })?;

        Self::new(url, config.token.clone(), config.timeout_secs)
    }

    /// Create new client with explicit parameters
    pub fn new(base_url: &str, token: Option<String>, timeout_secs: u64) -> Result<Self> {
        let base_url =
            Url::parse(base_url).with_context(|| format!("Invalid service URL: {}", base_url))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    /// Build a URL for an endpoint
    fn url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .with_context(|| format!("Invalid endpoint path: {}", path))
    }

    /// Add auth header if token is set
    fn auth_header(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(ref token) = self.token {
            builder.bearer_auth(token)
        } else {
            builder
        }
    }

    /// Extract error message from response
    async fn extract_error(resp: reqwest::Response) -> String {
        match resp.json::<ApiErrorResponse>().await {
            Ok(err) => err.detail,
            Err(_) => "Unknown error".to_string(),
        }
    }
}

#[async_trait]
impl Answerer for ServiceClient {
    async fn ask(&self, question: &str, context: &Path) -> Result<Answer> {
        let url = self.url("/api/chat")?;
        let body = ChatRequest {
            question: question.to_string(),
            base_dir: context.display().to_string(),
        };

        tracing::debug!(%url, "Asking reasoning service");

        let resp = self
            .auth_header(self.client.post(url))
            .json(&body)
            .send()
            .await
            .context("Failed to reach reasoning service")?;

        let status = resp.status();
        if !status.is_success() {
            let err = Self::extract_error(resp).await;
            anyhow::bail!("Reasoning service error ({}): {}", status, err);
        }

        let chat: ChatResponse = resp
            .json()
            .await
            .context("Failed to parse service response")?;

        Answer::try_from(chat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_requires_url() {
        let err = ServiceClient::from_config(&ServiceConfig::default()).unwrap_err();
        assert!(err.to_string().contains("service.url"));
    }

    #[test]
    fn test_invalid_url() {
        assert!(ServiceClient::new("not a url", None, 5).is_err());
    }

    #[test]
    fn test_endpoint_join() -> Result<()> {
        let client = ServiceClient::new("http://localhost:8000/", None, 5)?;
        assert_eq!(client.url("/api/chat")?.as_str(), "http://localhost:8000/api/chat");
        Ok(())
    }
}
