//! HTTP Graph Source
//!
//! Fetches method indexes and call graphs from the static-analysis service
//! over HTTP GET. Timeout policy lives in the underlying client; callers
//! recover from every `FetchError` as "no data" plus a notification.

use crate::api::dto::{MethodLinkDto, MethodListDto};
use crate::ports::GraphSource;
use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use url::Url;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Transport-level failure. Never fatal to the session.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{name} request returned status {status}")]
    Status { name: &'static str, status: StatusCode },

    #[error("failed to decode {name} response: {source}")]
    Decode {
        name: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

/// GraphSource implementation against the analysis service REST endpoints.
pub struct HttpGraphSource {
    http: Client,
    list_url: Url,
    link_url: Url,
}

impl HttpGraphSource {
    pub fn new(base_url: &Url) -> anyhow::Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &Url, timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;
        let list_url = base_url
            .join("method-info/list")
            .with_context(|| format!("Invalid base url {}", base_url))?;
        let link_url = base_url
            .join("method-info/method-link")
            .with_context(|| format!("Invalid base url {}", base_url))?;
        Ok(Self {
            http,
            list_url,
            link_url,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        name: &'static str,
    ) -> Result<T, FetchError> {
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|source| FetchError::Network {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { name, status });
        }

        response
            .json()
            .await
            .map_err(|source| FetchError::Decode { name, source })
    }
}

#[async_trait]
impl GraphSource for HttpGraphSource {
    async fn method_list(&self) -> Result<MethodListDto, FetchError> {
        self.get_json(self.list_url.clone(), "method list").await
    }

    async fn method_link(&self, method_id: &str) -> Result<MethodLinkDto, FetchError> {
        let mut url = self.link_url.clone();
        url.query_pairs_mut().append_pair("methodId", method_id);
        self.get_json(url, "method link").await
    }
}
