//! REST fetcher for the searchable-fields and platform enum endpoints.

use std::time::Duration;

use async_trait::async_trait;
use certus_core::{CatalogError, FilterField, PlatformEnumDictionary, Resource};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::fetcher::{CatalogFetcher, PlatformEnumFetcher};
use crate::wire::{flatten_groups, SearchFieldGroup};

/// Placeholder substituted with the resource code in `filters_path`.
pub const RESOURCE_PLACEHOLDER: &str = "{resource}";

/// Connection settings of [`RestCatalogFetcher`].
#[derive(Debug, Clone)]
pub struct RestCatalogConfig {
    pub base_url: String,
    /// Path template containing [`RESOURCE_PLACEHOLDER`].
    pub filters_path: String,
    pub enums_path: String,
    pub request_timeout: Duration,
    pub api_key: Option<String>,
    pub bearer_token: Option<String>,
}

impl RestCatalogConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            filters_path: "/v1/{resource}/search".to_string(),
            enums_path: "/v1/settings/platform/enums".to_string(),
            request_timeout: Duration::from_secs(10),
            api_key: None,
            bearer_token: None,
        }
    }

    pub fn with_filters_path(mut self, path: impl Into<String>) -> Self {
        self.filters_path = path.into();
        self
    }

    pub fn with_enums_path(mut self, path: impl Into<String>) -> Self {
        self.enums_path = path.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }
}

/// HTTP implementation of the catalog and platform enum fetchers.
#[derive(Debug, Clone)]
pub struct RestCatalogFetcher {
    client: reqwest::Client,
    base_url: String,
    filters_path: String,
    enums_path: String,
    auth_headers: HeaderMap,
}

impl RestCatalogFetcher {
    pub fn new(config: &RestCatalogConfig) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| CatalogError::ClientSetup {
                reason: e.to_string(),
            })?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            filters_path: config.filters_path.clone(),
            enums_path: config.enums_path.clone(),
            auth_headers: build_auth_headers(config)?,
        })
    }

    /// Full URL of the searchable-fields endpoint for `resource`.
    pub fn filters_url(&self, resource: Resource) -> String {
        format!(
            "{}{}",
            self.base_url,
            self.filters_path
                .replace(RESOURCE_PLACEHOLDER, resource.as_code())
        )
    }

    pub fn enums_url(&self) -> String {
        format!("{}{}", self.base_url, self.enums_path)
    }

    async fn get_text(&self, url: &str) -> Result<(u16, String), reqwest::Error> {
        let response = self
            .client
            .get(url)
            .headers(self.auth_headers.clone())
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok((status, body))
    }
}

#[async_trait]
impl CatalogFetcher for RestCatalogFetcher {
    async fn fetch_available_filters(
        &self,
        resource: Resource,
    ) -> Result<Vec<FilterField>, CatalogError> {
        let url = self.filters_url(resource);
        tracing::debug!(url = %url, "Requesting searchable fields");

        let (status, body) =
            self.get_text(&url)
                .await
                .map_err(|e| CatalogError::Transport {
                    resource,
                    reason: e.to_string(),
                })?;
        if !(200..300).contains(&status) {
            return Err(CatalogError::RequestFailed {
                resource,
                status,
                message: body,
            });
        }

        let groups: Vec<SearchFieldGroup> =
            serde_json::from_str(&body).map_err(|e| CatalogError::InvalidResponse {
                resource,
                reason: e.to_string(),
            })?;
        Ok(flatten_groups(groups))
    }
}

#[async_trait]
impl PlatformEnumFetcher for RestCatalogFetcher {
    async fn fetch_platform_enums(&self) -> Result<PlatformEnumDictionary, CatalogError> {
        let url = self.enums_url();
        tracing::debug!(url = %url, "Requesting platform enums");

        let (status, body) = self
            .get_text(&url)
            .await
            .map_err(|e| CatalogError::EnumsUnavailable {
                reason: e.to_string(),
            })?;
        if !(200..300).contains(&status) {
            return Err(CatalogError::EnumsUnavailable {
                reason: format!("HTTP {}: {}", status, body),
            });
        }
        serde_json::from_str(&body).map_err(|e| CatalogError::EnumsUnavailable {
            reason: e.to_string(),
        })
    }
}

fn build_auth_headers(config: &RestCatalogConfig) -> Result<HeaderMap, CatalogError> {
    let invalid = |e: reqwest::header::InvalidHeaderValue| CatalogError::ClientSetup {
        reason: e.to_string(),
    };
    let mut headers = HeaderMap::new();
    if let Some(api_key) = &config.api_key {
        headers.insert(
            HeaderName::from_static("x-api-key"),
            HeaderValue::from_str(api_key).map_err(invalid)?,
        );
    }
    if let Some(token) = &config.bearer_token {
        let value = format!("Bearer {}", token);
        headers.insert(
            HeaderName::from_static("authorization"),
            HeaderValue::from_str(&value).map_err(invalid)?,
        );
    }
    Ok(headers)
}
