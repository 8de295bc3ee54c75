//! Offline fetchers reading platform responses saved to disk.

use std::path::PathBuf;

use async_trait::async_trait;
use certus_catalog::{flatten_groups, CatalogFetcher, PlatformEnumFetcher, SearchFieldGroup};
use certus_core::{CatalogError, FilterField, PlatformEnumDictionary, Resource};

/// Serves a saved searchable-fields response for every resource.
#[derive(Debug, Clone)]
pub struct FileCatalogFetcher {
    path: PathBuf,
}

impl FileCatalogFetcher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogFetcher for FileCatalogFetcher {
    async fn fetch_available_filters(
        &self,
        resource: Resource,
    ) -> Result<Vec<FilterField>, CatalogError> {
        let body = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| CatalogError::Transport {
                resource,
                reason: format!("{}: {}", self.path.display(), e),
            })?;
        let groups: Vec<SearchFieldGroup> =
            serde_json::from_str(&body).map_err(|e| CatalogError::InvalidResponse {
                resource,
                reason: e.to_string(),
            })?;
        Ok(flatten_groups(groups))
    }
}

/// Serves a saved platform enum dictionary.
#[derive(Debug, Clone)]
pub struct FileEnumFetcher {
    path: PathBuf,
}

impl FileEnumFetcher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PlatformEnumFetcher for FileEnumFetcher {
    async fn fetch_platform_enums(&self) -> Result<PlatformEnumDictionary, CatalogError> {
        let body = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| CatalogError::EnumsUnavailable {
                reason: format!("{}: {}", self.path.display(), e),
            })?;
        serde_json::from_str(&body).map_err(|e| CatalogError::EnumsUnavailable {
            reason: e.to_string(),
        })
    }
}
