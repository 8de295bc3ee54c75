//! Fetcher traits for catalog and platform enum data.
//!
//! The store never performs I/O itself; callers pass a fetcher into each
//! load, which keeps the store testable and transport-agnostic.

use async_trait::async_trait;
use certus_core::{CatalogError, FilterField, PlatformEnumDictionary, Resource};

/// Retrieves the searchable fields of a backend resource.
#[async_trait]
pub trait CatalogFetcher: Send + Sync {
    /// Fetch the flattened field list for `resource`.
    async fn fetch_available_filters(
        &self,
        resource: Resource,
    ) -> Result<Vec<FilterField>, CatalogError>;
}

/// Retrieves the platform enum dictionary.
#[async_trait]
pub trait PlatformEnumFetcher: Send + Sync {
    async fn fetch_platform_enums(&self) -> Result<PlatformEnumDictionary, CatalogError>;
}
