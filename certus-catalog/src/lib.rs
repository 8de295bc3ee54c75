//! CERTUS Catalog - Filter Field Catalog
//!
//! Per-entity-type cache of filterable fields, fetched asynchronously from
//! the platform.
//!
//! # Example
//!
//! ```ignore
//! let store = Arc::new(FilterCatalogStore::new());
//! let fetcher = RestCatalogFetcher::new(&RestCatalogConfig::new(base_url))?;
//!
//! store
//!     .load_available_filters(EntityType::Certificate, Resource::Certificates, &fetcher)
//!     .await?;
//!
//! // Synchronous, never fetches; `None` is the normal unresolved case.
//! let field = store.lookup_field(EntityType::Certificate, FieldSource::Meta, "owner|STRING");
//! ```

pub mod fetcher;
pub mod rest;
pub mod snapshot;
pub mod store;
pub mod watermark;
pub mod wire;

pub use fetcher::{CatalogFetcher, PlatformEnumFetcher};
pub use rest::{RestCatalogConfig, RestCatalogFetcher, RESOURCE_PLACEHOLDER};
pub use snapshot::CatalogSnapshot;
pub use store::{CatalogEntry, CatalogStats, FilterCatalogStore, LoadOutcome};
pub use watermark::{LoadTicket, TicketDispenser};
pub use wire::{flatten_groups, SearchFieldData, SearchFieldGroup};
