//! Filter field catalog store.
//!
//! One slot per entity type. A slot holds the most recently installed
//! catalog plus the watermark of the newest ticket that may still install.
//! Loads are independent per entity type; within one entity type a result
//! only installs if its ticket is newer than the slot's watermark, so a
//! request that resolves after a fresher one is discarded.

use std::sync::atomic::{AtomicU64, Ordering};

use certus_core::{
    CatalogError, EntityType, FieldLookup, FieldSource, FilterField, Resource,
};
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::fetcher::CatalogFetcher;
use crate::snapshot::CatalogSnapshot;
use crate::watermark::{LoadTicket, TicketDispenser};

/// An installed catalog.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub snapshot: CatalogSnapshot,
    pub resource: Resource,
    pub ticket: LoadTicket,
    pub loaded_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Slot {
    entry: Option<CatalogEntry>,
    watermark: LoadTicket,
}

/// Result of a successful fetch.
#[derive(Debug, Clone)]
pub enum LoadOutcome {
    /// The fetched catalog replaced the slot's contents.
    Installed(CatalogSnapshot),
    /// A newer load or an invalidation happened while fetching; the result was discarded.
    Superseded { fetched: CatalogSnapshot },
}

impl LoadOutcome {
    pub fn is_installed(&self) -> bool {
        matches!(self, LoadOutcome::Installed(_))
    }

    /// The fields this load fetched, whether or not they were installed.
    pub fn fields(&self) -> &CatalogSnapshot {
        match self {
            LoadOutcome::Installed(snapshot) => snapshot,
            LoadOutcome::Superseded { fetched } => fetched,
        }
    }
}

/// Counters describing store usage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogStats {
    pub loads: u64,
    pub failures: u64,
    pub superseded: u64,
    pub lookup_hits: u64,
    pub lookup_misses: u64,
    pub entity_types: usize,
    pub fields: usize,
}

impl CatalogStats {
    /// Fraction of lookups that resolved (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.lookup_hits + self.lookup_misses;
        if total == 0 {
            0.0
        } else {
            self.lookup_hits as f64 / total as f64
        }
    }
}

#[derive(Debug, Default)]
struct Counters {
    loads: AtomicU64,
    failures: AtomicU64,
    superseded: AtomicU64,
    lookup_hits: AtomicU64,
    lookup_misses: AtomicU64,
}

/// Catalog cache keyed by entity type.
///
/// Owned by whichever component composes catalog and renderer, typically
/// behind an `Arc`. Reads never fetch.
#[derive(Debug, Default)]
pub struct FilterCatalogStore {
    slots: DashMap<EntityType, Slot>,
    tickets: TicketDispenser,
    counters: Counters,
}

impl FilterCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the catalog of `resource` and install it under `entity_type`.
    ///
    /// On failure the previously installed catalog is kept and the error is
    /// returned to the caller.
    pub async fn load_available_filters<F>(
        &self,
        entity_type: EntityType,
        resource: Resource,
        fetcher: &F,
    ) -> Result<LoadOutcome, CatalogError>
    where
        F: CatalogFetcher + ?Sized,
    {
        let ticket = self.tickets.issue();
        self.counters.loads.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(
            entity_type = %entity_type,
            resource = %resource,
            ticket = ticket.sequence(),
            "Loading available filters"
        );

        let fields = match fetcher.fetch_available_filters(resource).await {
            Ok(fields) => fields,
            Err(err) => {
                self.counters.failures.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(
                    entity_type = %entity_type,
                    resource = %resource,
                    error = %err,
                    "Failed to load available filters, keeping cached catalog"
                );
                return Err(err);
            }
        };

        Ok(self.install(entity_type, resource, ticket, CatalogSnapshot::new(fields)))
    }

    /// Clear the slot of `entity_type`, then load it again.
    ///
    /// In-flight loads issued before the refresh can no longer install. If
    /// the fetch fails the slot stays empty.
    pub async fn refresh<F>(
        &self,
        entity_type: EntityType,
        resource: Resource,
        fetcher: &F,
    ) -> Result<LoadOutcome, CatalogError>
    where
        F: CatalogFetcher + ?Sized,
    {
        self.invalidate(entity_type);
        self.load_available_filters(entity_type, resource, fetcher)
            .await
    }

    fn install(
        &self,
        entity_type: EntityType,
        resource: Resource,
        ticket: LoadTicket,
        snapshot: CatalogSnapshot,
    ) -> LoadOutcome {
        let mut slot = self.slots.entry(entity_type).or_default();
        if !ticket.is_newer_than(&slot.watermark) {
            self.counters.superseded.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(
                entity_type = %entity_type,
                ticket = ticket.sequence(),
                watermark = slot.watermark.sequence(),
                "Discarding superseded catalog load"
            );
            return LoadOutcome::Superseded { fetched: snapshot };
        }

        slot.watermark = ticket;
        slot.entry = Some(CatalogEntry {
            snapshot: snapshot.clone(),
            resource,
            ticket,
            loaded_at: Utc::now(),
        });
        tracing::info!(
            entity_type = %entity_type,
            resource = %resource,
            fields = snapshot.len(),
            "Installed filter catalog"
        );
        LoadOutcome::Installed(snapshot)
    }

    /// Drop the cached catalog of `entity_type`. Returns whether one was cached.
    pub fn invalidate(&self, entity_type: EntityType) -> bool {
        let floor = self.tickets.last_issued();
        let mut slot = self.slots.entry(entity_type).or_default();
        let had_entry = slot.entry.take().is_some();
        if floor.is_newer_than(&slot.watermark) {
            slot.watermark = floor;
        }
        had_entry
    }

    /// Resolve one field against the current cache. Never fetches.
    pub fn lookup_field(
        &self,
        entity_type: EntityType,
        source: FieldSource,
        identifier: &str,
    ) -> Option<FilterField> {
        let found = self.slots.get(&entity_type).and_then(|slot| {
            slot.entry
                .as_ref()
                .and_then(|entry| entry.snapshot.find_field(source, identifier).cloned())
        });
        let counter = if found.is_some() {
            &self.counters.lookup_hits
        } else {
            &self.counters.lookup_misses
        };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    /// Current catalog of `entity_type`, empty when nothing is cached.
    pub fn snapshot(&self, entity_type: EntityType) -> CatalogSnapshot {
        self.entry(entity_type)
            .map(|entry| entry.snapshot)
            .unwrap_or_default()
    }

    pub fn entry(&self, entity_type: EntityType) -> Option<CatalogEntry> {
        self.slots
            .get(&entity_type)
            .and_then(|slot| slot.entry.clone())
    }

    pub fn is_loaded(&self, entity_type: EntityType) -> bool {
        self.slots
            .get(&entity_type)
            .map(|slot| slot.entry.is_some())
            .unwrap_or(false)
    }

    pub fn loaded_at(&self, entity_type: EntityType) -> Option<DateTime<Utc>> {
        self.entry(entity_type).map(|entry| entry.loaded_at)
    }

    /// Entity types with a cached catalog, sorted.
    pub fn entity_types(&self) -> Vec<EntityType> {
        let mut types: Vec<EntityType> = self
            .slots
            .iter()
            .filter(|slot| slot.entry.is_some())
            .map(|slot| *slot.key())
            .collect();
        types.sort();
        types
    }

    pub fn stats(&self) -> CatalogStats {
        let (entity_types, fields) = self
            .slots
            .iter()
            .filter_map(|slot| slot.entry.as_ref().map(|entry| entry.snapshot.len()))
            .fold((0, 0), |(types, fields), len| (types + 1, fields + len));
        CatalogStats {
            loads: self.counters.loads.load(Ordering::Relaxed),
            failures: self.counters.failures.load(Ordering::Relaxed),
            superseded: self.counters.superseded.load(Ordering::Relaxed),
            lookup_hits: self.counters.lookup_hits.load(Ordering::Relaxed),
            lookup_misses: self.counters.lookup_misses.load(Ordering::Relaxed),
            entity_types,
            fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use certus_core::FilterFieldType;
    use std::sync::Mutex;

    struct FixedFetcher {
        result: Mutex<Result<Vec<FilterField>, CatalogError>>,
    }

    impl FixedFetcher {
        fn ok(fields: Vec<FilterField>) -> Self {
            Self {
                result: Mutex::new(Ok(fields)),
            }
        }

        fn failing() -> Self {
            Self {
                result: Mutex::new(Err(CatalogError::Transport {
                    resource: Resource::Certificates,
                    reason: "connection refused".to_string(),
                })),
            }
        }
    }

    #[async_trait]
    impl CatalogFetcher for FixedFetcher {
        async fn fetch_available_filters(
            &self,
            _resource: Resource,
        ) -> Result<Vec<FilterField>, CatalogError> {
            self.result.lock().unwrap().clone()
        }
    }

    fn username_field() -> FilterField {
        FilterField::new(FieldSource::Meta, "username|STRING", "Username", FilterFieldType::String)
    }

    #[tokio::test]
    async fn test_load_installs_and_lookup_resolves() {
        let store = FilterCatalogStore::new();
        let fetcher = FixedFetcher::ok(vec![username_field()]);

        let outcome = store
            .load_available_filters(EntityType::Certificate, Resource::Certificates, &fetcher)
            .await
            .unwrap();
        assert!(outcome.is_installed());
        assert_eq!(outcome.fields().len(), 1);

        let field = store
            .lookup_field(EntityType::Certificate, FieldSource::Meta, "username|STRING")
            .unwrap();
        assert_eq!(field.label, "Username");
        assert!(store
            .lookup_field(EntityType::Discovery, FieldSource::Meta, "username|STRING")
            .is_none());
        assert_eq!(store.entity_types(), vec![EntityType::Certificate]);
        assert!(store.loaded_at(EntityType::Certificate).is_some());
    }

    #[tokio::test]
    async fn test_failed_load_keeps_previous_catalog() {
        let store = FilterCatalogStore::new();
        store
            .load_available_filters(
                EntityType::Certificate,
                Resource::Certificates,
                &FixedFetcher::ok(vec![username_field()]),
            )
            .await
            .unwrap();

        let err = store
            .load_available_filters(
                EntityType::Certificate,
                Resource::Certificates,
                &FixedFetcher::failing(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Transport { .. }));
        assert_eq!(store.snapshot(EntityType::Certificate).len(), 1);
        assert_eq!(store.stats().failures, 1);
    }

    #[tokio::test]
    async fn test_failed_refresh_leaves_slot_empty() {
        let store = FilterCatalogStore::new();
        store
            .load_available_filters(
                EntityType::Certificate,
                Resource::Certificates,
                &FixedFetcher::ok(vec![username_field()]),
            )
            .await
            .unwrap();

        let result = store
            .refresh(
                EntityType::Certificate,
                Resource::Certificates,
                &FixedFetcher::failing(),
            )
            .await;
        assert!(result.is_err());
        assert!(!store.is_loaded(EntityType::Certificate));
        assert!(store.snapshot(EntityType::Certificate).is_empty());
    }

    #[test]
    fn test_stale_ticket_is_superseded() {
        let store = FilterCatalogStore::new();
        let older = store.tickets.issue();
        let newer = store.tickets.issue();

        let installed = store.install(
            EntityType::Key,
            Resource::Keys,
            newer,
            CatalogSnapshot::new(vec![username_field()]),
        );
        assert!(installed.is_installed());

        let late = store.install(EntityType::Key, Resource::Keys, older, CatalogSnapshot::empty());
        assert!(!late.is_installed());
        assert_eq!(store.snapshot(EntityType::Key).len(), 1);
        assert_eq!(store.stats().superseded, 1);
    }

    #[test]
    fn test_invalidate_blocks_in_flight_loads() {
        let store = FilterCatalogStore::new();
        let in_flight = store.tickets.issue();
        assert!(!store.invalidate(EntityType::User));

        let outcome = store.install(
            EntityType::User,
            Resource::Users,
            in_flight,
            CatalogSnapshot::new(vec![username_field()]),
        );
        assert!(!outcome.is_installed());
        assert!(!store.is_loaded(EntityType::User));
    }

    #[test]
    fn test_lookup_stats() {
        let store = FilterCatalogStore::new();
        let ticket = store.tickets.issue();
        store.install(
            EntityType::Role,
            Resource::Roles,
            ticket,
            CatalogSnapshot::new(vec![username_field()]),
        );
        store.lookup_field(EntityType::Role, FieldSource::Meta, "username|STRING");
        store.lookup_field(EntityType::Role, FieldSource::Meta, "missing");
        let stats = store.stats();
        assert_eq!(stats.lookup_hits, 1);
        assert_eq!(stats.lookup_misses, 1);
        assert_eq!(stats.entity_types, 1);
        assert_eq!(stats.fields, 1);
        assert!((stats.hit_rate() - 0.5).abs() < 0.001);
    }
}
