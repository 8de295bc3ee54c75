use std::sync::Arc;

use certus_catalog::{FilterCatalogStore, LoadOutcome};
use certus_core::{CatalogError, EntityType, FieldLookup, FieldSource, FilterField, FilterFieldType, Resource};
use certus_test_utils::{fixtures, generators, MockCatalogFetcher};
use proptest::prelude::*;

fn field(identifier: &str, label: &str) -> FilterField {
    FilterField::new(FieldSource::Property, identifier, label, FilterFieldType::String)
}

fn transport_error() -> CatalogError {
    CatalogError::Transport {
        resource: Resource::Certificates,
        reason: "connection reset".to_string(),
    }
}

#[tokio::test]
async fn load_installs_and_lookup_resolves() {
    let store = FilterCatalogStore::new();
    let fetcher = MockCatalogFetcher::new()
        .with_catalog(Resource::Certificates, fixtures::certificate_catalog());

    let outcome = store
        .load_available_filters(EntityType::Certificate, Resource::Certificates, &fetcher)
        .await
        .unwrap();
    assert!(outcome.is_installed());
    assert!(store.is_loaded(EntityType::Certificate));

    let username = store
        .lookup_field(EntityType::Certificate, FieldSource::Meta, "username|STRING")
        .unwrap();
    assert_eq!(username.label, "Username");
    assert!(store
        .lookup_field(EntityType::Certificate, FieldSource::Meta, "username")
        .is_none());
    assert!(store
        .lookup_field(EntityType::Key, FieldSource::Meta, "username|STRING")
        .is_none());
}

#[tokio::test]
async fn lookup_never_fetches() {
    let store = FilterCatalogStore::new();
    let fetcher = MockCatalogFetcher::new();
    assert!(store
        .lookup_field(EntityType::Certificate, FieldSource::Property, "commonName")
        .is_none());
    assert!(store.snapshot(EntityType::Certificate).is_empty());
    assert_eq!(fetcher.calls(), 0);

    let stats = store.stats();
    assert_eq!(stats.lookup_misses, 1);
    assert_eq!(stats.loads, 0);
}

#[tokio::test]
async fn failed_load_keeps_previous_catalog() {
    let store = FilterCatalogStore::new();
    let fetcher = MockCatalogFetcher::new();
    fetcher.push_ok(vec![field("commonName", "Common Name")]);
    fetcher.push_err(transport_error());

    store
        .load_available_filters(EntityType::Certificate, Resource::Certificates, &fetcher)
        .await
        .unwrap();
    let before = store.snapshot(EntityType::Certificate);

    let err = store
        .load_available_filters(EntityType::Certificate, Resource::Certificates, &fetcher)
        .await
        .unwrap_err();
    assert_eq!(err, transport_error());

    let after = store.snapshot(EntityType::Certificate);
    assert!(before.ptr_eq(&after));
    assert_eq!(store.stats().failures, 1);
}

#[tokio::test]
async fn successful_reload_replaces_wholesale() {
    let store = FilterCatalogStore::new();
    let fetcher = MockCatalogFetcher::new();
    fetcher.push_ok(vec![field("commonName", "Common Name"), field("serialNumber", "Serial")]);
    fetcher.push_ok(vec![field("commonName", "CN")]);

    for _ in 0..2 {
        store
            .load_available_filters(EntityType::Certificate, Resource::Certificates, &fetcher)
            .await
            .unwrap();
    }

    let snapshot = store.snapshot(EntityType::Certificate);
    assert_eq!(snapshot.len(), 1);
    assert_eq!(
        snapshot
            .find_field(FieldSource::Property, "commonName")
            .map(|f| f.label.as_str()),
        Some("CN")
    );
    assert!(snapshot.find_field(FieldSource::Property, "serialNumber").is_none());
}

#[tokio::test]
async fn older_load_resolving_late_is_discarded() {
    let store = FilterCatalogStore::new();
    let fetcher = MockCatalogFetcher::new();
    let release_first = fetcher.push_gated(Ok(vec![field("commonName", "stale")]));
    fetcher.push_ok(vec![field("commonName", "fresh")]);

    let (first, second) = tokio::join!(
        store.load_available_filters(EntityType::Certificate, Resource::Certificates, &fetcher),
        async {
            let outcome = store
                .load_available_filters(EntityType::Certificate, Resource::Certificates, &fetcher)
                .await;
            let _ = release_first.send(());
            outcome
        }
    );

    assert!(matches!(first.unwrap(), LoadOutcome::Superseded { .. }));
    assert!(second.unwrap().is_installed());
    let current = store
        .lookup_field(EntityType::Certificate, FieldSource::Property, "commonName")
        .unwrap();
    assert_eq!(current.label, "fresh");
    assert_eq!(store.stats().superseded, 1);
}

#[tokio::test]
async fn invalidate_discards_in_flight_load() {
    let store = FilterCatalogStore::new();
    let fetcher = MockCatalogFetcher::new();
    let release = fetcher.push_gated(Ok(vec![field("commonName", "Common Name")]));

    let (outcome, had_entry) = tokio::join!(
        store.load_available_filters(EntityType::Certificate, Resource::Certificates, &fetcher),
        async {
            let had_entry = store.invalidate(EntityType::Certificate);
            let _ = release.send(());
            had_entry
        }
    );

    assert!(!had_entry);
    assert!(!outcome.unwrap().is_installed());
    assert!(!store.is_loaded(EntityType::Certificate));
}

#[tokio::test]
async fn failed_refresh_leaves_slot_empty() {
    let store = FilterCatalogStore::new();
    let fetcher = MockCatalogFetcher::new();
    fetcher.push_ok(vec![field("commonName", "Common Name")]);
    fetcher.push_err(transport_error());

    store
        .load_available_filters(EntityType::Certificate, Resource::Certificates, &fetcher)
        .await
        .unwrap();
    assert!(store
        .refresh(EntityType::Certificate, Resource::Certificates, &fetcher)
        .await
        .is_err());
    assert!(!store.is_loaded(EntityType::Certificate));
}

#[tokio::test]
async fn entity_types_are_independent() {
    let store = Arc::new(FilterCatalogStore::new());
    let fetcher = Arc::new(
        MockCatalogFetcher::new()
            .with_catalog(Resource::Certificates, fixtures::certificate_catalog())
            .with_catalog(Resource::Keys, vec![field("name", "Key Name")]),
    );

    let mut handles = Vec::new();
    for (entity_type, resource) in [
        (EntityType::Certificate, Resource::Certificates),
        (EntityType::Key, Resource::Keys),
        (EntityType::DiscoveryCertificate, Resource::Certificates),
    ] {
        let store = Arc::clone(&store);
        let fetcher = Arc::clone(&fetcher);
        handles.push(tokio::spawn(async move {
            store
                .load_available_filters(entity_type, resource, fetcher.as_ref())
                .await
                .map(|outcome| outcome.is_installed())
        }));
    }
    for handle in handles {
        assert!(handle.await.unwrap().unwrap());
    }

    assert_eq!(
        store.entity_types(),
        vec![EntityType::Certificate, EntityType::DiscoveryCertificate, EntityType::Key]
    );
    assert!(store
        .lookup_field(EntityType::Key, FieldSource::Property, "name")
        .is_some());
    assert!(store
        .lookup_field(EntityType::Certificate, FieldSource::Property, "name")
        .is_none());
    assert_eq!(fetcher.calls(), 3);
}

proptest! {
    #[test]
    fn lookup_matches_installed_fields(catalog in generators::arb_catalog(16)) {
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let store = FilterCatalogStore::new();
        let fetcher = MockCatalogFetcher::new();
        fetcher.push_ok(catalog.clone());

        runtime
            .block_on(store.load_available_filters(EntityType::Certificate, Resource::Certificates, &fetcher))
            .unwrap();

        for field in &catalog {
            let found = store.lookup_field(EntityType::Certificate, field.field_source, &field.field_identifier);
            prop_assert_eq!(found.as_ref(), Some(field));
        }
        prop_assert_eq!(store.snapshot(EntityType::Certificate).len(), catalog.len());
    }

    #[test]
    fn last_issued_load_wins(labels in prop::collection::vec("[A-Za-z]{1,8}", 1..6)) {
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let store = FilterCatalogStore::new();
        let fetcher = MockCatalogFetcher::new();
        for label in &labels {
            fetcher.push_ok(vec![field("commonName", label)]);
        }

        runtime.block_on(async {
            for _ in &labels {
                let _ = store
                    .load_available_filters(EntityType::Certificate, Resource::Certificates, &fetcher)
                    .await;
            }
        });

        let current = store.lookup_field(EntityType::Certificate, FieldSource::Property, "commonName");
        prop_assert_eq!(current.map(|f| f.label), labels.last().cloned());
    }
}

#[test]
fn wire_fixture_flattens() {
    let groups = serde_json::from_value(fixtures::certificate_catalog_json()).unwrap();
    let fields = certus_catalog::flatten_groups(groups);
    assert_eq!(fields.len(), 3);
    assert_eq!(fields[2].field_source, FieldSource::Meta);
    assert_eq!(fields[1].enum_value_set.as_deref(), Some("CertificateState"));
}
