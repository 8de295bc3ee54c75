//! CERTUS Test Utilities
//!
//! Shared test infrastructure for the CERTUS workspace:
//! - Scripted mock fetchers for catalog and platform enum loads
//! - Proptest generators for fields, values and condition items
//! - Fixtures for a certificate catalog and its platform enums
//! - Assertions for rendered display fragments

pub use certus_catalog::{CatalogFetcher, PlatformEnumFetcher};
pub use certus_core::{
    CatalogError, ConditionGroup, ConditionItem, ConditionValue, EntityType, FieldSource,
    FilterConditionOperator, FilterField, FilterFieldType, PlatformEnumDictionary,
    PlatformEnumItem, Resource,
};

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::oneshot;

// ============================================================================
// MOCK FETCHERS
// ============================================================================

struct ScriptedResponse {
    result: Result<Vec<FilterField>, CatalogError>,
    gate: Option<oneshot::Receiver<()>>,
}

/// Catalog and enum fetcher driven by a script.
///
/// Each fetch pops the next scripted response; a gated response waits until
/// its sender fires (or is dropped), which lets tests resolve loads out of
/// order. With an empty script the per-resource defaults are served, and a
/// resource without a default yields a 404 `RequestFailed`.
#[derive(Default)]
pub struct MockCatalogFetcher {
    script: Mutex<VecDeque<ScriptedResponse>>,
    defaults: HashMap<Resource, Vec<FilterField>>,
    enums: Option<PlatformEnumDictionary>,
    calls: AtomicUsize,
    requested: Mutex<Vec<Resource>>,
}

impl MockCatalogFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `fields` for `resource` whenever the script is empty.
    pub fn with_catalog(mut self, resource: Resource, fields: Vec<FilterField>) -> Self {
        self.defaults.insert(resource, fields);
        self
    }

    pub fn with_enums(mut self, enums: PlatformEnumDictionary) -> Self {
        self.enums = Some(enums);
        self
    }

    pub fn push_ok(&self, fields: Vec<FilterField>) {
        self.push(Ok(fields), None);
    }

    pub fn push_err(&self, error: CatalogError) {
        self.push(Err(error), None);
    }

    /// Script a response that resolves only once the returned sender fires.
    pub fn push_gated(&self, result: Result<Vec<FilterField>, CatalogError>) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.push(result, Some(rx));
        tx
    }

    fn push(&self, result: Result<Vec<FilterField>, CatalogError>, gate: Option<oneshot::Receiver<()>>) {
        lock(&self.script).push_back(ScriptedResponse { result, gate });
    }

    /// Number of catalog fetches served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Resources requested, in call order.
    pub fn requested(&self) -> Vec<Resource> {
        lock(&self.requested).clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl CatalogFetcher for MockCatalogFetcher {
    async fn fetch_available_filters(
        &self,
        resource: Resource,
    ) -> Result<Vec<FilterField>, CatalogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        lock(&self.requested).push(resource);

        let scripted = lock(&self.script).pop_front();
        match scripted {
            Some(ScriptedResponse { result, gate }) => {
                if let Some(gate) = gate {
                    // A dropped sender releases the gate as well.
                    let _ = gate.await;
                }
                result
            }
            None => self.defaults.get(&resource).cloned().ok_or_else(|| {
                CatalogError::RequestFailed {
                    resource,
                    status: 404,
                    message: "no mock catalog".to_string(),
                }
            }),
        }
    }
}

#[async_trait]
impl PlatformEnumFetcher for MockCatalogFetcher {
    async fn fetch_platform_enums(&self) -> Result<PlatformEnumDictionary, CatalogError> {
        self.enums
            .clone()
            .ok_or_else(|| CatalogError::EnumsUnavailable {
                reason: "no mock enums".to_string(),
            })
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for CERTUS condition types.

    use super::*;
    use proptest::prelude::*;

    pub fn arb_field_source() -> impl Strategy<Value = FieldSource> {
        prop::sample::select(FieldSource::ALL.to_vec())
    }

    pub fn arb_known_operator() -> impl Strategy<Value = FilterConditionOperator> {
        prop::sample::select(FilterConditionOperator::KNOWN.to_vec())
    }

    pub fn arb_field_type() -> impl Strategy<Value = FilterFieldType> {
        prop_oneof![
            Just(FilterFieldType::String),
            Just(FilterFieldType::Text),
            Just(FilterFieldType::Number),
            Just(FilterFieldType::Boolean),
            Just(FilterFieldType::Date),
            Just(FilterFieldType::DateTime),
            Just(FilterFieldType::List),
            Just(FilterFieldType::Enum),
        ]
    }

    pub fn arb_entity_type() -> impl Strategy<Value = EntityType> {
        prop_oneof![
            Just(EntityType::Certificate),
            Just(EntityType::RaProfile),
            Just(EntityType::Key),
            Just(EntityType::User),
            Just(EntityType::Trigger),
        ]
    }

    /// A bare identifier, or `<name>|<TYPE>` for sources using composite keys.
    pub fn arb_identifier(source: FieldSource) -> impl Strategy<Value = String> {
        let content_type = prop::sample::select(vec!["STRING", "TEXT", "INTEGER", "DATE", "BOOLEAN"]);
        ("[a-z][a-zA-Z0-9]{0,15}", content_type).prop_map(move |(name, content_type)| {
            if source.uses_composite_identifier() {
                format!("{}|{}", name, content_type)
            } else {
                name
            }
        })
    }

    /// Text without quotes, never parseable as a date.
    pub fn arb_plain_text() -> impl Strategy<Value = String> {
        "[a-zA-Z][a-zA-Z0-9 _.-]{0,23}"
    }

    /// Display name of a reference object.
    pub fn arb_name() -> impl Strategy<Value = serde_json::Value> {
        prop_oneof![
            2 => arb_plain_text().prop_map(serde_json::Value::String),
            1 => any::<i64>().prop_map(serde_json::Value::from),
            1 => any::<bool>().prop_map(serde_json::Value::Bool),
        ]
    }

    /// Scalar operand: text, integer, float or named object.
    pub fn arb_scalar_value() -> impl Strategy<Value = ConditionValue> {
        prop_oneof![
            arb_plain_text().prop_map(ConditionValue::Text),
            any::<i64>().prop_map(ConditionValue::from),
            (-1.0e9f64..1.0e9).prop_map(|f| ConditionValue::from(serde_json::Value::from(f))),
            arb_name().prop_map(|name| ConditionValue::from(serde_json::json!({ "name": name }))),
        ]
    }

    fn arb_json_leaf() -> impl Strategy<Value = serde_json::Value> {
        prop_oneof![
            Just(serde_json::Value::Null),
            any::<bool>().prop_map(serde_json::Value::Bool),
            any::<i64>().prop_map(serde_json::Value::from),
            arb_plain_text().prop_map(serde_json::Value::String),
        ]
    }

    /// Arbitrary object operand, including `name` keys holding nulls,
    /// arrays or nested objects.
    pub fn arb_object_value() -> impl Strategy<Value = ConditionValue> {
        let key = prop_oneof![Just("name".to_string()), "[a-z]{1,8}"];
        let member = prop_oneof![
            3 => arb_json_leaf(),
            1 => prop::collection::vec(arb_json_leaf(), 0..3).prop_map(serde_json::Value::Array),
            1 => prop::collection::vec(("[a-z]{1,4}", arb_json_leaf()), 0..3)
                .prop_map(|entries| serde_json::Value::Object(entries.into_iter().collect())),
        ];
        prop::collection::vec((key, member), 0..4).prop_map(|entries| {
            ConditionValue::from(serde_json::Value::Object(entries.into_iter().collect()))
        })
    }

    /// Any operand shape, malformed ones included.
    pub fn arb_condition_value() -> impl Strategy<Value = ConditionValue> {
        let element = prop_oneof![
            4 => arb_scalar_value(),
            1 => arb_object_value(),
            1 => any::<bool>().prop_map(ConditionValue::Bool),
            1 => Just(ConditionValue::Null),
        ];
        let nested = prop::collection::vec(element.clone(), 0..3).prop_map(ConditionValue::List);
        prop_oneof![
            3 => arb_scalar_value(),
            1 => arb_object_value(),
            1 => any::<bool>().prop_map(ConditionValue::Bool),
            1 => Just(ConditionValue::Null),
            2 => prop::collection::vec(prop_oneof![4 => element, 1 => nested], 0..5)
                .prop_map(ConditionValue::List),
        ]
    }

    pub fn arb_filter_field() -> impl Strategy<Value = FilterField> {
        arb_field_source()
            .prop_flat_map(|source| (Just(source), arb_identifier(source)))
            .prop_flat_map(|(source, identifier)| {
                (Just(source), Just(identifier), arb_plain_text(), arb_field_type())
            })
            .prop_map(|(source, identifier, label, field_type)| {
                FilterField::new(source, identifier, label, field_type)
            })
    }

    /// Fields with distinct `(source, identifier)` keys.
    pub fn arb_catalog(max_fields: usize) -> impl Strategy<Value = Vec<FilterField>> {
        prop::collection::vec(arb_filter_field(), 0..=max_fields).prop_map(|fields| {
            let mut seen = std::collections::HashSet::new();
            fields
                .into_iter()
                .filter(|f| seen.insert((f.field_source, f.field_identifier.clone())))
                .collect()
        })
    }

    pub fn arb_condition_item() -> impl Strategy<Value = ConditionItem> {
        arb_field_source()
            .prop_flat_map(|source| (Just(source), arb_identifier(source)))
            .prop_flat_map(|(source, identifier)| {
                (
                    Just(source),
                    Just(identifier),
                    arb_known_operator(),
                    prop::option::of(arb_condition_value()),
                )
            })
            .prop_map(|(source, identifier, operator, value)| ConditionItem {
                field_source: source,
                field_identifier: identifier,
                operator,
                value,
            })
    }

    pub fn arb_condition_group() -> impl Strategy<Value = ConditionGroup> {
        (arb_plain_text(), prop::collection::vec(arb_condition_item(), 0..8))
            .prop_map(|(name, items)| ConditionGroup::new(name).with_items(items))
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built catalogs and enum tables.

    use super::*;
    use serde_json::json;

    /// Searchable fields of the certificate inventory.
    pub fn certificate_catalog() -> Vec<FilterField> {
        vec![
            FilterField::new(FieldSource::Property, "commonName", "Common Name", FilterFieldType::String),
            FilterField::new(FieldSource::Property, "notAfter", "Expires At", FilterFieldType::Date),
            FilterField::new(FieldSource::Property, "issuedAt", "Issued At", FilterFieldType::DateTime),
            FilterField::new(FieldSource::Property, "status", "Status", FilterFieldType::List)
                .with_enum("CertificateState")
                .with_multi_value(true)
                .with_possible_values(vec![json!("valid"), json!("revoked"), json!("expired")]),
            FilterField::new(FieldSource::Property, "owner", "Owner", FilterFieldType::Object),
            FilterField::new(FieldSource::Meta, "username|STRING", "Username", FilterFieldType::String),
            FilterField::new(FieldSource::Meta, "port|INTEGER", "Port", FilterFieldType::Number),
            FilterField::new(FieldSource::Custom, "region|STRING", "Region", FilterFieldType::List)
                .with_multi_value(true),
            FilterField::new(FieldSource::Data, "keyUsage|STRING", "Key Usage", FilterFieldType::String),
        ]
    }

    /// Certificate catalog wrapped in the platform's grouped wire format.
    pub fn certificate_catalog_json() -> serde_json::Value {
        json!([
            {
                "filterFieldSource": "property",
                "searchFieldData": [
                    {"fieldIdentifier": "commonName", "fieldLabel": "Common Name", "type": "string",
                     "conditions": ["EQUALS", "CONTAINS"]},
                    {"fieldIdentifier": "status", "fieldLabel": "Status", "type": "list",
                     "multiValue": true, "platformEnum": "CertificateState",
                     "value": ["valid", "revoked", "expired"]}
                ]
            },
            {
                "filterFieldSource": "meta",
                "searchFieldData": [
                    {"fieldIdentifier": "username|STRING", "fieldLabel": "Username", "type": "string",
                     "attributeContentType": "string"}
                ]
            }
        ])
    }

    pub fn platform_enums() -> PlatformEnumDictionary {
        let mut dictionary = PlatformEnumDictionary::new();
        let mut insert = |enum_name: &str, code: &str, label: &str| {
            dictionary.entry(enum_name.to_string()).or_default().insert(
                code.to_string(),
                PlatformEnumItem {
                    code: code.to_string(),
                    label: label.to_string(),
                    description: None,
                },
            );
        };
        insert("CertificateState", "valid", "Valid");
        insert("CertificateState", "revoked", "Revoked");
        insert("CertificateState", "expired", "Expired");
        insert("FilterConditionOperator", "EQUALS", "Equals");
        insert("FilterFieldSource", "custom", "Custom Attribute");
        dictionary
    }

    /// Compliance rule condition group over the certificate catalog.
    pub fn expiring_certificates_group() -> ConditionGroup {
        ConditionGroup::new("expiring-certificates").with_items(vec![
            ConditionItem::new(FieldSource::Property, "notAfter", FilterConditionOperator::Lesser)
                .with_value("2025-06-30"),
            ConditionItem::new(FieldSource::Property, "status", FilterConditionOperator::Equals)
                .with_value(ConditionValue::list(["valid", "expired"])),
            ConditionItem::new(FieldSource::Meta, "username|STRING", FilterConditionOperator::Contains)
                .with_value("d"),
            ConditionItem::new(FieldSource::Custom, "unknownField|TEXT", FilterConditionOperator::NotEmpty),
        ])
    }
}

// ============================================================================
// ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertions for rendered labels.

    /// Assert that `label` is one literal wrapped in a single pair of quotes.
    #[track_caller]
    pub fn assert_single_quoted(label: &str) {
        assert!(
            label.len() >= 2 && label.starts_with('\'') && label.ends_with('\''),
            "Label not quoted: {:?}",
            label
        );
    }

    /// Assert that `label` is `expected.len()` quoted literals joined by ` OR `.
    #[track_caller]
    pub fn assert_or_joined(label: &str, expected: &[String]) {
        let joined = expected
            .iter()
            .map(|e| format!("'{}'", e))
            .collect::<Vec<_>>()
            .join(" OR ");
        assert_eq!(label, joined, "List label mismatch");
    }
}

// ============================================================================
// TESTS
// ============================================================================
