//! Immutable catalog snapshots.

use certus_core::{FieldLookup, FieldSource, FilterField};
use std::collections::HashMap;
use std::sync::Arc;

/// Read-only view of one entity type's fields.
///
/// Cloning is cheap; a snapshot stays valid after the store has been
/// refreshed or invalidated.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    inner: Arc<SnapshotInner>,
}

#[derive(Debug, Default)]
struct SnapshotInner {
    fields: Vec<FilterField>,
    /// source -> identifier -> position in `fields`.
    index: HashMap<FieldSource, HashMap<String, usize>>,
}

impl CatalogSnapshot {
    /// Build a snapshot. On duplicate `(source, identifier)` the first descriptor wins.
    pub fn new(fields: Vec<FilterField>) -> Self {
        let mut index: HashMap<FieldSource, HashMap<String, usize>> = HashMap::new();
        for (position, field) in fields.iter().enumerate() {
            let by_identifier = index.entry(field.field_source).or_default();
            if by_identifier.contains_key(&field.field_identifier) {
                tracing::debug!(
                    source = %field.field_source,
                    identifier = %field.field_identifier,
                    "Duplicate filter field descriptor ignored"
                );
                continue;
            }
            by_identifier.insert(field.field_identifier.clone(), position);
        }
        Self {
            inner: Arc::new(SnapshotInner { fields, index }),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn fields(&self) -> &[FilterField] {
        &self.inner.fields
    }

    pub fn len(&self) -> usize {
        self.inner.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.fields.is_empty()
    }

    /// Fields of one source namespace, in backend order.
    pub fn by_source(&self, source: FieldSource) -> impl Iterator<Item = &FilterField> {
        self.inner
            .fields
            .iter()
            .filter(move |field| field.field_source == source)
    }

    /// Whether two snapshots share the same underlying field list.
    pub fn ptr_eq(&self, other: &CatalogSnapshot) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl FieldLookup for CatalogSnapshot {
    fn find_field(&self, source: FieldSource, identifier: &str) -> Option<&FilterField> {
        let position = self.inner.index.get(&source)?.get(identifier)?;
        self.inner.fields.get(*position)
    }
}

impl From<Vec<FilterField>> for CatalogSnapshot {
    fn from(fields: Vec<FilterField>) -> Self {
        Self::new(fields)
    }
}
