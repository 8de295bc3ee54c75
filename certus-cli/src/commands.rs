//! Subcommand implementations.
//!
//! Commands write to any `io::Write` so they can run against a buffer in
//! tests; `main` passes stdout.

use std::io::Write;

use certus_catalog::{CatalogFetcher, CatalogSnapshot, FilterCatalogStore, PlatformEnumFetcher};
use certus_core::{
    validate_group, CatalogError, ConditionGroup, ConditionItem, EntityType, FieldSource,
    Resource,
};
use certus_render::{BadgeVariant, ConditionRenderer, DateFormatter, PlatformEnumRegistry};
use serde_json::Value;

use crate::error::CliError;

/// Catalog store plus the fetchers feeding it, bound to one entity type.
pub struct Session {
    store: FilterCatalogStore,
    catalog: Box<dyn CatalogFetcher>,
    enums: Option<Box<dyn PlatformEnumFetcher>>,
    entity_type: EntityType,
    resource: Resource,
}

impl Session {
    pub fn new(
        entity_type: EntityType,
        resource: Resource,
        catalog: Box<dyn CatalogFetcher>,
        enums: Option<Box<dyn PlatformEnumFetcher>>,
    ) -> Self {
        Self {
            store: FilterCatalogStore::new(),
            catalog,
            enums,
            entity_type,
            resource,
        }
    }

    pub fn store(&self) -> &FilterCatalogStore {
        &self.store
    }

    /// Load the catalog, failing on fetch errors.
    pub async fn catalog(&self) -> Result<CatalogSnapshot, CatalogError> {
        self.store
            .load_available_filters(self.entity_type, self.resource, self.catalog.as_ref())
            .await?;
        Ok(self.store.snapshot(self.entity_type))
    }

    /// Load the catalog, degrading to whatever is cached when the fetch fails.
    pub async fn catalog_or_cached(&self) -> CatalogSnapshot {
        match self.catalog().await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::warn!(
                    entity_type = %self.entity_type,
                    error = %err,
                    "Rendering without field catalog"
                );
                self.store.snapshot(self.entity_type)
            }
        }
    }

    /// Platform enum labels; empty when unavailable.
    pub async fn enum_registry(&self) -> PlatformEnumRegistry {
        let Some(fetcher) = &self.enums else {
            return PlatformEnumRegistry::default();
        };
        match fetcher.fetch_platform_enums().await {
            Ok(dictionary) => PlatformEnumRegistry::new(dictionary),
            Err(err) => {
                tracing::warn!(error = %err, "Platform enums unavailable, using built-in labels");
                PlatformEnumRegistry::default()
            }
        }
    }
}

/// Parse a conditions document.
///
/// Accepts a single group object, an array of groups, or a bare array of
/// condition items (wrapped into one group named `default_name`).
pub fn parse_groups(contents: &str, default_name: &str) -> Result<Vec<ConditionGroup>, serde_json::Error> {
    let document: Value = serde_json::from_str(contents)?;
    if let Value::Array(entries) = &document {
        if !entries.is_empty() && entries.iter().all(is_item) {
            let items: Vec<ConditionItem> = serde_json::from_value(document)?;
            return Ok(vec![ConditionGroup::new(default_name).with_items(items)]);
        }
        return serde_json::from_value(document);
    }
    Ok(vec![serde_json::from_value(document)?])
}

fn is_item(entry: &Value) -> bool {
    entry.get("fieldSource").is_some()
}

pub async fn run_fields(
    session: &Session,
    out: &mut dyn Write,
    source: Option<FieldSource>,
    json: bool,
) -> Result<(), CliError> {
    let snapshot = session.catalog().await?;
    let fields: Vec<_> = snapshot
        .fields()
        .iter()
        .filter(|field| source.map_or(true, |s| field.field_source == s))
        .collect();

    if json {
        serde_json::to_writer_pretty(&mut *out, &fields)?;
        writeln!(out)?;
        return Ok(());
    }
    for field in fields {
        write!(
            out,
            "{:<9} {:<36} {:<9} {}",
            field.field_source.as_code(),
            field.field_identifier,
            field.field_type,
            field.label
        )?;
        if let Some(enum_name) = &field.enum_value_set {
            write!(out, " [enum: {}]", enum_name)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

pub async fn run_render(
    session: &Session,
    out: &mut dyn Write,
    groups: &[ConditionGroup],
    dates: &dyn DateFormatter,
    variant: BadgeVariant,
    json: bool,
) -> Result<(), CliError> {
    let snapshot = session.catalog_or_cached().await;
    let enums = session.enum_registry().await;
    let renderer = ConditionRenderer::new(&enums, dates);
    let rendered: Vec<_> = groups
        .iter()
        .map(|group| renderer.render_group(group, &snapshot, variant))
        .collect();

    let unresolved: usize = rendered.iter().map(|group| group.unresolved_count()).sum();
    if unresolved > 0 {
        tracing::debug!(unresolved, "Some condition fields did not resolve");
    }

    if json {
        serde_json::to_writer_pretty(&mut *out, &rendered)?;
        writeln!(out)?;
        return Ok(());
    }
    for (i, group) in rendered.iter().enumerate() {
        if i > 0 && variant == BadgeVariant::Standard {
            writeln!(out)?;
        }
        writeln!(out, "{}", group)?;
    }
    Ok(())
}

/// Validate every item; unresolved fields only get operand-arity checks.
pub async fn run_validate(
    session: &Session,
    out: &mut dyn Write,
    groups: &[ConditionGroup],
) -> Result<(), CliError> {
    let snapshot = session.catalog_or_cached().await;
    let mut failures = 0;
    for group in groups {
        for (index, err) in validate_group(group, &snapshot) {
            failures += 1;
            writeln!(out, "{}[{}]: {}", group.name, index, err)?;
        }
    }
    if failures > 0 {
        return Err(CliError::ValidationFailed { count: failures });
    }
    writeln!(out, "ok")?;
    Ok(())
}
