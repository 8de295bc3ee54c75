//! Condition item and condition group rendering.

use std::fmt;

use certus_core::{
    ConditionGroup, ConditionItem, ConditionValue, FieldLookup, FieldSource,
    FilterConditionOperator, FilterField, CONDITION_OPERATOR_ENUM, FIELD_SOURCE_ENUM,
};
use serde::Serialize;

use crate::dates::{ChronoDateFormatter, DateFormatter};
use crate::item::ConditionDisplay;
use crate::labels::{operator_label, source_label, EnumLabelResolver, NoEnumLabels};
use crate::value::{ValueFormatter, ValueStyle};

/// Presentation variant of the badges. Does not affect formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeVariant {
    #[default]
    Standard,
    Compact,
}

/// A condition group rendered as a header plus one badge per item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedGroup {
    pub header: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub variant: BadgeVariant,
    pub badges: Vec<ConditionDisplay>,
}

impl RenderedGroup {
    pub fn badge_count(&self) -> usize {
        self.badges.len()
    }

    /// Number of badges whose field did not resolve against the catalog.
    pub fn unresolved_count(&self) -> usize {
        self.badges.iter().filter(|badge| !badge.resolved).count()
    }
}

impl fmt::Display for RenderedGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.variant {
            BadgeVariant::Standard => {
                write!(f, "{}", self.header)?;
                if let Some(description) = &self.description {
                    write!(f, "\n  {}", description)?;
                }
                for badge in &self.badges {
                    write!(f, "\n  - {}", badge)?;
                }
                Ok(())
            }
            BadgeVariant::Compact => {
                write!(f, "{}", self.header)?;
                for (i, badge) in self.badges.iter().enumerate() {
                    let sep = if i == 0 { ": " } else { " | " };
                    write!(f, "{}[{}]", sep, badge)?;
                }
                Ok(())
            }
        }
    }
}

/// Formats condition items against a field catalog.
///
/// Rendering is synchronous and side-effect free; the catalog is read through
/// [`FieldLookup`] and an unresolved field degrades to its raw identifier.
#[derive(Clone, Copy)]
pub struct ConditionRenderer<'a> {
    enums: &'a dyn EnumLabelResolver,
    dates: &'a dyn DateFormatter,
}

impl<'a> ConditionRenderer<'a> {
    pub fn new(enums: &'a dyn EnumLabelResolver, dates: &'a dyn DateFormatter) -> Self {
        Self { enums, dates }
    }

    /// Source label, preferring the platform's `FilterFieldSource` enum.
    pub fn source_label(&self, source: FieldSource) -> String {
        self.enums
            .label(FIELD_SOURCE_ENUM, source.as_code())
            .unwrap_or_else(|| source_label(source))
            .to_string()
    }

    /// Operator label, preferring the platform's `FilterConditionOperator`
    /// enum. Unknown operators fall back to their raw token.
    pub fn operator_label(&self, operator: &FilterConditionOperator) -> String {
        let token = operator.as_token();
        self.enums
            .label(CONDITION_OPERATOR_ENUM, token)
            .or_else(|| operator_label(operator))
            .unwrap_or(token)
            .to_string()
    }

    pub fn format_value(
        &self,
        value: Option<&ConditionValue>,
        field: Option<&FilterField>,
    ) -> String {
        ValueFormatter::new(self.enums, self.dates).format(value, ValueStyle::for_field(field))
    }

    pub fn render_item<L: FieldLookup + ?Sized>(
        &self,
        item: &ConditionItem,
        catalog: &L,
    ) -> ConditionDisplay {
        let field = catalog.find_field(item.field_source, &item.field_identifier);
        if field.is_none() {
            tracing::trace!(
                source = %item.field_source,
                identifier = %item.field_identifier,
                "Condition field not in catalog"
            );
        }

        ConditionDisplay {
            source_label: self.source_label(item.field_source),
            field_label: field
                .map(|f| f.label.clone())
                .unwrap_or_else(|| item.field_identifier.clone()),
            operator_label: self.operator_label(&item.operator),
            value_label: self.format_value(item.effective_value(), field),
            resolved: field.is_some(),
        }
    }

    /// Render every item in order under the group name.
    pub fn render_group<L: FieldLookup + ?Sized>(
        &self,
        group: &ConditionGroup,
        catalog: &L,
        variant: BadgeVariant,
    ) -> RenderedGroup {
        RenderedGroup {
            header: group.name.clone(),
            description: group.description.clone(),
            variant,
            badges: group
                .items
                .iter()
                .map(|item| self.render_item(item, catalog))
                .collect(),
        }
    }
}

impl fmt::Debug for ConditionRenderer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConditionRenderer").finish_non_exhaustive()
    }
}

/// Render one item with built-in labels and default date patterns.
pub fn render_item<L: FieldLookup + ?Sized>(item: &ConditionItem, catalog: &L) -> ConditionDisplay {
    let dates = ChronoDateFormatter::default();
    ConditionRenderer::new(&NoEnumLabels, &dates).render_item(item, catalog)
}

/// Render a group with built-in labels and default date patterns.
pub fn render_group<L: FieldLookup + ?Sized>(
    group: &ConditionGroup,
    catalog: &L,
    variant: BadgeVariant,
) -> RenderedGroup {
    let dates = ChronoDateFormatter::default();
    ConditionRenderer::new(&NoEnumLabels, &dates).render_group(group, catalog, variant)
}
