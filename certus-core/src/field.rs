//! Filterable field descriptors

use crate::{FieldSource, FilterConditionOperator, FilterFieldType};
use serde::{Deserialize, Serialize};

/// Separator between attribute name and content type in composite identifiers.
pub const COMPOSITE_SEPARATOR: char = '|';

/// One filterable attribute of a resource, as declared by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct FilterField {
    pub field_source: FieldSource,
    /// Unique within (entity type, source). DATA and CUSTOM sources use `<name>|<TYPE>`.
    pub field_identifier: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FilterFieldType,
    /// Platform enum used to translate stored codes into labels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enum_value_set: Option<String>,
    /// Operators the backend accepts for this field. Empty means unrestricted.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[cfg_attr(feature = "openapi", schema(value_type = Vec<String>))]
    pub operators: Vec<FilterConditionOperator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Vec<Object>>))]
    pub possible_values: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub multi_value: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute_content_type: Option<String>,
}

impl FilterField {
    pub fn new(
        field_source: FieldSource,
        field_identifier: impl Into<String>,
        label: impl Into<String>,
        field_type: FilterFieldType,
    ) -> Self {
        Self {
            field_source,
            field_identifier: field_identifier.into(),
            label: label.into(),
            field_type,
            enum_value_set: None,
            operators: Vec::new(),
            possible_values: None,
            multi_value: false,
            attribute_content_type: None,
        }
    }

    pub fn with_enum(mut self, enum_name: impl Into<String>) -> Self {
        self.enum_value_set = Some(enum_name.into());
        self
    }

    pub fn with_operators(mut self, operators: Vec<FilterConditionOperator>) -> Self {
        self.operators = operators;
        self
    }

    pub fn with_possible_values(mut self, values: Vec<serde_json::Value>) -> Self {
        self.possible_values = Some(values);
        self
    }

    pub fn with_multi_value(mut self, multi_value: bool) -> Self {
        self.multi_value = multi_value;
        self
    }

    /// Whether this descriptor answers to the given lookup key.
    pub fn matches(&self, source: FieldSource, identifier: &str) -> bool {
        self.field_source == source && self.field_identifier == identifier
    }

    /// Whether the backend accepts `operator` on this field.
    pub fn allows(&self, operator: &FilterConditionOperator) -> bool {
        self.operators.is_empty() || self.operators.contains(operator)
    }

    /// Attribute name part of the identifier (the whole identifier when not composite).
    pub fn attribute_name(&self) -> &str {
        split_composite_identifier(&self.field_identifier).0
    }
}

/// Synchronous field resolution by `(source, identifier)`.
///
/// Implementations must never fetch; a miss is the normal "unresolved field"
/// case and is reported as `None`.
pub trait FieldLookup {
    fn find_field(&self, source: FieldSource, identifier: &str) -> Option<&FilterField>;
}

impl FieldLookup for [FilterField] {
    fn find_field(&self, source: FieldSource, identifier: &str) -> Option<&FilterField> {
        self.iter().find(|field| field.matches(source, identifier))
    }
}

impl FieldLookup for Vec<FilterField> {
    fn find_field(&self, source: FieldSource, identifier: &str) -> Option<&FilterField> {
        self.as_slice().find_field(source, identifier)
    }
}

/// Split a `<name>|<TYPE>` identifier. Identifiers without a separator yield `None` as type.
pub fn split_composite_identifier(identifier: &str) -> (&str, Option<&str>) {
    match identifier.split_once(COMPOSITE_SEPARATOR) {
        Some((name, content_type)) => (name, Some(content_type)),
        None => (identifier, None),
    }
}
