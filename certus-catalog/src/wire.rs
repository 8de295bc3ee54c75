//! Wire format of the searchable-fields endpoint.
//!
//! The backend groups field descriptors by source; the catalog stores them
//! flattened, each descriptor carrying its group's source.

use certus_core::{FieldSource, FilterConditionOperator, FilterField, FilterFieldType};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fields of one source namespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFieldGroup {
    pub filter_field_source: FieldSource,
    #[serde(default)]
    pub search_field_data: Vec<SearchFieldData>,
}

/// One searchable field as described by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFieldData {
    pub field_identifier: String,
    pub field_label: String,
    #[serde(rename = "type")]
    pub field_type: FilterFieldType,
    #[serde(default)]
    pub conditions: Vec<FilterConditionOperator>,
    /// Possible values for list fields.
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub multi_value: bool,
    #[serde(default)]
    pub platform_enum: Option<String>,
    #[serde(default)]
    pub attribute_content_type: Option<String>,
}

impl SearchFieldData {
    fn into_field(self, source: FieldSource) -> FilterField {
        let possible_values = match self.value {
            None | Some(Value::Null) => None,
            Some(Value::Array(values)) => Some(values),
            Some(single) => Some(vec![single]),
        };
        FilterField {
            field_source: source,
            field_identifier: self.field_identifier,
            label: self.field_label,
            field_type: self.field_type,
            enum_value_set: self.platform_enum,
            operators: self.conditions,
            possible_values,
            multi_value: self.multi_value,
            attribute_content_type: self.attribute_content_type,
        }
    }
}

/// Flatten grouped descriptors, preserving backend order.
pub fn flatten_groups(groups: Vec<SearchFieldGroup>) -> Vec<FilterField> {
    groups
        .into_iter()
        .flat_map(|group| {
            let source = group.filter_field_source;
            group
                .search_field_data
                .into_iter()
                .map(move |data| data.into_field(source))
        })
        .collect()
}
