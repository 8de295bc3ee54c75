//! Display tuple of a single condition item.

use std::fmt;

use serde::Serialize;

use crate::value::quote;

/// Human-readable rendering of one condition item.
///
/// `field_label` and `value_label` are stored unquoted and quoted
/// respectively: the value formatter owns its own quoting because list values
/// quote each element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionDisplay {
    pub source_label: String,
    pub field_label: String,
    pub operator_label: String,
    pub value_label: String,
    /// Whether the field resolved against the catalog.
    pub resolved: bool,
}

impl ConditionDisplay {
    /// Badge fragments in display order. The value fragment is omitted when empty.
    pub fn fragments(&self) -> Vec<String> {
        let mut fragments = vec![
            self.source_label.clone(),
            quote(&self.field_label),
            self.operator_label.clone(),
        ];
        if !self.value_label.is_empty() {
            fragments.push(self.value_label.clone());
        }
        fragments
    }

    pub fn has_value(&self) -> bool {
        !self.value_label.is_empty()
    }
}

impl fmt::Display for ConditionDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fragments().join(" "))
    }
}
