//! Platform enum dictionary as served by the backend.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One code of a platform-managed enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformEnumItem {
    pub code: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Enum name -> code -> item.
pub type PlatformEnumDictionary = BTreeMap<String, BTreeMap<String, PlatformEnumItem>>;

/// Platform enum holding display labels of [`crate::FieldSource`] codes.
pub const FIELD_SOURCE_ENUM: &str = "FilterFieldSource";

/// Platform enum holding display labels of [`crate::FilterConditionOperator`] tokens.
pub const CONDITION_OPERATOR_ENUM: &str = "FilterConditionOperator";
