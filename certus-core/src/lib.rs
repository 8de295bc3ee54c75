//! CERTUS Core - Condition Data Model
//!
//! Condition items, filter field descriptors and their enums. All other
//! crates depend on this. Formatting lives in `certus-render`, caching and
//! fetching in `certus-catalog`.

pub mod condition;
pub mod enums;
pub mod error;
pub mod field;
pub mod platform;
pub mod validation;

pub use condition::{ConditionGroup, ConditionItem, ConditionValue, NamedValue};
pub use enums::{EntityType, FieldSource, FilterConditionOperator, FilterFieldType, Resource};
pub use error::{CatalogError, CertusError, CertusResult, ValidationError};
pub use field::{split_composite_identifier, FieldLookup, FilterField, COMPOSITE_SEPARATOR};
pub use platform::{
    PlatformEnumDictionary, PlatformEnumItem, CONDITION_OPERATOR_ENUM, FIELD_SOURCE_ENUM,
};
pub use validation::{validate_group, validate_item};
