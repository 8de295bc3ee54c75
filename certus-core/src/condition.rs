//! Condition items and named condition groups

use crate::{FieldSource, FilterConditionOperator};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use uuid::Uuid;

/// Operand of a condition item.
///
/// The shape is constrained by the resolved field's type but never enforced
/// at this level. Absent values are `None` on [`ConditionItem::value`].
/// (De)serialization goes through [`serde_json::Value`] so that wire objects
/// are classified in one place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum ConditionValue {
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
    List(Vec<ConditionValue>),
    /// Reference object rendered through its `name`.
    Named(NamedValue),
    Object(Map<String, Value>),
}

/// Object operand carrying a display `name` plus arbitrary other keys.
///
/// `name` is always a string, number or boolean.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedValue {
    pub name: Value,
    pub extra: Map<String, Value>,
}

impl NamedValue {
    /// Strings verbatim, numbers and booleans stringified.
    pub fn display_name(&self) -> String {
        match &self.name {
            Value::String(name) => name.clone(),
            other => other.to_string(),
        }
    }
}

fn is_scalar_name(name: &Value) -> bool {
    matches!(name, Value::String(_) | Value::Number(_) | Value::Bool(_))
}

impl ConditionValue {
    pub fn text(value: impl Into<String>) -> Self {
        ConditionValue::Text(value.into())
    }

    pub fn list<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<ConditionValue>,
    {
        ConditionValue::List(values.into_iter().map(Into::into).collect())
    }

    pub fn named(name: impl Into<String>) -> Self {
        ConditionValue::Named(NamedValue {
            name: Value::String(name.into()),
            extra: Map::new(),
        })
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ConditionValue::Null)
    }

    /// Number of operands: list length, zero for null, one otherwise.
    pub fn arity(&self) -> usize {
        match self {
            ConditionValue::Null => 0,
            ConditionValue::List(items) => items.iter().filter(|v| !v.is_null()).count(),
            _ => 1,
        }
    }
}

impl From<Value> for ConditionValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => ConditionValue::Null,
            Value::Bool(b) => ConditionValue::Bool(b),
            Value::Number(n) => ConditionValue::Number(n),
            Value::String(s) => ConditionValue::Text(s),
            Value::Array(items) => {
                ConditionValue::List(items.into_iter().map(ConditionValue::from).collect())
            }
            Value::Object(mut map) => match map.remove("name") {
                Some(name) if is_scalar_name(&name) => {
                    ConditionValue::Named(NamedValue { name, extra: map })
                }
                Some(other) => {
                    map.insert("name".to_string(), other);
                    ConditionValue::Object(map)
                }
                None => ConditionValue::Object(map),
            },
        }
    }
}

impl From<ConditionValue> for Value {
    fn from(value: ConditionValue) -> Self {
        match value {
            ConditionValue::Null => Value::Null,
            ConditionValue::Bool(b) => Value::Bool(b),
            ConditionValue::Number(n) => Value::Number(n),
            ConditionValue::Text(s) => Value::String(s),
            ConditionValue::List(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            ConditionValue::Named(NamedValue { name, mut extra }) => {
                extra.insert("name".to_string(), name);
                Value::Object(extra)
            }
            ConditionValue::Object(map) => Value::Object(map),
        }
    }
}

impl From<&str> for ConditionValue {
    fn from(value: &str) -> Self {
        ConditionValue::Text(value.to_string())
    }
}

impl From<String> for ConditionValue {
    fn from(value: String) -> Self {
        ConditionValue::Text(value)
    }
}

impl From<bool> for ConditionValue {
    fn from(value: bool) -> Self {
        ConditionValue::Bool(value)
    }
}

impl From<i64> for ConditionValue {
    fn from(value: i64) -> Self {
        ConditionValue::Number(Number::from(value))
    }
}

/// One predicate: field + operator + value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ConditionItem {
    pub field_source: FieldSource,
    pub field_identifier: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub operator: FilterConditionOperator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Object>))]
    pub value: Option<ConditionValue>,
}

impl ConditionItem {
    pub fn new(
        field_source: FieldSource,
        field_identifier: impl Into<String>,
        operator: FilterConditionOperator,
    ) -> Self {
        Self {
            field_source,
            field_identifier: field_identifier.into(),
            operator,
            value: None,
        }
    }

    pub fn with_value(mut self, value: impl Into<ConditionValue>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Value with explicit nulls collapsed into absence.
    pub fn effective_value(&self) -> Option<&ConditionValue> {
        self.value.as_ref().filter(|v| !v.is_null())
    }
}

/// Named, ordered list of condition items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ConditionGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<Uuid>,
    #[serde(alias = "conditionName")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, alias = "conditionItems")]
    pub items: Vec<ConditionItem>,
}

impl ConditionGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            uuid: None,
            name: name.into(),
            description: None,
            items: Vec::new(),
        }
    }

    pub fn with_items(mut self, items: Vec<ConditionItem>) -> Self {
        self.items = items;
        self
    }

    pub fn push(&mut self, item: ConditionItem) {
        self.items.push(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
