//! Value formatting.
//!
//! The declared field type selects a [`ValueStyle`]; the value's own shape
//! decides everything the type does not (lists, booleans, named objects).
//! Formatting never fails: anything unexpected is stringified and quoted.

use certus_core::{ConditionValue, FilterField, FilterFieldType};
use serde_json::Value;

use crate::dates::DateFormatter;
use crate::labels::EnumLabelResolver;

/// Separator between the quoted elements of a list value.
pub const LIST_SEPARATOR: &str = " OR ";

/// Type-driven formatting applied to textual operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueStyle<'a> {
    Plain,
    Date,
    DateTime,
    /// Codes of the named platform enum; `None` when the field declares no enum.
    Enum(Option<&'a str>),
}

impl<'a> ValueStyle<'a> {
    /// Style for a resolved field, or [`ValueStyle::Plain`] when unresolved.
    pub fn for_field(field: Option<&'a FilterField>) -> Self {
        let Some(field) = field else {
            return ValueStyle::Plain;
        };
        let enum_name = field.enum_value_set.as_deref();
        match field.field_type {
            FilterFieldType::Date => ValueStyle::Date,
            FilterFieldType::DateTime => ValueStyle::DateTime,
            FilterFieldType::Enum => ValueStyle::Enum(enum_name),
            FilterFieldType::String
            | FilterFieldType::Text
            | FilterFieldType::Number
            | FilterFieldType::Boolean
            | FilterFieldType::Time
            | FilterFieldType::List
            | FilterFieldType::Object
            | FilterFieldType::Unknown => match enum_name {
                Some(name) => ValueStyle::Enum(Some(name)),
                None => ValueStyle::Plain,
            },
        }
    }
}

/// Formats condition operands for display.
pub struct ValueFormatter<'a> {
    enums: &'a dyn EnumLabelResolver,
    dates: &'a dyn DateFormatter,
}

impl<'a> ValueFormatter<'a> {
    pub fn new(enums: &'a dyn EnumLabelResolver, dates: &'a dyn DateFormatter) -> Self {
        Self { enums, dates }
    }

    /// Display label of an operand: empty for absent values, otherwise one or
    /// more single-quoted literals joined by [`LIST_SEPARATOR`].
    pub fn format(&self, value: Option<&ConditionValue>, style: ValueStyle<'_>) -> String {
        match value {
            None | Some(ConditionValue::Null) => String::new(),
            Some(ConditionValue::List(items)) => items
                .iter()
                .filter(|item| !item.is_null())
                .map(|item| quote(&self.format_element(item, style)))
                .collect::<Vec<_>>()
                .join(LIST_SEPARATOR),
            Some(scalar) => quote(&self.format_element(scalar, style)),
        }
    }

    /// Unquoted text of a single operand.
    fn format_element(&self, value: &ConditionValue, style: ValueStyle<'_>) -> String {
        match value {
            ConditionValue::Null => String::new(),
            ConditionValue::Bool(flag) => flag.to_string(),
            ConditionValue::Named(named) => named.display_name(),
            ConditionValue::Text(text) => self.apply_style(text, style),
            ConditionValue::Number(number) => self.apply_style(&number.to_string(), style),
            ConditionValue::List(_) | ConditionValue::Object(_) => {
                Value::from(value.clone()).to_string()
            }
        }
    }

    fn apply_style(&self, text: &str, style: ValueStyle<'_>) -> String {
        match style {
            ValueStyle::Plain | ValueStyle::Enum(None) => text.to_string(),
            ValueStyle::Date => self.dates.format_date(text),
            ValueStyle::DateTime => self.dates.format_datetime(text),
            ValueStyle::Enum(Some(enum_name)) => self
                .enums
                .label(enum_name, text)
                .map(str::to_string)
                .unwrap_or_else(|| text.to_string()),
        }
    }
}

/// Wrap in single quotes.
pub fn quote(text: &str) -> String {
    format!("'{}'", text)
}
