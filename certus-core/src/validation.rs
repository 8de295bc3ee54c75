//! Condition item validation against the field catalog.
//!
//! Operand arity is checked for every item. Field-specific checks (allowed
//! operators, multi-value, possible values) only run when the field resolves;
//! an unresolved field is never a validation failure.

use crate::{
    ConditionGroup, ConditionItem, ConditionValue, FieldLookup, FilterField, ValidationError,
};
use regex::Regex;
use serde_json::Value;

/// Validate one condition item. `field` is the resolved descriptor, if any.
pub fn validate_item(
    item: &ConditionItem,
    field: Option<&FilterField>,
) -> Result<(), ValidationError> {
    let field_name = || item.field_identifier.clone();
    let value = item.effective_value();

    if let Some(field) = field {
        if !field.allows(&item.operator) {
            return Err(ValidationError::OperatorNotAllowed {
                field: field_name(),
                operator: item.operator.clone(),
            });
        }
    }

    // Unknown operators carry no arity information.
    if item.operator.is_known() {
        let arity = value.map(ConditionValue::arity).unwrap_or(0);
        if item.operator.is_value_less() && arity > 0 {
            return Err(ValidationError::UnexpectedValue {
                field: field_name(),
                operator: item.operator.clone(),
            });
        }
        if !item.operator.is_value_less() && arity == 0 {
            return Err(ValidationError::MissingValue {
                field: field_name(),
                operator: item.operator.clone(),
            });
        }
    }

    let Some(value) = value else {
        return Ok(());
    };

    if item.operator.is_pattern() {
        for pattern in scalars(value) {
            if let ConditionValue::Text(pattern) = pattern {
                Regex::new(pattern).map_err(|e| ValidationError::InvalidPattern {
                    field: field_name(),
                    reason: e.to_string(),
                })?;
            }
        }
    }

    if let Some(field) = field {
        let count = value.arity();
        if !field.multi_value && count > 1 {
            return Err(ValidationError::TooManyValues {
                field: field_name(),
                count,
            });
        }
        if let Some(allowed) = &field.possible_values {
            for candidate in scalars(value) {
                if !is_allowed(candidate, allowed) {
                    return Err(ValidationError::ValueNotAllowed {
                        field: field_name(),
                        value: Value::from(candidate.clone()).to_string(),
                    });
                }
            }
        }
    }

    Ok(())
}

/// Validate every item of a group, returning `(index, error)` for each failure.
pub fn validate_group<L>(group: &ConditionGroup, lookup: &L) -> Vec<(usize, ValidationError)>
where
    L: FieldLookup + ?Sized,
{
    group
        .items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let field = lookup.find_field(item.field_source, &item.field_identifier);
            validate_item(item, field).err().map(|err| (index, err))
        })
        .collect()
}

fn scalars(value: &ConditionValue) -> Vec<&ConditionValue> {
    match value {
        ConditionValue::List(items) => items.iter().filter(|v| !v.is_null()).collect(),
        ConditionValue::Null => Vec::new(),
        other => vec![other],
    }
}

/// Possible values are either plain scalars or reference objects keyed by `name`/`code`.
fn is_allowed(candidate: &ConditionValue, allowed: &[Value]) -> bool {
    let candidate_json = Value::from(candidate.clone());
    allowed.iter().any(|option| {
        if *option == candidate_json {
            return true;
        }
        let key = match candidate {
            ConditionValue::Text(text) => Some(text.as_str()),
            ConditionValue::Named(named) => named.name.as_str(),
            _ => None,
        };
        match (option, key) {
            (Value::Object(map), Some(key)) => ["name", "code"]
                .iter()
                .any(|k| map.get(*k).and_then(Value::as_str) == Some(key)),
            _ => false,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FieldSource, FilterConditionOperator, FilterFieldType};
    use serde_json::json;

    fn status_field() -> FilterField {
        FilterField::new(FieldSource::Property, "status", "Status", FilterFieldType::List)
            .with_enum("CertificateState")
            .with_operators(vec![
                FilterConditionOperator::Equals,
                FilterConditionOperator::NotEquals,
            ])
            .with_possible_values(vec![json!("valid"), json!({"code": "revoked", "label": "Revoked"})])
    }

    #[test]
    fn test_valid_item_passes() {
        let item = ConditionItem::new(FieldSource::Property, "status", FilterConditionOperator::Equals)
            .with_value("valid");
        assert!(validate_item(&item, Some(&status_field())).is_ok());

        let item = ConditionItem::new(FieldSource::Property, "status", FilterConditionOperator::Equals)
            .with_value("revoked");
        assert!(validate_item(&item, Some(&status_field())).is_ok());
    }

    #[test]
    fn test_operator_not_allowed() {
        let item = ConditionItem::new(FieldSource::Property, "status", FilterConditionOperator::Contains)
            .with_value("valid");
        assert!(matches!(
            validate_item(&item, Some(&status_field())),
            Err(ValidationError::OperatorNotAllowed { .. })
        ));
    }

    #[test]
    fn test_value_less_operator_with_value() {
        let item = ConditionItem::new(FieldSource::Meta, "owner|STRING", FilterConditionOperator::Empty)
            .with_value("x");
        assert!(matches!(
            validate_item(&item, None),
            Err(ValidationError::UnexpectedValue { .. })
        ));
    }

    #[test]
    fn test_missing_value() {
        let item = ConditionItem::new(FieldSource::Meta, "owner|STRING", FilterConditionOperator::Equals);
        assert!(matches!(
            validate_item(&item, None),
            Err(ValidationError::MissingValue { .. })
        ));

        let item = ConditionItem::new(FieldSource::Meta, "owner|STRING", FilterConditionOperator::Equals)
            .with_value(ConditionValue::List(Vec::new()));
        assert!(matches!(
            validate_item(&item, None),
            Err(ValidationError::MissingValue { .. })
        ));
    }

    #[test]
    fn test_unknown_operator_skips_arity() {
        let item = ConditionItem::new(FieldSource::Meta, "owner|STRING", FilterConditionOperator::from("BETWEEN"));
        assert!(validate_item(&item, None).is_ok());
    }

    #[test]
    fn test_too_many_values() {
        let item = ConditionItem::new(FieldSource::Property, "status", FilterConditionOperator::Equals)
            .with_value(ConditionValue::list(["valid", "revoked"]));
        assert_eq!(
            validate_item(&item, Some(&status_field())),
            Err(ValidationError::TooManyValues {
                field: "status".to_string(),
                count: 2
            })
        );

        let multi = status_field().with_multi_value(true);
        assert!(validate_item(&item, Some(&multi)).is_ok());
    }

    #[test]
    fn test_value_not_allowed() {
        let item = ConditionItem::new(FieldSource::Property, "status", FilterConditionOperator::Equals)
            .with_value("expired");
        assert!(matches!(
            validate_item(&item, Some(&status_field())),
            Err(ValidationError::ValueNotAllowed { .. })
        ));
    }

    #[test]
    fn test_invalid_pattern() {
        let item = ConditionItem::new(FieldSource::Property, "commonName", FilterConditionOperator::Matches)
            .with_value("([a-z");
        assert!(matches!(
            validate_item(&item, None),
            Err(ValidationError::InvalidPattern { .. })
        ));

        let item = ConditionItem::new(FieldSource::Property, "commonName", FilterConditionOperator::Matches)
            .with_value("^[a-z]+\\.example\\.com$");
        assert!(validate_item(&item, None).is_ok());
    }

    #[test]
    fn test_validate_group_reports_indices() {
        let fields = vec![status_field()];
        let group = ConditionGroup::new("rules").with_items(vec![
            ConditionItem::new(FieldSource::Property, "status", FilterConditionOperator::Equals)
                .with_value("valid"),
            ConditionItem::new(FieldSource::Property, "status", FilterConditionOperator::Contains)
                .with_value("valid"),
            ConditionItem::new(FieldSource::Custom, "unknown|TEXT", FilterConditionOperator::Contains)
                .with_value("test"),
        ]);
        let errors = validate_group(&group, &fields);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].0, 1);
    }
}
