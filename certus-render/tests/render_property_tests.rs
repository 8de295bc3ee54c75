use certus_catalog::CatalogSnapshot;
use certus_core::{
    ConditionGroup, ConditionItem, ConditionValue, FieldLookup, FieldSource,
    FilterConditionOperator, FilterField, FilterFieldType,
};
use certus_render::{
    operator_label, render_group, render_item, BadgeVariant, ChronoDateFormatter,
    ConditionRenderer, PlatformEnumRegistry,
};
use certus_test_utils::assertions::{assert_or_joined, assert_single_quoted};
use certus_test_utils::{fixtures, generators};
use proptest::prelude::*;
use serde_json::json;

fn snapshot() -> CatalogSnapshot {
    CatalogSnapshot::new(fixtures::certificate_catalog())
}

fn item(source: FieldSource, identifier: &str, operator: FilterConditionOperator) -> ConditionItem {
    ConditionItem::new(source, identifier, operator)
}

// === Concrete scenarios ===

#[test]
fn metadata_username_contains() {
    let condition = item(FieldSource::Meta, "username|STRING", FilterConditionOperator::Contains)
        .with_value("d");
    let fragments = render_item(&condition, &snapshot()).fragments();
    for expected in ["Metadata", "'Username'", "contains", "'d'"] {
        assert!(fragments.iter().any(|f| f == expected), "missing {expected}: {fragments:?}");
    }
}

#[test]
fn unknown_field_label_is_identifier() {
    let condition = item(FieldSource::Custom, "unknownField|TEXT", FilterConditionOperator::Contains)
        .with_value("test");
    let badge = render_item(&condition, &snapshot());
    assert_eq!(badge.field_label, "unknownField|TEXT");
    assert_eq!(badge.fragments()[1], "'unknownField|TEXT'");
}

#[test]
fn array_value_joined_with_or() {
    let condition = item(FieldSource::Custom, "region|STRING", FilterConditionOperator::Equals)
        .with_value(ConditionValue::list(["us-east-1", "us-west-2"]));
    assert_eq!(
        render_item(&condition, &snapshot()).value_label,
        "'us-east-1' OR 'us-west-2'"
    );
}

#[test]
fn named_object_renders_name() {
    let condition = item(FieldSource::Property, "owner", FilterConditionOperator::Equals)
        .with_value(ConditionValue::from(json!({"name": "John Doe", "id": 123})));
    assert_eq!(render_item(&condition, &snapshot()).value_label, "'John Doe'");
}

#[test]
fn non_string_names_render_as_names() {
    let empty: Vec<FilterField> = Vec::new();
    let cases = [
        (json!({"name": 42, "id": 1}), "'42'"),
        (json!({"name": true}), "'true'"),
        (json!([{"name": 7}, {"name": "x"}]), "'7' OR 'x'"),
    ];
    for (raw, expected) in cases {
        let condition: ConditionItem = serde_json::from_value(json!({
            "fieldSource": "property",
            "fieldIdentifier": "owner",
            "operator": "EQUALS",
            "value": raw
        }))
        .unwrap();
        assert_eq!(render_item(&condition, &empty).value_label, expected);
    }
}

#[test]
fn empty_group_renders_header_only() {
    let group: ConditionGroup = serde_json::from_value(json!({
        "conditionName": "test-empty-conditions",
        "conditionItems": []
    }))
    .unwrap();
    for variant in [BadgeVariant::Standard, BadgeVariant::Compact] {
        let rendered = render_group(&group, &snapshot(), variant);
        assert_eq!(rendered.header, "test-empty-conditions");
        assert!(rendered.badges.is_empty());
        assert_eq!(rendered.to_string(), "test-empty-conditions");
    }
}

#[test]
fn full_group_with_platform_enums() {
    let enums = PlatformEnumRegistry::new(fixtures::platform_enums());
    let dates = ChronoDateFormatter::default();
    let renderer = ConditionRenderer::new(&enums, &dates);
    let rendered = renderer.render_group(
        &fixtures::expiring_certificates_group(),
        &snapshot(),
        BadgeVariant::Standard,
    );

    let lines: Vec<String> = rendered.badges.iter().map(|b| b.to_string()).collect();
    assert_eq!(
        lines,
        vec![
            "Property 'Expires At' lesser than '2025-06-30'",
            "Property 'Status' Equals 'Valid' OR 'Expired'",
            "Metadata 'Username' contains 'd'",
            "Custom Attribute 'unknownField|TEXT' not empty",
        ]
    );
    assert_eq!(rendered.unresolved_count(), 1);
}

#[test]
fn group_deserialized_from_platform_json() {
    let group: ConditionGroup = serde_json::from_value(json!({
        "uuid": "0191c2a4-3b5e-7c1d-9f00-000000000001",
        "name": "owner-check",
        "description": "Certificates owned by the admin team",
        "items": [
            {"fieldSource": "property", "fieldIdentifier": "issuedAt", "operator": "GREATER",
             "value": "2024-03-15T08:01:02Z"},
            {"fieldSource": "meta", "fieldIdentifier": "port|INTEGER", "operator": "EQUALS",
             "value": 8443},
            {"fieldSource": "property", "fieldIdentifier": "commonName", "operator": "SUCCESS",
             "value": null}
        ]
    }))
    .unwrap();
    let rendered = render_group(&group, &snapshot(), BadgeVariant::Compact);
    assert_eq!(
        rendered.to_string(),
        "owner-check: [Property 'Issued At' greater than '2024-03-15 08:01:02'] | \
         [Metadata 'Port' equals '8443'] | [Property 'Common Name' success]"
    );
}

// === Properties ===

proptest! {
    #[test]
    fn scalar_values_single_quoted(text in generators::arb_plain_text(), n in any::<i64>()) {
        let by_text = item(FieldSource::Property, "commonName", FilterConditionOperator::Equals)
            .with_value(text.as_str());
        let label = render_item(&by_text, &snapshot()).value_label;
        assert_single_quoted(&label);
        prop_assert_eq!(label, format!("'{}'", text));

        let by_number = item(FieldSource::Meta, "port|INTEGER", FilterConditionOperator::Greater)
            .with_value(n);
        prop_assert_eq!(render_item(&by_number, &snapshot()).value_label, format!("'{}'", n));
    }

    #[test]
    fn arrays_join_each_element(values in prop::collection::vec(generators::arb_plain_text(), 2..8)) {
        let condition = item(FieldSource::Custom, "region|STRING", FilterConditionOperator::Equals)
            .with_value(ConditionValue::list(values.clone()));
        let label = render_item(&condition, &snapshot()).value_label;
        assert_or_joined(&label, &values);
        prop_assert_eq!(label.matches(" OR ").count(), values.len() - 1);
    }

    #[test]
    fn unresolved_fields_fall_back_to_identifier(condition in generators::arb_condition_item()) {
        let catalog: Vec<FilterField> = Vec::new();
        let badge = render_item(&condition, &catalog);
        prop_assert!(!badge.resolved);
        prop_assert_eq!(badge.field_label, condition.field_identifier);
    }

    #[test]
    fn resolved_fields_use_catalog_label(
        catalog in generators::arb_catalog(10),
        index in any::<prop::sample::Index>(),
    ) {
        prop_assume!(!catalog.is_empty());
        let field = &catalog[index.index(catalog.len())];
        let condition = item(field.field_source, &field.field_identifier, FilterConditionOperator::NotEmpty);
        let snapshot = CatalogSnapshot::new(catalog.clone());
        prop_assert!(snapshot.find_field(field.field_source, &field.field_identifier).is_some());

        let badge = render_item(&condition, &snapshot);
        prop_assert!(badge.resolved);
        prop_assert_eq!(&badge.field_label, &field.label);
        prop_assert_eq!(badge.fragments().len(), 3);
    }

    #[test]
    fn every_known_operator_has_label(operator in generators::arb_known_operator()) {
        let label = operator_label(&operator).unwrap_or_default();
        prop_assert!(!label.is_empty());
        prop_assert_ne!(label, operator.as_token());
        prop_assert!(label.chars().all(|c| c.is_ascii_lowercase() || c == ' '));
    }

    #[test]
    fn booleans_render_quoted(flag in any::<bool>(), field_type in generators::arb_field_type()) {
        let field = FilterField::new(FieldSource::Property, "flag", "Flag", field_type);
        let condition = item(FieldSource::Property, "flag", FilterConditionOperator::Equals)
            .with_value(flag);
        let expected = if flag { "'true'" } else { "'false'" };
        prop_assert_eq!(render_item(&condition, &vec![field]).value_label, expected);
    }

    #[test]
    fn group_renders_one_badge_per_item_in_order(group in generators::arb_condition_group()) {
        let rendered = render_group(&group, &snapshot(), BadgeVariant::Standard);
        prop_assert_eq!(&rendered.header, &group.name);
        prop_assert_eq!(rendered.badges.len(), group.items.len());
        for (badge, condition) in rendered.badges.iter().zip(&group.items) {
            prop_assert_eq!(badge, &render_item(condition, &snapshot()));
        }
    }

    #[test]
    fn rendering_never_panics(condition in generators::arb_condition_item()) {
        let badge = render_item(&condition, &snapshot());
        prop_assert!(!badge.source_label.is_empty());
        prop_assert!(!badge.operator_label.is_empty());
        let label = &badge.value_label;
        prop_assert!(
            label.is_empty() || (label.starts_with('\'') && label.ends_with('\'')),
            "unquoted value label {:?}",
            label
        );
    }
}

#[test]
fn date_and_datetime_fields_use_distinct_formatters() {
    let dates = ChronoDateFormatter::new("%d/%m/%Y", "%d/%m/%Y %H:%M").unwrap();
    let enums = PlatformEnumRegistry::default();
    let renderer = ConditionRenderer::new(&enums, &dates);
    let value = "2024-03-15T08:01:02Z";

    let date = item(FieldSource::Property, "notAfter", FilterConditionOperator::Greater).with_value(value);
    let datetime = item(FieldSource::Property, "issuedAt", FilterConditionOperator::Greater).with_value(value);
    assert_eq!(renderer.render_item(&date, &snapshot()).value_label, "'15/03/2024'");
    assert_eq!(renderer.render_item(&datetime, &snapshot()).value_label, "'15/03/2024 08:01'");
}
