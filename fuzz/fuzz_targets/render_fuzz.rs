//! Fuzz target for condition item rendering.
//!
//! Feeds arbitrary JSON documents through `ConditionItem` deserialization and
//! the renderer. Rendering must never panic, whatever the value shape.
//!
//! Run with: cargo +nightly fuzz run render_fuzz -- -max_total_time=60

#![no_main]

use certus_core::{ConditionItem, FieldSource, FilterField, FilterFieldType};
use certus_render::{render_item, quote};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(item) = serde_json::from_slice::<ConditionItem>(data) else {
        return;
    };

    let catalog = vec![
        FilterField::new(item.field_source, item.field_identifier.clone(), "Resolved", FilterFieldType::Date),
        FilterField::new(FieldSource::Property, "status", "Status", FilterFieldType::List)
            .with_enum("CertificateState"),
    ];
    let resolved = render_item(&item, &catalog);
    assert_eq!(resolved.field_label, "Resolved");
    assert_eq!(resolved.fragments()[1], quote("Resolved"));

    let unresolved = render_item(&item, &Vec::<FilterField>::new());
    assert_eq!(unresolved.field_label, item.field_identifier);

    // Absent values render empty, anything else renders quoted.
    if !unresolved.value_label.is_empty() {
        assert!(unresolved.value_label.starts_with('\''));
        assert!(unresolved.value_label.ends_with('\''));
    }
});
