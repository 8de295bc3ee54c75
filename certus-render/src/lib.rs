//! CERTUS Render - Condition Formatting
//!
//! Turns condition items and condition groups into display fragments:
//! source label, field label, operator label and value label. Field metadata
//! comes from any [`certus_core::FieldLookup`] (usually a catalog snapshot),
//! enum labels from an [`EnumLabelResolver`] and dates from a
//! [`DateFormatter`].
//!
//! Rendering never fails. Unresolved fields fall back to their raw
//! identifier and malformed values are stringified and quoted.

pub mod dates;
pub mod item;
pub mod labels;
pub mod renderer;
pub mod value;

pub use dates::{
    ChronoDateFormatter, DateFormatter, InvalidDateFormat, DEFAULT_DATETIME_FORMAT,
    DEFAULT_DATE_FORMAT,
};
pub use item::ConditionDisplay;
pub use labels::{operator_label, source_label, EnumLabelResolver, NoEnumLabels, PlatformEnumRegistry};
pub use renderer::{render_group, render_item, BadgeVariant, ConditionRenderer, RenderedGroup};
pub use value::{quote, ValueFormatter, ValueStyle, LIST_SEPARATOR};
