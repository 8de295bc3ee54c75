//! Label tables for field sources, operators and platform enums.

use certus_core::{FieldSource, FilterConditionOperator, PlatformEnumDictionary, PlatformEnumItem};

/// Built-in display label of a field source.
pub fn source_label(source: FieldSource) -> &'static str {
    match source {
        FieldSource::Property => "Property",
        FieldSource::Data => "Data attribute",
        FieldSource::Meta => "Metadata",
        FieldSource::Custom => "Custom attribute",
    }
}

/// Built-in display label of an operator. `None` for tokens this build does not know.
pub fn operator_label(operator: &FilterConditionOperator) -> Option<&'static str> {
    let label = match operator {
        FilterConditionOperator::Equals => "equals",
        FilterConditionOperator::NotEquals => "not equals",
        FilterConditionOperator::Contains => "contains",
        FilterConditionOperator::NotContains => "not contains",
        FilterConditionOperator::StartsWith => "starts with",
        FilterConditionOperator::EndsWith => "ends with",
        FilterConditionOperator::Matches => "matches",
        FilterConditionOperator::NotMatches => "not matches",
        FilterConditionOperator::Greater => "greater than",
        FilterConditionOperator::Lesser => "lesser than",
        FilterConditionOperator::GreaterOrEqual => "greater or equal",
        FilterConditionOperator::LesserOrEqual => "lesser or equal",
        FilterConditionOperator::Empty => "empty",
        FilterConditionOperator::NotEmpty => "not empty",
        FilterConditionOperator::InPast => "in past",
        FilterConditionOperator::InNext => "in next",
        FilterConditionOperator::CountEqual => "count equal",
        FilterConditionOperator::CountNotEqual => "count not equal",
        FilterConditionOperator::CountGreaterThan => "count greater than",
        FilterConditionOperator::CountLessThan => "count less than",
        FilterConditionOperator::Success => "success",
        FilterConditionOperator::Failed => "failed",
        FilterConditionOperator::Other(_) => return None,
    };
    Some(label)
}

/// Maps `(enum name, code)` to a display label.
pub trait EnumLabelResolver: Send + Sync {
    fn label(&self, enum_name: &str, code: &str) -> Option<&str>;
}

/// Resolver that knows no enums; every lookup falls back to the raw code.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEnumLabels;

impl EnumLabelResolver for NoEnumLabels {
    fn label(&self, _enum_name: &str, _code: &str) -> Option<&str> {
        None
    }
}

/// In-memory platform enum dictionary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformEnumRegistry {
    dictionary: PlatformEnumDictionary,
}

impl PlatformEnumRegistry {
    pub fn new(dictionary: PlatformEnumDictionary) -> Self {
        Self { dictionary }
    }

    /// Parse the platform's `{ enum: { code: { code, label } } }` document.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    pub fn insert(
        &mut self,
        enum_name: impl Into<String>,
        code: impl Into<String>,
        label: impl Into<String>,
    ) {
        let code = code.into();
        self.dictionary.entry(enum_name.into()).or_default().insert(
            code.clone(),
            PlatformEnumItem {
                code,
                label: label.into(),
                description: None,
            },
        );
    }

    pub fn enum_names(&self) -> impl Iterator<Item = &str> {
        self.dictionary.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.dictionary.is_empty()
    }

    pub fn dictionary(&self) -> &PlatformEnumDictionary {
        &self.dictionary
    }
}

impl EnumLabelResolver for PlatformEnumRegistry {
    fn label(&self, enum_name: &str, code: &str) -> Option<&str> {
        self.dictionary
            .get(enum_name)?
            .get(code)
            .map(|item| item.label.as_str())
    }
}

impl From<PlatformEnumDictionary> for PlatformEnumRegistry {
    fn from(dictionary: PlatformEnumDictionary) -> Self {
        Self::new(dictionary)
    }
}
