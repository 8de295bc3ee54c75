//! Enum types for condition items and filter fields

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// FIELD SOURCE
// ============================================================================

/// Namespace a filterable field belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum FieldSource {
    /// Intrinsic property of the resource
    Property,
    /// Provider-supplied data attribute
    Data,
    /// Metadata attached by connectors
    Meta,
    /// Custom attribute defined by administrators
    Custom,
}

impl FieldSource {
    pub const ALL: [FieldSource; 4] = [
        FieldSource::Property,
        FieldSource::Data,
        FieldSource::Meta,
        FieldSource::Custom,
    ];

    /// Platform wire code.
    pub fn as_code(&self) -> &'static str {
        match self {
            FieldSource::Property => "property",
            FieldSource::Data => "data",
            FieldSource::Meta => "meta",
            FieldSource::Custom => "custom",
        }
    }

    /// Whether identifiers in this namespace use the `<name>|<TYPE>` composite form.
    pub fn uses_composite_identifier(&self) -> bool {
        matches!(self, FieldSource::Data | FieldSource::Custom)
    }
}

impl fmt::Display for FieldSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_code())
    }
}

impl FromStr for FieldSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "property" => Ok(FieldSource::Property),
            "data" => Ok(FieldSource::Data),
            "meta" | "metadata" => Ok(FieldSource::Meta),
            "custom" => Ok(FieldSource::Custom),
            _ => Err(format!("Invalid FieldSource: {}", s)),
        }
    }
}

// ============================================================================
// FIELD TYPE
// ============================================================================

/// Declared value type of a filter field. Drives value formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum FilterFieldType {
    String,
    Text,
    Number,
    Boolean,
    Date,
    #[serde(alias = "dateTime")]
    DateTime,
    Time,
    List,
    Enum,
    Object,
    /// Any type this build does not know about.
    #[serde(other)]
    Unknown,
}

impl fmt::Display for FilterFieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            FilterFieldType::String => "string",
            FilterFieldType::Text => "text",
            FilterFieldType::Number => "number",
            FilterFieldType::Boolean => "boolean",
            FilterFieldType::Date => "date",
            FilterFieldType::DateTime => "datetime",
            FilterFieldType::Time => "time",
            FilterFieldType::List => "list",
            FilterFieldType::Enum => "enum",
            FilterFieldType::Object => "object",
            FilterFieldType::Unknown => "unknown",
        };
        write!(f, "{}", value)
    }
}

// ============================================================================
// CONDITION OPERATOR
// ============================================================================

/// Comparison operator of a condition item.
///
/// Tokens the server sends that this build does not recognise are kept
/// verbatim in [`FilterConditionOperator::Other`] so they survive a round trip
/// and can still be displayed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FilterConditionOperator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    Matches,
    NotMatches,
    Greater,
    Lesser,
    GreaterOrEqual,
    LesserOrEqual,
    Empty,
    NotEmpty,
    InPast,
    InNext,
    CountEqual,
    CountNotEqual,
    CountGreaterThan,
    CountLessThan,
    Success,
    Failed,
    Other(String),
}

impl FilterConditionOperator {
    /// Every operator this build knows, in declaration order.
    pub const KNOWN: [FilterConditionOperator; 22] = [
        FilterConditionOperator::Equals,
        FilterConditionOperator::NotEquals,
        FilterConditionOperator::Contains,
        FilterConditionOperator::NotContains,
        FilterConditionOperator::StartsWith,
        FilterConditionOperator::EndsWith,
        FilterConditionOperator::Matches,
        FilterConditionOperator::NotMatches,
        FilterConditionOperator::Greater,
        FilterConditionOperator::Lesser,
        FilterConditionOperator::GreaterOrEqual,
        FilterConditionOperator::LesserOrEqual,
        FilterConditionOperator::Empty,
        FilterConditionOperator::NotEmpty,
        FilterConditionOperator::InPast,
        FilterConditionOperator::InNext,
        FilterConditionOperator::CountEqual,
        FilterConditionOperator::CountNotEqual,
        FilterConditionOperator::CountGreaterThan,
        FilterConditionOperator::CountLessThan,
        FilterConditionOperator::Success,
        FilterConditionOperator::Failed,
    ];

    /// Platform wire token (e.g. `NOT_CONTAINS`).
    pub fn as_token(&self) -> &str {
        match self {
            FilterConditionOperator::Equals => "EQUALS",
            FilterConditionOperator::NotEquals => "NOT_EQUALS",
            FilterConditionOperator::Contains => "CONTAINS",
            FilterConditionOperator::NotContains => "NOT_CONTAINS",
            FilterConditionOperator::StartsWith => "STARTS_WITH",
            FilterConditionOperator::EndsWith => "ENDS_WITH",
            FilterConditionOperator::Matches => "MATCHES",
            FilterConditionOperator::NotMatches => "NOT_MATCHES",
            FilterConditionOperator::Greater => "GREATER",
            FilterConditionOperator::Lesser => "LESSER",
            FilterConditionOperator::GreaterOrEqual => "GREATER_OR_EQUAL",
            FilterConditionOperator::LesserOrEqual => "LESSER_OR_EQUAL",
            FilterConditionOperator::Empty => "EMPTY",
            FilterConditionOperator::NotEmpty => "NOT_EMPTY",
            FilterConditionOperator::InPast => "IN_PAST",
            FilterConditionOperator::InNext => "IN_NEXT",
            FilterConditionOperator::CountEqual => "COUNT_EQUAL",
            FilterConditionOperator::CountNotEqual => "COUNT_NOT_EQUAL",
            FilterConditionOperator::CountGreaterThan => "COUNT_GREATER_THAN",
            FilterConditionOperator::CountLessThan => "COUNT_LESS_THAN",
            FilterConditionOperator::Success => "SUCCESS",
            FilterConditionOperator::Failed => "FAILED",
            FilterConditionOperator::Other(token) => token.as_str(),
        }
    }

    /// Operators that test presence or outcome and carry no operand.
    pub fn is_value_less(&self) -> bool {
        matches!(
            self,
            FilterConditionOperator::Empty
                | FilterConditionOperator::NotEmpty
                | FilterConditionOperator::Success
                | FilterConditionOperator::Failed
        )
    }

    /// Operators whose operand is a regular expression.
    pub fn is_pattern(&self) -> bool {
        matches!(
            self,
            FilterConditionOperator::Matches | FilterConditionOperator::NotMatches
        )
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, FilterConditionOperator::Other(_))
    }
}

impl From<String> for FilterConditionOperator {
    fn from(token: String) -> Self {
        match token.as_str() {
            "EQUALS" => FilterConditionOperator::Equals,
            "NOT_EQUALS" => FilterConditionOperator::NotEquals,
            "CONTAINS" => FilterConditionOperator::Contains,
            "NOT_CONTAINS" => FilterConditionOperator::NotContains,
            "STARTS_WITH" => FilterConditionOperator::StartsWith,
            "ENDS_WITH" => FilterConditionOperator::EndsWith,
            "MATCHES" => FilterConditionOperator::Matches,
            "NOT_MATCHES" => FilterConditionOperator::NotMatches,
            "GREATER" => FilterConditionOperator::Greater,
            "LESSER" => FilterConditionOperator::Lesser,
            "GREATER_OR_EQUAL" => FilterConditionOperator::GreaterOrEqual,
            "LESSER_OR_EQUAL" => FilterConditionOperator::LesserOrEqual,
            "EMPTY" => FilterConditionOperator::Empty,
            "NOT_EMPTY" => FilterConditionOperator::NotEmpty,
            "IN_PAST" => FilterConditionOperator::InPast,
            "IN_NEXT" => FilterConditionOperator::InNext,
            "COUNT_EQUAL" => FilterConditionOperator::CountEqual,
            "COUNT_NOT_EQUAL" => FilterConditionOperator::CountNotEqual,
            "COUNT_GREATER_THAN" => FilterConditionOperator::CountGreaterThan,
            "COUNT_LESS_THAN" => FilterConditionOperator::CountLessThan,
            "SUCCESS" => FilterConditionOperator::Success,
            "FAILED" => FilterConditionOperator::Failed,
            _ => FilterConditionOperator::Other(token),
        }
    }
}

impl From<&str> for FilterConditionOperator {
    fn from(token: &str) -> Self {
        Self::from(token.to_string())
    }
}

impl From<FilterConditionOperator> for String {
    fn from(operator: FilterConditionOperator) -> Self {
        match operator {
            FilterConditionOperator::Other(token) => token,
            known => known.as_token().to_string(),
        }
    }
}

impl fmt::Display for FilterConditionOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_token())
    }
}

// ============================================================================
// ENTITY TYPE / RESOURCE
// ============================================================================

/// Filter context a catalog is cached under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    Certificate,
    Discovery,
    DiscoveryCertificate,
    Entity,
    Location,
    RaProfile,
    Authority,
    ComplianceProfile,
    AcmeAccount,
    AcmeProfile,
    CmpProfile,
    ScepProfile,
    Key,
    Token,
    Connector,
    User,
    Role,
    Group,
    AuditLog,
    Trigger,
}

impl EntityType {
    /// Backend resource normally queried for this filter context.
    pub fn default_resource(&self) -> Resource {
        match self {
            EntityType::Certificate => Resource::Certificates,
            EntityType::Discovery => Resource::Discoveries,
            EntityType::DiscoveryCertificate => Resource::Certificates,
            EntityType::Entity => Resource::Entities,
            EntityType::Location => Resource::Locations,
            EntityType::RaProfile => Resource::RaProfiles,
            EntityType::Authority => Resource::Authorities,
            EntityType::ComplianceProfile => Resource::ComplianceProfiles,
            EntityType::AcmeAccount => Resource::AcmeAccounts,
            EntityType::AcmeProfile => Resource::AcmeProfiles,
            EntityType::CmpProfile => Resource::CmpProfiles,
            EntityType::ScepProfile => Resource::ScepProfiles,
            EntityType::Key => Resource::Keys,
            EntityType::Token => Resource::Tokens,
            EntityType::Connector => Resource::Connectors,
            EntityType::User => Resource::Users,
            EntityType::Role => Resource::Roles,
            EntityType::Group => Resource::Groups,
            EntityType::AuditLog => Resource::AuditLogs,
            EntityType::Trigger => Resource::Triggers,
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            EntityType::Certificate => "CERTIFICATE",
            EntityType::Discovery => "DISCOVERY",
            EntityType::DiscoveryCertificate => "DISCOVERY_CERTIFICATE",
            EntityType::Entity => "ENTITY",
            EntityType::Location => "LOCATION",
            EntityType::RaProfile => "RA_PROFILE",
            EntityType::Authority => "AUTHORITY",
            EntityType::ComplianceProfile => "COMPLIANCE_PROFILE",
            EntityType::AcmeAccount => "ACME_ACCOUNT",
            EntityType::AcmeProfile => "ACME_PROFILE",
            EntityType::CmpProfile => "CMP_PROFILE",
            EntityType::ScepProfile => "SCEP_PROFILE",
            EntityType::Key => "KEY",
            EntityType::Token => "TOKEN",
            EntityType::Connector => "CONNECTOR",
            EntityType::User => "USER",
            EntityType::Role => "ROLE",
            EntityType::Group => "GROUP",
            EntityType::AuditLog => "AUDIT_LOG",
            EntityType::Trigger => "TRIGGER",
        };
        write!(f, "{}", value)
    }
}

impl FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "certificate" => Ok(EntityType::Certificate),
            "discovery" => Ok(EntityType::Discovery),
            "discoverycertificate" => Ok(EntityType::DiscoveryCertificate),
            "entity" => Ok(EntityType::Entity),
            "location" => Ok(EntityType::Location),
            "raprofile" => Ok(EntityType::RaProfile),
            "authority" => Ok(EntityType::Authority),
            "complianceprofile" => Ok(EntityType::ComplianceProfile),
            "acmeaccount" => Ok(EntityType::AcmeAccount),
            "acmeprofile" => Ok(EntityType::AcmeProfile),
            "cmpprofile" => Ok(EntityType::CmpProfile),
            "scepprofile" => Ok(EntityType::ScepProfile),
            "key" => Ok(EntityType::Key),
            "token" => Ok(EntityType::Token),
            "connector" => Ok(EntityType::Connector),
            "user" => Ok(EntityType::User),
            "role" => Ok(EntityType::Role),
            "group" => Ok(EntityType::Group),
            "auditlog" => Ok(EntityType::AuditLog),
            "trigger" => Ok(EntityType::Trigger),
            _ => Err(format!("Invalid EntityType: {}", s)),
        }
    }
}

/// Backend resource whose searchable fields make up a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub enum Resource {
    Certificates,
    Discoveries,
    Entities,
    Locations,
    RaProfiles,
    Authorities,
    ComplianceProfiles,
    AcmeAccounts,
    AcmeProfiles,
    CmpProfiles,
    ScepProfiles,
    Keys,
    Tokens,
    Connectors,
    Users,
    Roles,
    Groups,
    AuditLogs,
    Triggers,
}

impl Resource {
    /// Platform resource code used in request paths.
    pub fn as_code(&self) -> &'static str {
        match self {
            Resource::Certificates => "certificates",
            Resource::Discoveries => "discoveries",
            Resource::Entities => "entities",
            Resource::Locations => "locations",
            Resource::RaProfiles => "raProfiles",
            Resource::Authorities => "authorities",
            Resource::ComplianceProfiles => "complianceProfiles",
            Resource::AcmeAccounts => "acmeAccounts",
            Resource::AcmeProfiles => "acmeProfiles",
            Resource::CmpProfiles => "cmpProfiles",
            Resource::ScepProfiles => "scepProfiles",
            Resource::Keys => "keys",
            Resource::Tokens => "tokens",
            Resource::Connectors => "connectors",
            Resource::Users => "users",
            Resource::Roles => "roles",
            Resource::Groups => "groups",
            Resource::AuditLogs => "auditLogs",
            Resource::Triggers => "triggers",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_code())
    }
}

impl FromStr for Resource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "certificates" => Ok(Resource::Certificates),
            "discoveries" => Ok(Resource::Discoveries),
            "entities" => Ok(Resource::Entities),
            "locations" => Ok(Resource::Locations),
            "raprofiles" => Ok(Resource::RaProfiles),
            "authorities" => Ok(Resource::Authorities),
            "complianceprofiles" => Ok(Resource::ComplianceProfiles),
            "acmeaccounts" => Ok(Resource::AcmeAccounts),
            "acmeprofiles" => Ok(Resource::AcmeProfiles),
            "cmpprofiles" => Ok(Resource::CmpProfiles),
            "scepprofiles" => Ok(Resource::ScepProfiles),
            "keys" => Ok(Resource::Keys),
            "tokens" => Ok(Resource::Tokens),
            "connectors" => Ok(Resource::Connectors),
            "users" => Ok(Resource::Users),
            "roles" => Ok(Resource::Roles),
            "groups" => Ok(Resource::Groups),
            "auditlogs" => Ok(Resource::AuditLogs),
            "triggers" => Ok(Resource::Triggers),
            _ => Err(format!("Invalid Resource: {}", s)),
        }
    }
}

fn normalize_token(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
