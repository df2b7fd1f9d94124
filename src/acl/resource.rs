//! Resource types, pattern types and resource pattern filters

use crate::error::ValidationError;
use num_enum::TryFromPrimitive;
use serde::{Deserialize, Serialize};

use super::wire_code;

/// Literal resource name that matches every resource of its type
pub const WILDCARD_RESOURCE: &str = "*";

/// Kind of resource an ACL applies to
#[repr(i8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    /// Filter-only: any resource type
    Any = 1,
    Topic = 2,
    Group = 3,
    Cluster = 4,
    TransactionalId = 5,
    DelegationToken = 6,
    User = 7,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Any => "ANY",
            Self::Topic => "TOPIC",
            Self::Group => "GROUP",
            Self::Cluster => "CLUSTER",
            Self::TransactionalId => "TRANSACTIONAL_ID",
            Self::DelegationToken => "DELEGATION_TOKEN",
            Self::User => "USER",
        }
    }
}

wire_code!(ResourceType, "resource_type");

/// How a resource name matches concrete resources
#[repr(i8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    /// Filter-only: any pattern type, names compared exactly
    Any = 1,
    /// Filter-only: every pattern that would apply to the named resource
    Match = 2,
    Literal = 3,
    Prefixed = 4,
}

impl PatternType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Any => "ANY",
            Self::Match => "MATCH",
            Self::Literal => "LITERAL",
            Self::Prefixed => "PREFIXED",
        }
    }

    /// Whether a stored pattern may carry this type
    pub fn is_specific(&self) -> bool {
        matches!(self, Self::Literal | Self::Prefixed)
    }
}

wire_code!(PatternType, "pattern_type");

/// Predicate over resource patterns
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ResourcePatternFilter {
    pub resource_type: ResourceType,
    /// Resource name; `None` matches every name
    #[serde(default)]
    pub name: Option<String>,
    pub pattern_type: PatternType,
}

impl ResourcePatternFilter {
    pub fn new(resource_type: ResourceType, name: Option<String>, pattern_type: PatternType) -> Self {
        Self {
            resource_type,
            name,
            pattern_type,
        }
    }

    /// Filter matching every resource pattern
    pub fn any() -> Self {
        Self::new(ResourceType::Any, None, PatternType::Any)
    }

    /// Check whether a stored resource pattern passes this filter
    pub fn matches(&self, pattern: &ResourcePattern) -> bool {
        if self.resource_type != ResourceType::Any && self.resource_type != pattern.resource_type {
            return false;
        }

        if !matches!(self.pattern_type, PatternType::Any | PatternType::Match)
            && self.pattern_type != pattern.pattern_type
        {
            return false;
        }

        let Some(name) = self.name.as_deref() else {
            return true;
        };

        if self.pattern_type == PatternType::Any || self.pattern_type == pattern.pattern_type {
            return name == pattern.name;
        }

        // MATCH: does the stored pattern apply to the named resource?
        match pattern.pattern_type {
            PatternType::Literal => name == pattern.name || pattern.name == WILDCARD_RESOURCE,
            PatternType::Prefixed => name.starts_with(&pattern.name),
            PatternType::Any | PatternType::Match => false,
        }
    }

    /// Name of the first field that could match more than one value
    pub fn find_indefinite_field(&self) -> Option<&'static str> {
        if self.resource_type == ResourceType::Any {
            return Some("resource_type");
        }
        if !self.pattern_type.is_specific() {
            return Some("pattern_type");
        }
        if self.name.is_none() {
            return Some("name");
        }
        None
    }
}

/// Concrete resource pattern attached to a stored ACL
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", try_from = "RawResourcePattern")]
pub struct ResourcePattern {
    resource_type: ResourceType,
    name: String,
    pattern_type: PatternType,
}

impl ResourcePattern {
    /// Build a pattern; filter-only values are rejected
    pub fn new(
        resource_type: ResourceType,
        name: impl Into<String>,
        pattern_type: PatternType,
    ) -> Result<Self, ValidationError> {
        if resource_type == ResourceType::Any {
            return Err(ValidationError::InvalidBinding(
                "resource type ANY is only valid in filters".to_string(),
            ));
        }
        if !pattern_type.is_specific() {
            return Err(ValidationError::InvalidBinding(format!(
                "pattern type {} is only valid in filters",
                pattern_type
            )));
        }

        Ok(Self {
            resource_type,
            name: name.into(),
            pattern_type,
        })
    }

    pub fn resource_type(&self) -> ResourceType {
        self.resource_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern_type(&self) -> PatternType {
        self.pattern_type
    }

    /// Filter matching exactly this pattern
    pub fn to_filter(&self) -> ResourcePatternFilter {
        ResourcePatternFilter::new(self.resource_type, Some(self.name.clone()), self.pattern_type)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
struct RawResourcePattern {
    resource_type: ResourceType,
    name: String,
    pattern_type: PatternType,
}

impl TryFrom<RawResourcePattern> for ResourcePattern {
    type Error = ValidationError;

    fn try_from(raw: RawResourcePattern) -> Result<Self, Self::Error> {
        Self::new(raw.resource_type, raw.name, raw.pattern_type)
    }
}
