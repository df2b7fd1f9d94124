//! ACL bindings and binding filters

use serde::{Deserialize, Serialize};

use super::entry::{AccessControlEntry, AccessControlEntryFilter};
use super::resource::{ResourcePattern, ResourcePatternFilter};

/// Filter over ACL bindings, as sent in a describe request
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AclBindingFilter {
    pub pattern_filter: ResourcePatternFilter,
    pub entry_filter: AccessControlEntryFilter,
}

impl AclBindingFilter {
    pub fn new(pattern_filter: ResourcePatternFilter, entry_filter: AccessControlEntryFilter) -> Self {
        Self {
            pattern_filter,
            entry_filter,
        }
    }

    /// Filter matching every binding
    pub fn any() -> Self {
        Self::new(ResourcePatternFilter::any(), AccessControlEntryFilter::any())
    }

    pub fn matches(&self, binding: &AclBinding) -> bool {
        self.pattern_filter.matches(&binding.pattern) && self.entry_filter.matches(&binding.entry)
    }

    /// Name of the first field that could match more than one value
    pub fn find_indefinite_field(&self) -> Option<&'static str> {
        self.pattern_filter
            .find_indefinite_field()
            .or_else(|| self.entry_filter.find_indefinite_field())
    }

    /// True when the filter can match at most one binding
    pub fn matches_at_most_one(&self) -> bool {
        self.find_indefinite_field().is_none()
    }
}

/// A stored ACL: an entry applied to a resource pattern
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AclBinding {
    pub pattern: ResourcePattern,
    pub entry: AccessControlEntry,
}

impl AclBinding {
    pub fn new(pattern: ResourcePattern, entry: AccessControlEntry) -> Self {
        Self { pattern, entry }
    }

    /// Filter matching exactly this binding
    pub fn to_filter(&self) -> AclBindingFilter {
        AclBindingFilter::new(
            self.pattern.to_filter(),
            AccessControlEntryFilter::new(
                Some(self.entry.principal().to_string()),
                Some(self.entry.host().to_string()),
                self.entry.operation(),
                self.entry.permission_type(),
            ),
        )
    }
}
