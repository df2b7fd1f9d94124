//! Operations, permission types and access-control entry filters

use crate::error::ValidationError;
use num_enum::TryFromPrimitive;
use serde::{Deserialize, Serialize};

use super::wire_code;

/// Operation an ACL grants or denies
#[repr(i8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AclOperation {
    /// Filter-only: any operation
    Any = 1,
    All = 2,
    Read = 3,
    Write = 4,
    Create = 5,
    Delete = 6,
    Alter = 7,
    Describe = 8,
    ClusterAction = 9,
    DescribeConfigs = 10,
    AlterConfigs = 11,
    IdempotentWrite = 12,
    CreateTokens = 13,
    DescribeTokens = 14,
}

impl AclOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Any => "ANY",
            Self::All => "ALL",
            Self::Read => "READ",
            Self::Write => "WRITE",
            Self::Create => "CREATE",
            Self::Delete => "DELETE",
            Self::Alter => "ALTER",
            Self::Describe => "DESCRIBE",
            Self::ClusterAction => "CLUSTER_ACTION",
            Self::DescribeConfigs => "DESCRIBE_CONFIGS",
            Self::AlterConfigs => "ALTER_CONFIGS",
            Self::IdempotentWrite => "IDEMPOTENT_WRITE",
            Self::CreateTokens => "CREATE_TOKENS",
            Self::DescribeTokens => "DESCRIBE_TOKENS",
        }
    }
}

wire_code!(AclOperation, "operation");

/// Whether an ACL allows or denies
#[repr(i8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AclPermissionType {
    /// Filter-only: either permission
    Any = 1,
    Deny = 2,
    Allow = 3,
}

impl AclPermissionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Any => "ANY",
            Self::Deny => "DENY",
            Self::Allow => "ALLOW",
        }
    }
}

wire_code!(AclPermissionType, "permission_type");

/// Predicate over access-control entries
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AccessControlEntryFilter {
    /// Principal such as `User:alice`; `None` matches every principal
    #[serde(default)]
    pub principal: Option<String>,
    /// Host address; `None` matches every host
    #[serde(default)]
    pub host: Option<String>,
    pub operation: AclOperation,
    pub permission_type: AclPermissionType,
}

impl AccessControlEntryFilter {
    pub fn new(
        principal: Option<String>,
        host: Option<String>,
        operation: AclOperation,
        permission_type: AclPermissionType,
    ) -> Self {
        Self {
            principal,
            host,
            operation,
            permission_type,
        }
    }

    /// Filter matching every entry
    pub fn any() -> Self {
        Self::new(None, None, AclOperation::Any, AclPermissionType::Any)
    }

    /// Check whether a stored entry passes this filter
    pub fn matches(&self, entry: &AccessControlEntry) -> bool {
        if let Some(ref principal) = self.principal {
            if *principal != entry.principal {
                return false;
            }
        }

        if let Some(ref host) = self.host {
            if *host != entry.host {
                return false;
            }
        }

        if self.operation != AclOperation::Any && self.operation != entry.operation {
            return false;
        }

        self.permission_type == AclPermissionType::Any || self.permission_type == entry.permission_type
    }

    /// Name of the first field that could match more than one value
    pub fn find_indefinite_field(&self) -> Option<&'static str> {
        if self.principal.is_none() {
            return Some("principal");
        }
        if self.host.is_none() {
            return Some("host");
        }
        if self.operation == AclOperation::Any {
            return Some("operation");
        }
        if self.permission_type == AclPermissionType::Any {
            return Some("permission_type");
        }
        None
    }
}

/// Concrete access-control entry of a stored ACL
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", try_from = "RawAccessControlEntry")]
pub struct AccessControlEntry {
    principal: String,
    host: String,
    operation: AclOperation,
    permission_type: AclPermissionType,
}

impl AccessControlEntry {
    /// Build an entry; `ANY` operation or permission is rejected
    pub fn new(
        principal: impl Into<String>,
        host: impl Into<String>,
        operation: AclOperation,
        permission_type: AclPermissionType,
    ) -> Result<Self, ValidationError> {
        if operation == AclOperation::Any {
            return Err(ValidationError::InvalidBinding(
                "operation ANY is only valid in filters".to_string(),
            ));
        }
        if permission_type == AclPermissionType::Any {
            return Err(ValidationError::InvalidBinding(
                "permission type ANY is only valid in filters".to_string(),
            ));
        }

        Ok(Self {
            principal: principal.into(),
            host: host.into(),
            operation,
            permission_type,
        })
    }

    pub fn principal(&self) -> &str {
        &self.principal
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn operation(&self) -> AclOperation {
        self.operation
    }

    pub fn permission_type(&self) -> AclPermissionType {
        self.permission_type
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
struct RawAccessControlEntry {
    principal: String,
    host: String,
    operation: AclOperation,
    permission_type: AclPermissionType,
}

impl TryFrom<RawAccessControlEntry> for AccessControlEntry {
    type Error = ValidationError;

    fn try_from(raw: RawAccessControlEntry) -> Result<Self, Self::Error> {
        Self::new(raw.principal, raw.host, raw.operation, raw.permission_type)
    }
}
