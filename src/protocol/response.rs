//! Describe-ACLs response envelope

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::errors::{ApiError, ErrorCode};
use crate::acl::AclBinding;

/// One ACL of a described resource, as wire codes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AclDescription {
    pub principal: String,
    pub host: String,
    pub operation: i8,
    pub permission_type: i8,
}

/// A resource pattern and the ACLs bound to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DescribeAclsResource {
    pub resource_type: i8,
    pub resource_name: String,
    pub pattern_type: i8,
    pub acls: Vec<AclDescription>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DescribeAclsResponse {
    pub throttle_time_ms: i32,
    pub error_code: i16,
    pub error_message: Option<String>,
    #[serde(default)]
    pub resources: Vec<DescribeAclsResource>,
}

impl DescribeAclsResponse {
    /// Error response for an arbitrary failure.
    ///
    /// Total: every cause classifies, and the throttle time is kept as given.
    pub fn from_failure(throttle_time_ms: i32, cause: &(dyn std::error::Error + 'static)) -> Self {
        Self::from_api_error(throttle_time_ms, &ApiError::from_error(cause))
    }

    pub fn from_api_error(throttle_time_ms: i32, error: &ApiError) -> Self {
        Self {
            throttle_time_ms,
            error_code: error.code().code(),
            error_message: error.message(),
            resources: Vec::new(),
        }
    }

    /// Successful response listing the bindings grouped by resource pattern
    pub fn success(throttle_time_ms: i32, bindings: &[AclBinding]) -> Self {
        Self {
            throttle_time_ms,
            error_code: ErrorCode::None.code(),
            error_message: None,
            resources: group_by_resource(bindings),
        }
    }

    pub fn error(&self) -> ErrorCode {
        ErrorCode::from_code(self.error_code)
    }

    pub fn is_error(&self) -> bool {
        self.error_code != ErrorCode::None.code()
    }
}

/// Group bindings by resource pattern, keeping first-seen order
fn group_by_resource(bindings: &[AclBinding]) -> Vec<DescribeAclsResource> {
    let mut resources: Vec<DescribeAclsResource> = Vec::new();
    let mut index: HashMap<(i8, &str, i8), usize> = HashMap::new();

    for binding in bindings {
        let pattern = &binding.pattern;
        let acl = AclDescription {
            principal: binding.entry.principal().to_string(),
            host: binding.entry.host().to_string(),
            operation: binding.entry.operation().code(),
            permission_type: binding.entry.permission_type().code(),
        };

        let key = (
            pattern.resource_type().code(),
            pattern.name(),
            pattern.pattern_type().code(),
        );
        match index.get(&key) {
            Some(&i) => resources[i].acls.push(acl),
            None => {
                index.insert(key, resources.len());
                resources.push(DescribeAclsResource {
                    resource_type: key.0,
                    resource_name: key.1.to_string(),
                    pattern_type: key.2,
                    acls: vec![acl],
                });
            }
        }
    }

    resources
}
