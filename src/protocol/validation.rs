//! Per-version validation of outbound request payloads

use tracing::debug;

use crate::acl::{AclOperation, AclPermissionType, PatternType, ResourceType, UNKNOWN_CODE};
use crate::error::ValidationError;

use super::request::DescribeAclsRequestData;

/// Validate a payload for the given version.
///
/// Version 0 predates prefixed patterns: an ANY pattern type is rewritten to
/// LITERAL before the checks, every other non-literal type is rejected.
pub fn validate(
    mut data: DescribeAclsRequestData,
    version: i16,
) -> Result<DescribeAclsRequestData, ValidationError> {
    if version == 0 {
        if data.pattern_type == PatternType::Any.code() {
            debug!(version, "Coercing ANY resource pattern type to LITERAL");
            data.pattern_type = PatternType::Literal.code();
        }

        if data.pattern_type != PatternType::Literal.code() {
            return Err(ValidationError::UnsupportedVersion(
                "version 0 only supports literal resource pattern types".to_string(),
            ));
        }
    }

    let codes = [
        data.pattern_type,
        data.resource_type,
        data.permission_type,
        data.operation,
    ];
    if codes.contains(&UNKNOWN_CODE) {
        return Err(ValidationError::InvalidFilter(
            "filter contains UNKNOWN elements".to_string(),
        ));
    }

    if !(PatternType::is_known_code(data.pattern_type)
        && ResourceType::is_known_code(data.resource_type)
        && AclPermissionType::is_known_code(data.permission_type)
        && AclOperation::is_known_code(data.operation))
    {
        return Err(ValidationError::InvalidFilter(
            "filter contains unrecognized codes".to_string(),
        ));
    }

    Ok(data)
}
