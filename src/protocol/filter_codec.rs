//! Mapping between [`AclBindingFilter`] and the flat request payload

use crate::acl::{
    AccessControlEntryFilter, AclBindingFilter, AclOperation, AclPermissionType, PatternType,
    ResourcePatternFilter, ResourceType,
};
use crate::error::DecodeError;

use super::request::DescribeAclsRequestData;

/// Flatten a filter into wire codes and strings. Total and lossless.
pub fn encode(filter: &AclBindingFilter) -> DescribeAclsRequestData {
    let pattern = &filter.pattern_filter;
    let entry = &filter.entry_filter;

    DescribeAclsRequestData {
        resource_type: pattern.resource_type.code(),
        resource_name_filter: pattern.name.clone(),
        pattern_type: pattern.pattern_type.code(),
        principal_filter: entry.principal.clone(),
        host_filter: entry.host.clone(),
        operation: entry.operation.code(),
        permission_type: entry.permission_type.code(),
    }
}

/// Rebuild the filter from a flat payload.
///
/// Fails on the first code that does not name a variant, the UNKNOWN
/// sentinel included.
pub fn decode(data: &DescribeAclsRequestData) -> Result<AclBindingFilter, DecodeError> {
    let pattern_filter = ResourcePatternFilter::new(
        ResourceType::from_code(data.resource_type)?,
        data.resource_name_filter.clone(),
        PatternType::from_code(data.pattern_type)?,
    );
    let entry_filter = AccessControlEntryFilter::new(
        data.principal_filter.clone(),
        data.host_filter.clone(),
        AclOperation::from_code(data.operation)?,
        AclPermissionType::from_code(data.permission_type)?,
    );

    Ok(AclBindingFilter::new(pattern_filter, entry_filter))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acl::UNKNOWN_CODE;

    fn filter() -> AclBindingFilter {
        AclBindingFilter::new(
            ResourcePatternFilter::new(ResourceType::Group, None, PatternType::Prefixed),
            AccessControlEntryFilter::new(
                Some("User:bob".to_string()),
                Some("10.0.0.7".to_string()),
                AclOperation::Describe,
                AclPermissionType::Deny,
            ),
        )
    }

    #[test]
    fn test_encode_maps_codes() {
        let data = encode(&filter());
        assert_eq!(data.resource_type, 3);
        assert_eq!(data.resource_name_filter, None);
        assert_eq!(data.pattern_type, 4);
        assert_eq!(data.principal_filter.as_deref(), Some("User:bob"));
        assert_eq!(data.host_filter.as_deref(), Some("10.0.0.7"));
        assert_eq!(data.operation, 8);
        assert_eq!(data.permission_type, 2);
    }

    #[test]
    fn test_decode_inverts_encode() {
        assert_eq!(decode(&encode(&filter())).unwrap(), filter());
    }

    #[test]
    fn test_decode_names_offending_field() {
        let mut data = encode(&filter());
        data.operation = UNKNOWN_CODE;
        assert_eq!(
            decode(&data),
            Err(DecodeError::UnknownCode {
                field: "operation",
                code: 0
            })
        );

        let mut data = encode(&filter());
        data.permission_type = 9;
        assert_eq!(
            decode(&data),
            Err(DecodeError::UnknownCode {
                field: "permission_type",
                code: 9
            })
        );
    }

    #[test]
    fn test_decode_checks_resource_type_first() {
        let mut data = encode(&filter());
        data.resource_type = UNKNOWN_CODE;
        data.operation = UNKNOWN_CODE;
        assert!(matches!(
            decode(&data),
            Err(DecodeError::UnknownCode { field: "resource_type", .. })
        ));
    }
}
