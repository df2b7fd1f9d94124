//! Versioned byte codec for describe-ACLs messages

use bytes::Bytes;

use super::request::DescribeAclsRequestData;
use super::response::{AclDescription, DescribeAclsResource, DescribeAclsResponse};
use super::wire::{WireReader, WireWriter};
use super::{is_flexible, pattern_type_supported, MAX_VERSION, MIN_VERSION};
use crate::acl::PatternType;
use crate::error::CodecError;

/// Converts describe-ACLs payloads to and from bytes for a protocol version
pub trait Codec: Send + Sync {
    fn encode_request(&self, data: &DescribeAclsRequestData, version: i16) -> Result<Bytes, CodecError>;

    fn decode_request(&self, buf: &[u8], version: i16) -> Result<DescribeAclsRequestData, CodecError>;

    fn encode_response(&self, response: &DescribeAclsResponse, version: i16) -> Result<Bytes, CodecError>;

    fn decode_response(&self, buf: &[u8], version: i16) -> Result<DescribeAclsResponse, CodecError>;
}

/// Codec for the broker wire layout, versions 0 through 3
#[derive(Debug, Clone, Copy, Default)]
pub struct WireCodec;

impl WireCodec {
    pub fn new() -> Self {
        Self
    }

    fn check_version(version: i16) -> Result<(), CodecError> {
        if (MIN_VERSION..=MAX_VERSION).contains(&version) {
            Ok(())
        } else {
            Err(CodecError::UnsupportedVersion(version))
        }
    }
}

impl Codec for WireCodec {
    fn encode_request(&self, data: &DescribeAclsRequestData, version: i16) -> Result<Bytes, CodecError> {
        Self::check_version(version)?;
        let flexible = is_flexible(version);
        let mut w = WireWriter::new();

        w.put_i8(data.resource_type);
        w.put_nullable_string(data.resource_name_filter.as_deref(), flexible, "resource_name_filter")?;
        if pattern_type_supported(version) {
            w.put_i8(data.pattern_type);
        } else if data.pattern_type != PatternType::Literal.code() {
            return Err(CodecError::UnsupportedField {
                field: "pattern_type",
                version,
            });
        }
        w.put_nullable_string(data.principal_filter.as_deref(), flexible, "principal_filter")?;
        w.put_nullable_string(data.host_filter.as_deref(), flexible, "host_filter")?;
        w.put_i8(data.operation);
        w.put_i8(data.permission_type);
        if flexible {
            w.put_empty_tagged_fields();
        }

        Ok(w.finish().freeze())
    }

    fn decode_request(&self, buf: &[u8], version: i16) -> Result<DescribeAclsRequestData, CodecError> {
        Self::check_version(version)?;
        let flexible = is_flexible(version);
        let mut r = WireReader::new(buf);

        let resource_type = r.read_i8("resource_type")?;
        let resource_name_filter = r.read_nullable_string(flexible, "resource_name_filter")?;
        let pattern_type = if pattern_type_supported(version) {
            r.read_i8("pattern_type")?
        } else {
            PatternType::Literal.code()
        };
        let principal_filter = r.read_nullable_string(flexible, "principal_filter")?;
        let host_filter = r.read_nullable_string(flexible, "host_filter")?;
        let operation = r.read_i8("operation")?;
        let permission_type = r.read_i8("permission_type")?;
        if flexible {
            r.skip_tagged_fields()?;
        }
        r.finish()?;

        Ok(DescribeAclsRequestData {
            resource_type,
            resource_name_filter,
            pattern_type,
            principal_filter,
            host_filter,
            operation,
            permission_type,
        })
    }

    fn encode_response(&self, response: &DescribeAclsResponse, version: i16) -> Result<Bytes, CodecError> {
        Self::check_version(version)?;
        let flexible = is_flexible(version);
        let mut w = WireWriter::new();

        w.put_i32(response.throttle_time_ms);
        w.put_i16(response.error_code);
        w.put_nullable_string(response.error_message.as_deref(), flexible, "error_message")?;
        w.put_array_len(response.resources.len(), flexible, "resources")?;

        for resource in &response.resources {
            w.put_i8(resource.resource_type);
            w.put_string(&resource.resource_name, flexible, "resource_name")?;
            if pattern_type_supported(version) {
                w.put_i8(resource.pattern_type);
            } else if resource.pattern_type != PatternType::Literal.code() {
                return Err(CodecError::UnsupportedField {
                    field: "pattern_type",
                    version,
                });
            }

            w.put_array_len(resource.acls.len(), flexible, "acls")?;
            for acl in &resource.acls {
                w.put_string(&acl.principal, flexible, "principal")?;
                w.put_string(&acl.host, flexible, "host")?;
                w.put_i8(acl.operation);
                w.put_i8(acl.permission_type);
                if flexible {
                    w.put_empty_tagged_fields();
                }
            }

            if flexible {
                w.put_empty_tagged_fields();
            }
        }

        if flexible {
            w.put_empty_tagged_fields();
        }

        Ok(w.finish().freeze())
    }

    fn decode_response(&self, buf: &[u8], version: i16) -> Result<DescribeAclsResponse, CodecError> {
        Self::check_version(version)?;
        let flexible = is_flexible(version);
        let mut r = WireReader::new(buf);

        let throttle_time_ms = r.read_i32("throttle_time_ms")?;
        let error_code = r.read_i16("error_code")?;
        let error_message = r.read_nullable_string(flexible, "error_message")?;

        let resource_count = r.read_array_len(flexible, "resources")?;
        let mut resources = Vec::with_capacity(resource_count);
        for _ in 0..resource_count {
            let resource_type = r.read_i8("resource_type")?;
            let resource_name = r.read_string(flexible, "resource_name")?;
            let pattern_type = if pattern_type_supported(version) {
                r.read_i8("pattern_type")?
            } else {
                PatternType::Literal.code()
            };

            let acl_count = r.read_array_len(flexible, "acls")?;
            let mut acls = Vec::with_capacity(acl_count);
            for _ in 0..acl_count {
                let principal = r.read_string(flexible, "principal")?;
                let host = r.read_string(flexible, "host")?;
                let operation = r.read_i8("operation")?;
                let permission_type = r.read_i8("permission_type")?;
                if flexible {
                    r.skip_tagged_fields()?;
                }
                acls.push(AclDescription {
                    principal,
                    host,
                    operation,
                    permission_type,
                });
            }

            if flexible {
                r.skip_tagged_fields()?;
            }
            resources.push(DescribeAclsResource {
                resource_type,
                resource_name,
                pattern_type,
                acls,
            });
        }

        if flexible {
            r.skip_tagged_fields()?;
        }
        r.finish()?;

        Ok(DescribeAclsResponse {
            throttle_time_ms,
            error_code,
            error_message,
            resources,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_data() -> DescribeAclsRequestData {
        DescribeAclsRequestData {
            resource_type: 2,
            resource_name_filter: Some("orders".to_string()),
            pattern_type: 3,
            principal_filter: Some("User:alice".to_string()),
            host_filter: None,
            operation: 3,
            permission_type: 3,
        }
    }

    #[test]
    fn test_v0_request_layout() {
        let bytes = WireCodec.encode_request(&sample_data(), 0).unwrap();
        let expected: Vec<u8> = [
            &[0x02u8][..], // resource type TOPIC
            &[0x00, 0x06], b"orders",                      // resource name
            &[0x00, 0x0a], b"User:alice",                  // principal
            &[0xff, 0xff],                                 // host (null)
            &[0x03, 0x03],                                 // READ, ALLOW
        ]
        .concat();
        assert_eq!(&bytes[..], &expected[..]);
    }

    #[test]
    fn test_v1_carries_pattern_type() {
        let mut data = sample_data();
        data.pattern_type = 4;
        let bytes = WireCodec.encode_request(&data, 1).unwrap();
        assert_eq!(bytes[9], 0x04);
        assert_eq!(WireCodec.decode_request(&bytes, 1).unwrap(), data);
    }

    #[test]
    fn test_v0_decodes_pattern_as_literal() {
        let bytes = WireCodec.encode_request(&sample_data(), 0).unwrap();
        let decoded = WireCodec.decode_request(&bytes, 0).unwrap();
        assert_eq!(decoded.pattern_type, PatternType::Literal.code());
    }

    #[test]
    fn test_v0_rejects_non_literal_pattern() {
        let mut data = sample_data();
        data.pattern_type = PatternType::Prefixed.code();
        assert_eq!(
            WireCodec.encode_request(&data, 0),
            Err(CodecError::UnsupportedField {
                field: "pattern_type",
                version: 0
            })
        );
    }

    #[test]
    fn test_flexible_request_layout() {
        let bytes = WireCodec.encode_request(&sample_data(), 2).unwrap();
        // compact string length is len + 1
        assert_eq!(bytes[1], 0x07);
        // null compact host, then READ, ALLOW and an empty tag section
        assert_eq!(&bytes[bytes.len() - 4..], &[0x00, 0x03, 0x03, 0x00]);
        assert_eq!(WireCodec.decode_request(&bytes, 3).unwrap(), sample_data());
    }

    #[test]
    fn test_truncated_request() {
        let bytes = WireCodec.encode_request(&sample_data(), 1).unwrap();
        let result = WireCodec.decode_request(&bytes[..bytes.len() - 1], 1);
        assert!(matches!(result, Err(CodecError::Truncated { context: "permission_type", .. })));
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let mut bytes = WireCodec.encode_request(&sample_data(), 1).unwrap().to_vec();
        bytes.push(0);
        assert_eq!(WireCodec.decode_request(&bytes, 1), Err(CodecError::TrailingBytes(1)));
    }

    #[test]
    fn test_unsupported_version() {
        assert_eq!(
            WireCodec.decode_request(&[], 4),
            Err(CodecError::UnsupportedVersion(4))
        );
        assert!(WireCodec.encode_request(&sample_data(), -1).is_err());
    }

    #[test]
    fn test_response_roundtrip_with_resources() {
        let response = DescribeAclsResponse {
            throttle_time_ms: 10,
            error_code: 0,
            error_message: None,
            resources: vec![DescribeAclsResource {
                resource_type: 2,
                resource_name: "orders".to_string(),
                pattern_type: 4,
                acls: vec![AclDescription {
                    principal: "User:alice".to_string(),
                    host: "*".to_string(),
                    operation: 3,
                    permission_type: 3,
                }],
            }],
        };

        for version in 1..=3 {
            let bytes = WireCodec.encode_response(&response, version).unwrap();
            assert_eq!(WireCodec.decode_response(&bytes, version).unwrap(), response);
        }
        assert!(WireCodec.encode_response(&response, 0).is_err());
    }

    #[test]
    fn test_error_response_layout_v0() {
        let response = DescribeAclsResponse {
            throttle_time_ms: 50,
            error_code: 42,
            error_message: Some("bad".to_string()),
            resources: Vec::new(),
        };

        let bytes = WireCodec.encode_response(&response, 0).unwrap();
        let expected: Vec<u8> = [
            &[0x00u8, 0x00, 0x00, 0x32][..],
            &[0x00, 0x2a],
            &[0x00, 0x03], b"bad",
            &[0x00, 0x00, 0x00, 0x00],
        ]
        .concat();
        assert_eq!(&bytes[..], &expected[..]);
    }
}
