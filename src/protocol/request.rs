//! Describe-ACLs request envelope

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::codec::{Codec, WireCodec};
use super::response::DescribeAclsResponse;
use super::{filter_codec, is_supported_version, validation};
use crate::acl::{AclBindingFilter, PatternType};
use crate::error::{CodecError, DecodeError, ValidationError};

/// Flat wire form of a describe filter
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DescribeAclsRequestData {
    pub resource_type: i8,
    pub resource_name_filter: Option<String>,
    pub pattern_type: i8,
    pub principal_filter: Option<String>,
    pub host_filter: Option<String>,
    pub operation: i8,
    pub permission_type: i8,
}

impl Default for DescribeAclsRequestData {
    fn default() -> Self {
        Self {
            resource_type: 0,
            resource_name_filter: None,
            pattern_type: PatternType::Literal.code(),
            principal_filter: None,
            host_filter: None,
            operation: 0,
            permission_type: 0,
        }
    }
}

impl fmt::Display for DescribeAclsRequestData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DescribeAclsRequestData(resource_type={}, resource_name_filter={:?}, pattern_type={}, \
             principal_filter={:?}, host_filter={:?}, operation={}, permission_type={})",
            self.resource_type,
            self.resource_name_filter,
            self.pattern_type,
            self.principal_filter,
            self.host_filter,
            self.operation,
            self.permission_type
        )
    }
}

/// Immutable describe-ACLs request for one protocol version
///
/// Requests built for sending are validated once, at construction. Requests
/// read off the wire are trusted and only checked when [`filter`] resolves
/// their codes.
///
/// [`filter`]: DescribeAclsRequest::filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeAclsRequest {
    data: DescribeAclsRequestData,
    version: i16,
}

impl DescribeAclsRequest {
    /// Build an outbound request from a domain filter
    pub fn build(filter: &AclBindingFilter, version: i16) -> Result<Self, ValidationError> {
        Self::from_data(filter_codec::encode(filter), version)
    }

    /// Build an outbound request from an already-flattened payload
    pub fn from_data(data: DescribeAclsRequestData, version: i16) -> Result<Self, ValidationError> {
        if !is_supported_version(version) {
            return Err(ValidationError::UnsupportedVersion(format!(
                "describe acls version {} is not supported",
                version
            )));
        }

        let data = validation::validate(data, version)?;
        Ok(Self { data, version })
    }

    /// Read a received request. No validation is applied.
    pub fn from_wire(codec: &dyn Codec, buf: &[u8], version: i16) -> Result<Self, CodecError> {
        let data = codec.decode_request(buf, version)?;
        Ok(Self { data, version })
    }

    /// Read a received request with the default [`WireCodec`]
    pub fn parse(buf: &[u8], version: i16) -> Result<Self, CodecError> {
        Self::from_wire(&WireCodec, buf, version)
    }

    pub fn data(&self) -> &DescribeAclsRequestData {
        &self.data
    }

    pub fn version(&self) -> i16 {
        self.version
    }

    /// Resolve the payload back into a domain filter
    pub fn filter(&self) -> Result<AclBindingFilter, DecodeError> {
        filter_codec::decode(&self.data)
    }

    pub fn to_bytes(&self, codec: &dyn Codec) -> Result<Bytes, CodecError> {
        codec.encode_request(&self.data, self.version)
    }

    /// Error response for a failure while handling this request
    pub fn error_response(
        &self,
        throttle_time_ms: i32,
        cause: &(dyn std::error::Error + 'static),
    ) -> DescribeAclsResponse {
        DescribeAclsResponse::from_failure(throttle_time_ms, cause)
    }
}
