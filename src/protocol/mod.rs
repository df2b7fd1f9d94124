//! Describe-ACLs protocol handling
//!
//! Request envelope construction and validation, the filter <-> flat payload
//! mapping, the byte codec and error responses.

mod codec;
mod errors;
pub mod filter_codec;
mod request;
mod response;
pub mod validation;
mod wire;

pub use codec::{Codec, WireCodec};
pub use errors::{ApiError, ErrorCode};
pub use request::{DescribeAclsRequest, DescribeAclsRequestData};
pub use response::{AclDescription, DescribeAclsResource, DescribeAclsResponse};

/// Lowest describe-ACLs version this crate speaks
pub const MIN_VERSION: i16 = 0;

/// Highest describe-ACLs version this crate speaks
pub const MAX_VERSION: i16 = 3;

/// First version carrying the resource pattern type on the wire
pub const PATTERN_TYPE_VERSION: i16 = 1;

/// First flexible (compact, tagged) version
pub const FIRST_FLEXIBLE_VERSION: i16 = 2;

pub(crate) fn is_flexible(version: i16) -> bool {
    version >= FIRST_FLEXIBLE_VERSION
}

pub(crate) fn pattern_type_supported(version: i16) -> bool {
    version >= PATTERN_TYPE_VERSION
}

/// Whether the version is within the range this crate speaks
pub fn is_supported_version(version: i16) -> bool {
    (MIN_VERSION..=MAX_VERSION).contains(&version)
}
