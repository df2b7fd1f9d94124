//! Error types for filter validation, decoding and wire handling
//!
//! Each error family maps onto a protocol error code through
//! [`ApiError::from_error`](crate::protocol::ApiError::from_error).

use thiserror::Error;

/// Rejection of a request (or binding) at construction time
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The protocol version cannot represent the filter
    #[error("{0}")]
    UnsupportedVersion(String),

    /// The filter carries UNKNOWN or unrecognized codes
    #[error("{0}")]
    InvalidFilter(String),

    /// A concrete binding was built from filter-only values (ANY, MATCH)
    #[error("{0}")]
    InvalidBinding(String),
}

/// A received code that does not resolve to a known enum variant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("unknown {field} code {code}")]
    UnknownCode { field: &'static str, code: i8 },
}

/// Byte-level encoding and decoding failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("describe acls version {0} is not supported by the wire codec")]
    UnsupportedVersion(i16),

    #[error("truncated payload: need {need} bytes for {context}, {remaining} remaining")]
    Truncated {
        need: usize,
        remaining: usize,
        context: &'static str,
    },

    #[error("invalid length {length} for {context}")]
    InvalidLength { length: i64, context: &'static str },

    #[error("{context} is not valid UTF-8")]
    InvalidUtf8 { context: &'static str },

    #[error("unsigned varint is longer than 5 bytes")]
    VarintOverflow,

    #[error("field {field} cannot be encoded at version {version}")]
    UnsupportedField { field: &'static str, version: i16 },

    #[error("{0} unexpected trailing bytes")]
    TrailingBytes(usize),
}

/// Receive-side failures that are not caused by the payload itself
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    #[error("no ACL source is configured")]
    SecurityDisabled,

    #[error("not authorized to describe ACLs")]
    ClusterAuthorizationFailed,

    #[error("describe acls version {version} is outside the accepted range {min}..={max}")]
    VersionNotAccepted { version: i16, min: i16, max: i16 },
}
