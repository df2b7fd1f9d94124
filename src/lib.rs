//! Describe-ACLs request/response contract
//!
//! This crate implements the versioned "describe ACLs" exchange of a
//! broker-style wire protocol:
//!
//! - **Filters**: resource pattern and access-control entry predicates
//! - **Encoding**: filter <-> flat wire codes, per-version byte layouts
//! - **Validation**: per-version rules, including the version 0 coercion of
//!   `ANY` pattern types to `LITERAL`
//! - **Error responses**: total classification of failures into protocol
//!   error codes
//!
//! # Architecture
//!
//! Outbound requests are built with [`DescribeAclsRequest::build`], which
//! validates once. Inbound requests are read with
//! [`DescribeAclsRequest::from_wire`] and are not re-validated; resolving
//! them with [`DescribeAclsRequest::filter`] fails on unknown codes.
//! [`DescribeAclsHandler`] drives the receive side against an [`acl::AclSource`].
//!
//! # Example
//!
//! ```
//! use sentinel_describe_acls::acl::{
//!     AccessControlEntryFilter, AclBindingFilter, AclOperation, AclPermissionType,
//!     PatternType, ResourcePatternFilter, ResourceType,
//! };
//! use sentinel_describe_acls::DescribeAclsRequest;
//!
//! let filter = AclBindingFilter::new(
//!     ResourcePatternFilter::new(ResourceType::Topic, Some("orders".into()), PatternType::Any),
//!     AccessControlEntryFilter::new(
//!         Some("User:alice".into()),
//!         Some("*".into()),
//!         AclOperation::Read,
//!         AclPermissionType::Allow,
//!     ),
//! );
//!
//! let request = DescribeAclsRequest::build(&filter, 0).unwrap();
//! assert_eq!(request.filter().unwrap().pattern_filter.pattern_type, PatternType::Literal);
//! ```

pub mod acl;
pub mod config;
pub mod error;
pub mod handler;
pub mod protocol;

// Re-export main types
pub use config::DescribeAclsConfig;
pub use handler::DescribeAclsHandler;
pub use protocol::{DescribeAclsRequest, DescribeAclsResponse};
