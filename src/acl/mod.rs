//! Access-control domain model
//!
//! Resource patterns, access-control entries, the filters callers build over
//! them, and the [`AclSource`] seam that answers a filter with bindings.

/// Stable `i8` wire codes for a closed enum.
///
/// `from_code` is total: the sentinel and unrecognized codes are errors.
macro_rules! wire_code {
    ($ty:ident, $field:literal) => {
        impl $ty {
            /// Wire code of this variant
            pub fn code(&self) -> i8 {
                *self as i8
            }

            /// Resolve a wire code
            pub fn from_code(code: i8) -> Result<Self, $crate::error::DecodeError> {
                Self::try_from(code).map_err(|_| $crate::error::DecodeError::UnknownCode {
                    field: $field,
                    code,
                })
            }

            /// Whether the code resolves to a variant
            pub fn is_known_code(code: i8) -> bool {
                Self::try_from(code).is_ok()
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub(crate) use wire_code;

mod binding;
mod entry;
mod resource;
mod source;

pub use binding::{AclBinding, AclBindingFilter};
pub use entry::{AccessControlEntry, AccessControlEntryFilter, AclOperation, AclPermissionType};
pub use resource::{PatternType, ResourcePattern, ResourcePatternFilter, ResourceType, WILDCARD_RESOURCE};
pub use source::{AclSource, MemoryAclSource};

/// Reserved wire code for values the sender could not name.
///
/// No domain enum has a variant with this code.
pub const UNKNOWN_CODE: i8 = 0;
