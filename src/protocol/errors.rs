//! Protocol error codes and failure classification

use num_enum::TryFromPrimitive;
use std::error::Error as StdError;
use std::fmt;

use crate::error::{CodecError, DecodeError, HandlerError, ValidationError};

/// Protocol-visible error codes used by describe-ACLs responses
#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive)]
pub enum ErrorCode {
    UnknownServerError = -1,
    None = 0,
    CorruptMessage = 2,
    ClusterAuthorizationFailed = 31,
    UnsupportedVersion = 35,
    InvalidRequest = 42,
    SecurityDisabled = 54,
}

impl ErrorCode {
    pub fn code(&self) -> i16 {
        *self as i16
    }

    /// Resolve a received code; unrecognized codes read as an unknown server error
    pub fn from_code(code: i16) -> Self {
        Self::try_from(code).unwrap_or(Self::UnknownServerError)
    }

    /// Message used when a failure carries no message of its own
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::UnknownServerError => {
                "The server experienced an unexpected error when processing the request."
            }
            Self::None => "",
            Self::CorruptMessage => {
                "This message has failed its CRC checksum, exceeds the valid size, has a null key for a compacted topic, or is otherwise corrupt."
            }
            Self::ClusterAuthorizationFailed => "Cluster authorization failed.",
            Self::UnsupportedVersion => "The version of API is not supported.",
            Self::InvalidRequest => {
                "This most likely occurs because of a request being malformed by the client library or the message was sent to an incompatible broker."
            }
            Self::SecurityDisabled => "Security features are disabled.",
        }
    }
}

/// Classified failure: error code plus the message sent to the peer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    code: ErrorCode,
    message: Option<String>,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: Option<String>) -> Self {
        Self { code, message }
    }

    pub fn none() -> Self {
        Self::new(ErrorCode::None, None)
    }

    /// Classify an arbitrary failure. Never fails.
    ///
    /// The source chain is searched for a known error type; the first hit
    /// decides the code and supplies the message. Anything unrecognized is an
    /// unknown server error carrying only the generic message.
    pub fn from_error(err: &(dyn StdError + 'static)) -> Self {
        let mut current = Some(err);
        while let Some(e) = current {
            if let Some(api_error) = Self::classify(e) {
                return api_error;
            }
            current = e.source();
        }

        Self::new(ErrorCode::UnknownServerError, None)
    }

    fn classify(err: &(dyn StdError + 'static)) -> Option<Self> {
        let code = if let Some(e) = err.downcast_ref::<ValidationError>() {
            match e {
                ValidationError::UnsupportedVersion(_) => ErrorCode::UnsupportedVersion,
                ValidationError::InvalidFilter(_) | ValidationError::InvalidBinding(_) => {
                    ErrorCode::InvalidRequest
                }
            }
        } else if err.downcast_ref::<DecodeError>().is_some() {
            ErrorCode::InvalidRequest
        } else if let Some(e) = err.downcast_ref::<CodecError>() {
            match e {
                CodecError::UnsupportedVersion(_) | CodecError::UnsupportedField { .. } => {
                    ErrorCode::UnsupportedVersion
                }
                _ => ErrorCode::CorruptMessage,
            }
        } else if let Some(e) = err.downcast_ref::<HandlerError>() {
            match e {
                HandlerError::SecurityDisabled => ErrorCode::SecurityDisabled,
                HandlerError::VersionNotAccepted { .. } => ErrorCode::UnsupportedVersion,
                HandlerError::ClusterAuthorizationFailed => ErrorCode::ClusterAuthorizationFailed,
            }
        } else {
            return None;
        };

        Some(Self::new(code, Some(err.to_string())))
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn is_success(&self) -> bool {
        self.code == ErrorCode::None
    }

    /// Message for the response; falls back to the code's default text
    pub fn message(&self) -> Option<String> {
        match (&self.message, self.code) {
            (_, ErrorCode::None) => None,
            (Some(message), _) if !message.is_empty() => Some(message.clone()),
            (_, code) => Some(code.default_message().to_string()),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.message() {
            Some(message) => write!(f, "{:?}: {}", self.code, message),
            None => write!(f, "{:?}", self.code),
        }
    }
}
