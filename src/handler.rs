//! Describe-ACLs request handler
//!
//! Receive side of the contract: reads a request off the wire without
//! re-validating it, resolves the filter, asks the [`AclSource`] for matching
//! bindings and turns every failure into an error response.

use crate::acl::{AclBinding, AclBindingFilter, AclSource, MemoryAclSource};
use crate::config::DescribeAclsConfig;
use crate::error::{CodecError, HandlerError};
use crate::protocol::{
    is_supported_version, Codec, DescribeAclsRequest, DescribeAclsResponse, WireCodec, MIN_VERSION,
};

use anyhow::{anyhow, Result};
use bytes::Bytes;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Describe-ACLs handler
pub struct DescribeAclsHandler {
    /// Configuration
    config: Arc<RwLock<DescribeAclsConfig>>,
    /// Source of stored bindings
    source: Arc<RwLock<Option<Arc<dyn AclSource>>>>,
    /// Byte codec
    codec: Arc<dyn Codec>,
}

impl DescribeAclsHandler {
    /// Create a handler with default configuration and no ACL source
    pub fn new() -> Result<Self> {
        Self::with_config(DescribeAclsConfig::default())
    }

    /// Create a handler, loading the configured ACL file if there is one
    pub fn with_config(config: DescribeAclsConfig) -> Result<Self> {
        config.validate().map_err(|e| anyhow!("{}", e))?;
        let source = Self::load_source(&config)?;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            source: Arc::new(RwLock::new(source)),
            codec: Arc::new(WireCodec),
        })
    }

    /// Create a handler backed by the given source
    pub fn with_source(config: DescribeAclsConfig, source: Arc<dyn AclSource>) -> Result<Self> {
        config.validate().map_err(|e| anyhow!("{}", e))?;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            source: Arc::new(RwLock::new(Some(source))),
            codec: Arc::new(WireCodec),
        })
    }

    /// Replace the byte codec
    pub fn with_codec(mut self, codec: Arc<dyn Codec>) -> Self {
        self.codec = codec;
        self
    }

    fn load_source(config: &DescribeAclsConfig) -> Result<Option<Arc<dyn AclSource>>> {
        match &config.security.acls_file {
            Some(path) => {
                let source = MemoryAclSource::from_json_file(path)?;
                info!(path = %path.display(), bindings = source.len(), "Loaded ACL source");
                Ok(Some(Arc::new(source)))
            }
            None => Ok(None),
        }
    }

    /// Reconfigure the handler
    ///
    /// An ACL file in the new configuration replaces the current source;
    /// without one the current source is kept.
    pub fn reconfigure(&self, config: DescribeAclsConfig) -> Result<()> {
        config.validate().map_err(|e| anyhow!("{}", e))?;

        if let Some(source) = Self::load_source(&config)? {
            *self.source.write() = Some(source);
        }

        *self.config.write() = config;
        Ok(())
    }

    /// Replace the ACL source
    pub fn set_source(&self, source: Arc<dyn AclSource>) {
        *self.source.write() = Some(source);
    }

    /// Handle a raw request
    ///
    /// `throttle_time_ms` of `None` uses the configured default.
    pub fn handle(&self, version: i16, payload: &[u8], throttle_time_ms: Option<i32>) -> DescribeAclsResponse {
        let config = self.config.read().clone();
        let throttle = throttle_time_ms.unwrap_or(config.general.default_throttle_ms);

        if !config.protocol.accepts(version) {
            warn!(
                version,
                min = config.protocol.min_version,
                max = config.protocol.max_version,
                "Describe ACLs version not accepted"
            );
            let err = HandlerError::VersionNotAccepted {
                version,
                min: config.protocol.min_version,
                max: config.protocol.max_version,
            };
            return DescribeAclsResponse::from_failure(throttle, &err);
        }

        // Received requests are trusted: no validation, only code resolution
        let request = match DescribeAclsRequest::from_wire(self.codec.as_ref(), payload, version) {
            Ok(r) => r,
            Err(e) => {
                warn!(version, error = %e, "Failed to parse describe ACLs request");
                return DescribeAclsResponse::from_failure(throttle, &e);
            }
        };

        if config.general.log_requests {
            debug!(version, request = %request.data(), "Describe ACLs request");
        }

        let filter = match request.filter() {
            Ok(f) => f,
            Err(e) => {
                warn!(version, error = %e, "Describe ACLs filter has unresolvable codes");
                return request.error_response(throttle, &e);
            }
        };

        match self.describe(&config, &filter) {
            Ok(bindings) => {
                debug!(version, bindings = bindings.len(), "Describe ACLs answered");
                DescribeAclsResponse::success(throttle, &bindings)
            }
            Err(e) => {
                warn!(version, error = %e, "Describe ACLs failed");
                request.error_response(throttle, &*e)
            }
        }
    }

    fn describe(&self, config: &DescribeAclsConfig, filter: &AclBindingFilter) -> Result<Vec<AclBinding>> {
        if !config.security.authorizer_enabled {
            return Err(HandlerError::SecurityDisabled.into());
        }

        let source = self.source.read().clone();
        let Some(source) = source else {
            return Err(HandlerError::SecurityDisabled.into());
        };

        debug!(source = source.name(), filter = ?filter, "Querying ACL source");
        source.describe(filter)
    }

    /// Handle a raw request and encode the response at the request version
    ///
    /// A response the codec cannot write at that version is replaced by an
    /// UNSUPPORTED_VERSION response, at the request version when it is in
    /// range and at the lowest version otherwise.
    pub fn handle_bytes(
        &self,
        version: i16,
        payload: &[u8],
        throttle_time_ms: Option<i32>,
    ) -> Result<Bytes, CodecError> {
        let response = self.handle(version, payload, throttle_time_ms);

        match self.codec.encode_response(&response, version) {
            Ok(bytes) => Ok(bytes),
            Err(e) => {
                warn!(version, error = %e, "Failed to encode describe ACLs response");
                let fallback = DescribeAclsResponse::from_failure(response.throttle_time_ms, &e);
                let fallback_version = if is_supported_version(version) { version } else { MIN_VERSION };
                self.codec.encode_response(&fallback, fallback_version)
            }
        }
    }
}

impl Default for DescribeAclsHandler {
    fn default() -> Self {
        Self {
            config: Arc::new(RwLock::new(DescribeAclsConfig::default())),
            source: Arc::new(RwLock::new(None)),
            codec: Arc::new(WireCodec),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acl::{
        AccessControlEntry, AccessControlEntryFilter, AclOperation, AclPermissionType, PatternType,
        ResourcePattern, ResourcePatternFilter, ResourceType,
    };
    use crate::protocol::{filter_codec, DescribeAclsRequestData, ErrorCode};

    struct FailingSource;

    impl AclSource for FailingSource {
        fn describe(&self, _filter: &AclBindingFilter) -> Result<Vec<AclBinding>> {
            Err(anyhow!("backing store unavailable at 10.1.2.3"))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    /// Returns its bindings whatever the filter asks for
    struct UnfilteredSource(Vec<AclBinding>);

    impl AclSource for UnfilteredSource {
        fn describe(&self, _filter: &AclBindingFilter) -> Result<Vec<AclBinding>> {
            Ok(self.0.clone())
        }

        fn name(&self) -> &str {
            "unfiltered"
        }
    }

    fn source() -> Arc<dyn AclSource> {
        Arc::new(MemoryAclSource::new(vec![
            AclBinding::new(
                ResourcePattern::new(ResourceType::Topic, "orders", PatternType::Literal).unwrap(),
                AccessControlEntry::new("User:alice", "*", AclOperation::Read, AclPermissionType::Allow).unwrap(),
            ),
            AclBinding::new(
                ResourcePattern::new(ResourceType::Topic, "ord", PatternType::Prefixed).unwrap(),
                AccessControlEntry::new("User:bob", "*", AclOperation::Write, AclPermissionType::Deny).unwrap(),
            ),
        ]))
    }

    fn request_bytes(filter: &AclBindingFilter, version: i16) -> Bytes {
        DescribeAclsRequest::build(filter, version)
            .unwrap()
            .to_bytes(&WireCodec)
            .unwrap()
    }

    fn topic_filter(pattern_type: PatternType) -> AclBindingFilter {
        AclBindingFilter::new(
            ResourcePatternFilter::new(ResourceType::Topic, Some("orders".to_string()), pattern_type),
            AccessControlEntryFilter::any(),
        )
    }

    #[test]
    fn test_handler_creation() {
        assert!(DescribeAclsHandler::new().is_ok());

        let mut config = DescribeAclsConfig::default();
        config.protocol.min_version = 2;
        config.protocol.max_version = 1;
        assert!(DescribeAclsHandler::with_config(config).is_err());
    }

    #[test]
    fn test_match_filter_finds_literal_and_prefixed() {
        let handler = DescribeAclsHandler::with_source(DescribeAclsConfig::default(), source()).unwrap();
        let response = handler.handle(1, &request_bytes(&topic_filter(PatternType::Match), 1), Some(0));

        assert!(!response.is_error());
        assert_eq!(response.resources.len(), 2);
    }

    #[test]
    fn test_v0_request_sees_only_literal_patterns() {
        let handler = DescribeAclsHandler::with_source(DescribeAclsConfig::default(), source()).unwrap();
        let response = handler.handle(0, &request_bytes(&topic_filter(PatternType::Any), 0), Some(0));

        assert_eq!(response.resources.len(), 1);
        assert_eq!(response.resources[0].pattern_type, PatternType::Literal.code());
    }

    #[test]
    fn test_without_source_security_disabled() {
        let handler = DescribeAclsHandler::default();
        let response = handler.handle(1, &request_bytes(&AclBindingFilter::any(), 1), Some(3));

        assert_eq!(response.error(), ErrorCode::SecurityDisabled);
        assert_eq!(response.throttle_time_ms, 3);
    }

    #[test]
    fn test_authorizer_disabled() {
        let mut config = DescribeAclsConfig::default();
        config.security.authorizer_enabled = false;
        let handler = DescribeAclsHandler::with_source(config, source()).unwrap();

        let response = handler.handle(2, &request_bytes(&AclBindingFilter::any(), 2), None);
        assert_eq!(response.error(), ErrorCode::SecurityDisabled);
    }

    #[test]
    fn test_unknown_code_becomes_invalid_request() {
        let handler = DescribeAclsHandler::with_source(DescribeAclsConfig::default(), source()).unwrap();
        let mut data = filter_codec::encode(&AclBindingFilter::any());
        data.operation = 0;
        let bytes = WireCodec.encode_request(&data, 1).unwrap();

        let response = handler.handle(1, &bytes, Some(50));
        assert_eq!(response.throttle_time_ms, 50);
        assert_eq!(response.error(), ErrorCode::InvalidRequest);
        assert!(response.error_message.is_some());
    }

    #[test]
    fn test_source_failure_is_generic() {
        let handler =
            DescribeAclsHandler::with_source(DescribeAclsConfig::default(), Arc::new(FailingSource)).unwrap();
        let response = handler.handle(1, &request_bytes(&AclBindingFilter::any(), 1), Some(0));

        assert_eq!(response.error(), ErrorCode::UnknownServerError);
        assert!(!response.error_message.unwrap().contains("10.1.2.3"));
    }

    #[test]
    fn test_version_window() {
        let mut config = DescribeAclsConfig::default();
        config.protocol.min_version = 1;
        let handler = DescribeAclsHandler::with_source(config, source()).unwrap();

        let response = handler.handle(0, &request_bytes(&topic_filter(PatternType::Literal), 0), None);
        assert_eq!(response.error(), ErrorCode::UnsupportedVersion);
        assert_eq!(
            response.error_message.as_deref(),
            Some("describe acls version 0 is outside the accepted range 1..=3")
        );
    }

    #[test]
    fn test_corrupt_payload() {
        let handler = DescribeAclsHandler::with_source(DescribeAclsConfig::default(), source()).unwrap();
        let response = handler.handle(1, &[0x02, 0x00], None);
        assert_eq!(response.error(), ErrorCode::CorruptMessage);
    }

    #[test]
    fn test_default_throttle_from_config() {
        let mut config = DescribeAclsConfig::default();
        config.general.default_throttle_ms = 40;
        let handler = DescribeAclsHandler::with_config(config).unwrap();

        let response = handler.handle(1, &request_bytes(&AclBindingFilter::any(), 1), None);
        assert_eq!(response.throttle_time_ms, 40);
    }

    #[test]
    fn test_handle_bytes_unsupported_version_falls_back() {
        let handler = DescribeAclsHandler::with_source(DescribeAclsConfig::default(), source()).unwrap();

        let bytes = handler.handle_bytes(9, &[], Some(0)).unwrap();
        let response = WireCodec.decode_response(&bytes, MIN_VERSION).unwrap();
        assert_eq!(response.error(), ErrorCode::UnsupportedVersion);
    }

    #[test]
    fn test_handle_bytes_v0_cannot_carry_prefixed_bindings() {
        let prefixed = Arc::new(UnfilteredSource(vec![AclBinding::new(
            ResourcePattern::new(ResourceType::Topic, "ord", PatternType::Prefixed).unwrap(),
            AccessControlEntry::new("User:bob", "*", AclOperation::Write, AclPermissionType::Deny).unwrap(),
        )]));
        let handler = DescribeAclsHandler::with_source(DescribeAclsConfig::default(), prefixed).unwrap();

        let filter = AclBindingFilter::any();
        let bytes = handler.handle_bytes(0, &request_bytes(&filter, 0), Some(7)).unwrap();
        let response = WireCodec.decode_response(&bytes, 0).unwrap();

        assert_eq!(response.error(), ErrorCode::UnsupportedVersion);
        assert_eq!(response.throttle_time_ms, 7);
        assert!(response.resources.is_empty());
    }

    /// Codec that writes nothing but error responses, recording the version used
    struct ErrorsOnlyCodec {
        versions: parking_lot::Mutex<Vec<i16>>,
    }

    impl Codec for ErrorsOnlyCodec {
        fn encode_request(&self, data: &DescribeAclsRequestData, version: i16) -> Result<Bytes, CodecError> {
            WireCodec.encode_request(data, version)
        }

        fn decode_request(&self, buf: &[u8], version: i16) -> Result<DescribeAclsRequestData, CodecError> {
            WireCodec.decode_request(buf, version)
        }

        fn encode_response(&self, response: &DescribeAclsResponse, version: i16) -> Result<Bytes, CodecError> {
            self.versions.lock().push(version);
            if !response.is_error() {
                return Err(CodecError::UnsupportedField {
                    field: "resources",
                    version,
                });
            }
            WireCodec.encode_response(response, version)
        }

        fn decode_response(&self, buf: &[u8], version: i16) -> Result<DescribeAclsResponse, CodecError> {
            WireCodec.decode_response(buf, version)
        }
    }

    #[test]
    fn test_handle_bytes_fallback_keeps_request_version() {
        let codec = Arc::new(ErrorsOnlyCodec {
            versions: parking_lot::Mutex::new(Vec::new()),
        });
        let handler = DescribeAclsHandler::with_source(DescribeAclsConfig::default(), source())
            .unwrap()
            .with_codec(codec.clone());

        let bytes = handler
            .handle_bytes(2, &request_bytes(&AclBindingFilter::any(), 2), Some(0))
            .unwrap();
        let response = WireCodec.decode_response(&bytes, 2).unwrap();

        assert_eq!(response.error(), ErrorCode::UnsupportedVersion);
        assert_eq!(*codec.versions.lock(), vec![2, 2]);
    }

    #[test]
    fn test_handle_bytes_success() {
        let handler = DescribeAclsHandler::with_source(DescribeAclsConfig::default(), source()).unwrap();
        let data = DescribeAclsRequestData {
            resource_type: ResourceType::Any.code(),
            pattern_type: PatternType::Any.code(),
            operation: AclOperation::Any.code(),
            permission_type: AclPermissionType::Any.code(),
            ..Default::default()
        };
        let payload = WireCodec.encode_request(&data, 3).unwrap();

        let bytes = handler.handle_bytes(3, &payload, Some(0)).unwrap();
        let response = WireCodec.decode_response(&bytes, 3).unwrap();
        assert_eq!(response.resources.len(), 2);
    }

    #[test]
    fn test_set_source() {
        let handler = DescribeAclsHandler::default();
        handler.set_source(source());
        let response = handler.handle(1, &request_bytes(&AclBindingFilter::any(), 1), None);
        assert!(!response.is_error());
    }
}
