//! Configuration types for the describe-ACLs handler
//!
//! Provides JSON-serializable configuration for the accepted protocol
//! version window, throttling defaults and the ACL source.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::protocol::{MAX_VERSION, MIN_VERSION};

/// Describe-ACLs handler configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case", default)]
pub struct DescribeAclsConfig {
    /// Protocol version window
    pub protocol: ProtocolConfig,

    /// ACL source settings
    pub security: SecurityConfig,

    /// General settings
    pub general: GeneralConfig,
}

impl DescribeAclsConfig {
    /// Check settings that serde cannot express
    pub fn validate(&self) -> Result<(), String> {
        let p = &self.protocol;
        if p.min_version < MIN_VERSION || p.max_version > MAX_VERSION {
            return Err(format!(
                "version window {}..={} is outside the supported range {}..={}",
                p.min_version, p.max_version, MIN_VERSION, MAX_VERSION
            ));
        }
        if p.min_version > p.max_version {
            return Err(format!(
                "min-version {} is greater than max-version {}",
                p.min_version, p.max_version
            ));
        }
        if self.general.default_throttle_ms < 0 {
            return Err("default-throttle-ms must not be negative".to_string());
        }
        Ok(())
    }
}

// ============================================================================
// Protocol Configuration
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ProtocolConfig {
    /// Lowest accepted request version
    pub min_version: i16,

    /// Highest accepted request version
    pub max_version: i16,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            min_version: MIN_VERSION,
            max_version: MAX_VERSION,
        }
    }
}

impl ProtocolConfig {
    pub fn accepts(&self, version: i16) -> bool {
        (self.min_version..=self.max_version).contains(&version)
    }
}

// ============================================================================
// Security Configuration
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SecurityConfig {
    /// Answer describe requests; when false every request gets SECURITY_DISABLED
    pub authorizer_enabled: bool,

    /// JSON file of ACL bindings for the in-memory source
    pub acls_file: Option<PathBuf>,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            authorizer_enabled: true,
            acls_file: None,
        }
    }
}

// ============================================================================
// General Configuration
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case", default)]
pub struct GeneralConfig {
    /// Log every handled request (verbose)
    pub log_requests: bool,

    /// Throttle time attached when the caller supplies none
    pub default_throttle_ms: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DescribeAclsConfig::default();
        assert_eq!(config.protocol.min_version, 0);
        assert_eq!(config.protocol.max_version, 3);
        assert!(config.security.authorizer_enabled);
        assert!(!config.general.log_requests);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_config() {
        let json = r#"{
            "protocol": {
                "min-version": 1,
                "max-version": 2
            },
            "security": {
                "acls-file": "/etc/acls/bindings.json"
            },
            "general": {
                "log-requests": true,
                "default-throttle-ms": 25
            }
        }"#;

        let config: DescribeAclsConfig = serde_json::from_str(json).expect("Failed to parse");
        assert!(config.protocol.accepts(1));
        assert!(!config.protocol.accepts(0));
        assert!(!config.protocol.accepts(3));
        assert!(config.security.authorizer_enabled);
        assert_eq!(
            config.security.acls_file,
            Some(PathBuf::from("/etc/acls/bindings.json"))
        );
        assert_eq!(config.general.default_throttle_ms, 25);
    }

    #[test]
    fn test_validate_rejects_bad_windows() {
        let mut config = DescribeAclsConfig::default();
        config.protocol.max_version = 7;
        assert!(config.validate().is_err());

        let mut config = DescribeAclsConfig::default();
        config.protocol.min_version = 3;
        config.protocol.max_version = 1;
        assert!(config.validate().is_err());

        let mut config = DescribeAclsConfig::default();
        config.general.default_throttle_ms = -1;
        assert!(config.validate().is_err());
    }
}
