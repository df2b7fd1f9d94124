//! Describe-ACLs CLI
//!
//! Builds, inspects and answers describe-ACLs payloads.

use anyhow::{bail, Context, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use clap::{Args, Parser, Subcommand};
use sentinel_describe_acls::acl::{
    AccessControlEntryFilter, AclBindingFilter, AclOperation, AclPermissionType, PatternType,
    ResourcePatternFilter, ResourceType,
};
use sentinel_describe_acls::protocol::{Codec, WireCodec};
use sentinel_describe_acls::{DescribeAclsConfig, DescribeAclsHandler, DescribeAclsRequest};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

/// Describe-ACLs request tool
#[derive(Parser, Debug)]
#[command(name = "describe-acls")]
#[command(author = "Sentinel Contributors")]
#[command(version)]
#[command(about = "Build, decode and answer describe ACLs requests", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    /// Enable JSON log format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a request from a filter and print its bytes as hex
    Encode {
        #[command(flatten)]
        filter: FilterArgs,

        /// Protocol version
        #[arg(short = 'v', long = "api-version", default_value_t = 3)]
        version: i16,
    },

    /// Decode request bytes and print the filter as JSON
    Decode {
        #[command(flatten)]
        payload: PayloadArgs,

        /// Protocol version
        #[arg(short = 'v', long = "api-version")]
        version: i16,
    },

    /// Answer request bytes against an ACL file and print the response
    Describe {
        #[command(flatten)]
        payload: PayloadArgs,

        /// Protocol version
        #[arg(short = 'v', long = "api-version")]
        version: i16,

        /// Configuration file path (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// ACL bindings file (JSON), overrides the configured one
        #[arg(long)]
        acls: Option<PathBuf>,

        /// Throttle time to report
        #[arg(long)]
        throttle_ms: Option<i32>,
    },
}

#[derive(Args, Debug)]
struct FilterArgs {
    #[arg(long, value_parser = parse_resource_type, default_value = "any")]
    resource_type: ResourceType,

    /// Resource name; omit to match every name
    #[arg(long)]
    resource_name: Option<String>,

    #[arg(long, value_parser = parse_pattern_type, default_value = "any")]
    pattern_type: PatternType,

    /// Principal such as User:alice; omit to match every principal
    #[arg(long)]
    principal: Option<String>,

    /// Host; omit to match every host
    #[arg(long)]
    host: Option<String>,

    #[arg(long, value_parser = parse_operation, default_value = "any")]
    operation: AclOperation,

    #[arg(long, value_parser = parse_permission_type, default_value = "any")]
    permission_type: AclPermissionType,
}

impl FilterArgs {
    fn into_filter(self) -> AclBindingFilter {
        AclBindingFilter::new(
            ResourcePatternFilter::new(self.resource_type, self.resource_name, self.pattern_type),
            AccessControlEntryFilter::new(self.principal, self.host, self.operation, self.permission_type),
        )
    }
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct PayloadArgs {
    /// Payload as hex
    #[arg(long)]
    hex: Option<String>,

    /// Payload as base64
    #[arg(long)]
    base64: Option<String>,
}

impl PayloadArgs {
    fn bytes(&self) -> Result<Vec<u8>> {
        match (&self.hex, &self.base64) {
            (Some(h), _) => hex::decode(h.trim()).context("Invalid hex payload"),
            (None, Some(b)) => BASE64.decode(b.trim()).context("Invalid base64 payload"),
            (None, None) => bail!("a payload is required"),
        }
    }
}

fn parse_enum<T: serde::de::DeserializeOwned>(s: &str) -> Result<T, String> {
    let name = s.trim().to_ascii_lowercase().replace('-', "_");
    serde_json::from_value(serde_json::Value::String(name)).map_err(|_| format!("unknown value '{}'", s))
}

fn parse_resource_type(s: &str) -> Result<ResourceType, String> {
    parse_enum(s)
}

fn parse_pattern_type(s: &str) -> Result<PatternType, String> {
    parse_enum(s)
}

fn parse_operation(s: &str) -> Result<AclOperation, String> {
    parse_enum(s)
}

fn parse_permission_type(s: &str) -> Result<AclPermissionType, String> {
    parse_enum(s)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    if cli.json_logs {
        fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    }

    info!(version = env!("CARGO_PKG_VERSION"), "Starting describe-acls");

    match cli.command {
        Command::Encode { filter, version } => {
            let request = DescribeAclsRequest::build(&filter.into_filter(), version)?;
            let bytes = request.to_bytes(&WireCodec)?;
            println!("{}", hex::encode(bytes));
        }

        Command::Decode { payload, version } => {
            let request = DescribeAclsRequest::parse(&payload.bytes()?, version)?;
            match request.filter() {
                Ok(filter) => println!("{}", serde_json::to_string_pretty(&filter)?),
                Err(e) => {
                    warn!(error = %e, "Request does not resolve to a filter");
                    let response = request.error_response(0, &e);
                    println!("{}", serde_json::to_string_pretty(&response)?);
                }
            }
        }

        Command::Describe {
            payload,
            version,
            config,
            acls,
            throttle_ms,
        } => {
            let mut config = match &config {
                Some(path) => {
                    info!(path = %path.display(), "Loading configuration from file");
                    let content = std::fs::read_to_string(path)?;
                    serde_json::from_str(&content)?
                }
                None => DescribeAclsConfig::default(),
            };
            if acls.is_some() {
                config.security.acls_file = acls;
            }

            let handler = DescribeAclsHandler::with_config(config)?;
            let response = handler.handle(version, &payload.bytes()?, throttle_ms);
            println!("{}", serde_json::to_string_pretty(&response)?);

            match WireCodec.encode_response(&response, version) {
                Ok(bytes) => println!("{}", hex::encode(bytes)),
                Err(e) => warn!(version, error = %e, "Response cannot be encoded at this version"),
            }
        }
    }

    Ok(())
}
