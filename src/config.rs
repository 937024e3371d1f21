//! Configuration for r53-ddns.
//!
//! Values arrive as a [`RawConfig`] (flags or environment, see `main.rs`) and
//! are checked once by [`RawConfig::resolve`] before any network call.

use crate::address::AddressFamily;
use crate::error::{DdnsError, Result};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Default IPv4 echo service.
pub const DEFAULT_IPV4_QUERY_URL: &str = "https://api.ipify.org";

/// Default IPv6-capable echo service.
pub const DEFAULT_IPV6_QUERY_URL: &str = "https://api64.ipify.org";

/// Default AWS region.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Default record TTL in seconds.
pub const DEFAULT_TTL: u32 = 300;

/// Default per-call timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

const MIN_FQDN_LEN: usize = 3;

/// Address record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    A,
    Aaaa,
}

impl RecordType {
    /// Address family the record holds.
    pub fn family(self) -> AddressFamily {
        match self {
            RecordType::A => AddressFamily::V4,
            RecordType::Aaaa => AddressFamily::V6,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = DdnsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(RecordType::A),
            "AAAA" => Ok(RecordType::Aaaa),
            other => Err(DdnsError::Config(format!(
                "Invalid record type: {:?}. Must be A or AAAA",
                other
            ))),
        }
    }
}

/// Parse a comma-separated record type list such as `"a, AAAA"`.
///
/// Order is kept; repeated types are dropped after their first occurrence.
pub fn parse_record_types(input: &str) -> Result<Vec<RecordType>> {
    let mut types = Vec::new();

    for part in input.split(',') {
        let record_type: RecordType = part.parse()?;
        if !types.contains(&record_type) {
            types.push(record_type);
        }
    }

    Ok(types)
}

/// Check that `fqdn` is root-anchored and long enough to name a zone.
pub fn validate_fqdn(fqdn: &str) -> Result<()> {
    if !fqdn.ends_with('.') {
        return Err(DdnsError::Config(format!(
            "FQDN must end with a dot: {:?}",
            fqdn
        )));
    }
    if fqdn.len() < MIN_FQDN_LEN {
        return Err(DdnsError::Config(format!("FQDN too short: {:?}", fqdn)));
    }
    Ok(())
}

/// AWS client settings.
#[derive(Clone, Default)]
pub struct AwsSettings {
    /// Explicit access key. When absent the default credential chain is used.
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    /// Temporary credentials only; ignored without key and secret.
    pub session_token: Option<String>,
    pub region: String,
    /// Endpoint override (LocalStack, tests).
    pub endpoint_url: Option<String>,
}

impl fmt::Debug for AwsSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsSettings")
            .field("access_key_id", &self.access_key_id)
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(|_| "<redacted>"),
            )
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "<redacted>"),
            )
            .field("region", &self.region)
            .field("endpoint_url", &self.endpoint_url)
            .finish()
    }
}

/// Unvalidated settings as collected from the command line and environment.
#[derive(Debug, Clone)]
pub struct RawConfig {
    pub ipv4_query_url: String,
    pub ipv6_query_url: String,
    pub zone_id: String,
    pub fqdn: String,
    pub aws: AwsSettings,
    pub record_types: String,
    pub ttl: u32,
    pub timeout_secs: u64,
    pub dry_run: bool,
}

impl RawConfig {
    /// Validate into a [`Config`]. Any error here is fatal for the run.
    pub fn resolve(self) -> Result<Config> {
        if self.zone_id.trim().is_empty() {
            return Err(DdnsError::Config("Zone ID must not be empty".to_string()));
        }

        validate_fqdn(&self.fqdn)?;
        let record_types = parse_record_types(&self.record_types)?;

        if self.timeout_secs == 0 {
            return Err(DdnsError::Config(
                "Timeout must be at least one second".to_string(),
            ));
        }

        Ok(Config {
            ipv4_query_url: self.ipv4_query_url,
            ipv6_query_url: self.ipv6_query_url,
            zone_id: self.zone_id,
            fqdn: self.fqdn,
            aws: self.aws,
            record_types,
            ttl: self.ttl,
            timeout: Duration::from_secs(self.timeout_secs),
            dry_run: self.dry_run,
        })
    }
}

/// Validated reconciliation request.
#[derive(Debug, Clone)]
pub struct Config {
    pub ipv4_query_url: String,
    pub ipv6_query_url: String,
    pub zone_id: String,
    /// Root-anchored name, e.g. `"home.example.com."`.
    pub fqdn: String,
    pub aws: AwsSettings,
    /// Non-empty, no duplicates, in processing order.
    pub record_types: Vec<RecordType>,
    pub ttl: u32,
    /// Bound on each outbound call.
    pub timeout: Duration,
    pub dry_run: bool,
}

impl Config {
    /// IP echo endpoint for a record type's family.
    pub fn query_url(&self, record_type: RecordType) -> &str {
        match record_type.family() {
            AddressFamily::V4 => &self.ipv4_query_url,
            AddressFamily::V6 => &self.ipv6_query_url,
        }
    }
}
