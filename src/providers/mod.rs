//! DNS provider abstraction and the Route53 implementation.

mod route53;


pub use route53::Route53Provider;

use crate::config::RecordType;
use crate::error::Result;
use async_trait::async_trait;
use std::fmt;

/// Identifies one record set in a zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordKey {
    pub zone_id: String,
    /// Root-anchored name, matched exactly.
    pub fqdn: String,
    pub record_type: RecordType,
}

/// A single-value record set to upsert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordChange {
    pub key: RecordKey,
    pub value: String,
    pub ttl: u32,
}

/// Provider-assigned identifier of a submitted change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeId(pub String);

impl fmt::Display for ChangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of [`upsert`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Submitted(ChangeId),
    /// Dry run: nothing was sent.
    DryRun,
}

/// Trait for DNS providers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DdnsProvider: Send + Sync {
    /// Get the provider name.
    fn name(&self) -> &'static str;

    /// First value of the record set matching `key` exactly.
    ///
    /// `Ok(None)` means the record does not exist. A failed lookup is an
    /// error, never `Ok(None)`.
    async fn read_record(&self, key: &RecordKey) -> Result<Option<String>>;

    /// Replace the record set for `change.key` with a single value.
    async fn upsert_record(&self, change: &RecordChange) -> Result<ChangeId>;
}

/// Write `change` through `provider`, or only log it when `dry_run` is set.
pub async fn upsert(
    provider: &dyn DdnsProvider,
    change: &RecordChange,
    dry_run: bool,
) -> Result<WriteOutcome> {
    if dry_run {
        tracing::info!(
            "DRY RUN: Would update {} record {} to {} (TTL: {})",
            change.key.record_type,
            change.key.fqdn,
            change.value,
            change.ttl
        );
        return Ok(WriteOutcome::DryRun);
    }

    let change_id = provider.upsert_record(change).await?;
    tracing::info!(
        change_id = %change_id,
        "Updated {} record {} to {} via {}",
        change.key.record_type,
        change.key.fqdn,
        change.value,
        provider.name()
    );
    Ok(WriteOutcome::Submitted(change_id))
}
