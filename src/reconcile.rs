//! Per-record-type reconciliation.
//!
//! Each requested record type runs FETCH → VALIDATE → READ → COMPARE and then
//! either skips or writes. Types are processed one after another; a failure in
//! one is recorded in its result and does not stop the rest.

use crate::address;
use crate::config::{Config, RecordType};
use crate::error::{DdnsError, Result};
use crate::fetcher::IpFetcher;
use crate::providers::{self, ChangeId, DdnsProvider, RecordChange, RecordKey, WriteOutcome};
use chrono::{DateTime, Utc};
use tracing::Instrument;

/// Outcome of reconciling one record type.
#[derive(Debug)]
pub struct RecordTypeResult {
    pub record_type: RecordType,
    /// Value found in the zone, if any.
    pub previous_value: Option<String>,
    /// Validated public address. `None` if fetch or validation failed.
    pub new_value: Option<String>,
    /// A write was performed (or simulated, in dry-run mode).
    pub changed: bool,
    /// Set only for live writes.
    pub change_id: Option<ChangeId>,
    pub error: Option<DdnsError>,
    pub checked_at: DateTime<Utc>,
}

impl RecordTypeResult {
    fn new(record_type: RecordType) -> Self {
        Self {
            record_type,
            previous_value: None,
            new_value: None,
            changed: false,
            change_id: None,
            error: None,
            checked_at: Utc::now(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Results for every requested record type, in processing order.
#[derive(Debug, Default)]
pub struct ReconcileReport {
    pub results: Vec<RecordTypeResult>,
}

impl ReconcileReport {
    /// True when every record type reconciled, including no-op runs.
    pub fn success(&self) -> bool {
        self.results.iter().all(RecordTypeResult::is_success)
    }

    pub fn changed(&self) -> usize {
        self.results.iter().filter(|r| r.changed).count()
    }

    pub fn failed(&self) -> usize {
        self.results.iter().filter(|r| !r.is_success()).count()
    }
}

/// Drives the fetch/compare/write cycle against a provider.
pub struct Reconciler<'a> {
    config: &'a Config,
    fetcher: &'a IpFetcher,
    provider: &'a dyn DdnsProvider,
}

impl<'a> Reconciler<'a> {
    pub fn new(config: &'a Config, fetcher: &'a IpFetcher, provider: &'a dyn DdnsProvider) -> Self {
        Self {
            config,
            fetcher,
            provider,
        }
    }

    /// Reconcile every configured record type sequentially.
    pub async fn run(&self) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        for &record_type in &self.config.record_types {
            let span = tracing::info_span!(
                "reconcile",
                record_type = %record_type,
                fqdn = %self.config.fqdn
            );
            let result = self.reconcile(record_type).instrument(span).await;
            report.results.push(result);
        }

        report
    }

    /// Reconcile a single record type. Errors are captured in the result.
    pub async fn reconcile(&self, record_type: RecordType) -> RecordTypeResult {
        let mut result = RecordTypeResult::new(record_type);
        tracing::info!("Processing {} record for {}", record_type, self.config.fqdn);

        if let Err(e) = self.drive(&mut result).await {
            tracing::error!(stage = e.stage(), "{} reconciliation failed: {}", record_type, e);
            result.error = Some(e);
        }

        result
    }

    async fn drive(&self, result: &mut RecordTypeResult) -> Result<()> {
        let record_type = result.record_type;
        let family = record_type.family();

        let candidate = self
            .fetcher
            .fetch(self.config.query_url(record_type), self.config.timeout)
            .await?;

        if let Err(reason) = address::check(&candidate, family) {
            return Err(DdnsError::Validation {
                candidate,
                reason: reason.to_string(),
            });
        }
        result.new_value = Some(candidate.clone());

        let key = RecordKey {
            zone_id: self.config.zone_id.clone(),
            fqdn: self.config.fqdn.clone(),
            record_type,
        };
        let existing = self.provider.read_record(&key).await?;
        result.previous_value = existing.clone();

        if existing.as_deref() == Some(candidate.as_str()) {
            tracing::info!(
                "NO UPDATE NEEDED: {} record already set to {}",
                record_type,
                candidate
            );
            return Ok(());
        }

        tracing::info!(
            "UPDATE NEEDED: {} record changing from {} to {}",
            record_type,
            existing.as_deref().unwrap_or("<none>"),
            candidate
        );

        let change = RecordChange {
            key,
            value: candidate,
            ttl: self.config.ttl,
        };
        match providers::upsert(self.provider, &change, self.config.dry_run).await? {
            WriteOutcome::Submitted(change_id) => result.change_id = Some(change_id),
            WriteOutcome::DryRun => {}
        }
        result.changed = true;

        Ok(())
    }
}
