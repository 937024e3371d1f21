//! AWS Route53 DDNS provider.
//!
//! Requires IAM permissions `route53:ListResourceRecordSets` and
//! `route53:ChangeResourceRecordSets` on the hosted zone.

use super::{ChangeId, DdnsProvider, RecordChange, RecordKey};
use crate::config::{AwsSettings, RecordType};
use crate::error::{DdnsError, Result};
use async_trait::async_trait;
use aws_config::retry::RetryConfig;
use aws_config::timeout::TimeoutConfig;
use aws_config::BehaviorVersion;
use aws_sdk_route53::config::{Credentials, Region};
use aws_sdk_route53::error::DisplayErrorContext;
use aws_sdk_route53::types::{
    Change, ChangeAction, ChangeBatch, ResourceRecord, ResourceRecordSet, RrType,
};
use aws_sdk_route53::Client;
use std::time::Duration;

const CREDENTIALS_SOURCE: &str = "r53-ddns";

/// Route53 provider backed by the AWS SDK.
pub struct Route53Provider {
    client: Client,
}

impl Route53Provider {
    /// Build a client from `settings`.
    ///
    /// Explicit credentials are used only when both key and secret are given,
    /// together with the session token if one is set. Otherwise the default
    /// chain (environment, profile, IMDS) applies.
    /// Retries are disabled and every operation is bounded by `timeout`.
    pub async fn new(settings: &AwsSettings, timeout: Duration) -> Result<Self> {
        if settings.region.trim().is_empty() {
            return Err(DdnsError::ClientConstruction(
                "AWS region must not be empty".to_string(),
            ));
        }

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(settings.region.clone()))
            .retry_config(RetryConfig::disabled())
            .timeout_config(TimeoutConfig::builder().operation_timeout(timeout).build());

        match (&settings.access_key_id, &settings.secret_access_key) {
            (Some(key), Some(secret)) => {
                tracing::debug!("Using explicit AWS credentials");
                let creds = Credentials::new(
                    key,
                    secret,
                    settings.session_token.clone(),
                    None,
                    CREDENTIALS_SOURCE,
                );
                loader = loader.credentials_provider(creds);
            }
            (None, None) => {
                tracing::debug!("Using AWS credential chain (IAM role, env vars, or config file)");
            }
            _ => {
                tracing::warn!(
                    "Only one of AWS access key ID / secret access key given, using AWS credential chain"
                );
            }
        }

        if let Some(endpoint_url) = &settings.endpoint_url {
            tracing::debug!("Using Route53 endpoint {}", endpoint_url);
            loader = loader.endpoint_url(endpoint_url);
        }

        let config = loader.load().await;

        Ok(Self {
            client: Client::new(&config),
        })
    }
}

fn rr_type(record_type: RecordType) -> RrType {
    match record_type {
        RecordType::A => RrType::A,
        RecordType::Aaaa => RrType::Aaaa,
    }
}

fn build_change_batch(change: &RecordChange) -> Result<ChangeBatch> {
    let build_err = |e: aws_sdk_route53::error::BuildError| {
        DdnsError::ProviderWrite(format!("Malformed change batch: {}", e))
    };

    let record = ResourceRecord::builder()
        .value(&change.value)
        .build()
        .map_err(build_err)?;

    let record_set = ResourceRecordSet::builder()
        .name(&change.key.fqdn)
        .r#type(rr_type(change.key.record_type))
        .ttl(i64::from(change.ttl))
        .resource_records(record)
        .build()
        .map_err(build_err)?;

    let upsert = Change::builder()
        .action(ChangeAction::Upsert)
        .resource_record_set(record_set)
        .build()
        .map_err(build_err)?;

    ChangeBatch::builder()
        .changes(upsert)
        .build()
        .map_err(build_err)
}

#[async_trait]
impl DdnsProvider for Route53Provider {
    fn name(&self) -> &'static str {
        "route53"
    }

    async fn read_record(&self, key: &RecordKey) -> Result<Option<String>> {
        let wanted = rr_type(key.record_type);

        let output = self
            .client
            .list_resource_record_sets()
            .hosted_zone_id(&key.zone_id)
            .start_record_name(&key.fqdn)
            .start_record_type(wanted.clone())
            .max_items(1)
            .send()
            .await
            .map_err(|e| {
                DdnsError::ProviderRead(format!(
                    "listing {} records for {}: {}",
                    key.record_type,
                    key.fqdn,
                    DisplayErrorContext(&e)
                ))
            })?;

        // The listing starts at (name, type) but may return the next set in
        // lexical order, so both must match exactly.
        let value = output
            .resource_record_sets()
            .iter()
            .filter(|set| set.name() == key.fqdn && *set.r#type() == wanted)
            .find_map(|set| set.resource_records().first())
            .map(|record| record.value().to_string());

        if value.is_none() {
            tracing::info!("No existing {} record found for {}", key.record_type, key.fqdn);
        }

        Ok(value)
    }

    async fn upsert_record(&self, change: &RecordChange) -> Result<ChangeId> {
        let batch = build_change_batch(change)?;

        let output = self
            .client
            .change_resource_record_sets()
            .hosted_zone_id(&change.key.zone_id)
            .change_batch(batch)
            .send()
            .await
            .map_err(|e| {
                DdnsError::ProviderWrite(format!(
                    "upserting {} record {}: {}",
                    change.key.record_type,
                    change.key.fqdn,
                    DisplayErrorContext(&e)
                ))
            })?;

        output
            .change_info()
            .map(|info| ChangeId(info.id().to_string()))
            .ok_or_else(|| DdnsError::ProviderWrite("Response carried no change info".to_string()))
    }
}
