//! r53-ddns - Dynamic DNS updater for AWS Route53.

use clap::Parser;
use r53_ddns::config::{
    self, AwsSettings, RawConfig, DEFAULT_IPV4_QUERY_URL, DEFAULT_IPV6_QUERY_URL, DEFAULT_REGION,
};
use r53_ddns::fetcher::IpFetcher;
use r53_ddns::providers::Route53Provider;
use r53_ddns::reconcile::{ReconcileReport, Reconciler};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "r53-ddns")]
#[command(about = "Update AWS Route53 DNS records with the current public IP address")]
#[command(version)]
struct Cli {
    /// URL to query for the IPv4 address
    #[arg(short = '4', long, env = "IPV4_QUERY_URL", default_value = DEFAULT_IPV4_QUERY_URL)]
    ipv4_query_url: String,

    /// URL to query for the IPv6 address
    #[arg(short = '6', long, env = "IPV6_QUERY_URL", default_value = DEFAULT_IPV6_QUERY_URL)]
    ipv6_query_url: String,

    /// Route53 hosted zone ID
    #[arg(short, long, env = "ZONE_ID")]
    zone_id: String,

    /// Fully qualified domain name to update, ending with "." (e.g. "example.com.")
    #[arg(short = 'd', long, env = "FQDN")]
    fqdn: String,

    /// AWS access key ID (optional with an IAM role or AWS config)
    #[arg(short = 'a', long, env = "AWS_ACCESS_KEY_ID")]
    aws_access_key_id: Option<String>,

    /// AWS secret access key (optional with an IAM role or AWS config)
    #[arg(short = 's', long, env = "AWS_SECRET_ACCESS_KEY", hide_env_values = true)]
    aws_secret_access_key: Option<String>,

    /// AWS session token for temporary credentials
    #[arg(long, env = "AWS_SESSION_TOKEN", hide_env_values = true)]
    aws_session_token: Option<String>,

    /// AWS region
    #[arg(short = 'r', long, env = "AWS_REGION", default_value = DEFAULT_REGION)]
    aws_region: String,

    /// Route53 endpoint override (e.g. LocalStack)
    #[arg(long, env = "AWS_ENDPOINT_URL")]
    aws_endpoint_url: Option<String>,

    /// Record types to update: "A", "AAAA", or "A,AAAA"
    #[arg(short = 't', long, env = "RECORD_TYPES", default_value = "A")]
    record_types: String,

    /// DNS record TTL in seconds
    #[arg(long, env = "TTL", default_value_t = config::DEFAULT_TTL)]
    ttl: u32,

    /// Timeout in seconds for each outbound request
    #[arg(long, env = "TIMEOUT", default_value_t = config::DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Show what would be updated without making changes
    #[arg(long, env = "DRY_RUN")]
    dry_run: bool,

    /// Enable verbose debug logging
    #[arg(short, long, env = "VERBOSE")]
    verbose: bool,
}

impl Cli {
    fn into_raw_config(self) -> RawConfig {
        RawConfig {
            ipv4_query_url: self.ipv4_query_url,
            ipv6_query_url: self.ipv6_query_url,
            zone_id: self.zone_id,
            fqdn: self.fqdn,
            aws: AwsSettings {
                access_key_id: self.aws_access_key_id,
                secret_access_key: self.aws_secret_access_key,
                session_token: self.aws_session_token,
                region: self.aws_region,
                endpoint_url: self.aws_endpoint_url,
            },
            record_types: self.record_types,
            ttl: self.ttl,
            timeout_secs: self.timeout,
            dry_run: self.dry_run,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_directives = if verbose {
        "debug,hyper=info,h2=info,rustls=info"
    } else {
        "info"
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(report) if report.success() => {
            tracing::info!("DDNS update completed successfully");
            ExitCode::SUCCESS
        }
        Ok(report) => {
            tracing::error!(
                failed = report.failed(),
                "DDNS update completed with errors"
            );
            ExitCode::FAILURE
        }
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ReconcileReport> {
    let config = cli.into_raw_config().resolve()?;

    let record_types: Vec<_> = config.record_types.iter().map(|t| t.as_str()).collect();
    tracing::info!(
        dry_run = config.dry_run,
        "Starting DDNS update for {} (record types: {})",
        config.fqdn,
        record_types.join(", ")
    );

    let fetcher = IpFetcher::new()?;
    let provider = Route53Provider::new(&config.aws, config.timeout).await?;

    let report = Reconciler::new(&config, &fetcher, &provider).run().await;
    log_summary(&report);

    Ok(report)
}

fn log_summary(report: &ReconcileReport) {
    for result in &report.results {
        let previous = result.previous_value.as_deref().unwrap_or("<none>");
        let new = result.new_value.as_deref().unwrap_or("<unknown>");

        match &result.error {
            None => tracing::info!(
                record_type = %result.record_type,
                changed = result.changed,
                change_id = result.change_id.as_ref().map(|id| id.0.as_str()).unwrap_or("-"),
                checked_at = %result.checked_at.to_rfc3339(),
                "{}: {} -> {}",
                result.record_type,
                previous,
                new
            ),
            Some(e) => tracing::warn!(
                record_type = %result.record_type,
                stage = e.stage(),
                checked_at = %result.checked_at.to_rfc3339(),
                "{}: failed ({})",
                result.record_type,
                e
            ),
        }
    }
}
