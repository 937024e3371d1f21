//! # r53-ddns
//!
//! Keeps AWS Route53 A/AAAA records pointed at the host's current public IP.
//!
//! ## Features
//!
//! - IPv4 (A) and IPv6 (AAAA) records, processed in the order requested
//! - Writes only when the published value differs from the fetched one
//! - Dry-run mode that logs the intended change without calling Route53
//! - Explicit credentials or the standard AWS credential chain
//!
//! ## Usage
//!
//! ```bash
//! # Update the A record once (e.g. from cron)
//! r53-ddns --zone-id Z123EXAMPLE --fqdn home.example.com.
//!
//! # Both families, without touching the zone
//! r53-ddns -z Z123EXAMPLE -d home.example.com. -t A,AAAA --dry-run
//! ```

pub mod address;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod providers;
pub mod reconcile;

pub use config::{Config, RawConfig, RecordType};
pub use error::{DdnsError, Result};
pub use fetcher::IpFetcher;
pub use reconcile::{ReconcileReport, Reconciler, RecordTypeResult};
