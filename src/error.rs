//! Error types for r53-ddns.

use thiserror::Error;

/// Result type alias for r53-ddns.
pub type Result<T> = std::result::Result<T, DdnsError>;

/// DDNS error types.
#[derive(Error, Debug)]
pub enum DdnsError {
    /// Invalid configuration (FQDN, record types, zone id, timeout).
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP or Route53 client could not be built.
    #[error("Client construction failed: {0}")]
    ClientConstruction(String),

    /// Public IP could not be fetched.
    #[error("Failed to fetch IP from {url}: {message}")]
    Fetch { url: String, message: String },

    /// Fetched value is not an address of the expected family.
    #[error("Invalid address {candidate:?}: {reason}")]
    Validation { candidate: String, reason: String },

    /// Provider lookup failed. Distinct from a missing record.
    #[error("Provider read failed: {0}")]
    ProviderRead(String),

    /// Provider rejected the change.
    #[error("Provider write failed: {0}")]
    ProviderWrite(String),
}

impl DdnsError {
    /// Pipeline stage the error belongs to, used as a log field.
    pub fn stage(&self) -> &'static str {
        match self {
            DdnsError::Config(_) => "config",
            DdnsError::ClientConstruction(_) => "client",
            DdnsError::Fetch { .. } => "fetch",
            DdnsError::Validation { .. } => "validate",
            DdnsError::ProviderRead(_) => "read",
            DdnsError::ProviderWrite(_) => "write",
        }
    }
}
