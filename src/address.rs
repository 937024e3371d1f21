//! Address family validation.

use std::fmt;
use std::net::IpAddr;

/// IP address family of a record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressFamily {
    V4,
    V6,
}

impl AddressFamily {
    fn matches(self, ip: &IpAddr) -> bool {
        match self {
            AddressFamily::V4 => ip.is_ipv4(),
            AddressFamily::V6 => ip.is_ipv6(),
        }
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressFamily::V4 => f.write_str("IPv4"),
            AddressFamily::V6 => f.write_str("IPv6"),
        }
    }
}

/// Why a candidate failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// Not an IP address at all.
    Malformed,
    /// A valid address of the other family.
    WrongFamily {
        expected: AddressFamily,
        actual: AddressFamily,
    },
}

impl fmt::Display for AddressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressError::Malformed => f.write_str("not a valid IP address"),
            AddressError::WrongFamily { expected, actual } => {
                write!(f, "expected {} address, got {}", expected, actual)
            }
        }
    }
}

/// Parse `candidate` and check it belongs to `family`.
///
/// The string is taken as-is: surrounding whitespace makes it malformed.
pub fn check(candidate: &str, family: AddressFamily) -> Result<IpAddr, AddressError> {
    let ip: IpAddr = candidate.parse().map_err(|_| AddressError::Malformed)?;

    if family.matches(&ip) {
        Ok(ip)
    } else {
        let actual = if ip.is_ipv4() {
            AddressFamily::V4
        } else {
            AddressFamily::V6
        };
        Err(AddressError::WrongFamily {
            expected: family,
            actual,
        })
    }
}

/// Returns true if `candidate` is a valid address of `family`.
pub fn validate(candidate: &str, family: AddressFamily) -> bool {
    check(candidate, family).is_ok()
}
