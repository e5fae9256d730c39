//! # Device Model
//!
//! One discovered fleet appliance: an immutable snapshot of a single
//! service advertisement. Devices are created during a discovery pass,
//! never mutated, and discarded when the run ends.

use std::cmp::Ordering;
use std::fmt;
use std::net::IpAddr;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Device {
    pub hostname: String,
    pub address: IpAddr,
    pub port: u16,
}

impl Device {
    pub fn new(hostname: impl Into<String>, address: IpAddr, port: u16) -> Self {
        Self {
            hostname: hostname.into(),
            address,
            port,
        }
    }

    /// The trailing decimal digits of the hostname, used for range-based
    /// selection (`"bioreactor-07"` → `7`).
    ///
    /// `None` when the hostname has no trailing digits, or when they do
    /// not fit a `u32`; such devices are only addressable without a
    /// range filter.
    pub fn ordinal(&self) -> Option<u32> {
        let stem: &str = self.hostname.trim_end_matches(|c: char| c.is_ascii_digit());
        let digits: &str = &self.hostname[stem.len()..];
        if digits.is_empty() {
            return None;
        }
        digits.parse().ok()
    }
}

/// Total order by hostname. Every consumer sorts through this, so one
/// discovery pass always yields the same iteration order regardless of
/// advertisement arrival order.
impl Ord for Device {
    fn cmp(&self, other: &Self) -> Ordering {
        self.hostname.cmp(&other.hostname)
    }
}

impl PartialOrd for Device {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.hostname, self.address)
    }
}
