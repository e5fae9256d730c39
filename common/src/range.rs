//! # Ordinal Range Selector
//!
//! Parses a compact selector like `"1-3,5,7-9"` into the set of device
//! ordinals it names. The selector only ever converts text to a set;
//! "no filter at all" is expressed by the *absence* of a selector, never
//! by an empty set.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::device::Device;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RangeParseError {
    #[error("empty selector between commas in '{0}'")]
    EmptyToken(String),
    #[error("'{0}' is not a device ordinal")]
    NotANumber(String),
    #[error("'{0}' must be a single 'start-end' pair")]
    MalformedPair(String),
    #[error("descending range '{0}': start must not exceed end")]
    Descending(String),
}

/// Parses a comma-separated ordinal selector into a set.
///
/// Each token is either a bare non-negative integer or an inclusive
/// `start-end` pair; duplicates collapse. The empty string parses to the
/// empty set. Malformed tokens are a hard error, not a silent skip.
pub fn parse_range(spec: &str) -> Result<BTreeSet<u32>, RangeParseError> {
    let mut ordinals: BTreeSet<u32> = BTreeSet::new();
    if spec.is_empty() {
        return Ok(ordinals);
    }

    for token in spec.split(',') {
        let token = token.trim();
        if token.is_empty() {
            return Err(RangeParseError::EmptyToken(spec.to_string()));
        }

        match token.split_once('-') {
            None => {
                ordinals.insert(parse_ordinal(token)?);
            }
            Some((start_str, end_str)) => {
                if end_str.contains('-') {
                    return Err(RangeParseError::MalformedPair(token.to_string()));
                }
                let start = parse_ordinal(start_str)?;
                let end = parse_ordinal(end_str)?;
                if start > end {
                    return Err(RangeParseError::Descending(token.to_string()));
                }
                ordinals.extend(start..=end);
            }
        }
    }

    Ok(ordinals)
}

/// Keeps the devices whose hostname ordinal is in `selected`.
///
/// Devices without a parseable ordinal cannot match any selector and are
/// dropped here; an unfiltered selection never reaches this function.
pub fn filter_by_ordinal(devices: Vec<Device>, selected: &BTreeSet<u32>) -> Vec<Device> {
    devices
        .into_iter()
        .filter(|device| device.ordinal().is_some_and(|ordinal| selected.contains(&ordinal)))
        .collect()
}

fn parse_ordinal(s: &str) -> Result<u32, RangeParseError> {
    let s = s.trim();
    s.parse::<u32>()
        .map_err(|_| RangeParseError::NotANumber(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};

    fn set(ordinals: &[u32]) -> BTreeSet<u32> {
        ordinals.iter().copied().collect()
    }

    #[test]
    fn parses_singles_pairs_and_duplicates() {
        assert_eq!(parse_range("1-3,5,7-9").unwrap(), set(&[1, 2, 3, 5, 7, 8, 9]));
        assert_eq!(parse_range("4").unwrap(), set(&[4]));
        assert_eq!(parse_range("2,2,1-2").unwrap(), set(&[1, 2]));
    }

    #[test]
    fn empty_spec_is_empty_set() {
        assert_eq!(parse_range("").unwrap(), BTreeSet::new());
    }

    #[test]
    fn empty_token_is_an_error() {
        assert_eq!(
            parse_range("1,,3"),
            Err(RangeParseError::EmptyToken("1,,3".to_string()))
        );
    }

    #[test]
    fn non_numeric_token_is_an_error() {
        assert!(matches!(parse_range("1,x"), Err(RangeParseError::NotANumber(_))));
        assert!(matches!(parse_range("-5"), Err(RangeParseError::NotANumber(_))));
    }

    #[test]
    fn pair_with_extra_separator_is_an_error() {
        assert_eq!(
            parse_range("1-2-3"),
            Err(RangeParseError::MalformedPair("1-2-3".to_string()))
        );
    }

    #[test]
    fn descending_pair_is_an_error() {
        assert_eq!(
            parse_range("3-1"),
            Err(RangeParseError::Descending("3-1".to_string()))
        );
    }

    #[test]
    fn filter_keeps_selected_ordinals_only() {
        let devices = vec![
            Device::new("alpha1", IpAddr::V4(Ipv4Addr::LOCALHOST), 9000),
            Device::new("beta2", IpAddr::V4(Ipv4Addr::LOCALHOST), 9000),
            Device::new("gamma3", IpAddr::V4(Ipv4Addr::LOCALHOST), 9000),
            Device::new("nameless", IpAddr::V4(Ipv4Addr::LOCALHOST), 9000),
        ];

        let kept = filter_by_ordinal(devices, &set(&[1, 3]));
        let names: Vec<&str> = kept.iter().map(|d| d.hostname.as_str()).collect();
        assert_eq!(names, ["alpha1", "gamma3"]);
    }
}
