//! Deterministic, content-addressed cache keys.
//!
//! Two requests that differ in any identifying field — source, source
//! version, location, coordinates, period, variable set or unit schema —
//! must never share a file on disk, so the full identity string is hashed
//! rather than truncated into a filename.

use crate::types::location::LatLon;
use crate::types::period::Period;
use sha2::{Digest, Sha256};
use std::fmt;

/// Identity of one cached payload.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheKey {
    identity: String,
}

impl CacheKey {
    pub fn new(
        source_id: &str,
        source_version: &str,
        location_id: &str,
        coordinate: LatLon,
        period: Period,
        variables: &str,
        unit_schema: &str,
    ) -> Self {
        let identity = format!(
            "{source_id}:{source_version}:{location_id}:{lat}:{lon}:{start}:{end}:{variables}:units={unit_schema}",
            lat = coordinate.0,
            lon = coordinate.1,
            start = period.start_date(),
            end = period.end_date(),
        );
        Self { identity }
    }

    /// Hex SHA-256 of the identity string; used as the on-disk file stem.
    pub fn file_stem(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.identity.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(version: &str, lat: f64, start: i32) -> CacheKey {
        CacheKey::new(
            "open_meteo_archive",
            version,
            "fue-south",
            LatLon(lat, -14.23),
            Period::new(start, 2024).unwrap(),
            "temperature_2m_max",
            "celsius",
        )
    }

    #[test]
    fn identical_requests_share_a_key() {
        assert_eq!(key("v1", 28.16, 2015).file_stem(), key("v1", 28.16, 2015).file_stem());
    }

    #[test]
    fn any_differing_field_changes_the_key() {
        let base = key("v1", 28.16, 2015).file_stem();
        assert_ne!(base, key("v2", 28.16, 2015).file_stem());
        assert_ne!(base, key("v1", 28.17, 2015).file_stem());
        assert_ne!(base, key("v1", 28.16, 2016).file_stem());
    }

    #[test]
    fn file_stem_is_hex() {
        let stem = key("v1", 28.16, 2015).file_stem();
        assert_eq!(stem.len(), 64);
        assert!(stem.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
