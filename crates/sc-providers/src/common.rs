//! Helpers shared across adapters (§4.7): dummy-zone synthesis for
//! providers with no availability-zone concept, required-env-var reading,
//! and a couple of unit conversions every vendor needs at least once.

use chrono::Utc;
use sc_core::error::{AdapterError, ConfigError};
use sc_core::Result;
use sc_schema::entities::{Region, Zone};
use sc_schema::status::MetaColumns;

/// Reads a required environment variable, turning a missing one into the
/// same `ConfigError::MissingEnvVar` the vendor runtime treats as fatal at
/// startup (§4.4, §7).
pub fn required_env(name: &str) -> Result<String> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()).into())
}

/// Wraps a `reqwest::Error` with the vendor id that was fetching when it
/// failed, so the stage-fatal log line (§7) can name the offending vendor.
pub fn http_error(vendor_id: &str, source: reqwest::Error) -> sc_core::error::CrateError {
    AdapterError::Http { vendor_id: vendor_id.to_string(), source }.into()
}

pub fn adapter_error(vendor_id: &str, message: impl Into<String>) -> sc_core::error::CrateError {
    AdapterError::Other { vendor_id: vendor_id.to_string(), message: message.into() }.into()
}

/// Synthesizes a 1:1 dummy `Zone` per `Region`, reusing the region's id and
/// name, for providers without an availability-zone concept (Hetzner, OVH
/// single-AZ regions, UpCloud) — §4.7.
pub fn dummy_zones(regions: &[Region]) -> Vec<Zone> {
    regions
        .iter()
        .map(|region| Zone {
            vendor_id: region.vendor_id.clone(),
            region_id: region.region_id.clone(),
            zone_id: region.region_id.clone(),
            name: region.name.clone(),
            api_reference: region.region_id.clone(),
            display_name: region.display_name.clone(),
            meta: MetaColumns { status: region.meta.status, observed_at: region.meta.observed_at },
        })
        .collect()
}

/// `GiB -> MiB`, used by adapters whose provider reports memory in GiB
/// (§4.7 "convert units to the canonical ones").
pub fn gib_to_mib(gib: f64) -> i64 {
    (gib * 1024.0).round() as i64
}

/// `Hz -> GHz`, used by the inspector and by adapters that read a clock
/// speed straight from a provider catalog in Hz.
pub fn hz_to_ghz(hz: f64) -> f64 {
    hz / 1_000_000_000.0
}

pub fn meta_now() -> MetaColumns {
    MetaColumns { status: sc_schema::Status::Active, observed_at: Utc::now() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gib_to_mib_converts() {
        assert_eq!(gib_to_mib(1.0), 1024);
    }

    #[test]
    fn dummy_zones_mirrors_region_identity() {
        let region = Region {
            vendor_id: "hcloud".into(),
            region_id: "fsn1".into(),
            name: "fsn1".into(),
            api_reference: "fsn1".into(),
            display_name: "Falkenstein".into(),
            aliases: vec![],
            country_id: "DE".into(),
            state: None,
            city: None,
            address_line: None,
            zip_code: None,
            lon: None,
            lat: None,
            founding_year: None,
            green_energy: Some(true),
            meta: meta_now(),
        };
        let zones = dummy_zones(&[region]);
        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].zone_id, "fsn1");
        assert_eq!(zones[0].region_id, "fsn1");
    }
}
