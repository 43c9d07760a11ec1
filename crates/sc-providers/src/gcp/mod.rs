//! Google Cloud adapter (§4.7, §9). Mirrors the source's `gcp.py`, which
//! only ever finished `inventory_datacenters`/`inventory_compliance_frameworks`;
//! everything downstream of regions raises `NotImplementedError` there and
//! returns an empty list here (§9).

use async_trait::async_trait;

use sc_core::adapter::Adapter;
use sc_core::vendor::VendorContext;
use sc_core::Result;
use sc_schema::entities::{Ipv4Price, Region, Server, ServerPrice, Storage, StoragePrice, TrafficPrice, VendorComplianceLink, Zone};

use crate::common::meta_now;

const VENDOR_ID: &str = "gcp";

#[derive(Default)]
pub struct GcpAdapter;

impl GcpAdapter {
    pub fn new() -> Self {
        Self
    }
}

/// `(region_id, display_name, country_id, city, lat, lon, founding_year)`,
/// collected manually from <https://cloud.google.com/about/locations>
/// (§4.7); the source's own `inventory_datacenters` does the same from a
/// hardcoded table rather than an authenticated Compute Engine call.
const REGIONS: &[(&str, &str, &str, &str, f64, f64, i32)] = &[
    ("us-central1", "Iowa", "US", "Council Bluffs", 41.2619, -95.8608, 2009),
    ("us-east1", "South Carolina", "US", "Moncks Corner", 33.1960, -79.9624, 2015),
    ("europe-west1", "Belgium", "BE", "St. Ghislain", 50.4730, 3.8180, 2015),
    ("europe-west4", "Netherlands", "NL", "Eemshaven", 53.4386, 6.8355, 2018),
    ("asia-east1", "Taiwan", "TW", "Changhua County", 24.0717, 120.5624, 2013),
    ("asia-northeast1", "Tokyo", "JP", "Tokyo", 35.6762, 139.6503, 2016),
];

#[async_trait]
impl Adapter for GcpAdapter {
    fn vendor_id(&self) -> &str {
        VENDOR_ID
    }

    async fn inventory_compliance_frameworks(&self, _ctx: &VendorContext) -> Result<Vec<VendorComplianceLink>> {
        // Source: <https://cloud.google.com/security/compliance/offerings>.
        Ok(["iso27001", "soc2", "hipaa", "pci_dss"]
            .into_iter()
            .map(|id| VendorComplianceLink { vendor_id: VENDOR_ID.to_string(), compliance_framework_id: id.to_string(), comment: None, meta: meta_now() })
            .collect())
    }

    async fn inventory_regions(&self, _ctx: &VendorContext) -> Result<Vec<Region>> {
        Ok(REGIONS
            .iter()
            .map(|(id, display_name, country, city, lat, lon, founding_year)| Region {
                vendor_id: VENDOR_ID.to_string(),
                region_id: (*id).to_string(),
                name: (*id).to_string(),
                api_reference: (*id).to_string(),
                display_name: (*display_name).to_string(),
                aliases: vec![],
                country_id: (*country).to_string(),
                state: None,
                city: Some((*city).to_string()),
                address_line: None,
                zip_code: None,
                lon: Some(*lon),
                lat: Some(*lat),
                founding_year: Some(*founding_year),
                green_energy: None,
                meta: meta_now(),
            })
            .collect())
    }

    /// Unimplemented in the source beyond regions/compliance (§9).
    async fn inventory_zones(&self, _ctx: &VendorContext, _regions: &[Region]) -> Result<Vec<Zone>> {
        Ok(vec![])
    }

    async fn inventory_servers(&self, _ctx: &VendorContext) -> Result<Vec<Server>> {
        Ok(vec![])
    }

    async fn inventory_server_prices(&self, _ctx: &VendorContext, _regions: &[Region], _zones: &[Zone], _servers: &[Server]) -> Result<Vec<ServerPrice>> {
        Ok(vec![])
    }

    async fn inventory_server_prices_spot(&self, _ctx: &VendorContext, _regions: &[Region], _zones: &[Zone], _servers: &[Server]) -> Result<Vec<ServerPrice>> {
        Ok(vec![])
    }

    async fn inventory_storages(&self, _ctx: &VendorContext) -> Result<Vec<Storage>> {
        Ok(vec![])
    }

    async fn inventory_storage_prices(&self, _ctx: &VendorContext, _regions: &[Region], _storages: &[Storage]) -> Result<Vec<StoragePrice>> {
        Ok(vec![])
    }

    async fn inventory_traffic_prices(&self, _ctx: &VendorContext, _regions: &[Region]) -> Result<Vec<TrafficPrice>> {
        Ok(vec![])
    }

    async fn inventory_ipv4_prices(&self, _ctx: &VendorContext, _regions: &[Region]) -> Result<Vec<Ipv4Price>> {
        Ok(vec![])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sc_core::progress::ProgressTracker;

    #[tokio::test]
    async fn regions_cover_known_continents() {
        let adapter = GcpAdapter::new();
        let ctx = VendorContext::new(VENDOR_ID, ProgressTracker::new(), sc_core::cache::DiskCache::disabled());
        let regions = adapter.inventory_regions(&ctx).await.unwrap();
        assert!(regions.iter().any(|r| r.country_id == "US"));
        assert!(regions.iter().any(|r| r.country_id == "JP"));
    }

    #[tokio::test]
    async fn zones_are_unimplemented_for_now() {
        let adapter = GcpAdapter::new();
        let ctx = VendorContext::new(VENDOR_ID, ProgressTracker::new(), sc_core::cache::DiskCache::disabled());
        assert!(adapter.inventory_zones(&ctx, &[]).await.unwrap().is_empty());
    }
}
