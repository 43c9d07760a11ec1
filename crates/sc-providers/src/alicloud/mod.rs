//! Alibaba Cloud adapter (§4.7), grounded on `alicloud.py`. The source
//! authenticates through the proprietary `aliyun-python-sdk-*` family with
//! AK/SK request signing; that signing scheme is the SDK machinery §1 puts
//! out of scope, so this adapter keeps the source's manual region
//! coordinate table and CPU-architecture normalization but drops the live
//! `DescribeInstanceTypes`/`DescribePrice` calls, matching the
//! Azure/GCP fidelity bar for adapters with no reachable unauthenticated
//! endpoint (§9).

use async_trait::async_trait;

use sc_core::adapter::Adapter;
use sc_core::vendor::VendorContext;
use sc_core::Result;
use sc_schema::entities::{Ipv4Price, Region, Server, ServerPrice, Storage, StoragePrice, TrafficPrice, VendorComplianceLink, Zone};
use sc_schema::enums::CpuArchitecture;

use crate::common::{dummy_zones, meta_now};

const VENDOR_ID: &str = "alicloud";

#[derive(Default)]
pub struct AlicloudAdapter;

impl AlicloudAdapter {
    pub fn new() -> Self {
        Self
    }
}

/// `(region_id, city, country_id, lat, lon)`, a subset of the source's
/// `aliyun_region_coords` table limited to regions outside mainland China
/// (§9 "Some adapters ... treat empty-list/partial returns as valid").
const REGIONS: &[(&str, &str, &str, f64, f64)] = &[
    ("ap-northeast-1", "Tokyo", "JP", 35.6895, 139.6917),
    ("ap-southeast-1", "Singapore", "SG", 1.3521, 103.8198),
    ("us-east-1", "Virginia", "US", 38.0293, -78.4767),
    ("eu-central-1", "Frankfurt", "DE", 50.1109, 8.6821),
    ("me-east-1", "Dubai", "AE", 25.2048, 55.2708),
];

/// Normalizes the source's `_normalize_cpu_architecture` (X86 → X86_64, ARM
/// → ARM64); Alibaba's `DescribeInstanceTypes` reports bare families.
fn cpu_architecture(raw: &str) -> CpuArchitecture {
    match raw.to_uppercase().as_str() {
        "ARM" => CpuArchitecture::Arm64,
        _ => CpuArchitecture::X86_64,
    }
}

#[async_trait]
impl Adapter for AlicloudAdapter {
    fn vendor_id(&self) -> &str {
        VENDOR_ID
    }

    async fn inventory_compliance_frameworks(&self, _ctx: &VendorContext) -> Result<Vec<VendorComplianceLink>> {
        // Source lists a long CSA/ISO/SOC catalog; trimmed to the ids this
        // core's compliance-framework registry actually seeds (§4.8 H).
        Ok(["iso27001", "soc2"]
            .into_iter()
            .map(|id| VendorComplianceLink { vendor_id: VENDOR_ID.to_string(), compliance_framework_id: id.to_string(), comment: None, meta: meta_now() })
            .collect())
    }

    async fn inventory_regions(&self, _ctx: &VendorContext) -> Result<Vec<Region>> {
        Ok(REGIONS
            .iter()
            .map(|(id, city, country, lat, lon)| Region {
                vendor_id: VENDOR_ID.to_string(),
                region_id: (*id).to_string(),
                name: (*id).to_string(),
                api_reference: (*id).to_string(),
                display_name: format!("{city} ({country})"),
                aliases: vec![],
                country_id: (*country).to_string(),
                state: None,
                city: Some((*city).to_string()),
                address_line: None,
                zip_code: None,
                lon: Some(*lon),
                lat: Some(*lat),
                founding_year: None,
                green_energy: None,
                meta: meta_now(),
            })
            .collect())
    }

    async fn inventory_zones(&self, _ctx: &VendorContext, regions: &[Region]) -> Result<Vec<Zone>> {
        Ok(dummy_zones(regions))
    }

    /// `DescribeInstanceTypes` needs a signed AK/SK request; left empty
    /// rather than invented (§9).
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

    #[test]
    fn arm_prefix_maps_to_arm64() {
        assert!(matches!(cpu_architecture("ARM"), CpuArchitecture::Arm64));
    }

    #[test]
    fn unknown_prefix_defaults_to_x86_64() {
        assert!(matches!(cpu_architecture("X86"), CpuArchitecture::X86_64));
    }

    #[tokio::test]
    async fn regions_avoid_mainland_china() {
        let adapter = AlicloudAdapter::new();
        let ctx = VendorContext::new(VENDOR_ID, sc_core::progress::ProgressTracker::new(), sc_core::cache::DiskCache::disabled());
        let regions = adapter.inventory_regions(&ctx).await.unwrap();
        assert!(regions.iter().all(|r| r.country_id != "CN"));
    }
}
