//! Hetzner Cloud adapter (§4.7), grounded on the Hetzner Cloud API
//! (`api.hetzner.cloud/v1`). Hetzner has no availability-zone concept, so
//! every datacenter gets a 1:1 dummy zone (`common::dummy_zones`), and no
//! spot market, so `inventory_server_prices_spot` is always empty.

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use sc_core::adapter::Adapter;
use sc_core::vendor::VendorContext;
use sc_core::Result;
use sc_schema::entities::{Ipv4Price, Region, Server, ServerPrice, Storage, StoragePrice, TrafficPrice, VendorComplianceLink, Zone};
use sc_schema::enums::{Allocation, CpuAllocation, CpuArchitecture, StorageType};
use sc_schema::price::{PriceFields, PriceUnit};

use crate::common::{adapter_error, dummy_zones, http_error, meta_now, required_env};

const BASE_URL: &str = "https://api.hetzner.cloud/v1";
const VENDOR_ID: &str = "hcloud";

pub struct HcloudAdapter {
    client: reqwest::Client,
}

impl HcloudAdapter {
    pub fn new() -> Self {
        Self { client: reqwest::Client::new() }
    }

    async fn token(&self) -> Result<String> {
        required_env("HCLOUD_TOKEN")
    }

    async fn get<T: for<'de> Deserialize<'de>>(&self, path: &str) -> Result<T> {
        let token = self.token().await?;
        let response = self
            .client
            .get(format!("{BASE_URL}{path}"))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| http_error(VENDOR_ID, e))?;
        response.error_for_status_ref().map_err(|e| http_error(VENDOR_ID, e))?;
        response.json().await.map_err(|e| http_error(VENDOR_ID, e))
    }
}

impl Default for HcloudAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct DatacentersResponse {
    datacenters: Vec<HcloudDatacenter>,
}

#[derive(Debug, Deserialize)]
struct HcloudDatacenter {
    id: u64,
    name: String,
    location: HcloudLocation,
}

#[derive(Debug, Deserialize)]
struct HcloudLocation {
    name: String,
    city: String,
    country: String,
}

#[derive(Debug, Deserialize)]
struct ServerTypesResponse {
    server_types: Vec<HcloudServerType>,
}

#[derive(Debug, Deserialize)]
struct HcloudServerType {
    id: u64,
    name: String,
    description: String,
    cores: i32,
    memory: f64,
    disk: f64,
    cpu_type: String,
    architecture: String,
    storage_type: String,
    included_traffic: Option<i64>,
    deprecation: Option<serde_json::Value>,
    prices: Vec<HcloudServerPrice>,
}

#[derive(Debug, Deserialize)]
struct HcloudServerPrice {
    location: String,
    price_hourly: HcloudMoney,
}

#[derive(Debug, Deserialize)]
struct HcloudMoney {
    net: String,
}

/// Lon/lat collected manually from the datacenter's city, and the CPU
/// manufacturer/family table from <https://www.hetzner.com/cloud/>; neither
/// is exposed by the API (§4.7 "manual tables").
fn datacenter_coordinates(id: u64) -> Option<(f64, f64)> {
    match id {
        2 => Some((49.4498349, 11.0128772)),   // Nuremberg
        3 => Some((60.3433291, 25.02683)),     // Helsinki
        4 => Some((50.4793313, 12.3331105)),   // Falkenstein
        5 => Some((39.0176685, -77.468102)),   // Ashburn, VA
        6 => Some((45.558319, -122.9306602)),  // Hillsboro, OR
        _ => None,
    }
}

fn server_cpu(server_name: &str) -> Result<(&'static str, Option<&'static str>)> {
    let upper = server_name.to_uppercase();
    if ["CX11", "CX21", "CX31", "CX41", "CX51"].contains(&upper.as_str()) {
        return Ok(("Intel", Some("Xeon Gold")));
    }
    if ["CPX11", "CPX21", "CPX31", "CPX41", "CPX51"].contains(&upper.as_str()) {
        return Ok(("AMD", Some("EPYC 7002")));
    }
    if ["CAX11", "CAX21", "CAX31", "CAX41"].contains(&upper.as_str()) {
        return Ok(("AMD", Some("Ampere Altra")));
    }
    if ["CCX13", "CCX23", "CCX33", "CCX43", "CCX53", "CCX63"].contains(&upper.as_str()) {
        return Ok(("AMD", None));
    }
    Err(adapter_error(VENDOR_ID, format!("unknown Hetzner Cloud server type: {server_name}")))
}

#[async_trait]
impl Adapter for HcloudAdapter {
    fn vendor_id(&self) -> &str {
        VENDOR_ID
    }

    async fn inventory_compliance_frameworks(&self, _ctx: &VendorContext) -> Result<Vec<VendorComplianceLink>> {
        Ok(vec![VendorComplianceLink {
            vendor_id: VENDOR_ID.to_string(),
            compliance_framework_id: "iso27001".to_string(),
            comment: None,
            meta: meta_now(),
        }])
    }

    async fn inventory_regions(&self, _ctx: &VendorContext) -> Result<Vec<Region>> {
        let response: DatacentersResponse = self.get("/datacenters").await?;
        let mut items = Vec::with_capacity(response.datacenters.len());
        for dc in response.datacenters {
            let (lat, lon) = datacenter_coordinates(dc.id)
                .ok_or_else(|| adapter_error(VENDOR_ID, format!("missing coordinates for datacenter {}", dc.id)))?;
            items.push(Region {
                vendor_id: VENDOR_ID.to_string(),
                region_id: dc.name.clone(),
                name: dc.name.clone(),
                api_reference: dc.name.clone(),
                display_name: format!("{} ({})", dc.location.city, dc.location.country),
                aliases: vec![dc.location.name],
                country_id: dc.location.country,
                state: None,
                city: Some(dc.location.city),
                address_line: None,
                zip_code: None,
                lon: Some(lon),
                lat: Some(lat),
                founding_year: None,
                // Every Hetzner datacenter runs on green energy per
                // <https://www.hetzner.com/unternehmen/umweltschutz/>.
                green_energy: Some(true),
                meta: meta_now(),
            });
        }
        Ok(items)
    }

    async fn inventory_zones(&self, _ctx: &VendorContext, regions: &[Region]) -> Result<Vec<Zone>> {
        Ok(dummy_zones(regions))
    }

    async fn inventory_servers(&self, _ctx: &VendorContext) -> Result<Vec<Server>> {
        let response: ServerTypesResponse = self.get("/server_types").await?;
        let mut items = Vec::with_capacity(response.server_types.len());
        for server in response.server_types {
            let (manufacturer, family) = server_cpu(&server.name)?;
            items.push(Server {
                vendor_id: VENDOR_ID.to_string(),
                server_id: server.id.to_string(),
                name: server.name.clone(),
                api_reference: server.name.clone(),
                display_name: server.name.clone(),
                description: Some(server.description),
                family: Some(server.name.trim_end_matches(|c: char| c.is_ascii_digit()).to_string()),
                vcpus: server.cores,
                hypervisor: None,
                cpu_allocation: if server.cpu_type == "shared" { CpuAllocation::Shared } else { CpuAllocation::Dedicated },
                cpu_cores: None,
                cpu_speed: None,
                cpu_architecture: if server.architecture == "arm" { CpuArchitecture::Arm64 } else { CpuArchitecture::X86_64 },
                cpu_manufacturer: Some(manufacturer.to_string()),
                cpu_family: family.map(str::to_string),
                cpu_model: None,
                cpu_l1_cache: None,
                cpu_l2_cache: None,
                cpu_l3_cache: None,
                cpu_flags: vec![],
                cpus: vec![],
                memory_amount: (server.memory * 1024.0).round() as i64,
                memory_generation: None,
                memory_speed: None,
                memory_ecc: None,
                gpu_count: 0.0,
                gpu_memory_min: None,
                gpu_memory_total: None,
                gpu_manufacturer: None,
                gpu_family: None,
                gpu_model: None,
                gpus: vec![],
                storage_size: server.disk,
                storage_type: Some(if server.storage_type == "local" { "SSD" } else { "NETWORK" }.to_string()),
                storages: vec![],
                network_speed: None,
                // https://docs.hetzner.com/cloud/billing/faq/#how-do-you-bill-for-traffic
                inbound_traffic: 0.0,
                outbound_traffic: server.included_traffic.unwrap_or(0) as f64 / 1024f64.powi(3),
                ipv4: 0,
                meta: sc_schema::status::MetaColumns {
                    status: if server.deprecation.is_some() { sc_schema::Status::Inactive } else { sc_schema::Status::Active },
                    observed_at: Utc::now(),
                },
            });
        }
        Ok(items)
    }

    async fn inventory_server_prices(&self, _ctx: &VendorContext, regions: &[Region], zones: &[Zone], _servers: &[Server]) -> Result<Vec<ServerPrice>> {
        let response: ServerTypesResponse = self.get("/server_types").await?;
        let by_name_or_alias = |location: &str| -> Option<String> {
            regions
                .iter()
                .find(|r| r.name == location || r.aliases.iter().any(|a| a == location))
                .map(|r| r.region_id.clone())
        };
        let _ = zones;
        let mut items = Vec::new();
        for server in response.server_types {
            for price in server.prices {
                let Some(region_id) = by_name_or_alias(&price.location) else {
                    return Err(adapter_error(VENDOR_ID, format!("unknown datacenter location `{}`", price.location)));
                };
                items.push(ServerPrice {
                    vendor_id: VENDOR_ID.to_string(),
                    region_id: region_id.clone(),
                    zone_id: region_id,
                    server_id: server.id.to_string(),
                    allocation: Allocation::Ondemand,
                    operating_system: "Linux".to_string(),
                    price: PriceFields {
                        unit: PriceUnit::Hour,
                        price: price.price_hourly.net.parse().unwrap_or(0.0),
                        price_upfront: 0.0,
                        price_tiered: vec![],
                        currency: "EUR".to_string(),
                    },
                    meta: meta_now(),
                });
            }
        }
        Ok(items)
    }

    /// There is no spot market at Hetzner Cloud.
    async fn inventory_server_prices_spot(&self, _ctx: &VendorContext, _regions: &[Region], _zones: &[Zone], _servers: &[Server]) -> Result<Vec<ServerPrice>> {
        Ok(vec![])
    }

    async fn inventory_storages(&self, _ctx: &VendorContext) -> Result<Vec<Storage>> {
        // Not exposed via the API; collected manually from
        // <https://docs.hetzner.cloud/#volumes-create-a-volume>.
        Ok(vec![Storage {
            vendor_id: VENDOR_ID.to_string(),
            storage_id: "block".to_string(),
            name: "Block storage volume".to_string(),
            description: None,
            storage_type: StorageType::Network,
            max_iops: None,
            max_throughput: None,
            min_size: Some(10.0),
            max_size: Some(10240.0),
            meta: meta_now(),
        }])
    }

    async fn inventory_storage_prices(&self, _ctx: &VendorContext, regions: &[Region], _storages: &[Storage]) -> Result<Vec<StoragePrice>> {
        Ok(regions
            .iter()
            .map(|region| StoragePrice {
                vendor_id: VENDOR_ID.to_string(),
                region_id: region.region_id.clone(),
                storage_id: "block".to_string(),
                price: PriceFields { unit: PriceUnit::GbMonth, price: 0.0440, price_upfront: 0.0, price_tiered: vec![], currency: "EUR".to_string() },
                meta: meta_now(),
            })
            .collect())
    }

    async fn inventory_traffic_prices(&self, _ctx: &VendorContext, regions: &[Region]) -> Result<Vec<TrafficPrice>> {
        let mut items = Vec::with_capacity(regions.len() * 2);
        for region in regions {
            items.push(TrafficPrice {
                vendor_id: VENDOR_ID.to_string(),
                region_id: region.region_id.clone(),
                direction: sc_schema::enums::TrafficDirection::In,
                price: PriceFields { unit: PriceUnit::GbMonth, price: 0.0, price_upfront: 0.0, price_tiered: vec![], currency: "EUR".to_string() },
                meta: meta_now(),
            });
            items.push(TrafficPrice {
                vendor_id: VENDOR_ID.to_string(),
                region_id: region.region_id.clone(),
                direction: sc_schema::enums::TrafficDirection::Out,
                price: PriceFields {
                    unit: PriceUnit::GbMonth,
                    price: (1.0 / 1024.0 * 1e8).round() / 1e8,
                    price_upfront: 0.0,
                    price_tiered: vec![],
                    currency: "EUR".to_string(),
                },
                meta: meta_now(),
            });
        }
        Ok(items)
    }

    async fn inventory_ipv4_prices(&self, _ctx: &VendorContext, regions: &[Region]) -> Result<Vec<Ipv4Price>> {
        Ok(regions
            .iter()
            .map(|region| Ipv4Price {
                vendor_id: VENDOR_ID.to_string(),
                region_id: region.region_id.clone(),
                price: PriceFields { unit: PriceUnit::Month, price: 0.50, price_upfront: 0.0, price_tiered: vec![], currency: "EUR".to_string() },
                meta: meta_now(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_intel_shared_vcpu_line() {
        let (manufacturer, family) = server_cpu("cx21").unwrap();
        assert_eq!(manufacturer, "Intel");
        assert_eq!(family, Some("Xeon Gold"));
    }

    #[test]
    fn rejects_unknown_server_type() {
        assert!(server_cpu("zz99").is_err());
    }

    #[test]
    fn known_datacenter_has_coordinates() {
        assert!(datacenter_coordinates(4).is_some());
        assert!(datacenter_coordinates(999).is_none());
    }
}
