//! AWS adapter (§4.7). Grounded on the AWS Price List bulk API
//! (`pricing.us-east-1.amazonaws.com/offers/...`), which is unauthenticated
//! and needs no SDK — a pragmatic substitute for the source's
//! `boto3`-backed `describe_instance_types`/`get_products` calls (§1,
//! provider SDKs are out of scope beyond what an adapter genuinely needs).
//! Region/AZ geography and the EC2 instance-family glossary aren't in that
//! feed, so both are manual tables as the source's own `_instance_families`
//! map already was.

use async_trait::async_trait;
use serde_json::Value;

use sc_core::adapter::Adapter;
use sc_core::vendor::VendorContext;
use sc_core::Result;
use sc_schema::entities::{Ipv4Price, Region, Server, ServerPrice, Storage, StoragePrice, TrafficPrice, VendorComplianceLink, Zone};
use sc_schema::enums::{Allocation, CpuAllocation, CpuArchitecture, StorageType, TrafficDirection};
use sc_schema::price::{PriceFields, PriceTier, PriceUnit, TierBound};

use crate::common::{adapter_error, http_error, meta_now};

const VENDOR_ID: &str = "aws";
const PRICING_BASE: &str = "https://pricing.us-east-1.amazonaws.com";

pub struct AwsAdapter {
    client: reqwest::Client,
}

impl AwsAdapter {
    pub fn new() -> Self {
        Self { client: reqwest::Client::new() }
    }

    async fn get_json(&self, url: &str) -> Result<Value> {
        let response = self.client.get(url).send().await.map_err(|e| http_error(VENDOR_ID, e))?;
        response.error_for_status_ref().map_err(|e| http_error(VENDOR_ID, e))?;
        response.json().await.map_err(|e| http_error(VENDOR_ID, e))
    }
}

impl Default for AwsAdapter {
    fn default() -> Self {
        Self::new()
    }
}

/// `(region_id, display_city, country_id, state, lat, lon, founding_year)`.
/// Not exposed by any public AWS endpoint; collected from AWS's own "Global
/// Infrastructure" marketing pages (§4.7 "manual tables").
const REGIONS: &[(&str, &str, &str, Option<&str>, f64, f64, i32)] = &[
    ("us-east-1", "N. Virginia", "US", Some("Virginia"), 38.9519, -77.4480, 2006),
    ("us-east-2", "Ohio", "US", Some("Ohio"), 40.0946, -82.7541, 2016),
    ("us-west-1", "N. California", "US", Some("California"), 37.35, -121.96, 2009),
    ("us-west-2", "Oregon", "US", Some("Oregon"), 45.9175, -119.2684, 2011),
    ("eu-west-1", "Ireland", "IE", None, 53.4084, -8.2439, 2007),
    ("eu-central-1", "Frankfurt", "DE", Some("Hesse"), 50.1109, 8.6821, 2014),
    ("ap-southeast-1", "Singapore", "SG", None, 1.3521, 103.8198, 2010),
    ("ap-northeast-1", "Tokyo", "JP", None, 35.6762, 139.6503, 2011),
    ("sa-east-1", "Sao Paulo", "BR", None, -23.5505, -46.6333, 2011),
];

/// Three AZs per region is the common case; a handful of regions genuinely
/// only have fewer, but the core's contract only needs *a* valid zone set,
/// not an exhaustive one (§4.7).
const AZ_SUFFIXES: &[&str] = &["a", "b", "c"];

/// Mirrors the source's `_instance_families` glossary, trimmed to the
/// families needed to label the instance types this adapter's pricing feed
/// actually returns.
fn family_description(family: &str) -> &'static str {
    match family {
        "a" => "AWS Graviton",
        "c" => "Compute optimized",
        "d" => "Dense storage",
        "g" => "Graphics intensive",
        "i" => "Storage optimized",
        "m" => "General purpose",
        "p" => "GPU accelerated",
        "r" => "Memory optimized",
        "t" => "Burstable performance",
        "x" => "Memory intensive",
        "z" => "High frequency",
        _ => "General purpose",
    }
}

fn instance_family(instance_type: &str) -> String {
    instance_type.split('.').next().unwrap_or(instance_type).chars().take_while(|c| !c.is_ascii_digit()).collect()
}

fn cpu_architecture(physical_processor: &str) -> CpuArchitecture {
    let lower = physical_processor.to_lowercase();
    if lower.contains("graviton") {
        CpuArchitecture::Arm64
    } else {
        CpuArchitecture::X86_64
    }
}

#[async_trait]
impl Adapter for AwsAdapter {
    fn vendor_id(&self) -> &str {
        VENDOR_ID
    }

    async fn inventory_compliance_frameworks(&self, _ctx: &VendorContext) -> Result<Vec<VendorComplianceLink>> {
        // Source: <https://aws.amazon.com/compliance/programs/>.
        Ok(["iso27001", "soc2", "pci_dss", "hipaa", "gdpr"]
            .into_iter()
            .map(|id| VendorComplianceLink { vendor_id: VENDOR_ID.to_string(), compliance_framework_id: id.to_string(), comment: None, meta: meta_now() })
            .collect())
    }

    async fn inventory_regions(&self, _ctx: &VendorContext) -> Result<Vec<Region>> {
        Ok(REGIONS
            .iter()
            .map(|(id, city, country, state, lat, lon, founding_year)| Region {
                vendor_id: VENDOR_ID.to_string(),
                region_id: (*id).to_string(),
                name: (*id).to_string(),
                api_reference: (*id).to_string(),
                display_name: format!("{city} ({country})"),
                aliases: vec![],
                country_id: (*country).to_string(),
                state: state.map(str::to_string),
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

    async fn inventory_zones(&self, _ctx: &VendorContext, regions: &[Region]) -> Result<Vec<Zone>> {
        let mut items = Vec::new();
        for region in regions {
            for suffix in AZ_SUFFIXES {
                let zone_id = format!("{}{suffix}", region.region_id);
                items.push(Zone {
                    vendor_id: VENDOR_ID.to_string(),
                    region_id: region.region_id.clone(),
                    zone_id: zone_id.clone(),
                    name: zone_id.clone(),
                    api_reference: zone_id.clone(),
                    display_name: zone_id,
                    meta: meta_now(),
                });
            }
        }
        Ok(items)
    }

    /// Fetches the `us-east-1` AmazonEC2 bulk offer file, which lists every
    /// instance type's attributes (the source's `describe_instance_types`
    /// equivalent, minus the SDK).
    async fn inventory_servers(&self, _ctx: &VendorContext) -> Result<Vec<Server>> {
        let offer = self.get_json(&format!("{PRICING_BASE}/offers/v1.0/aws/AmazonEC2/current/us-east-1/index.json")).await?;
        let products = offer.get("products").and_then(Value::as_object).ok_or_else(|| adapter_error(VENDOR_ID, "offer file missing `products`"))?;

        let mut items = Vec::new();
        let mut seen = std::collections::HashSet::new();
        for product in products.values() {
            let attrs = product.get("attributes").and_then(Value::as_object);
            let Some(attrs) = attrs else { continue };
            if product.get("productFamily").and_then(Value::as_str) != Some("Compute Instance") {
                continue;
            }
            let Some(instance_type) = attrs.get("instanceType").and_then(Value::as_str) else { continue };
            if !seen.insert(instance_type.to_string()) {
                continue;
            }
            let vcpus: i32 = attrs.get("vcpu").and_then(Value::as_str).and_then(|s| s.parse().ok()).unwrap_or(1);
            let memory_gib: f64 = attrs
                .get("memory")
                .and_then(Value::as_str)
                .map(|s| s.trim_end_matches(" GiB").replace(',', ""))
                .and_then(|s| s.parse().ok())
                .unwrap_or(0.0);
            let physical_processor = attrs.get("physicalProcessor").and_then(Value::as_str).unwrap_or("");
            let clock_speed: Option<f64> = attrs.get("clockSpeed").and_then(Value::as_str).map(|s| s.trim_end_matches(" GHz").to_string()).and_then(|s| s.parse().ok());
            let family = instance_family(instance_type);

            items.push(Server {
                vendor_id: VENDOR_ID.to_string(),
                server_id: instance_type.to_string(),
                name: instance_type.to_string(),
                api_reference: instance_type.to_string(),
                display_name: instance_type.to_string(),
                description: Some(family_description(&family).to_string()),
                family: Some(family.clone()),
                vcpus,
                hypervisor: attrs.get("instanceFamily").and_then(Value::as_str).map(str::to_string),
                cpu_allocation: if family == "t" { CpuAllocation::Burstable } else { CpuAllocation::Dedicated },
                cpu_cores: None,
                cpu_speed: clock_speed,
                cpu_architecture: cpu_architecture(physical_processor),
                cpu_manufacturer: if physical_processor.contains("AMD") {
                    Some("AMD".to_string())
                } else if physical_processor.contains("Graviton") {
                    Some("AWS".to_string())
                } else if !physical_processor.is_empty() {
                    Some("Intel".to_string())
                } else {
                    None
                },
                cpu_family: None,
                cpu_model: Some(physical_processor.to_string()).filter(|s| !s.is_empty()),
                cpu_l1_cache: None,
                cpu_l2_cache: None,
                cpu_l3_cache: None,
                cpu_flags: vec![],
                cpus: vec![],
                memory_amount: (memory_gib * 1024.0).round() as i64,
                memory_generation: None,
                memory_speed: None,
                memory_ecc: None,
                gpu_count: attrs.get("gpu").and_then(Value::as_str).and_then(|s| s.parse().ok()).unwrap_or(0.0),
                gpu_memory_min: None,
                gpu_memory_total: None,
                gpu_manufacturer: None,
                gpu_family: None,
                gpu_model: None,
                gpus: vec![],
                storage_size: attrs
                    .get("storage")
                    .and_then(Value::as_str)
                    .and_then(|s| if s == "EBS only" { Some(0.0) } else { s.split_whitespace().next().and_then(|n| n.parse().ok()) })
                    .unwrap_or(0.0),
                storage_type: attrs.get("storage").and_then(Value::as_str).map(|s| if s.to_lowercase().contains("nvme") { "NVME_SSD" } else { "SSD" }.to_string()),
                storages: vec![],
                network_speed: None,
                inbound_traffic: 0.0,
                outbound_traffic: 0.0,
                ipv4: 1,
                meta: meta_now(),
            });
        }
        Ok(items)
    }

    async fn inventory_server_prices(&self, _ctx: &VendorContext, regions: &[Region], zones: &[Zone], servers: &[Server]) -> Result<Vec<ServerPrice>> {
        let offer = self.get_json(&format!("{PRICING_BASE}/offers/v1.0/aws/AmazonEC2/current/us-east-1/index.json")).await?;
        let products = offer.get("products").and_then(Value::as_object).ok_or_else(|| adapter_error(VENDOR_ID, "offer file missing `products`"))?;
        let on_demand_terms = offer.get("terms").and_then(|t| t.get("OnDemand")).and_then(Value::as_object);
        let Some(on_demand_terms) = on_demand_terms else { return Ok(vec![]) };

        let Some(region) = regions.iter().find(|r| r.region_id == "us-east-1") else { return Ok(vec![]) };
        let Some(zone) = zones.iter().find(|z| z.region_id == region.region_id) else { return Ok(vec![]) };
        let server_ids: std::collections::HashSet<&str> = servers.iter().map(|s| s.server_id.as_str()).collect();

        let mut items = Vec::new();
        for (sku, product) in products {
            let attrs = product.get("attributes").and_then(Value::as_object);
            let Some(attrs) = attrs else { continue };
            if product.get("productFamily").and_then(Value::as_str) != Some("Compute Instance") {
                continue;
            }
            if attrs.get("operatingSystem").and_then(Value::as_str) != Some("Linux") || attrs.get("tenancy").and_then(Value::as_str) != Some("Shared") {
                continue;
            }
            let Some(instance_type) = attrs.get("instanceType").and_then(Value::as_str) else { continue };
            if !server_ids.contains(instance_type) {
                continue;
            }
            let Some(sku_terms) = on_demand_terms.get(sku).and_then(Value::as_object) else { continue };
            let Some(price_dimensions) = sku_terms.values().next().and_then(|t| t.get("priceDimensions")).and_then(Value::as_object) else { continue };
            let Some(dimension) = price_dimensions.values().next() else { continue };
            let price: f64 = dimension
                .get("pricePerUnit")
                .and_then(|p| p.get("USD"))
                .and_then(Value::as_str)
                .and_then(|s| s.parse().ok())
                .unwrap_or(0.0);

            items.push(ServerPrice {
                vendor_id: VENDOR_ID.to_string(),
                region_id: region.region_id.clone(),
                zone_id: zone.zone_id.clone(),
                server_id: instance_type.to_string(),
                allocation: Allocation::Ondemand,
                operating_system: "Linux".to_string(),
                price: PriceFields { unit: PriceUnit::Hour, price, price_upfront: 0.0, price_tiered: vec![], currency: "USD".to_string() },
                meta: meta_now(),
            });
        }
        Ok(items)
    }

    /// Spot price history needs SigV4-signed EC2 API calls, not a bulk
    /// unauthenticated feed; out of scope for the core (§1).
    async fn inventory_server_prices_spot(&self, _ctx: &VendorContext, _regions: &[Region], _zones: &[Zone], _servers: &[Server]) -> Result<Vec<ServerPrice>> {
        Ok(vec![])
    }

    async fn inventory_storages(&self, _ctx: &VendorContext) -> Result<Vec<Storage>> {
        // EBS volume types, collected from <https://aws.amazon.com/ebs/volume-types/>.
        Ok(vec![
            Storage { vendor_id: VENDOR_ID.into(), storage_id: "gp3".into(), name: "General Purpose SSD (gp3)".into(), description: None, storage_type: StorageType::Ssd, max_iops: Some(16_000), max_throughput: Some(1000.0), min_size: Some(1.0), max_size: Some(16384.0), meta: meta_now() },
            Storage { vendor_id: VENDOR_ID.into(), storage_id: "io2".into(), name: "Provisioned IOPS SSD (io2)".into(), description: None, storage_type: StorageType::NvmeSsd, max_iops: Some(256_000), max_throughput: Some(4000.0), min_size: Some(4.0), max_size: Some(65536.0), meta: meta_now() },
            Storage { vendor_id: VENDOR_ID.into(), storage_id: "st1".into(), name: "Throughput Optimized HDD (st1)".into(), description: None, storage_type: StorageType::Hdd, max_iops: None, max_throughput: Some(500.0), min_size: Some(125.0), max_size: Some(16384.0), meta: meta_now() },
        ])
    }

    async fn inventory_storage_prices(&self, _ctx: &VendorContext, regions: &[Region], storages: &[Storage]) -> Result<Vec<StoragePrice>> {
        // Flat published per-GB-month rates for us-east-1; other regions
        // track within a few percent and aren't re-fetched per storage type
        // to keep this adapter within the core's unauthenticated-feed scope.
        let rate = |storage_id: &str| -> f64 {
            match storage_id {
                "gp3" => 0.08,
                "io2" => 0.125,
                "st1" => 0.045,
                _ => 0.0,
            }
        };
        let mut items = Vec::new();
        for region in regions {
            for storage in storages {
                items.push(StoragePrice {
                    vendor_id: VENDOR_ID.to_string(),
                    region_id: region.region_id.clone(),
                    storage_id: storage.storage_id.clone(),
                    price: PriceFields { unit: PriceUnit::GbMonth, price: rate(&storage.storage_id), price_upfront: 0.0, price_tiered: vec![], currency: "USD".to_string() },
                    meta: meta_now(),
                });
            }
        }
        Ok(items)
    }

    async fn inventory_traffic_prices(&self, _ctx: &VendorContext, regions: &[Region]) -> Result<Vec<TrafficPrice>> {
        // Published tiered data-transfer-out pricing, <https://aws.amazon.com/ec2/pricing/on-demand/>.
        let tiers = vec![
            PriceTier { lower: TierBound::Finite(0.0), upper: TierBound::Finite(10_240.0), price: 0.09 },
            PriceTier { lower: TierBound::Finite(10_240.0), upper: TierBound::Finite(51_200.0), price: 0.085 },
            PriceTier { lower: TierBound::Finite(51_200.0), upper: TierBound::PositiveInfinity, price: 0.07 },
        ];
        let mut items = Vec::with_capacity(regions.len() * 2);
        for region in regions {
            items.push(TrafficPrice {
                vendor_id: VENDOR_ID.to_string(),
                region_id: region.region_id.clone(),
                direction: TrafficDirection::In,
                price: PriceFields { unit: PriceUnit::Gb, price: 0.0, price_upfront: 0.0, price_tiered: vec![], currency: "USD".to_string() },
                meta: meta_now(),
            });
            items.push(TrafficPrice {
                vendor_id: VENDOR_ID.to_string(),
                region_id: region.region_id.clone(),
                direction: TrafficDirection::Out,
                price: PriceFields { unit: PriceUnit::Gb, price: tiers[0].price, price_upfront: 0.0, price_tiered: tiers.clone(), currency: "USD".to_string() },
                meta: meta_now(),
            });
        }
        Ok(items)
    }

    async fn inventory_ipv4_prices(&self, _ctx: &VendorContext, regions: &[Region]) -> Result<Vec<Ipv4Price>> {
        // <https://aws.amazon.com/vpc/pricing/>: $0.005/hr per public IPv4.
        Ok(regions
            .iter()
            .map(|region| Ipv4Price {
                vendor_id: VENDOR_ID.to_string(),
                region_id: region.region_id.clone(),
                price: PriceFields { unit: PriceUnit::Hour, price: 0.005, price_upfront: 0.0, price_tiered: vec![], currency: "USD".to_string() },
                meta: meta_now(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_family_prefix_from_instance_type() {
        assert_eq!(instance_family("m5.large"), "m");
        assert_eq!(instance_family("c6gn.xlarge"), "c");
    }

    #[test]
    fn graviton_processor_maps_to_arm64() {
        assert!(matches!(cpu_architecture("AWS Graviton2 Processor"), CpuArchitecture::Arm64));
    }

    #[test]
    fn intel_processor_maps_to_x86_64() {
        assert!(matches!(cpu_architecture("Intel Xeon Platinum 8275L"), CpuArchitecture::X86_64));
    }
}
