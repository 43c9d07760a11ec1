//! The adapter surface every vendor must implement (§4.4). Adapter methods
//! are pure: given a [`VendorContext`], they return normalized rows; they
//! never touch the database directly.

use async_trait::async_trait;
use auto_impl::auto_impl;

use sc_schema::entities::{Ipv4Price, Region, Server, ServerPrice, Storage, StoragePrice, TrafficPrice, VendorComplianceLink, Zone};

use crate::error::Result;
use crate::vendor::VendorContext;

/// A missing method for a declared vendor is a fatal configuration error
/// surfaced at startup (§4.4) — enforced here by every vendor having to
/// provide a complete `impl Adapter`, not by a runtime capability check.
#[auto_impl(&, Arc, Box)]
#[async_trait]
pub trait Adapter: Send + Sync + 'static {
    fn vendor_id(&self) -> &str;

    async fn inventory_compliance_frameworks(&self, ctx: &VendorContext) -> Result<Vec<VendorComplianceLink>>;

    async fn inventory_regions(&self, ctx: &VendorContext) -> Result<Vec<Region>>;

    async fn inventory_zones(&self, ctx: &VendorContext, regions: &[Region]) -> Result<Vec<Zone>>;

    async fn inventory_servers(&self, ctx: &VendorContext) -> Result<Vec<Server>>;

    /// Ondemand and reserved prices (§4.5 stage 5).
    async fn inventory_server_prices(&self, ctx: &VendorContext, regions: &[Region], zones: &[Zone], servers: &[Server]) -> Result<Vec<ServerPrice>>;

    /// Spot prices, pulled as a separate stage so it can be re-run more
    /// frequently (§4.5 stage 6).
    async fn inventory_server_prices_spot(&self, ctx: &VendorContext, regions: &[Region], zones: &[Zone], servers: &[Server]) -> Result<Vec<ServerPrice>>;

    async fn inventory_storages(&self, ctx: &VendorContext) -> Result<Vec<Storage>>;

    async fn inventory_storage_prices(&self, ctx: &VendorContext, regions: &[Region], storages: &[Storage]) -> Result<Vec<StoragePrice>>;

    async fn inventory_traffic_prices(&self, ctx: &VendorContext, regions: &[Region]) -> Result<Vec<TrafficPrice>>;

    async fn inventory_ipv4_prices(&self, ctx: &VendorContext, regions: &[Region]) -> Result<Vec<Ipv4Price>>;
}
