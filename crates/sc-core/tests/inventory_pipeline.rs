//! End-to-end coverage of the §8 testable properties against a real
//! in-memory SQLite database and a stub [`Adapter`], exercising the
//! concrete S1-S6 scenarios from the spec rather than mocking the engine.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use sc_core::adapter::Adapter;
use sc_core::error::Result;
use sc_core::pipeline::{CancellationToken, Pipeline};
use sc_core::progress::ProgressTracker;
use sc_core::vendor::VendorRunner;
use sc_core::{cache::DiskCache, lookup};
use sc_db::{Engine, HashLevel};
use sc_schema::entities::{
    Ipv4Price, Region, Server, ServerPrice, Storage, StoragePrice, TrafficPrice, Vendor, VendorComplianceLink, Zone,
};
use sc_schema::enums::{Allocation, CpuAllocation, CpuArchitecture};
use sc_schema::hash::Entity;
use sc_schema::price::{PriceFields, PriceUnit};
use sc_schema::status::MetaColumns;

/// Adapter stub whose `inventory_*` methods return whatever was last set
/// through the `set_*` setters, defaulting to empty. Mirrors the "stub
/// adapter" scenarios S1-S6 describe.
#[derive(Default)]
struct StubAdapter {
    servers: Mutex<Vec<Server>>,
    server_prices: Mutex<Vec<ServerPrice>>,
    server_prices_spot: Mutex<Vec<ServerPrice>>,
}

impl StubAdapter {
    fn set_servers(&self, rows: Vec<Server>) {
        *self.servers.lock().unwrap() = rows;
    }

    fn set_server_prices(&self, rows: Vec<ServerPrice>) {
        *self.server_prices.lock().unwrap() = rows;
    }

    fn set_server_prices_spot(&self, rows: Vec<ServerPrice>) {
        *self.server_prices_spot.lock().unwrap() = rows;
    }
}

#[async_trait]
impl Adapter for StubAdapter {
    fn vendor_id(&self) -> &str {
        "hcloud"
    }

    async fn inventory_compliance_frameworks(&self, _ctx: &sc_core::VendorContext) -> Result<Vec<VendorComplianceLink>> {
        Ok(vec![])
    }

    async fn inventory_regions(&self, _ctx: &sc_core::VendorContext) -> Result<Vec<Region>> {
        Ok(vec![fsn1_region()])
    }

    async fn inventory_zones(&self, _ctx: &sc_core::VendorContext, _regions: &[Region]) -> Result<Vec<Zone>> {
        Ok(vec![fsn1_zone()])
    }

    async fn inventory_servers(&self, _ctx: &sc_core::VendorContext) -> Result<Vec<Server>> {
        Ok(self.servers.lock().unwrap().clone())
    }

    async fn inventory_server_prices(
        &self,
        _ctx: &sc_core::VendorContext,
        _regions: &[Region],
        _zones: &[Zone],
        _servers: &[Server],
    ) -> Result<Vec<ServerPrice>> {
        Ok(self.server_prices.lock().unwrap().clone())
    }

    async fn inventory_server_prices_spot(
        &self,
        _ctx: &sc_core::VendorContext,
        _regions: &[Region],
        _zones: &[Zone],
        _servers: &[Server],
    ) -> Result<Vec<ServerPrice>> {
        Ok(self.server_prices_spot.lock().unwrap().clone())
    }

    async fn inventory_storages(&self, _ctx: &sc_core::VendorContext) -> Result<Vec<Storage>> {
        Ok(vec![])
    }

    async fn inventory_storage_prices(
        &self,
        _ctx: &sc_core::VendorContext,
        _regions: &[Region],
        _storages: &[Storage],
    ) -> Result<Vec<StoragePrice>> {
        Ok(vec![])
    }

    async fn inventory_traffic_prices(&self, _ctx: &sc_core::VendorContext, _regions: &[Region]) -> Result<Vec<TrafficPrice>> {
        Ok(vec![])
    }

    async fn inventory_ipv4_prices(&self, _ctx: &sc_core::VendorContext, _regions: &[Region]) -> Result<Vec<Ipv4Price>> {
        Ok(vec![])
    }
}

fn fsn1_region() -> Region {
    Region {
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
        green_energy: None,
        meta: MetaColumns::observed_now(),
    }
}

fn fsn1_zone() -> Zone {
    Zone {
        vendor_id: "hcloud".into(),
        region_id: "fsn1".into(),
        zone_id: "fsn1".into(),
        name: "fsn1".into(),
        api_reference: "fsn1".into(),
        display_name: "Falkenstein".into(),
        meta: MetaColumns::observed_now(),
    }
}

fn cx11(vcpus: i32) -> Server {
    Server {
        vendor_id: "hcloud".into(),
        server_id: "cx11".into(),
        name: "cx11".into(),
        api_reference: "cx11".into(),
        display_name: "CX11".into(),
        description: None,
        family: None,
        vcpus,
        hypervisor: None,
        cpu_allocation: CpuAllocation::Shared,
        cpu_cores: None,
        cpu_speed: None,
        cpu_architecture: CpuArchitecture::X86_64,
        cpu_manufacturer: None,
        cpu_family: None,
        cpu_model: None,
        cpu_l1_cache: None,
        cpu_l2_cache: None,
        cpu_l3_cache: None,
        cpu_flags: vec![],
        cpus: vec![],
        memory_amount: 2048,
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
        storage_size: 20.0,
        storage_type: None,
        storages: vec![],
        network_speed: None,
        inbound_traffic: 20.0,
        outbound_traffic: 20.0,
        ipv4: 1,
        meta: MetaColumns::observed_now(),
    }
}

fn cx11_price(allocation: Allocation, price: f64) -> ServerPrice {
    ServerPrice {
        vendor_id: "hcloud".into(),
        region_id: "fsn1".into(),
        zone_id: "fsn1".into(),
        server_id: "cx11".into(),
        allocation,
        operating_system: "Linux".into(),
        price: PriceFields { unit: PriceUnit::Hour, price, price_upfront: 0.0, price_tiered: vec![], currency: "USD".into() },
        meta: MetaColumns::observed_now(),
    }
}

async fn seeded_engine() -> Engine {
    let engine = Engine::connect("sqlite::memory:").await.expect("in-memory sqlite connects");
    engine.ensure_schema().await.expect("schema creation succeeds");
    lookup::seed(&engine).await.expect("lookup seed succeeds");

    let vendor = Vendor {
        vendor_id: "hcloud".into(),
        name: "Hetzner".into(),
        logo: None,
        homepage: "https://www.hetzner.com".into(),
        country_id: "DE".into(),
        state: None,
        city: None,
        address_line: None,
        zip_code: None,
        founding_year: 1997,
        status_page: None,
        meta: MetaColumns::observed_now(),
    };
    engine.upsert("vendor", &[vendor.row_json()]).await.expect("vendor seed succeeds");
    engine
}

fn runner(adapter: Arc<StubAdapter>) -> VendorRunner {
    let vendor = Vendor {
        vendor_id: "hcloud".into(),
        name: "Hetzner".into(),
        logo: None,
        homepage: "https://www.hetzner.com".into(),
        country_id: "DE".into(),
        state: None,
        city: None,
        address_line: None,
        zip_code: None,
        founding_year: 1997,
        status_page: None,
        meta: MetaColumns::observed_now(),
    };
    VendorRunner::new(vendor, adapter, ProgressTracker::new(), DiskCache::disabled())
}

async fn row_status(engine: &Engine, table: &str, pk_predicate: &str) -> String {
    let sql = format!("SELECT status FROM \"{table}\" WHERE {pk_predicate}");
    let row: (String,) = sqlx::query_as(&sql).fetch_one(engine.pool()).await.expect("row exists");
    row.0
}

async fn row_observed_at(engine: &Engine, table: &str, pk_predicate: &str) -> String {
    let sql = format!("SELECT observed_at FROM \"{table}\" WHERE {pk_predicate}");
    let row: (String,) = sqlx::query_as(&sql).fetch_one(engine.pool()).await.expect("row exists");
    row.0
}

/// S1 - Hetzner fresh pull: one region, one zone, one server, one
/// ondemand server price, all ACTIVE.
#[tokio::test]
async fn s1_hetzner_fresh_pull() {
    let engine = seeded_engine().await;
    let adapter = Arc::new(StubAdapter::default());
    adapter.set_servers(vec![cx11(1)]);
    adapter.set_server_prices(vec![cx11_price(Allocation::Ondemand, 0.005)]);

    let run = runner(adapter);
    let pipeline = Pipeline::new(false);
    let summary = pipeline
        .run_vendor(&engine, None, &run, &CancellationToken::new())
        .await
        .expect("fresh pull succeeds");
    assert!(!summary.cancelled);

    assert_eq!(row_status(&engine, "region", "\"region_id\" = 'fsn1'").await, "ACTIVE");
    assert_eq!(row_status(&engine, "zone", "\"zone_id\" = 'fsn1'").await, "ACTIVE");
    assert_eq!(row_status(&engine, "server", "\"server_id\" = 'cx11'").await, "ACTIVE");
    assert_eq!(
        row_status(&engine, "server_price", "\"server_id\" = 'cx11' AND \"allocation\" = 'ONDEMAND'").await,
        "ACTIVE"
    );
}

/// S2 - Deprovisioning: a second pull with zero servers tombstones the
/// server and its price, without deleting either row.
#[tokio::test]
async fn s2_deprovisioning_tombstones_without_deleting() {
    let engine = seeded_engine().await;
    let adapter = Arc::new(StubAdapter::default());
    adapter.set_servers(vec![cx11(1)]);
    adapter.set_server_prices(vec![cx11_price(Allocation::Ondemand, 0.005)]);
    let run = runner(adapter.clone());
    let pipeline = Pipeline::new(false);
    pipeline.run_vendor(&engine, None, &run, &CancellationToken::new()).await.expect("first pull succeeds");

    adapter.set_servers(vec![]);
    adapter.set_server_prices(vec![]);
    pipeline.run_vendor(&engine, None, &run, &CancellationToken::new()).await.expect("second pull succeeds");

    assert_eq!(row_status(&engine, "server", "\"server_id\" = 'cx11'").await, "INACTIVE");
    assert_eq!(
        row_status(&engine, "server_price", "\"server_id\" = 'cx11' AND \"allocation\" = 'ONDEMAND'").await,
        "INACTIVE"
    );

    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM \"server\"").fetch_one(engine.pool()).await.unwrap();
    assert_eq!(count.0, 1, "tombstoning must never delete rows");
}

/// S3 - Spot-scoped invalidation: re-running only the spot stage with an
/// empty result leaves the on-demand row's `observed_at` untouched.
#[tokio::test]
async fn s3_spot_scoped_invalidation_leaves_ondemand_untouched() {
    let engine = seeded_engine().await;
    let adapter = Arc::new(StubAdapter::default());
    adapter.set_servers(vec![cx11(1)]);
    adapter.set_server_prices(vec![cx11_price(Allocation::Ondemand, 0.005)]);
    let run = runner(adapter.clone());
    let pipeline = Pipeline::new(false);
    pipeline.run_vendor(&engine, None, &run, &CancellationToken::new()).await.expect("first pull succeeds");

    let observed_before = row_observed_at(&engine, "server_price", "\"allocation\" = 'ONDEMAND'").await;

    // Re-run the whole pipeline (stages are sequential per §4.5) but with
    // an empty spot result; the ondemand stage still reports the same row,
    // so its predicate-scoped mark_inactive should not touch it, and the
    // later spot stage must only ever touch SPOT rows.
    adapter.set_server_prices_spot(vec![]);
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    pipeline.run_vendor(&engine, None, &run, &CancellationToken::new()).await.expect("spot-only re-run succeeds");

    let observed_after = row_observed_at(&engine, "server_price", "\"allocation\" = 'ONDEMAND'").await;
    assert_eq!(observed_before, observed_after, "non-SPOT row must be untouched by the spot stage");

    let spot_count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM \"server_price\" WHERE \"allocation\" = 'SPOT'")
        .fetch_one(engine.pool())
        .await
        .unwrap();
    assert_eq!(spot_count.0, 0);
}

/// S4 - SCD history: with SCD enabled, two pulls (fresh then
/// deprovisioned) leave two rows in `server_scd` for `cx11` - one ACTIVE,
/// one INACTIVE - and neither is ever mutated in place.
#[tokio::test]
async fn s4_scd_history_preserves_both_observations() {
    let engine = seeded_engine().await;
    let adapter = Arc::new(StubAdapter::default());
    adapter.set_servers(vec![cx11(1)]);
    let run = runner(adapter.clone());
    let pipeline = Pipeline::new(true);
    pipeline.run_vendor(&engine, None, &run, &CancellationToken::new()).await.expect("first pull succeeds");

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    adapter.set_servers(vec![]);
    pipeline.run_vendor(&engine, None, &run, &CancellationToken::new()).await.expect("second pull succeeds");

    let rows: Vec<(String, String)> = sqlx::query_as(
        "SELECT status, observed_at FROM \"server_scd\" WHERE \"server_id\" = 'cx11' ORDER BY observed_at",
    )
    .fetch_all(engine.pool())
    .await
    .expect("scd query succeeds");

    assert_eq!(rows.len(), 2, "one SCD row per observation");
    assert_eq!(rows[0].0, "ACTIVE");
    assert_eq!(rows[1].0, "INACTIVE");
    assert_ne!(rows[0].1, rows[1].1, "SCD rows are append-only, never mutated in place");
}

/// S5 - Infinity round-trip: a tiered StoragePrice with an unbounded top
/// tier survives a DB write + read cycle as the same JSON.
#[tokio::test]
async fn s5_infinity_round_trips_through_json_column() {
    let engine = seeded_engine().await;
    engine
        .upsert("region", &[fsn1_region().row_json()])
        .await
        .expect("region seed succeeds");

    let tiered = serde_json::json!([
        { "lower": 0.0, "upper": 100.0, "price": 0.1 },
        { "lower": 100.0, "upper": "Infinity", "price": 0.05 },
    ]);
    let storage_price = serde_json::json!({
        "vendor_id": "hcloud",
        "region_id": "fsn1",
        "storage_id": "volume",
        "unit": "GIB",
        "price": 0.1,
        "price_upfront": 0.0,
        "price_tiered": tiered,
        "currency": "USD",
        "status": "ACTIVE",
        "observed_at": Utc::now().to_rfc3339(),
    });
    engine.upsert("storage_price", &[storage_price]).await.expect("storage_price upsert succeeds");

    let row: (String,) =
        sqlx::query_as("SELECT price_tiered FROM \"storage_price\" WHERE \"storage_id\" = 'volume'")
            .fetch_one(engine.pool())
            .await
            .expect("row exists");
    let read_back: serde_json::Value = serde_json::from_str(&row.0).expect("stored value is valid JSON");
    assert_eq!(read_back, tiered);
}

/// S6 - Referential guard: a server price referencing a server the adapter
/// never returned aborts the stage with a referential error, leaving the
/// database exactly as it was pre-stage.
#[tokio::test]
async fn s6_referential_guard_aborts_and_leaves_db_unchanged() {
    let engine = seeded_engine().await;
    let adapter = Arc::new(StubAdapter::default());
    adapter.set_servers(vec![]); // no server returned ...
    adapter.set_server_prices(vec![cx11_price(Allocation::Ondemand, 0.005)]); // ... but a price references cx11
    let run = runner(adapter);
    let pipeline = Pipeline::new(false);

    let hash_before = engine.hash_database(HashLevel::Database, &["observed_at"]).await.unwrap();
    let err = pipeline.run_vendor(&engine, None, &run, &CancellationToken::new()).await;
    assert!(err.is_err(), "a server_price row referencing an unknown server must abort the stage");

    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM \"server_price\"").fetch_one(engine.pool()).await.unwrap();
    assert_eq!(count.0, 0, "the failed stage must not have committed any server_price rows");

    let hash_after = engine.hash_database(HashLevel::Database, &["observed_at"]).await.unwrap();
    assert_eq!(hash_before, hash_after, "a referential failure must leave prior stages' commits untouched");
}

/// Idempotence (§8 property 1): pulling an unchanged snapshot twice
/// produces an identical TABLE-level hash once `observed_at` is ignored.
#[tokio::test]
async fn idempotent_repull_of_unchanged_snapshot_hashes_identically() {
    let engine = seeded_engine().await;
    let adapter = Arc::new(StubAdapter::default());
    adapter.set_servers(vec![cx11(1)]);
    adapter.set_server_prices(vec![cx11_price(Allocation::Ondemand, 0.005)]);
    let run = runner(adapter);
    let pipeline = Pipeline::new(false);

    pipeline.run_vendor(&engine, None, &run, &CancellationToken::new()).await.unwrap();
    let first = engine.hash_database(HashLevel::Table, &["observed_at"]).await.unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    pipeline.run_vendor(&engine, None, &run, &CancellationToken::new()).await.unwrap();
    let second = engine.hash_database(HashLevel::Table, &["observed_at"]).await.unwrap();

    assert_eq!(first, second, "an unchanged snapshot must hash identically across pulls");
}
