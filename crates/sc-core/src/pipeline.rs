//! The inventory pipeline driver (§4.5): runs one vendor's ten ordered
//! stages, each as `mark_inactive → adapter call → validate → upsert
//! (+ optional SCD duplicate)` in a single transaction (§4.2 "one stage =
//! one commit"). Referential checks run in pure Rust against the rows this
//! same run already fetched, before any row reaches the database, so a
//! failed check leaves the database exactly as it was pre-stage (§8 S6).

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use sc_db::Engine;
use sc_schema::entities::{Benchmark, ServerPrice};
use sc_schema::hash::Entity;
use sc_schema::util::scmodels_to_dict;
use sc_schema::validate::Validate;
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::error::{CrateError, ReferentialError, Result};
use crate::lookup;
use crate::vendor::VendorRunner;

/// Checked between stages and between vendors, never mid-stage (§5's
/// cooperative cancellation model).
#[derive(Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone)]
pub struct StageOutcome {
    pub stage: &'static str,
    pub rows: usize,
}

#[derive(Debug, Clone)]
pub struct PipelineSummary {
    pub vendor_id: String,
    pub stages: Vec<StageOutcome>,
    /// `true` if cancellation was observed before every stage ran.
    pub cancelled: bool,
}

pub struct Pipeline {
    scd_enabled: bool,
}

impl Pipeline {
    pub fn new(scd_enabled: bool) -> Self {
        Self { scd_enabled }
    }

    /// Runs every stage for one vendor in order (§4.5). `inspector` is
    /// optional so a pull can skip enrichment entirely (§4.6's cache/TTL
    /// config already makes a no-op run cheap, but some deployments may not
    /// want it at all).
    #[instrument(skip(self, engine, inspector, runner, cancellation), fields(vendor_id = %runner.vendor.vendor_id))]
    pub async fn run_vendor(
        &self,
        engine: &Engine,
        inspector: Option<&sc_inspector::Inspector>,
        runner: &VendorRunner,
        cancellation: &CancellationToken,
    ) -> Result<PipelineSummary> {
        let vendor_id = runner.vendor.vendor_id.clone();
        let observed_at = Utc::now();
        let mut stages = Vec::new();

        if cancellation.is_cancelled() {
            return Ok(cancelled_summary(vendor_id, stages));
        }
        let links = runner.adapter.inventory_compliance_frameworks(&runner.context).await?;
        for link in &links {
            if lookup::known_compliance_framework_ids().all(|id| id != link.compliance_framework_id.as_str()) {
                return Err(referential_error("vendor_compliance_link", link.primary_key_string(), "compliance_framework", link.compliance_framework_id.clone()));
            }
        }
        stages.push(persist(engine, "vendor_compliance_link", &vendor_id, observed_at, None, &links, self.scd_enabled).await?);

        if cancellation.is_cancelled() {
            return Ok(cancelled_summary(vendor_id, stages));
        }
        let regions = runner.adapter.inventory_regions(&runner.context).await?;
        for region in &regions {
            if lookup::continent_for(&region.country_id).is_none() {
                return Err(referential_error("region", region.primary_key_string(), "country", region.country_id.clone()));
            }
        }
        let region_ids: HashSet<&str> = regions.iter().map(|r| r.region_id.as_str()).collect();
        stages.push(persist(engine, "region", &vendor_id, observed_at, None, &regions, self.scd_enabled).await?);

        if cancellation.is_cancelled() {
            return Ok(cancelled_summary(vendor_id, stages));
        }
        let zones = runner.adapter.inventory_zones(&runner.context, &regions).await?;
        for zone in &zones {
            if !region_ids.contains(zone.region_id.as_str()) {
                return Err(referential_error("zone", zone.primary_key_string(), "region", zone.region_id.clone()));
            }
        }
        let zone_keys: HashSet<(&str, &str)> = zones.iter().map(|z| (z.region_id.as_str(), z.zone_id.as_str())).collect();
        stages.push(persist(engine, "zone", &vendor_id, observed_at, None, &zones, self.scd_enabled).await?);

        if cancellation.is_cancelled() {
            return Ok(cancelled_summary(vendor_id, stages));
        }
        let servers = runner.adapter.inventory_servers(&runner.context).await?;
        let (servers, benchmarks, scores) = match inspector {
            Some(inspector) => {
                let result = inspector.inspect(&vendor_id, servers).await?;
                (result.servers, result.benchmarks, result.scores)
            }
            None => (servers, Vec::new(), Vec::new()),
        };
        let server_ids: HashSet<&str> = servers.iter().map(|s| s.server_id.as_str()).collect();
        stages.push(persist(engine, "server", &vendor_id, observed_at, None, &servers, self.scd_enabled).await?);

        if !benchmarks.is_empty() {
            let deduped = scmodels_to_dict(benchmarks, |b: &Benchmark| b.benchmark_id.clone());
            let rows: Vec<Value> = deduped.values().map(|b| b.row_json()).collect();
            engine.upsert(Benchmark::table_name(), &rows).await?;
            stages.push(StageOutcome { stage: "benchmark", rows: rows.len() });
        }
        if !scores.is_empty() {
            stages.push(persist(engine, "benchmark_score", &vendor_id, observed_at, None, &scores, self.scd_enabled).await?);
        }

        if cancellation.is_cancelled() {
            return Ok(cancelled_summary(vendor_id, stages));
        }
        let ondemand_reserved = runner.adapter.inventory_server_prices(&runner.context, &regions, &zones, &servers).await?;
        check_server_price_refs(&ondemand_reserved, &region_ids, &zone_keys, &server_ids)?;
        stages.push(persist(engine, "server_price", &vendor_id, observed_at, Some("\"allocation\" != 'SPOT'"), &ondemand_reserved, self.scd_enabled).await?);

        if cancellation.is_cancelled() {
            return Ok(cancelled_summary(vendor_id, stages));
        }
        let spot = runner.adapter.inventory_server_prices_spot(&runner.context, &regions, &zones, &servers).await?;
        check_server_price_refs(&spot, &region_ids, &zone_keys, &server_ids)?;
        stages.push(persist(engine, "server_price", &vendor_id, observed_at, Some("\"allocation\" = 'SPOT'"), &spot, self.scd_enabled).await?);

        if cancellation.is_cancelled() {
            return Ok(cancelled_summary(vendor_id, stages));
        }
        let storages = runner.adapter.inventory_storages(&runner.context).await?;
        let storage_ids: HashSet<&str> = storages.iter().map(|s| s.storage_id.as_str()).collect();
        stages.push(persist(engine, "storage", &vendor_id, observed_at, None, &storages, self.scd_enabled).await?);

        if cancellation.is_cancelled() {
            return Ok(cancelled_summary(vendor_id, stages));
        }
        let storage_prices = runner.adapter.inventory_storage_prices(&runner.context, &regions, &storages).await?;
        for price in &storage_prices {
            if !region_ids.contains(price.region_id.as_str()) {
                return Err(referential_error("storage_price", price.primary_key_string(), "region", price.region_id.clone()));
            }
            if !storage_ids.contains(price.storage_id.as_str()) {
                return Err(referential_error("storage_price", price.primary_key_string(), "storage", price.storage_id.clone()));
            }
        }
        stages.push(persist(engine, "storage_price", &vendor_id, observed_at, None, &storage_prices, self.scd_enabled).await?);

        if cancellation.is_cancelled() {
            return Ok(cancelled_summary(vendor_id, stages));
        }
        let traffic_prices = runner.adapter.inventory_traffic_prices(&runner.context, &regions).await?;
        for price in &traffic_prices {
            if !region_ids.contains(price.region_id.as_str()) {
                return Err(referential_error("traffic_price", price.primary_key_string(), "region", price.region_id.clone()));
            }
        }
        stages.push(persist(engine, "traffic_price", &vendor_id, observed_at, None, &traffic_prices, self.scd_enabled).await?);

        if cancellation.is_cancelled() {
            return Ok(cancelled_summary(vendor_id, stages));
        }
        let ipv4_prices = runner.adapter.inventory_ipv4_prices(&runner.context, &regions).await?;
        for price in &ipv4_prices {
            if !region_ids.contains(price.region_id.as_str()) {
                return Err(referential_error("ipv4_price", price.primary_key_string(), "region", price.region_id.clone()));
            }
        }
        stages.push(persist(engine, "ipv4_price", &vendor_id, observed_at, None, &ipv4_prices, self.scd_enabled).await?);

        Ok(PipelineSummary { vendor_id, stages, cancelled: false })
    }

    /// Runs every vendor in sequence, stopping early (but returning what
    /// already completed) if cancellation is observed between vendors.
    pub async fn run(
        &self,
        engine: &Engine,
        inspector: Option<&sc_inspector::Inspector>,
        runners: &[VendorRunner],
        cancellation: &CancellationToken,
    ) -> Result<Vec<PipelineSummary>> {
        let mut summaries = Vec::with_capacity(runners.len());
        for runner in runners {
            if cancellation.is_cancelled() {
                warn!("cancellation observed between vendors, stopping pull early");
                break;
            }
            summaries.push(self.run_vendor(engine, inspector, runner, cancellation).await?);
        }
        Ok(summaries)
    }
}

fn referential_error(table: &'static str, primary_key: String, referenced_table: &'static str, referenced_key: String) -> CrateError {
    ReferentialError::MissingReference { table, primary_key, referenced_table, referenced_key }.into()
}

fn check_server_price_refs(prices: &[ServerPrice], region_ids: &HashSet<&str>, zone_keys: &HashSet<(&str, &str)>, server_ids: &HashSet<&str>) -> Result<()> {
    for price in prices {
        if !region_ids.contains(price.region_id.as_str()) {
            return Err(referential_error("server_price", price.primary_key_string(), "region", price.region_id.clone()));
        }
        if !zone_keys.contains(&(price.region_id.as_str(), price.zone_id.as_str())) {
            return Err(referential_error("server_price", price.primary_key_string(), "zone", format!("{}/{}", price.region_id, price.zone_id)));
        }
        if !server_ids.contains(price.server_id.as_str()) {
            return Err(referential_error("server_price", price.primary_key_string(), "server", price.server_id.clone()));
        }
    }
    Ok(())
}

/// Validates every row, then commits the mark-inactive/upsert/SCD-duplicate
/// sequence as one transaction (§4.2, §8 S6) via [`Engine::run_stage`].
async fn persist<T: Validate + Entity>(
    engine: &Engine,
    stage: &'static str,
    vendor_id: &str,
    observed_at: DateTime<Utc>,
    predicate: Option<&str>,
    rows: &[T],
    scd_enabled: bool,
) -> Result<StageOutcome> {
    for row in rows {
        row.validate()?;
    }
    let json_rows: Vec<Value> = rows.iter().map(Entity::row_json).collect();
    engine.run_stage(T::table_name(), vendor_id, observed_at, predicate, &json_rows, scd_enabled).await?;
    Ok(StageOutcome { stage, rows: rows.len() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancellation_token_starts_uncancelled() {
        let token = CancellationToken::new();
        assert!(!token.is_cancelled());
        token.cancel();
        assert!(token.is_cancelled());
    }
}
