//! Ties the dataset source, hydration, and benchmark harvesting together
//! (§4.6). One `Inspector` is built once per pipeline run and reused across
//! every vendor and server it processes, so the dataset is fetched at most
//! once per process (§5).

use sc_schema::entities::{Benchmark, BenchmarkScore, Server};
use tracing::instrument;

use crate::benchmark;
use crate::error::Result;
use crate::hydrate;
use crate::source::InspectorSource;

pub struct Inspector {
    source: Box<dyn InspectorSource>,
}

/// What inspecting one vendor's server batch produced: the servers with
/// whatever fields the dataset could fill in, plus the benchmark
/// definitions and scores harvested for them.
pub struct InspectionResult {
    pub servers: Vec<Server>,
    pub benchmarks: Vec<Benchmark>,
    pub scores: Vec<BenchmarkScore>,
}

impl Inspector {
    pub fn new(source: impl InspectorSource + 'static) -> Self {
        Self { source: Box::new(source) }
    }

    #[instrument(skip(self, servers), fields(vendor_id, servers = servers.len()))]
    pub async fn inspect(&self, vendor_id: &str, servers: Vec<Server>) -> Result<InspectionResult> {
        let root = self.source.root().await?;

        let mut hydrated = Vec::with_capacity(servers.len());
        let mut benchmarks = Vec::new();
        let mut scores = Vec::new();

        for server in servers {
            let api_reference = server.api_reference.clone();
            let vcpus = server.vcpus;
            let server = hydrate::hydrate(server, &root, vendor_id).await;

            let harvest = benchmark::harvest_all(&root, vendor_id, &server.server_id, &api_reference, vcpus).await;
            benchmarks.extend(harvest.benchmarks);
            scores.extend(harvest.scores);

            hydrated.push(server);
        }

        Ok(InspectionResult { servers: hydrated, benchmarks, scores })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::FixtureSource;
    use sc_schema::enums::{CpuAllocation, CpuArchitecture};
    use sc_schema::status::MetaColumns;

    fn server(server_id: &str, api_reference: &str) -> Server {
        Server {
            vendor_id: "hcloud".into(),
            server_id: server_id.into(),
            name: server_id.into(),
            api_reference: api_reference.into(),
            display_name: server_id.into(),
            description: None,
            family: None,
            vcpus: 2,
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
            memory_amount: 4096,
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
            inbound_traffic: 0.0,
            outbound_traffic: 0.0,
            ipv4: 1,
            meta: MetaColumns::observed_now(),
        }
    }

    #[tokio::test]
    async fn inspecting_without_matching_dataset_entries_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let inspector = Inspector::new(FixtureSource::new(dir.path()));

        let result = inspector.inspect("hcloud", vec![server("cx11", "cx11")]).await.unwrap();
        assert_eq!(result.servers.len(), 1);
        assert!(result.benchmarks.is_empty());
        assert!(result.scores.is_empty());
        assert!(result.servers[0].cpu_manufacturer.is_none());
    }

    #[tokio::test]
    async fn inspecting_hydrates_and_harvests_from_fixture() {
        let dir = tempfile::tempdir().unwrap();
        let lscpu_dir = dir.path().join("hcloud").join("cx11").join("lscpu");
        tokio::fs::create_dir_all(&lscpu_dir).await.unwrap();
        tokio::fs::write(lscpu_dir.join("stdout"), "BogoMIPS: 4800.00\nFlags: fpu vme de\n").await.unwrap();

        let inspector = Inspector::new(FixtureSource::new(dir.path()));
        let result = inspector.inspect("hcloud", vec![server("cx11", "cx11")]).await.unwrap();

        assert_eq!(result.scores.len(), 1);
        assert_eq!(result.benchmarks.len(), 1);
        assert_eq!(result.servers[0].cpu_flags, vec!["fpu", "vme", "de"]);
    }
}
