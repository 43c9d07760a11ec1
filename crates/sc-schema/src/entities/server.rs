use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::enums::{CpuAllocation, CpuArchitecture, MemoryGeneration};
use crate::error::{Error, Result};
use crate::hash::Entity;
use crate::nested::{Cpu, Disk, Gpu};
use crate::status::MetaColumns;
use crate::validate::Validate;

/// §3.1. The richest entity in the model; most fields are optional because
/// an adapter only reports what the provider's catalog exposes, and the
/// inspector (§4.6) fills in the rest for servers it has probes for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    pub vendor_id: String,
    pub server_id: String,
    pub name: String,
    pub api_reference: String,
    pub display_name: String,
    pub description: Option<String>,
    pub family: Option<String>,
    pub vcpus: i32,
    pub hypervisor: Option<String>,
    pub cpu_allocation: CpuAllocation,
    pub cpu_cores: Option<i32>,
    pub cpu_speed: Option<f64>,
    pub cpu_architecture: CpuArchitecture,
    pub cpu_manufacturer: Option<String>,
    pub cpu_family: Option<String>,
    pub cpu_model: Option<String>,
    pub cpu_l1_cache: Option<i64>,
    pub cpu_l2_cache: Option<i64>,
    pub cpu_l3_cache: Option<i64>,
    #[serde(default)]
    pub cpu_flags: Vec<String>,
    #[serde(default)]
    pub cpus: Vec<Cpu>,
    pub memory_amount: i64,
    pub memory_generation: Option<MemoryGeneration>,
    pub memory_speed: Option<i64>,
    pub memory_ecc: Option<bool>,
    pub gpu_count: f64,
    pub gpu_memory_min: Option<i64>,
    pub gpu_memory_total: Option<i64>,
    pub gpu_manufacturer: Option<String>,
    pub gpu_family: Option<String>,
    pub gpu_model: Option<String>,
    #[serde(default)]
    pub gpus: Vec<Gpu>,
    pub storage_size: f64,
    pub storage_type: Option<String>,
    #[serde(default)]
    pub storages: Vec<Disk>,
    pub network_speed: Option<f64>,
    pub inbound_traffic: f64,
    pub outbound_traffic: f64,
    pub ipv4: i32,
    #[serde(flatten)]
    pub meta: MetaColumns,
}

impl Server {
    pub fn primary_keys() -> &'static [&'static str] {
        &["vendor_id", "server_id"]
    }
}

impl Validate for Server {
    fn validate(&self) -> Result<()> {
        if self.memory_amount <= 0 {
            return Err(Error::OutOfRange {
                table: <Self as Entity>::table_name(),
                field: "memory_amount",
                reason: format!("must be > 0, got {}", self.memory_amount),
            });
        }
        if self.vcpus <= 0 {
            return Err(Error::OutOfRange {
                table: <Self as Entity>::table_name(),
                field: "vcpus",
                reason: format!("must be > 0, got {}", self.vcpus),
            });
        }

        // Invariant 7: gpu_memory_total equals the sum of per-GPU memory
        // when gpus[] is populated.
        if !self.gpus.is_empty() {
            let sum: i64 = self.gpus.iter().filter_map(|g| g.memory_mib).sum();
            if let Some(total) = self.gpu_memory_total {
                if total != sum {
                    return Err(Error::GpuMemoryMismatch {
                        table: <Self as Entity>::table_name(),
                        total,
                        sum,
                    });
                }
            }
        }
        Ok(())
    }
}

impl Entity for Server {
    fn table_name() -> &'static str {
        "server"
    }

    fn primary_key_json(&self) -> serde_json::Value {
        json!({ "vendor_id": self.vendor_id, "server_id": self.server_id })
    }

    fn attributes_json(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(self).expect("Server always serializes");
        if let Some(obj) = value.as_object_mut() {
            obj.remove("vendor_id");
            obj.remove("server_id");
            obj.remove("observed_at");
        }
        value
    }

    fn observed_at(&self) -> DateTime<Utc> {
        self.meta.observed_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base(vcpus: i32, memory_amount: i64) -> Server {
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
            memory_amount,
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
            meta: crate::status::MetaColumns::observed_now(),
        }
    }

    #[test]
    fn rejects_non_positive_memory() {
        assert!(base(1, 0).validate().is_err());
    }

    #[test]
    fn rejects_gpu_memory_mismatch() {
        let mut s = base(1, 2048);
        s.gpus = vec![
            Gpu { memory_mib: Some(40960), ..Default::default() },
            Gpu { memory_mib: Some(40960), ..Default::default() },
        ];
        s.gpu_memory_total = Some(90000);
        assert!(s.validate().is_err());
    }

    #[test]
    fn accepts_consistent_gpu_memory() {
        let mut s = base(1, 2048);
        s.gpus = vec![
            Gpu { memory_mib: Some(40960), ..Default::default() },
            Gpu { memory_mib: Some(40960), ..Default::default() },
        ];
        s.gpu_memory_total = Some(81920);
        assert!(s.validate().is_ok());
    }
}
