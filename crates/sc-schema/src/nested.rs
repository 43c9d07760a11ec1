//! Nested JSON-valued types embedded in `Server` rows (`cpus[]`, `gpus[]`,
//! `storages[]`) and benchmark config maps.

use serde::{Deserialize, Serialize};

use crate::enums::StorageType;

/// One per-socket CPU entry in `Server.cpus[]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cpu {
    pub manufacturer: Option<String>,
    pub family: Option<String>,
    pub model: Option<String>,
    pub cores: Option<u32>,
    pub threads: Option<u32>,
    pub speed_ghz: Option<f64>,
}

/// One per-GPU entry in `Server.gpus[]`, hydrated from nvidia-smi XML by the
/// inspector (§4.6) or filled directly by an adapter that knows the shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Gpu {
    pub manufacturer: Option<String>,
    pub family: Option<String>,
    pub model: Option<String>,
    pub memory_mib: Option<i64>,
    pub firmware_version: Option<String>,
}

/// One per-disk entry in `Server.storages[]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Disk {
    pub size_gb: Option<f64>,
    pub storage_type: Option<StorageType>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gpu_memory_sums_for_invariant_check() {
        let gpus = vec![
            Gpu { memory_mib: Some(40960), ..Default::default() },
            Gpu { memory_mib: Some(40960), ..Default::default() },
        ];
        let sum: i64 = gpus.iter().filter_map(|g| g.memory_mib).sum();
        assert_eq!(sum, 81920);
    }
}
