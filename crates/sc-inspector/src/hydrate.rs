//! Fills in the `Server` fields an adapter's catalog never reports but the
//! inspector's probes do (§4.6a): CPU topology/cache/flags from
//! `dmidecode`/`lscpu`, memory generation/speed from `dmidecode`, and GPU
//! fields from `nvidia-smi`.
//!
//! Hydration only ever fills a field that is currently `None`/empty — an
//! adapter's own catalog value always wins over the inspector's guess.

use sc_schema::entities::Server;
use sc_schema::enums::MemoryGeneration;
use sc_schema::nested::Gpu;

use crate::layout;
use crate::parse::{dmidecode, lscpu, nvidia};

/// Standardizes the long-form vendor strings `dmidecode`/`lscpu` print
/// (`"Intel(R) Corporation"`, `"Advanced Micro Devices, Inc."`) down to the
/// short form the rest of the schema uses.
pub fn standardize_manufacturer(raw: &str) -> String {
    let lower = raw.to_lowercase();
    if lower.contains("intel") {
        "Intel".to_string()
    } else if lower.contains("advanced micro devices") || lower.contains("amd") {
        "AMD".to_string()
    } else if lower.contains("arm") {
        "ARM".to_string()
    } else if lower.contains("ampere") {
        "Ampere".to_string()
    } else if lower.contains("nvidia") {
        "NVIDIA".to_string()
    } else {
        raw.trim().to_string()
    }
}

/// `"Intel(R) Xeon(R) Platinum 8275CL CPU @ 3.00GHz"` → `"Xeon Platinum
/// 8275CL"`: drops registration marks, the trailing `CPU @ x.xxGHz`, and
/// the manufacturer name duplicated from the `Manufacturer` field.
fn clean_cpu_model(raw: &str, manufacturer: &str) -> String {
    let mut cleaned = raw.replace("(R)", "").replace("(T)", "").replace("(M)", "");
    if let Some(idx) = cleaned.find(" CPU @") {
        cleaned.truncate(idx);
    }
    for prefix in ["Intel", "AMD", "ARM", manufacturer] {
        if let Some(rest) = cleaned.trim().strip_prefix(prefix) {
            cleaned = rest.to_string();
        }
    }
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn memory_generation_from_type(raw: &str) -> Option<MemoryGeneration> {
    match raw.to_uppercase().as_str() {
        s if s.contains("DDR5") => Some(MemoryGeneration::Ddr5),
        s if s.contains("DDR4") => Some(MemoryGeneration::Ddr4),
        s if s.contains("DDR3") => Some(MemoryGeneration::Ddr3),
        _ => None,
    }
}

/// `"2933 MT/s"` / `"2933 MHz"` → `2933`.
fn leading_integer(raw: &str) -> Option<i64> {
    raw.split_whitespace().next()?.parse().ok()
}

pub async fn hydrate_cpu(mut server: Server, root: &std::path::Path, vendor_id: &str) -> Server {
    let dir = layout::framework_dir(root, vendor_id, &server.api_reference, "dmidecode");
    if let Some(text) = layout::read_text(&dir, "stdout").await {
        if let Some(block) = dmidecode::processor_blocks(&text).into_iter().next() {
            if server.cpu_manufacturer.is_none() {
                server.cpu_manufacturer = block.get("Manufacturer").map(|s| standardize_manufacturer(s));
            }
            if server.cpu_family.is_none() {
                server.cpu_family = block.get("Family").cloned();
            }
            if server.cpu_model.is_none() {
                if let Some(version) = block.get("Version") {
                    let manufacturer = server.cpu_manufacturer.as_deref().unwrap_or_default();
                    server.cpu_model = Some(clean_cpu_model(version, manufacturer));
                }
            }
            if server.cpu_speed.is_none() {
                server.cpu_speed = dmidecode::megahertz(&block, "Max Speed").map(|mhz| mhz as f64 / 1000.0);
            }
            if server.cpu_cores.is_none() {
                server.cpu_cores = block.get("Core Count").and_then(|s| s.parse().ok());
            }
        }
    }

    let lscpu_dir = layout::framework_dir(root, vendor_id, &server.api_reference, "lscpu");
    if let Some(text) = layout::read_text(&lscpu_dir, "stdout").await {
        let fields = lscpu::parse(&text);
        if server.cpu_l1_cache.is_none() {
            // L1 cache reported as separate instruction/data halves; sum them.
            let l1i = lscpu::cache_kib(&fields, "L1i cache").unwrap_or(0);
            let l1d = lscpu::cache_kib(&fields, "L1d cache").unwrap_or(0);
            if l1i > 0 || l1d > 0 {
                server.cpu_l1_cache = Some(i64::from(l1i + l1d));
            }
        }
        if server.cpu_l2_cache.is_none() {
            server.cpu_l2_cache = lscpu::cache_kib(&fields, "L2 cache").map(i64::from);
        }
        if server.cpu_l3_cache.is_none() {
            server.cpu_l3_cache = lscpu::cache_kib(&fields, "L3 cache").map(i64::from);
        }
        if server.cpu_flags.is_empty() {
            server.cpu_flags = lscpu::flags(&fields);
        }
    }

    server
}

pub async fn hydrate_memory(mut server: Server, root: &std::path::Path, vendor_id: &str) -> Server {
    let dir = layout::framework_dir(root, vendor_id, &server.api_reference, "dmidecode");
    if let Some(text) = layout::read_text(&dir, "stdout").await {
        if let Some(block) = dmidecode::memory_device_blocks(&text).into_iter().next() {
            if server.memory_generation.is_none() {
                server.memory_generation = block.get("Type").and_then(|t| memory_generation_from_type(t));
            }
            if server.memory_speed.is_none() {
                server.memory_speed = block.get("Speed").and_then(|s| leading_integer(s));
            }
        }
    }
    server
}

pub async fn hydrate_gpu(mut server: Server, root: &std::path::Path, vendor_id: &str) -> Server {
    if server.gpu_count <= 0.0 {
        return server;
    }
    let dir = layout::framework_dir(root, vendor_id, &server.api_reference, "nvidia-smi");
    let Some(xml) = layout::read_text(&dir, "stdout").await else {
        return server;
    };
    let reports = nvidia::parse(&xml);
    if reports.is_empty() {
        return server;
    }

    if server.gpus.is_empty() {
        server.gpus = reports
            .iter()
            .map(|r| Gpu {
                manufacturer: Some(r.manufacturer.clone()),
                family: r.family.clone(),
                model: Some(r.model.clone()),
                memory_mib: r.memory_mib.map(|m| m as i64),
                firmware_version: r.firmware_version.clone(),
            })
            .collect();
    }
    let first = &reports[0];
    if server.gpu_manufacturer.is_none() {
        server.gpu_manufacturer = Some(first.manufacturer.clone());
    }
    if server.gpu_family.is_none() {
        server.gpu_family = first.family.clone();
    }
    if server.gpu_model.is_none() {
        server.gpu_model = Some(first.model.clone());
    }
    if server.gpu_memory_min.is_none() {
        server.gpu_memory_min = reports.iter().filter_map(|r| r.memory_mib).min().map(|m| m as i64);
    }
    if server.gpu_memory_total.is_none() {
        let total: u64 = reports.iter().filter_map(|r| r.memory_mib).sum();
        if total > 0 {
            server.gpu_memory_total = Some(total as i64);
        }
    }
    server
}

pub async fn hydrate(server: Server, root: &std::path::Path, vendor_id: &str) -> Server {
    let server = hydrate_cpu(server, root, vendor_id).await;
    let server = hydrate_memory(server, root, vendor_id).await;
    hydrate_gpu(server, root, vendor_id).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standardizes_intel_manufacturer_string() {
        assert_eq!(standardize_manufacturer("Intel(R) Corporation"), "Intel");
    }

    #[test]
    fn standardizes_amd_manufacturer_string() {
        assert_eq!(standardize_manufacturer("Advanced Micro Devices, Inc."), "AMD");
    }

    #[test]
    fn cleans_cpu_model_string() {
        let cleaned = clean_cpu_model("Intel(R) Xeon(R) Platinum 8275CL CPU @ 3.00GHz", "Intel");
        assert_eq!(cleaned, "Xeon Platinum 8275CL");
    }

    #[test]
    fn maps_ddr4_memory_type() {
        assert_eq!(memory_generation_from_type("DDR4"), Some(MemoryGeneration::Ddr4));
    }

    fn server() -> Server {
        Server {
            vendor_id: "hcloud".into(),
            server_id: "cx11".into(),
            name: "cx11".into(),
            api_reference: "cx11".into(),
            display_name: "cx11".into(),
            description: None,
            family: None,
            vcpus: 2,
            hypervisor: None,
            cpu_allocation: sc_schema::enums::CpuAllocation::Shared,
            cpu_cores: None,
            cpu_speed: None,
            cpu_architecture: sc_schema::enums::CpuArchitecture::X86_64,
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
            meta: sc_schema::status::MetaColumns::observed_now(),
        }
    }

    #[tokio::test]
    async fn hydrate_cpu_sums_l1i_and_l1d_and_fills_cores_and_max_speed() {
        let dir = tempfile::tempdir().unwrap();
        let dmidecode_dir = dir.path().join("hcloud").join("cx11").join("dmidecode");
        tokio::fs::create_dir_all(&dmidecode_dir).await.unwrap();
        tokio::fs::write(
            dmidecode_dir.join("stdout"),
            "Processor Information\n\tManufacturer: Intel(R) Corporation\n\tCore Count: 8\n\tCurrent Speed: 2200 MHz\n\tMax Speed: 3000 MHz\n",
        )
        .await
        .unwrap();
        let lscpu_dir = dir.path().join("hcloud").join("cx11").join("lscpu");
        tokio::fs::create_dir_all(&lscpu_dir).await.unwrap();
        tokio::fs::write(lscpu_dir.join("stdout"), "L1i cache: 32K\nL1d cache: 32K\nL2 cache: 1024K\n").await.unwrap();

        let hydrated = hydrate_cpu(server(), dir.path(), "hcloud").await;

        assert_eq!(hydrated.cpu_cores, Some(8));
        assert_eq!(hydrated.cpu_speed, Some(3.0), "cpu_speed must come from Max Speed, not Current Speed");
        assert_eq!(hydrated.cpu_l1_cache, Some(64), "L1 cache must be L1i + L1d summed");
        assert_eq!(hydrated.cpu_l2_cache, Some(1024));
    }
}
