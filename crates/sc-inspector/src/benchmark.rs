//! Harvests `BenchmarkScore` rows (and the `Benchmark` definitions they
//! reference) out of the six frameworks' outputs (§4.6b). Each harvester is
//! independent: a server missing one framework's output simply contributes
//! no rows for it (§7 "Inspector miss").

use std::collections::BTreeMap;

use sc_schema::entities::{Benchmark, BenchmarkScore};
use sc_schema::status::MetaColumns;
use serde_json::{json, Value};

use crate::layout;

fn benchmark(
    benchmark_id: &str,
    name: &str,
    framework: &str,
    config_fields: &[(&str, &str)],
    measurement: Option<&str>,
    unit: Option<&str>,
    higher_is_better: bool,
) -> Benchmark {
    Benchmark {
        benchmark_id: benchmark_id.to_string(),
        name: name.to_string(),
        description: None,
        framework: framework.to_string(),
        config_fields: config_fields.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect::<BTreeMap<_, _>>(),
        measurement: measurement.map(str::to_string),
        unit: unit.map(str::to_string),
        higher_is_better,
        meta: MetaColumns::observed_now(),
    }
}

fn score(vendor_id: &str, server_id: &str, benchmark_id: &str, config: Value, value: f64, observed_at: chrono::DateTime<chrono::Utc>) -> BenchmarkScore {
    BenchmarkScore {
        vendor_id: vendor_id.to_string(),
        server_id: server_id.to_string(),
        benchmark_id: benchmark_id.to_string(),
        config,
        score: value,
        note: None,
        meta: MetaColumns { status: sc_schema::Status::Active, observed_at },
    }
}

/// `"aes-xts single-core"` → `"aes_xts_single_core"`.
fn slugify(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect::<String>()
        .split('_')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

pub struct Harvest {
    pub benchmarks: Vec<Benchmark>,
    pub scores: Vec<BenchmarkScore>,
}

impl Harvest {
    fn empty() -> Self {
        Self { benchmarks: Vec::new(), scores: Vec::new() }
    }
}

pub async fn harvest_bogomips(root: &std::path::Path, vendor_id: &str, server_id: &str, api_reference: &str) -> Harvest {
    let dir = layout::framework_dir(root, vendor_id, api_reference, "lscpu");
    let Some(text) = layout::read_text(&dir, "stdout").await else { return Harvest::empty() };
    let Some(bogomips) = crate::parse::lscpu::bogomips(&crate::parse::lscpu::parse(&text)) else { return Harvest::empty() };
    let observed_at = layout::read_meta(&dir).await.map(|m| m.end).unwrap_or_else(chrono::Utc::now);

    Harvest {
        benchmarks: vec![benchmark("bogomips", "BogoMIPS", "lscpu", &[], None, Some("bogomips"), true)],
        scores: vec![score(vendor_id, server_id, "bogomips", json!({}), bogomips, observed_at)],
    }
}

pub async fn harvest_bw_mem(root: &std::path::Path, vendor_id: &str, server_id: &str, api_reference: &str) -> Harvest {
    let dir = layout::framework_dir(root, vendor_id, api_reference, "bw_mem");
    let Some(text) = layout::read_text(&dir, "stdout").await else { return Harvest::empty() };
    let observed_at = layout::read_meta(&dir).await.map(|m| m.end).unwrap_or_else(chrono::Utc::now);

    let mut scores = Vec::new();
    for line in text.lines() {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let [what, size, value] = tokens[..] else { continue };
        let Ok(value) = value.parse::<f64>() else { continue };
        scores.push(score(vendor_id, server_id, "bw_mem", json!({ "what": what, "size": size }), value, observed_at));
    }
    if scores.is_empty() {
        return Harvest::empty();
    }
    Harvest {
        benchmarks: vec![benchmark("bw_mem", "Memory bandwidth", "bw_mem", &[("what", ""), ("size", "")], Some("bandwidth"), Some("MB/s"), true)],
        scores,
    }
}

#[derive(serde::Deserialize)]
struct CompressionRecord {
    threads: u32,
    #[serde(default)]
    extra_args: Option<String>,
    #[serde(default)]
    block_size: Option<String>,
    ratio: f64,
    compress: f64,
    decompress: f64,
}

pub async fn harvest_compression_text(root: &std::path::Path, vendor_id: &str, server_id: &str, api_reference: &str) -> Harvest {
    let dir = layout::framework_dir(root, vendor_id, api_reference, "compression_text");
    let Some(value) = layout::read_json(&dir, "parsed.json").await else { return Harvest::empty() };
    let observed_at = layout::read_meta(&dir).await.map(|m| m.end).unwrap_or_else(chrono::Utc::now);

    let Some(by_algo) = value.as_object() else { return Harvest::empty() };
    let mut scores = Vec::new();
    for (algo, by_level) in by_algo {
        let Some(by_level) = by_level.as_object() else { continue };
        for (level, records) in by_level {
            let Some(records) = records.as_array() else { continue };
            for record in records {
                let Ok(record) = serde_json::from_value::<CompressionRecord>(record.clone()) else { continue };
                let mut config = json!({
                    "algo": algo,
                    "compression_level": level,
                    "threads": record.threads,
                });
                if let Some(extra) = &record.extra_args {
                    config["extra_args"] = json!(extra);
                }
                if let Some(block_size) = &record.block_size {
                    config["block_size"] = json!(block_size);
                }
                scores.push(score(vendor_id, server_id, "compression_text:ratio", config.clone(), record.ratio, observed_at));
                scores.push(score(vendor_id, server_id, "compression_text:compress", config.clone(), record.compress, observed_at));
                scores.push(score(vendor_id, server_id, "compression_text:decompress", config, record.decompress, observed_at));
            }
        }
    }
    if scores.is_empty() {
        return Harvest::empty();
    }
    Harvest {
        benchmarks: vec![
            benchmark("compression_text:ratio", "Text compression ratio", "compression_text", &[("algo", ""), ("compression_level", ""), ("threads", "")], Some("ratio"), None, true),
            benchmark("compression_text:compress", "Text compression throughput", "compression_text", &[("algo", ""), ("compression_level", ""), ("threads", "")], Some("throughput"), Some("MB/s"), true),
            benchmark("compression_text:decompress", "Text decompression throughput", "compression_text", &[("algo", ""), ("compression_level", ""), ("threads", "")], Some("throughput"), Some("MB/s"), true),
        ],
        scores,
    }
}

#[derive(serde::Deserialize)]
struct GeekbenchRecord {
    score: f64,
    #[serde(default)]
    description: Option<String>,
}

pub async fn harvest_geekbench(root: &std::path::Path, vendor_id: &str, server_id: &str, api_reference: &str) -> Harvest {
    let dir = layout::framework_dir(root, vendor_id, api_reference, "geekbench");
    let Some(value) = layout::read_json(&dir, "parsed.json").await else { return Harvest::empty() };
    let meta = layout::read_meta(&dir).await;
    let observed_at = meta.as_ref().map(|m| m.end).unwrap_or_else(chrono::Utc::now);
    let framework_version = meta.and_then(|m| m.framework_version);

    let Some(by_cores) = value.as_object() else { return Harvest::empty() };
    let mut benchmarks = BTreeMap::new();
    let mut scores = Vec::new();
    for (cores, by_workload) in by_cores {
        let Some(by_workload) = by_workload.as_object() else { continue };
        for (workload, record) in by_workload {
            let Ok(record) = serde_json::from_value::<GeekbenchRecord>(record.clone()) else { continue };
            let benchmark_id = format!("geekbench:{}", slugify(workload));
            let mut config = json!({ "cores": cores });
            if let Some(version) = &framework_version {
                config["framework_version"] = json!(version);
            }
            benchmarks.entry(benchmark_id.clone()).or_insert_with(|| {
                let mut b = benchmark(&benchmark_id, workload, "geekbench", &[("cores", ""), ("framework_version", "")], Some("score"), Some("score"), true);
                b.description = record.description.clone();
                b
            });
            scores.push(score(vendor_id, server_id, &benchmark_id, config, record.score, observed_at));
        }
    }
    if scores.is_empty() {
        return Harvest::empty();
    }
    Harvest { benchmarks: benchmarks.into_values().collect(), scores }
}

#[derive(serde::Deserialize)]
struct OpensslRecord {
    algo: String,
    block_size: String,
    speed: f64,
}

pub async fn harvest_openssl(root: &std::path::Path, vendor_id: &str, server_id: &str, api_reference: &str) -> Harvest {
    let dir = layout::framework_dir(root, vendor_id, api_reference, "openssl");
    let Some(value) = layout::read_json(&dir, "parsed.json").await else { return Harvest::empty() };
    let meta = layout::read_meta(&dir).await;
    let observed_at = meta.as_ref().map(|m| m.end).unwrap_or_else(chrono::Utc::now);
    let framework_version = meta.and_then(|m| m.framework_version);

    let Some(records) = value.as_array() else { return Harvest::empty() };
    let mut scores = Vec::new();
    for record in records {
        let Ok(record) = serde_json::from_value::<OpensslRecord>(record.clone()) else { continue };
        let mut config = json!({ "algo": record.algo, "block_size": record.block_size });
        if let Some(version) = &framework_version {
            config["framework_version"] = json!(version);
        }
        scores.push(score(vendor_id, server_id, "openssl", config, record.speed, observed_at));
    }
    if scores.is_empty() {
        return Harvest::empty();
    }
    Harvest {
        benchmarks: vec![benchmark("openssl", "OpenSSL speed", "openssl", &[("algo", ""), ("block_size", ""), ("framework_version", "")], Some("throughput"), Some("MB/s"), true)],
        scores,
    }
}

/// `stress_ng`'s two output paths are counter-intuitively named in the
/// dataset: `stressng` holds the 1-core run and `stressngsinglecore` holds
/// the all-vcpus run.
pub async fn harvest_stress_ng(root: &std::path::Path, vendor_id: &str, server_id: &str, api_reference: &str, vcpus: i32) -> Harvest {
    let mut scores = Vec::new();
    for (path, cores) in [("stressng", 1), ("stressngsinglecore", vcpus)] {
        let dir = layout::framework_dir(root, vendor_id, api_reference, path);
        let Some(text) = layout::read_text(&dir, "stdout").await else { continue };
        let Some(line) = text.lines().find(|l| l.contains("bogo-ops-per-second-real-time")) else { continue };
        let Some(value) = line.split_whitespace().rev().find_map(|tok| tok.parse::<f64>().ok()) else { continue };
        let observed_at = layout::read_meta(&dir).await.map(|m| m.end).unwrap_or_else(chrono::Utc::now);
        scores.push(score(vendor_id, server_id, "stress_ng:cpu_all", json!({ "cores": cores }), value, observed_at));
    }
    if scores.is_empty() {
        return Harvest::empty();
    }
    Harvest {
        benchmarks: vec![benchmark("stress_ng:cpu_all", "stress-ng bogo-ops/s", "stress_ng", &[("cores", "")], Some("bogo-ops/s"), None, true)],
        scores,
    }
}

/// Runs all six harvesters for one server and merges the results.
pub async fn harvest_all(root: &std::path::Path, vendor_id: &str, server_id: &str, api_reference: &str, vcpus: i32) -> Harvest {
    let parts = [
        harvest_bogomips(root, vendor_id, server_id, api_reference).await,
        harvest_bw_mem(root, vendor_id, server_id, api_reference).await,
        harvest_compression_text(root, vendor_id, server_id, api_reference).await,
        harvest_geekbench(root, vendor_id, server_id, api_reference).await,
        harvest_openssl(root, vendor_id, server_id, api_reference).await,
        harvest_stress_ng(root, vendor_id, server_id, api_reference, vcpus).await,
    ];
    let mut merged = Harvest::empty();
    for part in parts {
        merged.benchmarks.extend(part.benchmarks);
        merged.scores.extend(part.scores);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugifies_workload_names() {
        assert_eq!(slugify("AES-XTS single-core"), "aes_xts_single_core");
    }

    #[tokio::test]
    async fn bogomips_harvest_reads_lscpu_output() {
        let dir = tempfile::tempdir().unwrap();
        let fw_dir = dir.path().join("hcloud").join("cx11").join("lscpu");
        tokio::fs::create_dir_all(&fw_dir).await.unwrap();
        tokio::fs::write(fw_dir.join("stdout"), "BogoMIPS: 4800.00\n").await.unwrap();

        let harvest = harvest_bogomips(dir.path(), "hcloud", "cx11", "cx11").await;
        assert_eq!(harvest.scores.len(), 1);
        assert_eq!(harvest.scores[0].score, 4800.00);
    }

    #[tokio::test]
    async fn missing_framework_output_yields_no_rows() {
        let dir = tempfile::tempdir().unwrap();
        let harvest = harvest_bogomips(dir.path(), "hcloud", "cx11", "cx11").await;
        assert!(harvest.scores.is_empty());
        assert!(harvest.benchmarks.is_empty());
    }
}
