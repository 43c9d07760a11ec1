//! Parses `nvidia-smi -q -x`'s XML report into per-GPU hydration fields.
//!
//! Only the handful of elements hydration actually reads are modeled; the
//! rest of `nvidia-smi`'s (very large) XML schema is ignored by
//! `quick_xml`'s serde layer simply by not declaring fields for it.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct NvidiaSmiLog {
    #[serde(rename = "gpu", default)]
    gpu: Vec<GpuEntry>,
}

#[derive(Debug, Deserialize)]
struct GpuEntry {
    product_name: String,
    fb_memory_usage: FbMemoryUsage,
    #[serde(default)]
    vbios_version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FbMemoryUsage {
    total: String,
}

/// One GPU as read off the report: manufacturer is always NVIDIA (the tool
/// only ever reports on its own cards), family/model are split out of
/// `product_name`, and `memory_mib` is parsed out of the `"16160 MiB"`
/// style string `fb_memory_usage/total` uses.
#[derive(Debug, Clone, PartialEq)]
pub struct GpuReport {
    pub manufacturer: String,
    pub family: Option<String>,
    pub model: String,
    pub memory_mib: Option<u64>,
    pub firmware_version: Option<String>,
}

pub fn parse(xml: &str) -> Vec<GpuReport> {
    let log: NvidiaSmiLog = match quick_xml::de::from_str(xml) {
        Ok(log) => log,
        Err(_) => return Vec::new(),
    };
    log.gpu
        .into_iter()
        .map(|gpu| {
            let (family, model) = split_product_name(&gpu.product_name);
            GpuReport {
                manufacturer: "NVIDIA".to_string(),
                family,
                model,
                memory_mib: parse_mib(&gpu.fb_memory_usage.total),
                firmware_version: gpu.vbios_version,
            }
        })
        .collect()
}

/// `"Tesla V100-SXM2-16GB"` → `(Some("Tesla"), "V100-SXM2-16GB")`.
fn split_product_name(product_name: &str) -> (Option<String>, String) {
    match product_name.split_once(' ') {
        Some((family, model)) => (Some(family.to_string()), model.to_string()),
        None => (None, product_name.to_string()),
    }
}

fn parse_mib(total: &str) -> Option<u64> {
    total.split_whitespace().next()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0"?>
<nvidia_smi_log>
  <gpu id="00000000:00:04.0">
    <product_name>Tesla V100-SXM2-16GB</product_name>
    <vbios_version>88.00.4F.00.09</vbios_version>
    <fb_memory_usage>
      <total>16160 MiB</total>
      <used>0 MiB</used>
    </fb_memory_usage>
  </gpu>
</nvidia_smi_log>
"#;

    #[test]
    fn parses_single_gpu() {
        let gpus = parse(SAMPLE);
        assert_eq!(gpus.len(), 1);
        assert_eq!(gpus[0].manufacturer, "NVIDIA");
        assert_eq!(gpus[0].family.as_deref(), Some("Tesla"));
        assert_eq!(gpus[0].model, "V100-SXM2-16GB");
        assert_eq!(gpus[0].memory_mib, Some(16160));
    }

    #[test]
    fn malformed_xml_yields_empty_vec() {
        assert!(parse("not xml").is_empty());
    }
}
