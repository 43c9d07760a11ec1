use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CpuAllocation {
    Shared,
    Burstable,
    Dedicated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CpuArchitecture {
    #[serde(rename = "ARM64")]
    Arm64,
    #[serde(rename = "ARM64_MAC")]
    Arm64Mac,
    #[serde(rename = "I386")]
    I386,
    #[serde(rename = "X86_64")]
    X86_64,
    #[serde(rename = "X86_64_MAC")]
    X86_64Mac,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StorageType {
    Hdd,
    Ssd,
    #[serde(rename = "NVME_SSD")]
    NvmeSsd,
    Network,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemoryGeneration {
    #[serde(rename = "DDR3")]
    Ddr3,
    #[serde(rename = "DDR4")]
    Ddr4,
    #[serde(rename = "DDR5")]
    Ddr5,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TrafficDirection {
    In,
    Out,
}

/// The purchasing model of a server instance (§3.1 ServerPrice, glossary).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Allocation {
    Ondemand,
    Reserved,
    Spot,
}

impl Allocation {
    pub fn as_str(self) -> &'static str {
        match self {
            Allocation::Ondemand => "ONDEMAND",
            Allocation::Reserved => "RESERVED",
            Allocation::Spot => "SPOT",
        }
    }
}
