use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::enums::StorageType;
use crate::error::{Error, Result};
use crate::hash::Entity;
use crate::status::MetaColumns;
use crate::validate::Validate;

/// §3.1. A block-storage offering, distinct from the `storages[]` attached
/// to a `Server`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Storage {
    pub vendor_id: String,
    pub storage_id: String,
    pub name: String,
    pub description: Option<String>,
    pub storage_type: StorageType,
    pub max_iops: Option<i64>,
    pub max_throughput: Option<f64>,
    pub min_size: Option<f64>,
    pub max_size: Option<f64>,
    #[serde(flatten)]
    pub meta: MetaColumns,
}

impl Storage {
    pub fn primary_keys() -> &'static [&'static str] {
        &["vendor_id", "storage_id"]
    }
}

impl Validate for Storage {
    fn validate(&self) -> Result<()> {
        if let (Some(min), Some(max)) = (self.min_size, self.max_size) {
            if min > max {
                return Err(Error::OutOfRange {
                    table: <Self as Entity>::table_name(),
                    field: "min_size",
                    reason: format!("min_size ({min}) > max_size ({max})"),
                });
            }
        }
        Ok(())
    }
}

impl Entity for Storage {
    fn table_name() -> &'static str {
        "storage"
    }

    fn primary_key_json(&self) -> serde_json::Value {
        json!({ "vendor_id": self.vendor_id, "storage_id": self.storage_id })
    }

    fn attributes_json(&self) -> serde_json::Value {
        json!({
            "name": self.name,
            "description": self.description,
            "storage_type": self.storage_type,
            "max_iops": self.max_iops,
            "max_throughput": self.max_throughput,
            "min_size": self.min_size,
            "max_size": self.max_size,
            "status": self.meta.status.as_str(),
        })
    }

    fn observed_at(&self) -> DateTime<Utc> {
        self.meta.observed_at
    }
}
