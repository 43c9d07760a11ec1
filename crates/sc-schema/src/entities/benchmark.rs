use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{Error, Result};
use crate::hash::Entity;
use crate::status::MetaColumns;
use crate::validate::Validate;

/// §3.1. Describes one benchmark kind (not an observation); seeded by the
/// inspector's framework registry (§4.6) rather than discovered per vendor.
/// Carries no SCD companion (§3.3, "except Benchmark itself").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Benchmark {
    pub benchmark_id: String,
    pub name: String,
    pub description: Option<String>,
    pub framework: String,
    #[serde(default)]
    pub config_fields: BTreeMap<String, String>,
    pub measurement: Option<String>,
    pub unit: Option<String>,
    pub higher_is_better: bool,
    #[serde(flatten)]
    pub meta: MetaColumns,
}

impl Benchmark {
    pub fn primary_keys() -> &'static [&'static str] {
        &["benchmark_id"]
    }
}

impl Validate for Benchmark {
    fn validate(&self) -> Result<()> {
        if self.benchmark_id.is_empty() {
            return Err(Error::MissingField {
                table: <Self as Entity>::table_name(),
                field: "benchmark_id",
            });
        }
        if self.framework.is_empty() {
            return Err(Error::MissingField {
                table: <Self as Entity>::table_name(),
                field: "framework",
            });
        }
        Ok(())
    }
}

impl Entity for Benchmark {
    fn table_name() -> &'static str {
        "benchmark"
    }

    fn primary_key_json(&self) -> serde_json::Value {
        json!({ "benchmark_id": self.benchmark_id })
    }

    fn attributes_json(&self) -> serde_json::Value {
        json!({
            "name": self.name,
            "description": self.description,
            "framework": self.framework,
            "config_fields": self.config_fields,
            "measurement": self.measurement,
            "unit": self.unit,
            "higher_is_better": self.higher_is_better,
            "status": self.meta.status.as_str(),
        })
    }

    fn observed_at(&self) -> DateTime<Utc> {
        self.meta.observed_at
    }
}
