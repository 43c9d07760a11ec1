use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{Error, Result};
use crate::hash::Entity;
use crate::status::MetaColumns;
use crate::validate::Validate;

/// §3.1. FK (vendor_id, region_id) → Region. Adapters for providers without
/// a zone concept synthesize a dummy 1:1 zone per region (§4.7).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Zone {
    pub vendor_id: String,
    pub region_id: String,
    pub zone_id: String,
    pub name: String,
    pub api_reference: String,
    pub display_name: String,
    #[serde(flatten)]
    pub meta: MetaColumns,
}

impl Zone {
    pub fn primary_keys() -> &'static [&'static str] {
        &["vendor_id", "region_id", "zone_id"]
    }
}

impl Validate for Zone {
    fn validate(&self) -> Result<()> {
        if self.zone_id.is_empty() {
            return Err(Error::MissingField { table: <Self as Entity>::table_name(), field: "zone_id" });
        }
        Ok(())
    }
}

impl Entity for Zone {
    fn table_name() -> &'static str {
        "zone"
    }

    fn primary_key_json(&self) -> serde_json::Value {
        json!({ "vendor_id": self.vendor_id, "region_id": self.region_id, "zone_id": self.zone_id })
    }

    fn attributes_json(&self) -> serde_json::Value {
        json!({
            "name": self.name,
            "api_reference": self.api_reference,
            "display_name": self.display_name,
            "status": self.meta.status.as_str(),
        })
    }

    fn observed_at(&self) -> DateTime<Utc> {
        self.meta.observed_at
    }
}
