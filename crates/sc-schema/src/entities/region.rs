use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{Error, Result};
use crate::hash::Entity;
use crate::status::MetaColumns;
use crate::validate::Validate;

/// §3.1. Historically named `Datacenter` in the source; per the Design
/// Notes (§9) this port uses the current name exclusively.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Region {
    pub vendor_id: String,
    pub region_id: String,
    pub name: String,
    pub api_reference: String,
    pub display_name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    pub country_id: String,
    pub state: Option<String>,
    pub city: Option<String>,
    pub address_line: Option<String>,
    pub zip_code: Option<String>,
    pub lon: Option<f64>,
    pub lat: Option<f64>,
    pub founding_year: Option<i32>,
    pub green_energy: Option<bool>,
    #[serde(flatten)]
    pub meta: MetaColumns,
}

impl Region {
    pub fn primary_keys() -> &'static [&'static str] {
        &["vendor_id", "region_id"]
    }
}

impl Validate for Region {
    fn validate(&self) -> Result<()> {
        if self.vendor_id.is_empty() {
            return Err(Error::MissingField { table: <Self as Entity>::table_name(), field: "vendor_id" });
        }
        if self.region_id.is_empty() {
            return Err(Error::MissingField { table: <Self as Entity>::table_name(), field: "region_id" });
        }
        Ok(())
    }
}

impl Entity for Region {
    fn table_name() -> &'static str {
        "region"
    }

    fn primary_key_json(&self) -> serde_json::Value {
        json!({ "vendor_id": self.vendor_id, "region_id": self.region_id })
    }

    fn attributes_json(&self) -> serde_json::Value {
        json!({
            "name": self.name,
            "api_reference": self.api_reference,
            "display_name": self.display_name,
            "aliases": self.aliases,
            "country_id": self.country_id,
            "state": self.state,
            "city": self.city,
            "address_line": self.address_line,
            "zip_code": self.zip_code,
            "lon": self.lon,
            "lat": self.lat,
            "founding_year": self.founding_year,
            "green_energy": self.green_energy,
            "status": self.meta.status.as_str(),
        })
    }

    fn observed_at(&self) -> DateTime<Utc> {
        self.meta.observed_at
    }
}
