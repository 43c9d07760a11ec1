use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::enums::Allocation;
use crate::error::Result;
use crate::hash::Entity;
use crate::price::PriceFields;
use crate::status::MetaColumns;
use crate::validate::Validate;

/// §3.1. FKs to Vendor, Region, Zone, Server. `allocation` distinguishes the
/// ondemand/reserved pull (stage 5) from the spot pull (stage 6, §4.5).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerPrice {
    pub vendor_id: String,
    pub region_id: String,
    pub zone_id: String,
    pub server_id: String,
    pub allocation: Allocation,
    pub operating_system: String,
    #[serde(flatten)]
    pub price: PriceFields,
    #[serde(flatten)]
    pub meta: MetaColumns,
}

impl ServerPrice {
    pub fn primary_keys() -> &'static [&'static str] {
        &["vendor_id", "region_id", "zone_id", "server_id", "allocation"]
    }
}

impl Validate for ServerPrice {
    fn validate(&self) -> Result<()> {
        self.price.validate(<Self as Entity>::table_name())
    }
}

impl Entity for ServerPrice {
    fn table_name() -> &'static str {
        "server_price"
    }

    fn primary_key_json(&self) -> serde_json::Value {
        json!({
            "vendor_id": self.vendor_id,
            "region_id": self.region_id,
            "zone_id": self.zone_id,
            "server_id": self.server_id,
            "allocation": self.allocation,
        })
    }

    fn attributes_json(&self) -> serde_json::Value {
        json!({
            "operating_system": self.operating_system,
            "price": self.price,
            "status": self.meta.status.as_str(),
        })
    }

    fn observed_at(&self) -> DateTime<Utc> {
        self.meta.observed_at
    }
}
