use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::enums::TrafficDirection;
use crate::error::Result;
use crate::hash::Entity;
use crate::price::PriceFields;
use crate::status::MetaColumns;
use crate::validate::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrafficPrice {
    pub vendor_id: String,
    pub region_id: String,
    pub direction: TrafficDirection,
    #[serde(flatten)]
    pub price: PriceFields,
    #[serde(flatten)]
    pub meta: MetaColumns,
}

impl TrafficPrice {
    pub fn primary_keys() -> &'static [&'static str] {
        &["vendor_id", "region_id", "direction"]
    }
}

impl Validate for TrafficPrice {
    fn validate(&self) -> Result<()> {
        self.price.validate(<Self as Entity>::table_name())
    }
}

impl Entity for TrafficPrice {
    fn table_name() -> &'static str {
        "traffic_price"
    }

    fn primary_key_json(&self) -> serde_json::Value {
        json!({ "vendor_id": self.vendor_id, "region_id": self.region_id, "direction": self.direction })
    }

    fn attributes_json(&self) -> serde_json::Value {
        json!({ "price": self.price, "status": self.meta.status.as_str() })
    }

    fn observed_at(&self) -> DateTime<Utc> {
        self.meta.observed_at
    }
}
