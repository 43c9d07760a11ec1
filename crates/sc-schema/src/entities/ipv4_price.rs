use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::Result;
use crate::hash::Entity;
use crate::price::PriceFields;
use crate::status::MetaColumns;
use crate::validate::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ipv4Price {
    pub vendor_id: String,
    pub region_id: String,
    #[serde(flatten)]
    pub price: PriceFields,
    #[serde(flatten)]
    pub meta: MetaColumns,
}

impl Ipv4Price {
    pub fn primary_keys() -> &'static [&'static str] {
        &["vendor_id", "region_id"]
    }
}

impl Validate for Ipv4Price {
    fn validate(&self) -> Result<()> {
        self.price.validate(<Self as Entity>::table_name())
    }
}

impl Entity for Ipv4Price {
    fn table_name() -> &'static str {
        "ipv4_price"
    }

    fn primary_key_json(&self) -> serde_json::Value {
        json!({ "vendor_id": self.vendor_id, "region_id": self.region_id })
    }

    fn attributes_json(&self) -> serde_json::Value {
        json!({ "price": self.price, "status": self.meta.status.as_str() })
    }

    fn observed_at(&self) -> DateTime<Utc> {
        self.meta.observed_at
    }
}
