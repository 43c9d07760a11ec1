use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::hash::Entity;
use crate::status::MetaColumns;

/// Declared statically, one record per supported provider (§3.5). The
/// persisted record is a pure value — the session/tracker/adapter binding
/// lives in `sc-core`'s `VendorRunner`, not here (§9, "Private attributes on
/// persisted entities").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vendor {
    pub vendor_id: String,
    pub name: String,
    pub logo: Option<String>,
    pub homepage: String,
    pub country_id: String,
    pub state: Option<String>,
    pub city: Option<String>,
    pub address_line: Option<String>,
    pub zip_code: Option<String>,
    pub founding_year: i32,
    pub status_page: Option<String>,
    #[serde(flatten)]
    pub meta: MetaColumns,
}

impl Vendor {
    pub fn primary_keys() -> &'static [&'static str] {
        &["vendor_id"]
    }
}

impl Entity for Vendor {
    fn table_name() -> &'static str {
        "vendor"
    }

    fn primary_key_json(&self) -> serde_json::Value {
        json!({ "vendor_id": self.vendor_id })
    }

    fn attributes_json(&self) -> serde_json::Value {
        json!({
            "name": self.name,
            "logo": self.logo,
            "homepage": self.homepage,
            "country_id": self.country_id,
            "state": self.state,
            "city": self.city,
            "address_line": self.address_line,
            "zip_code": self.zip_code,
            "founding_year": self.founding_year,
            "status_page": self.status_page,
            "status": self.meta.status.as_str(),
        })
    }

    fn observed_at(&self) -> DateTime<Utc> {
        self.meta.observed_at
    }
}
