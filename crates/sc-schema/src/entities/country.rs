use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::hash::Entity;
use crate::status::MetaColumns;

/// Seeded once from a static registry (§3.5); not discovered by any
/// adapter and carries no SCD companion (§3.3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Country {
    /// ISO-3166 alpha-2 code, e.g. `"DE"`.
    pub country_id: String,
    pub continent: String,
    #[serde(flatten)]
    pub meta: MetaColumns,
}

impl Country {
    pub fn primary_keys() -> &'static [&'static str] {
        &["country_id"]
    }
}

impl Entity for Country {
    fn table_name() -> &'static str {
        "country"
    }

    fn primary_key_json(&self) -> serde_json::Value {
        json!({ "country_id": self.country_id })
    }

    fn attributes_json(&self) -> serde_json::Value {
        json!({ "continent": self.continent, "status": self.meta.status.as_str() })
    }

    fn observed_at(&self) -> DateTime<Utc> {
        self.meta.observed_at
    }
}
