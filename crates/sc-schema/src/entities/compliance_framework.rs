use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::hash::Entity;
use crate::status::MetaColumns;

/// Seeded once from a static registry (§3.5), used as a lookup by
/// `VendorComplianceLink`; no SCD companion (§3.3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceFramework {
    pub compliance_framework_id: String,
    pub name: String,
    pub abbreviation: Option<String>,
    pub description: Option<String>,
    pub logo: Option<String>,
    pub homepage: Option<String>,
    #[serde(flatten)]
    pub meta: MetaColumns,
}

impl ComplianceFramework {
    pub fn primary_keys() -> &'static [&'static str] {
        &["compliance_framework_id"]
    }
}

impl Entity for ComplianceFramework {
    fn table_name() -> &'static str {
        "compliance_framework"
    }

    fn primary_key_json(&self) -> serde_json::Value {
        json!({ "compliance_framework_id": self.compliance_framework_id })
    }

    fn attributes_json(&self) -> serde_json::Value {
        json!({
            "name": self.name,
            "abbreviation": self.abbreviation,
            "description": self.description,
            "logo": self.logo,
            "homepage": self.homepage,
            "status": self.meta.status.as_str(),
        })
    }

    fn observed_at(&self) -> DateTime<Utc> {
        self.meta.observed_at
    }
}
