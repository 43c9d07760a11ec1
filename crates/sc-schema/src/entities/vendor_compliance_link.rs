use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{Error, Result};
use crate::hash::Entity;
use crate::status::MetaColumns;
use crate::validate::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorComplianceLink {
    pub vendor_id: String,
    pub compliance_framework_id: String,
    pub comment: Option<String>,
    #[serde(flatten)]
    pub meta: MetaColumns,
}

impl VendorComplianceLink {
    pub fn primary_keys() -> &'static [&'static str] {
        &["vendor_id", "compliance_framework_id"]
    }
}

impl Validate for VendorComplianceLink {
    fn validate(&self) -> Result<()> {
        if self.vendor_id.is_empty() {
            return Err(Error::MissingField {
                table: <Self as Entity>::table_name(),
                field: "vendor_id",
            });
        }
        if self.compliance_framework_id.is_empty() {
            return Err(Error::MissingField {
                table: <Self as Entity>::table_name(),
                field: "compliance_framework_id",
            });
        }
        Ok(())
    }
}

impl Entity for VendorComplianceLink {
    fn table_name() -> &'static str {
        "vendor_compliance_link"
    }

    fn primary_key_json(&self) -> serde_json::Value {
        json!({
            "vendor_id": self.vendor_id,
            "compliance_framework_id": self.compliance_framework_id,
        })
    }

    fn attributes_json(&self) -> serde_json::Value {
        json!({ "comment": self.comment, "status": self.meta.status.as_str() })
    }

    fn observed_at(&self) -> DateTime<Utc> {
        self.meta.observed_at
    }
}
