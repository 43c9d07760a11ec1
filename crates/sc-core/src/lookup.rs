//! Country→continent map and compliance-framework registry (§3.5, §4.8 H).
//! Seeded once at startup, not discovered by any adapter.

use chrono::Utc;
use sc_schema::entities::{ComplianceFramework, Country};
use sc_schema::hash::Entity;
use sc_schema::status::{MetaColumns, Status};
use serde_json::Value;

use crate::error::Result;

/// `(country_id, continent)`, covering every country the shipped vendor
/// adapters place a region in; extend this list before adding a new adapter
/// whose regions land somewhere new.
const COUNTRIES: &[(&str, &str)] = &[
    ("US", "North America"),
    ("CA", "North America"),
    ("BR", "South America"),
    ("DE", "Europe"),
    ("FI", "Europe"),
    ("FR", "Europe"),
    ("NL", "Europe"),
    ("GB", "Europe"),
    ("IE", "Europe"),
    ("SE", "Europe"),
    ("IT", "Europe"),
    ("ES", "Europe"),
    ("PL", "Europe"),
    ("BE", "Europe"),
    ("SG", "Asia"),
    ("JP", "Asia"),
    ("IN", "Asia"),
    ("AE", "Asia"),
    ("CN", "Asia"),
    ("TW", "Asia"),
    ("AU", "Oceania"),
    ("ZA", "Africa"),
];

const COMPLIANCE_FRAMEWORKS: &[(&str, &str, Option<&str>)] = &[
    ("iso27001", "ISO/IEC 27001", Some("ISO 27001")),
    ("soc2", "SOC 2", Some("SOC 2")),
    ("pci_dss", "Payment Card Industry Data Security Standard", Some("PCI DSS")),
    ("hipaa", "Health Insurance Portability and Accountability Act", Some("HIPAA")),
    ("gdpr", "General Data Protection Regulation", Some("GDPR")),
];

/// Upserts the static registries (§3.5's "seeded once"). Idempotent: safe to
/// call at the start of every `pull` invocation.
pub async fn seed(engine: &sc_db::Engine) -> Result<()> {
    let observed_at = Utc::now();
    let meta = || MetaColumns { status: Status::Active, observed_at };

    let countries: Vec<Value> = COUNTRIES
        .iter()
        .map(|(id, continent)| {
            Country { country_id: (*id).to_string(), continent: (*continent).to_string(), meta: meta() }.row_json()
        })
        .collect();
    engine.upsert("country", &countries).await?;

    let frameworks: Vec<Value> = COMPLIANCE_FRAMEWORKS
        .iter()
        .map(|(id, name, abbreviation)| {
            ComplianceFramework {
                compliance_framework_id: (*id).to_string(),
                name: (*name).to_string(),
                abbreviation: abbreviation.map(str::to_string),
                description: None,
                logo: None,
                homepage: None,
                meta: meta(),
            }
            .row_json()
        })
        .collect();
    engine.upsert("compliance_framework", &frameworks).await?;

    Ok(())
}

pub fn continent_for(country_id: &str) -> Option<&'static str> {
    COUNTRIES.iter().find(|(id, _)| *id == country_id).map(|(_, continent)| *continent)
}

/// Every `compliance_framework_id` the registry seeds, for the pipeline's
/// referential check on `VendorComplianceLink` (§7, invariant 2).
pub fn known_compliance_framework_ids() -> impl Iterator<Item = &'static str> {
    COMPLIANCE_FRAMEWORKS.iter().map(|(id, _, _)| *id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_country_resolves_to_its_continent() {
        assert_eq!(continent_for("DE"), Some("Europe"));
    }

    #[test]
    fn unknown_country_resolves_to_none() {
        assert_eq!(continent_for("XX"), None);
    }
}
