//! Static vendor declarations (§3.5 "Vendors are declared statically") and
//! the adapter binding the CLI's `pull` command needs to build a
//! [`VendorRunner`] per vendor.

use std::sync::Arc;

use chrono::Utc;
use sc_core::adapter::Adapter;
use sc_core::cache::DiskCache;
use sc_core::progress::ProgressTracker;
use sc_core::vendor::VendorRunner;
use sc_schema::entities::Vendor;
use sc_schema::status::MetaColumns;

use crate::alicloud::AlicloudAdapter;
use crate::aws::AwsAdapter;
use crate::azure::AzureAdapter;
use crate::gcp::GcpAdapter;
use crate::hcloud::HcloudAdapter;
use crate::ovh::OvhAdapter;
use crate::upcloud::UpcloudAdapter;

struct VendorDecl {
    vendor_id: &'static str,
    name: &'static str,
    homepage: &'static str,
    country_id: &'static str,
    founding_year: i32,
}

const VENDORS: &[VendorDecl] = &[
    VendorDecl { vendor_id: "aws", name: "Amazon Web Services", homepage: "https://aws.amazon.com", country_id: "US", founding_year: 2006 },
    VendorDecl { vendor_id: "azure", name: "Microsoft Azure", homepage: "https://azure.microsoft.com", country_id: "US", founding_year: 2010 },
    VendorDecl { vendor_id: "gcp", name: "Google Cloud Platform", homepage: "https://cloud.google.com", country_id: "US", founding_year: 2008 },
    VendorDecl { vendor_id: "hcloud", name: "Hetzner Cloud", homepage: "https://www.hetzner.com/cloud", country_id: "DE", founding_year: 2017 },
    VendorDecl { vendor_id: "ovh", name: "OVHcloud", homepage: "https://www.ovhcloud.com", country_id: "FR", founding_year: 2016 },
    VendorDecl { vendor_id: "upcloud", name: "UpCloud", homepage: "https://upcloud.com", country_id: "FI", founding_year: 2011 },
    VendorDecl { vendor_id: "alicloud", name: "Alibaba Cloud", homepage: "https://www.alibabacloud.com", country_id: "CN", founding_year: 2009 },
];

fn adapter_for(vendor_id: &str) -> Arc<dyn Adapter> {
    match vendor_id {
        "aws" => Arc::new(AwsAdapter::new()),
        "azure" => Arc::new(AzureAdapter::new()),
        "gcp" => Arc::new(GcpAdapter::new()),
        "hcloud" => Arc::new(HcloudAdapter::new()),
        "ovh" => Arc::new(OvhAdapter::new()),
        "upcloud" => Arc::new(UpcloudAdapter::new()),
        "alicloud" => Arc::new(AlicloudAdapter::new()),
        other => unreachable!("no adapter registered for vendor id `{other}`"),
    }
}

/// Every vendor id this build ships an adapter for, in declaration order.
pub fn known_vendor_ids() -> Vec<&'static str> {
    VENDORS.iter().map(|v| v.vendor_id).collect()
}

/// Builds one [`VendorRunner`] per declared vendor, optionally narrowed to
/// `selected` (an empty slice means "all"). Every runner shares `tracker` so
/// a CLI-driven progress display sees one combined view across vendors.
pub fn vendor_runners(tracker: &ProgressTracker, cache: &DiskCache, selected: &[String]) -> Vec<VendorRunner> {
    let observed_at = Utc::now();
    VENDORS
        .iter()
        .filter(|decl| selected.is_empty() || selected.iter().any(|id| id == decl.vendor_id))
        .map(|decl| {
            let vendor = Vendor {
                vendor_id: decl.vendor_id.to_string(),
                name: decl.name.to_string(),
                logo: None,
                homepage: decl.homepage.to_string(),
                country_id: decl.country_id.to_string(),
                state: None,
                city: None,
                address_line: None,
                zip_code: None,
                founding_year: decl.founding_year,
                status_page: None,
                meta: MetaColumns { status: sc_schema::Status::Active, observed_at },
            };
            VendorRunner::new(vendor, adapter_for(decl.vendor_id), tracker.clone(), cache.clone())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_declared_vendor_has_an_adapter() {
        for decl in VENDORS {
            let _ = adapter_for(decl.vendor_id);
        }
    }

    #[test]
    fn empty_selection_returns_every_vendor() {
        let tracker = ProgressTracker::new();
        let runners = vendor_runners(&tracker, &DiskCache::disabled(), &[]);
        assert_eq!(runners.len(), VENDORS.len());
    }

    #[test]
    fn selection_narrows_to_named_vendors() {
        let tracker = ProgressTracker::new();
        let runners = vendor_runners(&tracker, &DiskCache::disabled(), &["hcloud".to_string()]);
        assert_eq!(runners.len(), 1);
        assert_eq!(runners[0].vendor.vendor_id, "hcloud");
    }
}
