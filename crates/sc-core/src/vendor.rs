//! Per-vendor runtime binding (§4.4, §9 "Private attributes on persisted
//! entities"). The persisted `Vendor` record in `sc_schema` stays a pure
//! value; this module owns the session/tracker/adapter binding the source
//! attached directly onto the ORM object.

use std::sync::Arc;

use sc_schema::entities::Vendor;

use crate::adapter::Adapter;
use crate::cache::DiskCache;
use crate::progress::ProgressTracker;

/// Lent to an adapter on every `inventory_*` call (§4.4): the adapter reads
/// `vendor_id` for logging/caching, reports progress through `tracker`, and
/// may consult `cache` instead of re-fetching a value it already has. No
/// shipped adapter reads `cache` yet; it's threaded through so one can start
/// without changing the `Adapter` trait or this struct's shape.
#[derive(Clone)]
pub struct VendorContext {
    pub vendor_id: String,
    pub tracker: ProgressTracker,
    pub cache: DiskCache,
}

impl VendorContext {
    pub fn new(vendor_id: impl Into<String>, tracker: ProgressTracker, cache: DiskCache) -> Self {
        Self { vendor_id: vendor_id.into(), tracker, cache }
    }
}

/// Binds a declared [`Vendor`] record to its adapter and a shared tracker.
/// Built once at startup by the vendor registry; the pipeline driver
/// borrows it for the duration of one vendor's pull.
pub struct VendorRunner {
    pub vendor: Vendor,
    pub adapter: Arc<dyn Adapter>,
    pub context: VendorContext,
}

impl VendorRunner {
    pub fn new(vendor: Vendor, adapter: Arc<dyn Adapter>, tracker: ProgressTracker, cache: DiskCache) -> Self {
        let context = VendorContext::new(vendor.vendor_id.clone(), tracker, cache);
        Self { vendor, adapter, context }
    }
}
