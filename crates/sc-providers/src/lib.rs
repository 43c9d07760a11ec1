//! One module per vendor (§3.5, §4.7), plus the static vendor registry that
//! binds each declared [`Vendor`] record to its [`Adapter`] impl. Adapters
//! never reach into the database themselves — everything here is pure
//! functions over HTTP responses and manual tables.

pub mod alicloud;
pub mod aws;
pub mod azure;
pub mod common;
pub mod gcp;
pub mod hcloud;
pub mod ovh;
pub mod registry;
pub mod upcloud;

pub use registry::{known_vendor_ids, vendor_runners};
