//! The entities of §3.1, one module each. Lookup-only entities
//! (`Country`, `ComplianceFramework`) and `Vendor` sit alongside the
//! discovered entities; only the latter go through the inventory pipeline.

mod benchmark;
mod benchmark_score;
mod compliance_framework;
mod country;
mod ipv4_price;
mod region;
mod server;
mod server_price;
mod storage;
mod storage_price;
mod traffic_price;
mod vendor;
mod vendor_compliance_link;
mod zone;

pub use benchmark::Benchmark;
pub use benchmark_score::BenchmarkScore;
pub use compliance_framework::ComplianceFramework;
pub use country::Country;
pub use ipv4_price::Ipv4Price;
pub use region::Region;
pub use server::Server;
pub use server_price::ServerPrice;
pub use storage::Storage;
pub use storage_price::StoragePrice;
pub use traffic_price::TrafficPrice;
pub use vendor::Vendor;
pub use vendor_compliance_link::VendorComplianceLink;
pub use zone::Zone;
