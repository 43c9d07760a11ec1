//! Components C-E of the crawler: the progress tracker, the per-vendor
//! runtime binding, the adapter surface every vendor implements, the
//! inventory pipeline driver that wires them together, and the lookup
//! tables and disk cache that support it.

pub mod adapter;
pub mod cache;
pub mod error;
pub mod lookup;
pub mod pipeline;
pub mod progress;
pub mod vendor;

pub use adapter::Adapter;
pub use error::{CrateError, Result};
pub use pipeline::{Pipeline, PipelineSummary, StageOutcome};
pub use progress::ProgressTracker;
pub use vendor::{VendorContext, VendorRunner};
