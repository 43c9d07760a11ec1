//! Component F of the crawler (§4.6): fetches the external hardware/
//! benchmark dataset, hydrates `Server` rows with the fields it captures,
//! and harvests `Benchmark`/`BenchmarkScore` rows from it.

pub mod benchmark;
pub mod error;
pub mod hydrate;
pub mod inspector;
pub mod layout;
pub mod parse;
pub mod source;

pub use error::{Error, Result};
pub use inspector::{InspectionResult, Inspector};
pub use source::{FixtureSource, HttpArchiveSource, InspectorSource};
