//! Persistence engine: component B of the crawler (§4.2). Owns the SQLite
//! schema, the five-dialect DDL generator for the `schema` CLI subcommand,
//! and the upsert / mark-inactive / SCD-duplication / content-hashing
//! operations `sc-core`'s pipeline driver calls after each vendor pull.

pub mod ddl;
pub mod dialect;
pub mod engine;
pub mod error;
pub mod hash;
pub mod schema;

pub use dialect::Dialect;
pub use engine::{Engine, HashLevel};
pub use error::{Error, Result};
