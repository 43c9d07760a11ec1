//! `hash --connection-string=<url>` (§6.2): prints the DATABASE-level
//! content hash (§4.2, §8 invariant 8) as JSON to stdout.

use sc_core::CrateError;
use sc_db::{Engine, HashLevel};

/// `observed_at` is excluded so hashing the same logical snapshot twice
/// across separate pulls produces the same digest (§8 invariant 1).
const IGNORED_COLUMNS: &[&str] = &["observed_at"];

pub async fn execute(connection_string: &str) -> Result<(), CrateError> {
    let engine = Engine::connect(connection_string).await?;
    let hash = engine.hash_database(HashLevel::Database, IGNORED_COLUMNS).await?;
    println!("{}", serde_json::to_string_pretty(&hash).expect("hash value serializes"));
    Ok(())
}
