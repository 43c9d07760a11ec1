//! The inspector dataset's on-disk layout (§4.6):
//! `<vendor_id>/<server_api_reference>/<framework>/{stdout,stderr,meta.json,parsed.json,results.json}`.
//!
//! All reads here are "miss is fine": a missing file is the normal shape of
//! a server the dataset producer never probed, not an error (§7 "Inspector
//! miss" — non-fatal, logged at debug, field/benchmark left untouched).

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

pub fn framework_dir(root: &Path, vendor_id: &str, api_reference: &str, framework: &str) -> PathBuf {
    root.join(vendor_id).join(api_reference).join(framework)
}

/// `meta.json`'s well-known fields: the framework run's wall-clock bounds
/// and the tool version, used as `observed_at` for harvested benchmark
/// scores (§4.6 — "not the pull time") and as benchmark config context.
#[derive(Debug, Clone, Deserialize)]
pub struct Meta {
    pub start: Option<DateTime<Utc>>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub framework_version: Option<String>,
}

pub async fn read_text(dir: &Path, file: &str) -> Option<String> {
    match tokio::fs::read_to_string(dir.join(file)).await {
        Ok(s) => Some(s),
        Err(err) => {
            debug!(path = %dir.join(file).display(), %err, "inspector file missing or unreadable");
            None
        }
    }
}

pub async fn read_json(dir: &Path, file: &str) -> Option<Value> {
    let text = read_text(dir, file).await?;
    match serde_json::from_str(&text) {
        Ok(v) => Some(v),
        Err(err) => {
            debug!(path = %dir.join(file).display(), %err, "inspector JSON file is corrupt");
            None
        }
    }
}

pub async fn read_meta(dir: &Path) -> Option<Meta> {
    let value = read_json(dir, "meta.json").await?;
    match serde_json::from_value(value) {
        Ok(meta) => Some(meta),
        Err(err) => {
            debug!(path = %dir.join("meta.json").display(), %err, "inspector meta.json is malformed");
            None
        }
    }
}
