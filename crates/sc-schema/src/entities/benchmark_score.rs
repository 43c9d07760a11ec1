use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{Error, Result};
use crate::hash::Entity;
use crate::status::MetaColumns;
use crate::validate::Validate;

/// §3.1. One observation produced by the inspector's benchmark harvesting
/// (§4.6b). `config` disambiguates repeated runs of the same benchmark with
/// different parameters (e.g. `compression_text` threads/block_size), so it
/// is part of the primary key rather than an attribute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkScore {
    pub vendor_id: String,
    pub server_id: String,
    pub benchmark_id: String,
    #[serde(default)]
    pub config: Value,
    pub score: f64,
    pub note: Option<String>,
    #[serde(flatten)]
    pub meta: MetaColumns,
}

impl BenchmarkScore {
    pub fn primary_keys() -> &'static [&'static str] {
        &["vendor_id", "server_id", "benchmark_id", "config"]
    }
}

impl Validate for BenchmarkScore {
    fn validate(&self) -> Result<()> {
        if self.benchmark_id.is_empty() {
            return Err(Error::MissingField {
                table: <Self as Entity>::table_name(),
                field: "benchmark_id",
            });
        }
        if !self.score.is_finite() {
            return Err(Error::OutOfRange {
                table: <Self as Entity>::table_name(),
                field: "score",
                reason: format!("score must be finite, got {}", self.score),
            });
        }
        Ok(())
    }
}

impl Entity for BenchmarkScore {
    fn table_name() -> &'static str {
        "benchmark_score"
    }

    fn primary_key_json(&self) -> serde_json::Value {
        json!({
            "vendor_id": self.vendor_id,
            "server_id": self.server_id,
            "benchmark_id": self.benchmark_id,
            "config": self.config,
        })
    }

    fn attributes_json(&self) -> serde_json::Value {
        json!({
            "score": self.score,
            "note": self.note,
            "status": self.meta.status.as_str(),
        })
    }

    fn observed_at(&self) -> DateTime<Utc> {
        self.meta.observed_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_nonfinite_score() {
        let bs = BenchmarkScore {
            vendor_id: "hcloud".into(),
            server_id: "cx11".into(),
            benchmark_id: "bogomips".into(),
            config: json!({}),
            score: f64::NAN,
            note: None,
            meta: MetaColumns::observed_now(),
        };
        assert!(bs.validate().is_err());
    }
}
