//! Row and database content hashing (§4.1, §4.2, §4.8).
//!
//! Every entity exposes `hash()` — a stable SHA-1 over its JSON-sorted,
//! non-PK attributes — used both for per-row change detection and to build
//! up `hash_database` at the TABLE/DATABASE level in `sc-db`.

use chrono::{DateTime, Utc};
use serde_json::Value;
use sha1::{Digest, Sha1};

/// Recursively sort object keys so two semantically-equal JSON values always
/// serialize to the same byte string, regardless of field declaration order.
pub fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut sorted: Vec<(&String, &Value)> = map.iter().collect();
            sorted.sort_by(|a, b| a.0.cmp(b.0));
            let mut out = serde_json::Map::new();
            for (k, v) in sorted {
                out.insert(k.clone(), canonicalize(v));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

/// SHA-1 over the canonical JSON serialization of a value, hex-encoded.
pub fn sha1_hex_json(value: &Value) -> String {
    let canonical = canonicalize(value);
    let bytes = serde_json::to_vec(&canonical).expect("canonical JSON values always serialize");
    let mut hasher = Sha1::new();
    hasher.update(&bytes);
    hex::encode(hasher.finalize())
}

/// An entity type that can describe its own primary key and attributes as
/// JSON, the basis for `primary_keys()`/`attributes()`/`hash()` (§4.1).
pub trait Entity {
    /// Table name as used in the database and in error messages.
    fn table_name() -> &'static str;

    /// The primary-key columns, in declaration order, as a JSON object.
    fn primary_key_json(&self) -> Value;

    /// All non-PK, non-meta columns (i.e. excluding `status`/`observed_at`
    /// too, in addition to the PK) as a JSON object.
    fn attributes_json(&self) -> Value;

    /// The `observed_at` meta column (§3.1), kept out of `attributes_json`
    /// so `content_hash` can ignore it per the §4.1 `hash()` contract while
    /// `sc-db` still has it available to persist and to order SCD rows.
    fn observed_at(&self) -> DateTime<Utc>;

    /// The full row as stored: primary key + attributes + `observed_at`,
    /// used by `sc-db`'s upsert/SCD-duplication path.
    fn row_json(&self) -> Value {
        let mut map = match self.primary_key_json() {
            Value::Object(m) => m,
            other => panic!("primary_key_json() must return an object, got {other}"),
        };
        if let Value::Object(attrs) = self.attributes_json() {
            map.extend(attrs);
        }
        map.insert(
            "observed_at".to_string(),
            Value::String(self.observed_at().to_rfc3339()),
        );
        Value::Object(map)
    }

    /// Stable content hash over `attributes_json()`, ignoring `observed_at`
    /// per §4.1's `hash(row, ignored={"observed_at"})` contract. `status` is
    /// part of content on purpose: a tombstoned row must hash differently
    /// from its active counterpart for idempotence checks (§8.2) to see the
    /// transition.
    fn content_hash(&self) -> String {
        sha1_hex_json(&self.attributes_json())
    }

    /// JSON-serialized primary key, used as the map key for
    /// `hash_database(ROW)` (§4.2).
    fn primary_key_string(&self) -> String {
        let canonical = canonicalize(&self.primary_key_json());
        serde_json::to_string(&canonical).expect("canonical JSON values always serialize")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn canonicalization_is_order_independent() {
        let a = json!({"b": 1, "a": 2});
        let b = json!({"a": 2, "b": 1});
        assert_eq!(sha1_hex_json(&a), sha1_hex_json(&b));
    }

    #[test]
    fn nested_objects_are_canonicalized_too() {
        let a = json!({"outer": {"z": 1, "y": 2}});
        let b = json!({"outer": {"y": 2, "z": 1}});
        assert_eq!(sha1_hex_json(&a), sha1_hex_json(&b));
    }
}
