//! Database-level content hashing (§4.2/§8). Delegates canonicalization and
//! per-row hashing to [`sc_schema::hash`] so a row's hash computed here from
//! a raw SQL read agrees bit-for-bit with the same row's `content_hash()`
//! computed in `sc-schema` straight off a freshly-pulled entity.

use serde_json::Value;
use sha1::{Digest, Sha1};

pub use sc_schema::hash::sha1_hex_json as hash_value;

/// Combines an ordered list of child hashes into one parent hash, used to
/// roll row hashes up into a table hash and table hashes up into the
/// database hash (§8's "hash of hashes").
pub fn combine(hashes: &[String]) -> String {
    let mut hasher = Sha1::new();
    for h in hashes {
        hasher.update(h.as_bytes());
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn key_order_does_not_affect_the_hash() {
        let a: Value = json!({"b": 1, "a": 2});
        let b: Value = json!({"a": 2, "b": 1});
        assert_eq!(hash_value(&a), hash_value(&b));
    }

    #[test]
    fn combining_the_same_hashes_in_order_is_stable() {
        let hashes = vec!["abc".to_string(), "def".to_string()];
        assert_eq!(combine(&hashes), combine(&hashes));
        assert_ne!(combine(&hashes), combine(&["def".to_string(), "abc".to_string()]));
    }
}
