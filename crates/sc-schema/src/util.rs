//! Utilities (§4.8): chunking, indexing and argument hashing shared by the
//! persistence engine, the pipeline driver and the adapters' disk caches.
//!
//! `float_inf_to_str` lives in [`crate::price`] next to the `TierBound` codec
//! it serves; everything else named in §4.8 is here.

use std::collections::HashMap;
use std::hash::Hash;

use serde::Serialize;
use serde_json::Value;

use crate::hash::sha1_hex_json;

/// `chunk_list(seq, n)`: lazy fixed-size chunking, used by the bulk-upsert
/// path to stay under a backend's bound-parameter limit (§4.2).
pub fn chunk_list<T>(seq: &[T], n: usize) -> impl Iterator<Item = &[T]> {
    assert!(n > 0, "chunk size must be positive");
    seq.chunks(n)
}

/// `scmodels_to_dict(items, key_fn)`: index a list of records by a derived
/// key. Duplicates are accepted and the later occurrence wins, matching the
/// inventory pipeline's "last occurrence wins" tie-break (§4.5) for adapters
/// that return the same composite key twice within one pull.
pub fn scmodels_to_dict<T, K, F>(items: Vec<T>, key_fn: F) -> HashMap<K, T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut out = HashMap::with_capacity(items.len());
    for item in items {
        let key = key_fn(&item);
        out.insert(key, item);
    }
    out
}

/// Same as [`scmodels_to_dict`] but returns an error listing the first
/// duplicate key encountered, for callers that need strict uniqueness (e.g.
/// detecting an adapter bug rather than silently keeping the last row).
pub fn scmodels_to_dict_strict<T, K, F>(items: Vec<T>, key_fn: F) -> Result<HashMap<K, T>, String>
where
    K: Eq + Hash + std::fmt::Debug + Clone,
    F: Fn(&T) -> K,
{
    let mut out: HashMap<K, T> = HashMap::with_capacity(items.len());
    for item in items {
        let key = key_fn(&item);
        if out.contains_key(&key) {
            return Err(format!("duplicate key {key:?}"));
        }
        out.insert(key, item);
    }
    Ok(out)
}

/// `jsoned_hash(*args, **kwargs)` (§4.8): SHA-1 over the canonical JSON of an
/// arbitrary serializable value, used for disk-cache keys.
pub fn jsoned_hash<T: Serialize>(value: &T) -> String {
    let json: Value = serde_json::to_value(value).expect("cache keys are always serializable");
    sha1_hex_json(&json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_list_splits_into_fixed_size_pieces() {
        let items: Vec<i32> = (0..250).collect();
        let chunks: Vec<&[i32]> = chunk_list(&items, 100).collect();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), 100);
        assert_eq!(chunks[2].len(), 50);
    }

    #[test]
    fn scmodels_to_dict_keeps_the_last_occurrence() {
        let items = vec![("a", 1), ("a", 2), ("b", 3)];
        let indexed = scmodels_to_dict(items, |(k, _)| *k);
        assert_eq!(indexed.get("a").unwrap().1, 2);
    }

    #[test]
    fn jsoned_hash_is_stable_for_equal_values() {
        let a = serde_json::json!({"vendor_id": "aws", "region_id": "us-east-1"});
        let b = serde_json::json!({"region_id": "us-east-1", "vendor_id": "aws"});
        assert_eq!(jsoned_hash(&a), jsoned_hash(&b));
    }
}
