//! Ambient configuration loading (§10.3): a `.env` file is read before
//! argument parsing so adapter credentials can live outside the shell
//! environment, then vendor selection is resolved against the static
//! registry before the pipeline ever runs.

use sc_core::error::ConfigError;
use sc_providers::known_vendor_ids;

/// Loads `.env` from the working directory if present. Missing is not an
/// error — adapters may get their credentials from the real environment
/// instead.
pub fn load_dotenv() {
    match dotenv::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), ".env loaded"),
        Err(err) if err.not_found() => {}
        Err(err) => tracing::warn!(%err, "failed to parse .env"),
    }
}

/// Resolves `--include-vendor`/`--exclude-vendor` against the static vendor
/// registry (§9 "static registry keyed by vendor id"). An unknown vendor id
/// in either list is a fatal configuration error (§7), caught here rather
/// than silently ignored or discovered mid-pull.
pub fn resolve_vendor_selection(include: &[String], exclude: &[String]) -> Result<Vec<String>, ConfigError> {
    let known = known_vendor_ids();
    for id in include.iter().chain(exclude.iter()) {
        if !known.iter().any(|k| *k == id.as_str()) {
            return Err(ConfigError::UnknownVendor(id.clone()));
        }
    }

    let selected: Vec<String> = if include.is_empty() {
        known.iter().map(|s| s.to_string()).collect()
    } else {
        include.to_vec()
    };

    Ok(selected.into_iter().filter(|id| !exclude.contains(id)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_include_is_rejected() {
        let err = resolve_vendor_selection(&["nope".to_string()], &[]);
        assert!(matches!(err, Err(ConfigError::UnknownVendor(id)) if id == "nope"));
    }

    #[test]
    fn exclude_narrows_the_default_full_set() {
        let selected = resolve_vendor_selection(&[], &["aws".to_string()]).unwrap();
        assert!(!selected.iter().any(|id| id == "aws"));
        assert!(selected.iter().any(|id| id == "hcloud"));
    }

    #[test]
    fn include_and_exclude_compose() {
        let selected = resolve_vendor_selection(&["aws".to_string(), "hcloud".to_string()], &["aws".to_string()]).unwrap();
        assert_eq!(selected, vec!["hcloud".to_string()]);
    }
}
