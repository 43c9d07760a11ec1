use crate::error::Result;

/// Implemented by every entity type; called by the pipeline's per-stage
/// "validate(r) against table.validator" step (§4.5) before a row is
/// eligible for upsert. Distinct from the persistence objects themselves
/// per the Design Notes' "explicit (TableRecord, Validator) pairs" (§9).
pub trait Validate {
    fn validate(&self) -> Result<()>;
}
