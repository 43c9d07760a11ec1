use thiserror::Error;

/// Errors raised while validating rows against the cross-vendor schema.
///
/// These are the "Validation" and "Data-quality" error kinds: a row an
/// adapter returned does not satisfy the schema's invariants. Both are
/// stage-fatal for the pipeline that calls into this crate.
#[derive(Error, Debug)]
pub enum Error {
    #[error("{table}: missing required field `{field}`")]
    MissingField { table: &'static str, field: &'static str },

    #[error("{table}.{field}: invalid enum value `{value}`")]
    InvalidEnum {
        table: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("{table}.{field}: {reason}")]
    OutOfRange {
        table: &'static str,
        field: &'static str,
        reason: String,
    },

    #[error("{table}: price tiers not sorted or not contiguous: {reason}")]
    MalformedPriceTiers { table: &'static str, reason: String },

    #[error("{table}: gpu_memory_total ({total}) does not equal the sum of per-GPU memory ({sum})")]
    GpuMemoryMismatch {
        table: &'static str,
        total: i64,
        sum: i64,
    },

    #[error("failed to (de)serialize JSON value: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
