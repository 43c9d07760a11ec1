use thiserror::Error;

/// Fatal, surfaced-at-startup errors (§7): missing adapter method, missing
/// credentials, unknown vendor id.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown vendor id `{0}`")]
    UnknownVendor(String),

    #[error("vendor `{vendor_id}`: adapter not configured: {reason}")]
    AdapterNotConfigured { vendor_id: String, reason: String },

    #[error("missing required environment variable `{0}`")]
    MissingEnvVar(String),

    #[error("invalid database connection string `{0}`")]
    InvalidConnectionString(String),
}

/// A row returned by an adapter fails its schema check (§7). Wraps
/// `sc_schema::Error` rather than re-declaring its variants.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error(transparent)]
    Schema(#[from] sc_schema::Error),
}

/// An FK target is missing at commit time (§7, invariant 2).
#[derive(Debug, Error)]
pub enum ReferentialError {
    #[error("{table}: row ({primary_key}) references missing {referenced_table} ({referenced_key})")]
    MissingReference {
        table: &'static str,
        primary_key: String,
        referenced_table: &'static str,
        referenced_key: String,
    },
}

/// Errors an adapter implementation raises while talking to a provider API
/// (§7's "Transient I/O"/"Data-quality" kinds, as seen by the core).
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("vendor `{vendor_id}`: HTTP request failed: {source}")]
    Http {
        vendor_id: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("vendor `{vendor_id}`: {message}")]
    Other { vendor_id: String, message: String },
}

/// Unifies every crate-boundary error kind (§10.1). The CLI converts this
/// into an exit code; library code never panics on adapter- or
/// database-supplied data and always returns `Result<T, CrateError>`.
#[derive(Debug, Error)]
pub enum CrateError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Referential(#[from] ReferentialError),

    #[error(transparent)]
    Adapter(#[from] AdapterError),

    #[error(transparent)]
    Db(#[from] sc_db::Error),

    #[error(transparent)]
    Inspector(#[from] sc_inspector::Error),

    #[error("cache I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

impl From<sc_schema::Error> for CrateError {
    fn from(err: sc_schema::Error) -> Self {
        CrateError::Validation(ValidationError::Schema(err))
    }
}

pub type Result<T> = std::result::Result<T, CrateError>;
