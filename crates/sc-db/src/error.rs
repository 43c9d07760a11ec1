use thiserror::Error;

/// Errors raised by the persistence engine (§7: `sc-db`'s slice of the
/// unified `CrateError`). Adapter/validation errors live upstream in
/// `sc-core`; this crate only ever sees rows that already passed
/// `Validate::validate`.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to open database connection: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("database operation failed: {0}")]
    Sql(#[from] sqlx::Error),

    #[error("unknown table `{0}`")]
    UnknownTable(String),

    #[error("row for table `{table}` is missing primary key column `{column}`")]
    MissingPrimaryKeyColumn { table: &'static str, column: &'static str },

    #[error("{0}")]
    InvalidDialect(String),
}

pub type Result<T> = std::result::Result<T, Error>;
