use thiserror::Error;

/// Inspector-side errors (§7's "Inspector miss" kind lives one level below
/// this: a missing/corrupt framework output for one server is logged at
/// debug and treated as "no fields/scores from this framework", never
/// surfaced as an `Error`). These variants are for failures that prevent
/// the dataset itself from being usable at all.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to fetch inspector dataset from {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to extract inspector dataset archive: {0}")]
    Extract(#[source] std::io::Error),

    #[error("inspector dataset I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
