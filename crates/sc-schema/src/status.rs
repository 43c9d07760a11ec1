use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a discovered row.
///
/// `Inactive` means "previously observed, not present in the most recent
/// pull" — rows are never deleted, only tombstoned (see invariant 3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Active,
    Inactive,
}

impl Default for Status {
    fn default() -> Self {
        Status::Active
    }
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Active => "ACTIVE",
            Status::Inactive => "INACTIVE",
        }
    }
}

impl std::str::FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(Status::Active),
            "INACTIVE" => Ok(Status::Inactive),
            other => Err(format!("invalid status `{other}`")),
        }
    }
}

/// The two meta columns every entity in §3.1 carries in addition to its own
/// fields.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MetaColumns {
    #[serde(default)]
    pub status: Status,
    pub observed_at: DateTime<Utc>,
}

impl MetaColumns {
    pub fn observed_now() -> Self {
        MetaColumns {
            status: Status::Active,
            observed_at: Utc::now(),
        }
    }
}
