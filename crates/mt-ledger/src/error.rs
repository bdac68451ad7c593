// error.rs — Error types for the target/activity ledger.

use std::path::Path;

use thiserror::Error;

use crate::target::TargetCategory;

/// Errors that can occur during ledger operations.
///
/// Addressing an unknown target or activity is *not* an error: lifecycle
/// operations treat it as a silent no-op and report it through
/// [`Outcome::NotFound`](crate::lifecycle::Outcome::NotFound).
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The agent has already accepted a target of this category for the month.
    #[error("{agent} has already accepted a {category} target for {month}")]
    DuplicateAcceptedTarget {
        agent: String,
        month: String,
        category: TargetCategory,
    },

    /// A caller-supplied identifier is already used by another record.
    #[error("{kind} id '{id}' is already in use")]
    DuplicateId { kind: &'static str, id: String },

    /// A target goal must be a positive count.
    #[error("target goal must be positive, got {0}")]
    InvalidGoal(u32),

    /// A month string was not in `YYYY-MM` form.
    #[error("invalid month '{0}': expected YYYY-MM")]
    InvalidMonth(String),

    /// A file I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: String,
        source: std::io::Error,
    },

    /// Failed to serialize/deserialize ledger data.
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl LedgerError {
    /// Adapter for `map_err` on I/O results touching `path`.
    pub(crate) fn io(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| LedgerError::IoError {
            path: path.display().to_string(),
            source,
        }
    }
}
