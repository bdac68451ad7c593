// error.rs — Error types for the workbench and its surfaces.

use std::path::PathBuf;

use mt_ledger::{LedgerError, Month, TargetCategory};
use thiserror::Error;

/// Errors raised by the workbench, its surfaces, configuration and scripts.
#[derive(Debug, Error)]
pub enum WorkbenchError {
    /// A lifecycle operation refused the input.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// The supervisor form refuses a directive whose slot is already taken
    /// by a pending or accepted target.
    #[error("a {category} target for {agent} in {month} has already been issued")]
    DirectiveExists {
        agent: String,
        month: Month,
        category: TargetCategory,
    },

    /// Rejecting a target requires a reason.
    #[error("a rejection reason is required")]
    EmptyReason,

    /// An agent desk refuses to act on a record another agent owns.
    #[error("{id} belongs to {owner}, not {agent}")]
    NotOwner {
        id: String,
        owner: String,
        agent: String,
    },

    /// Completing an interview requires a written summary.
    #[error("an interview summary is required")]
    EmptySummary,

    /// Failed to read a file.
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The config file is not valid TOML for `WorkbenchConfig`.
    #[error("invalid config {path}: {source}")]
    InvalidConfig {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A script line could not be parsed.
    #[error("script line {line}: {source}")]
    InvalidScriptLine {
        line: usize,
        source: serde_json::Error,
    },
}
