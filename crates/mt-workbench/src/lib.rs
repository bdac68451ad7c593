//! # mt-workbench
//!
//! Application shell for Monthly Targets: one shared state, one supervisor
//! dashboard, and two agent dashboards (desktop and mobile) that see each
//! other's changes immediately.
//!
//! ## Key components
//!
//! - [`Workbench`] — owns the [`mt_ledger::StateStore`], dispatches events,
//!   posts toast notices
//! - [`SupervisorDesk`] / [`AgentDesk`] — the dashboards, with the form
//!   guards (duplicate directive, empty reason, empty summary)
//! - [`TargetDirective`] / [`ActivityDraft`] — form state and picker logic
//! - [`WorkbenchConfig`] — `.mt/config.toml`
//! - [`Script`] / [`Command`] — replayable JSONL sessions

pub mod config;
pub mod error;
pub mod forms;
pub mod script;
pub mod seed;
pub mod surface;
pub mod workbench;

pub use config::{CompletionConfig, MonthSource, NoticeConfig, WorkbenchConfig};
pub use error::WorkbenchError;
pub use forms::{ActivityDraft, TargetDirective, OTHER_THEME};
pub use script::{Command, Script, StepReport};
pub use seed::{demo_ledger, Department, StaffMember};
pub use surface::{AgentDesk, BoardRow, Surface, SupervisorDesk};
pub use workbench::Workbench;
