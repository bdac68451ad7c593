//! # mt-ledger
//!
//! Target and activity lifecycle for Monthly Targets.
//!
//! A supervisor issues monthly [`Target`]s to agents; agents accept or
//! reject them and run [`Activity`] records (meetings, interviews). When an
//! activity completes, the owner's accepted target of the matching category
//! gains one unit of progress.
//!
//! ## Key components
//!
//! - [`Target`] / [`TargetStatus`] — Pending → Accepted | Rejected
//! - [`Activity`] / [`ActivityStatus`] — Ongoing → (PendingSummary →) Completed
//! - [`lifecycle`] — pure operations `(&Ledger, input) → Transition`
//! - [`StateStore`] — in-memory collections plus the selected month
//! - [`LedgerEvent`] / [`EventDispatcher`] — events emitted on every change
//! - [`NoticeBoard`] — transient toast notices with expiry
//! - [`Progress`] — completion math (display clamps, storage does not)

pub mod activity;
pub mod error;
pub mod events;
pub mod lifecycle;
pub mod month;
pub mod notice;
pub mod progress;
pub mod store;
pub mod target;

pub use activity::{Activity, ActivityDetails, ActivityId, ActivityKind, ActivityStatus};
pub use error::LedgerError;
pub use events::{EventDispatcher, LedgerEvent, LogSink, NotificationSink};
pub use lifecycle::{Ledger, MonthScope, Outcome, Transition};
pub use month::Month;
pub use notice::{Notice, NoticeBoard, DEFAULT_NOTICE_TTL_MS};
pub use progress::Progress;
pub use store::StateStore;
pub use target::{Target, TargetCategory, TargetDecision, TargetId, TargetStatus};
