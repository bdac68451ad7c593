// events.rs — Lifecycle events and notification dispatch.
//
// Each applied lifecycle operation produces a LedgerEvent. Sinks (JSONL
// log files, in-memory collectors, the toast board) subscribe to them
// through the EventDispatcher. Sinks observe; they never gate an
// operation, and a failing sink never fails the operation that fed it.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::activity::{ActivityId, ActivityKind, ActivityStatus};
use crate::error::LedgerError;
use crate::month::Month;
use crate::target::{TargetCategory, TargetId, TargetStatus};

/// Events emitted when the ledger changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// A supervisor issued a new target.
    TargetIssued {
        target_id: TargetId,
        agent: String,
        month: Month,
        category: TargetCategory,
        goal: u32,
        timestamp: DateTime<Utc>,
    },

    /// A re-issued target overwrote the pending one in its slot.
    TargetReplaced {
        target_id: TargetId,
        agent: String,
        month: Month,
        category: TargetCategory,
        goal: u32,
        timestamp: DateTime<Utc>,
    },

    /// The agent accepted or rejected a target.
    TargetResponded {
        target_id: TargetId,
        status: TargetStatus,
        timestamp: DateTime<Utc>,
    },

    /// An activity was created.
    ActivityCreated {
        activity_id: ActivityId,
        kind: ActivityKind,
        title: String,
        timestamp: DateTime<Utc>,
    },

    /// An activity's status was overwritten (interview check-in).
    ActivityStatusChanged {
        activity_id: ActivityId,
        from_state: String,
        to_state: String,
        timestamp: DateTime<Utc>,
    },

    /// An activity was completed.
    ActivityCompleted {
        activity_id: ActivityId,
        summary: String,
        timestamp: DateTime<Utc>,
    },

    /// A completed activity was credited to a target.
    TargetProgressed {
        target_id: TargetId,
        activity_id: ActivityId,
        actual: u32,
        goal: u32,
        timestamp: DateTime<Utc>,
    },
}

impl LedgerEvent {
    /// Get the event type name as a string.
    pub fn event_type(&self) -> &str {
        match self {
            LedgerEvent::TargetIssued { .. } => "target_issued",
            LedgerEvent::TargetReplaced { .. } => "target_replaced",
            LedgerEvent::TargetResponded { .. } => "target_responded",
            LedgerEvent::ActivityCreated { .. } => "activity_created",
            LedgerEvent::ActivityStatusChanged { .. } => "activity_status_changed",
            LedgerEvent::ActivityCompleted { .. } => "activity_completed",
            LedgerEvent::TargetProgressed { .. } => "target_progressed",
        }
    }

    /// The toast shown to the user for this event, if any.
    ///
    /// Status overwrites and progress credits are silent; the completion
    /// toast already covers the credit.
    pub fn notice_text(&self) -> Option<String> {
        match self {
            LedgerEvent::TargetIssued { category, .. }
            | LedgerEvent::TargetReplaced { category, .. } => {
                Some(format!("新目标下达: {}", category.label()))
            }
            LedgerEvent::TargetResponded { status, .. } => match status {
                TargetStatus::Accepted => Some("您已接受目标".to_string()),
                _ => Some("您已退回目标".to_string()),
            },
            LedgerEvent::ActivityCreated { .. } => Some("活动创建成功".to_string()),
            LedgerEvent::ActivityCompleted { .. } => Some("活动核销成功".to_string()),
            LedgerEvent::ActivityStatusChanged { .. } | LedgerEvent::TargetProgressed { .. } => {
                None
            }
        }
    }

    /// Helper to create an ActivityStatusChanged event.
    pub fn activity_status_changed(
        activity_id: ActivityId,
        from: &ActivityStatus,
        to: &ActivityStatus,
    ) -> Self {
        LedgerEvent::ActivityStatusChanged {
            activity_id,
            from_state: from.to_string(),
            to_state: to.to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Trait for receiving ledger events.
pub trait NotificationSink: Send {
    /// Handle an event. Errors are logged but don't stop the system.
    fn send(&self, event: &LedgerEvent) -> Result<(), LedgerError>;
}

/// Appends every event as one JSON line to a file, creating the file and
/// its parent directory on first use.
pub struct LogSink {
    path: PathBuf,
}

impl LogSink {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append_line(&self, line: &str) -> Result<(), LedgerError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(LedgerError::io(dir))?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(LedgerError::io(&self.path))?;
        writeln!(file, "{line}").map_err(LedgerError::io(&self.path))
    }
}

impl NotificationSink for LogSink {
    fn send(&self, event: &LedgerEvent) -> Result<(), LedgerError> {
        self.append_line(&serde_json::to_string(event)?)
    }
}

/// Fans each ledger event out to every registered sink.
///
/// A failing sink is logged and skipped; the remaining sinks still see the
/// event and the lifecycle operation that produced it is not affected.
#[derive(Default)]
pub struct EventDispatcher {
    sinks: Vec<Box<dyn NotificationSink>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sink(&mut self, sink: Box<dyn NotificationSink>) {
        self.sinks.push(sink);
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    /// Send `event` to all sinks. Returns how many accepted it.
    pub fn dispatch(&self, event: &LedgerEvent) -> usize {
        let delivered = self
            .sinks
            .iter()
            .filter(|sink| match sink.send(event) {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!(event_type = event.event_type(), "ledger event sink failed: {}", e);
                    false
                }
            })
            .count();
        tracing::trace!(event_type = event.event_type(), delivered, "ledger event dispatched");
        delivered
    }
}
