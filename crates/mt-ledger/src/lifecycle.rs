// lifecycle.rs — Pure lifecycle operations over the target/activity ledger.
//
// Every operation takes the current collections plus one input and returns
// the next collections together with an `Outcome`. Nothing is mutated in
// place: the caller commits the returned `Ledger` to its store, which keeps
// each step auditable and replayable.
//
// Operations:
//   add_target              — issue (or re-issue) a Pending target
//   respond_to_target       — Pending → Accepted | Rejected
//   create_activity         — prepend a new Ongoing activity
//   complete_activity       — mark Completed and credit the matching target
//   update_activity_status  — raw Ongoing ⇄ PendingSummary overwrite
//
// Unknown identifiers are silent no-ops (`Outcome::NotFound`), never errors.
// Terminal records (Rejected targets, Completed activities) are never
// changed again (`Outcome::Unchanged`).

use serde::{Deserialize, Serialize};

use crate::activity::{Activity, ActivityId, ActivityStatus};
use crate::error::LedgerError;
use crate::month::Month;
use crate::target::{Target, TargetDecision, TargetId, TargetStatus};

/// Both collections, as one value.
///
/// Targets keep insertion order; activities are most-recent-first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    pub targets: Vec<Target>,
    pub activities: Vec<Activity>,
}

impl Ledger {
    pub fn new(targets: Vec<Target>, activities: Vec<Activity>) -> Self {
        Self {
            targets,
            activities,
        }
    }

    pub fn target(&self, id: &TargetId) -> Option<&Target> {
        self.targets.iter().find(|t| &t.id == id)
    }

    pub fn activity(&self, id: &ActivityId) -> Option<&Activity> {
        self.activities.iter().find(|a| &a.id == id)
    }
}

/// Which month a completed activity is credited against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthScope {
    /// The month currently selected on the agent's dashboard.
    Selected(Month),
    /// The activity's own scheduled month.
    Scheduled,
}

/// What a lifecycle operation did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// A new Pending target was appended.
    TargetIssued { target_id: TargetId },

    /// A Pending target in the same slot was overwritten, keeping its id.
    TargetReplaced { target_id: TargetId },

    /// A Pending target was accepted or rejected.
    TargetResponded {
        target_id: TargetId,
        status: TargetStatus,
    },

    /// A new Ongoing activity was prepended.
    ActivityCreated { activity_id: ActivityId },

    /// An activity's status was overwritten.
    ActivityStatusChanged {
        activity_id: ActivityId,
        from: ActivityStatus,
        to: ActivityStatus,
    },

    /// An activity was completed; `credited` names the target that gained progress.
    ActivityCompleted {
        activity_id: ActivityId,
        credited: Option<TargetId>,
    },

    /// No record with this id exists. Nothing changed.
    NotFound { id: String },

    /// The record exists but the operation does not apply to it. Nothing changed.
    Unchanged { id: String, reason: String },
}

impl Outcome {
    /// Whether the ledger changed.
    pub fn is_applied(&self) -> bool {
        !matches!(self, Outcome::NotFound { .. } | Outcome::Unchanged { .. })
    }
}

/// The next ledger and what changed to produce it.
#[derive(Debug, Clone)]
pub struct Transition {
    pub ledger: Ledger,
    pub outcome: Outcome,
}

impl Transition {
    fn untouched(ledger: &Ledger, outcome: Outcome) -> Self {
        tracing::debug!(?outcome, "lifecycle operation left ledger unchanged");
        Self {
            ledger: ledger.clone(),
            outcome,
        }
    }
}

/// Issue a target to an agent.
///
/// The input is forced to Pending with no progress. Fails with
/// `DuplicateAcceptedTarget` when the agent already accepted a target in the
/// same (month, category) slot. A Pending target in that slot is overwritten
/// in place, keeping its id; otherwise the target is appended. Rejected
/// targets are history and never overwritten. Fails with `DuplicateId` when
/// the input's id already names a different record.
pub fn add_target(ledger: &Ledger, target: Target) -> Result<Transition, LedgerError> {
    if target.goal == 0 {
        return Err(LedgerError::InvalidGoal(target.goal));
    }

    let mut target = target;
    target.status = TargetStatus::Pending;
    target.actual = 0;

    let in_slot =
        |t: &Target| t.occupies(&target.agent, target.month, target.category);

    if ledger
        .targets
        .iter()
        .any(|t| t.status == TargetStatus::Accepted && in_slot(t))
    {
        return Err(LedgerError::DuplicateAcceptedTarget {
            agent: target.agent.clone(),
            month: target.month.to_string(),
            category: target.category,
        });
    }

    let mut targets = ledger.targets.clone();
    let pending = targets
        .iter()
        .position(|t| t.status == TargetStatus::Pending && in_slot(t));

    // Re-issuing into a Pending slot under that slot's own id is a replace.
    let id_taken = targets
        .iter()
        .enumerate()
        .any(|(idx, t)| t.id == target.id && Some(idx) != pending);
    if id_taken {
        return Err(LedgerError::DuplicateId {
            kind: "target",
            id: target.id.to_string(),
        });
    }

    let outcome = match pending {
        Some(idx) => {
            target.id = targets[idx].id.clone();
            let target_id = target.id.clone();
            targets[idx] = target;
            Outcome::TargetReplaced { target_id }
        }
        None => {
            let target_id = target.id.clone();
            targets.push(target);
            Outcome::TargetIssued { target_id }
        }
    };

    Ok(Transition {
        ledger: Ledger::new(targets, ledger.activities.clone()),
        outcome,
    })
}

/// Record the owning agent's answer to a Pending target.
///
/// The reject reason is stored as given; requiring it to be non-empty is
/// the calling surface's job.
pub fn respond_to_target(ledger: &Ledger, id: &TargetId, decision: TargetDecision) -> Transition {
    let Some(idx) = ledger.targets.iter().position(|t| &t.id == id) else {
        return Transition::untouched(ledger, Outcome::NotFound { id: id.to_string() });
    };

    let current = &ledger.targets[idx].status;
    let next = decision.into_status();
    if !current.can_transition_to(&next) {
        return Transition::untouched(
            ledger,
            Outcome::Unchanged {
                id: id.to_string(),
                reason: format!("target is already {current}"),
            },
        );
    }

    let mut targets = ledger.targets.clone();
    targets[idx].status = next.clone();

    Transition {
        ledger: Ledger::new(targets, ledger.activities.clone()),
        outcome: Outcome::TargetResponded {
            target_id: id.clone(),
            status: next,
        },
    }
}

/// Add a new activity at the front of the list, forced to Ongoing. Fails
/// with `DuplicateId` when an activity with the same id already exists.
pub fn create_activity(ledger: &Ledger, activity: Activity) -> Result<Transition, LedgerError> {
    if ledger.activity(&activity.id).is_some() {
        return Err(LedgerError::DuplicateId {
            kind: "activity",
            id: activity.id.to_string(),
        });
    }

    let mut activity = activity;
    activity.status = ActivityStatus::Ongoing;
    let activity_id = activity.id.clone();

    let mut activities = Vec::with_capacity(ledger.activities.len() + 1);
    activities.push(activity);
    activities.extend(ledger.activities.iter().cloned());

    Ok(Transition {
        ledger: Ledger::new(ledger.targets.clone(), activities),
        outcome: Outcome::ActivityCreated { activity_id },
    })
}

/// Complete an activity with `summary` and credit one matching target.
///
/// The credited target is the first Accepted target owned by the activity's
/// owner, in the activity kind's category, for the month chosen by `scope`.
/// Its `actual` grows by exactly one. Completing an already-completed
/// activity changes nothing, so progress is never credited twice.
pub fn complete_activity(
    ledger: &Ledger,
    id: &ActivityId,
    summary: impl Into<String>,
    scope: MonthScope,
) -> Transition {
    let Some(idx) = ledger.activities.iter().position(|a| &a.id == id) else {
        return Transition::untouched(ledger, Outcome::NotFound { id: id.to_string() });
    };

    if ledger.activities[idx].status.is_completed() {
        return Transition::untouched(
            ledger,
            Outcome::Unchanged {
                id: id.to_string(),
                reason: "activity is already completed".to_string(),
            },
        );
    }

    let mut activities = ledger.activities.clone();
    activities[idx].status = ActivityStatus::Completed {
        summary: summary.into(),
    };
    let activity = &activities[idx];

    let category = activity.kind().category();
    let month = match scope {
        MonthScope::Selected(month) => month,
        MonthScope::Scheduled => activity.month(),
    };

    let mut targets = ledger.targets.clone();
    let credited = targets
        .iter_mut()
        .find(|t| t.status == TargetStatus::Accepted && t.occupies(&activity.owner, month, category))
        .map(|t| {
            t.actual = t.actual.saturating_add(1);
            t.id.clone()
        });

    Transition {
        ledger: Ledger::new(targets, activities),
        outcome: Outcome::ActivityCompleted {
            activity_id: id.clone(),
            credited,
        },
    }
}

/// Overwrite an activity's status without checking the kind's path.
///
/// Used for the interview check-in (Ongoing → PendingSummary). Completed
/// activities are final, and completion itself must go through
/// [`complete_activity`] so the target gets credited.
pub fn update_activity_status(ledger: &Ledger, id: &ActivityId, status: ActivityStatus) -> Transition {
    let Some(idx) = ledger.activities.iter().position(|a| &a.id == id) else {
        return Transition::untouched(ledger, Outcome::NotFound { id: id.to_string() });
    };

    let current = &ledger.activities[idx].status;
    let refusal = if current.is_completed() {
        Some("activity is already completed".to_string())
    } else if status.is_completed() {
        Some("completion goes through complete_activity".to_string())
    } else if *current == status {
        Some(format!("activity is already {current}"))
    } else {
        None
    };
    if let Some(reason) = refusal {
        return Transition::untouched(
            ledger,
            Outcome::Unchanged {
                id: id.to_string(),
                reason,
            },
        );
    }

    let from = current.clone();
    let mut activities = ledger.activities.clone();
    activities[idx].status = status.clone();

    Transition {
        ledger: Ledger::new(ledger.targets.clone(), activities),
        outcome: Outcome::ActivityStatusChanged {
            activity_id: id.clone(),
            from,
            to: status,
        },
    }
}
