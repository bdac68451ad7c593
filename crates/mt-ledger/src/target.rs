// target.rs — Target: a monthly activity commitment from supervisor to agent.
//
// A supervisor issues a Target to an agent for one month and one activity
// category. The agent accepts or rejects it exactly once:
//   Pending → Accepted
//   Pending → Rejected { reason }
// Only an Accepted target accrues progress, and only through activity
// completion (see `lifecycle::complete_activity`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::month::Month;
use crate::progress::Progress;

/// Opaque target identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetId(String);

impl TargetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// A fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TargetId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for TargetId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// The closed set of activity categories a target can count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetCategory {
    /// Training meetings (morning meetings, new-hire classes, trainings).
    TrainingMeeting,
    /// One-on-one interviews with an agent.
    OneOnOneInterview,
}

impl TargetCategory {
    pub const ALL: [TargetCategory; 2] = [
        TargetCategory::TrainingMeeting,
        TargetCategory::OneOnOneInterview,
    ];

    /// The label shown on dashboards.
    pub fn label(&self) -> &'static str {
        match self {
            TargetCategory::TrainingMeeting => "培训会议",
            TargetCategory::OneOnOneInterview => "1v1面谈",
        }
    }
}

impl fmt::Display for TargetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TargetCategory {
    type Err = String;

    /// Accepts the display label, the serde name, or a short alias.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "培训会议" | "training_meeting" | "training" | "meeting" => {
                Ok(TargetCategory::TrainingMeeting)
            }
            "1v1面谈" | "one_on_one_interview" | "interview" | "1v1" => {
                Ok(TargetCategory::OneOnOneInterview)
            }
            other => Err(format!("unknown target category '{other}'")),
        }
    }
}

/// The lifecycle state of a Target.
///
/// The rejection reason lives inside `Rejected`, so it exists exactly when
/// the target has been rejected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TargetStatus {
    /// Issued by the supervisor, awaiting the agent's response.
    Pending,

    /// The agent committed to the target; progress accrues from here.
    Accepted,

    /// The agent sent the target back.
    Rejected { reason: String },
}

impl fmt::Display for TargetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetStatus::Pending => write!(f, "pending"),
            TargetStatus::Accepted => write!(f, "accepted"),
            TargetStatus::Rejected { .. } => write!(f, "rejected"),
        }
    }
}

impl TargetStatus {
    /// Only Pending → Accepted and Pending → Rejected exist.
    pub fn can_transition_to(&self, next: &TargetStatus) -> bool {
        matches!(
            (self, next),
            (TargetStatus::Pending, TargetStatus::Accepted)
                | (TargetStatus::Pending, TargetStatus::Rejected { .. })
        )
    }

    /// Pending or Accepted: the states that occupy an (agent, month, category) slot.
    pub fn is_open(&self) -> bool {
        matches!(self, TargetStatus::Pending | TargetStatus::Accepted)
    }

    /// Dashboard badge text.
    pub fn label(&self) -> &'static str {
        match self {
            TargetStatus::Pending => "待确认",
            TargetStatus::Accepted => "已接受",
            TargetStatus::Rejected { .. } => "被退回",
        }
    }
}

/// An agent's answer to a pending target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum TargetDecision {
    Accept,
    Reject { reason: String },
}

impl TargetDecision {
    pub fn into_status(self) -> TargetStatus {
        match self {
            TargetDecision::Accept => TargetStatus::Accepted,
            TargetDecision::Reject { reason } => TargetStatus::Rejected { reason },
        }
    }
}

/// A monthly commitment: `goal` activities of one category for one agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub id: TargetId,

    /// The month the target applies to.
    pub month: Month,

    /// Which activities count toward this target.
    pub category: TargetCategory,

    /// Required number of completed activities (positive).
    pub goal: u32,

    /// Completed activities credited so far. May exceed `goal`.
    pub actual: u32,

    pub status: TargetStatus,

    /// Name of the agent who owns the target.
    pub agent: String,
}

impl Target {
    /// Create a new Pending target with no progress and a fresh id.
    pub fn new(agent: impl Into<String>, month: Month, category: TargetCategory, goal: u32) -> Self {
        Self {
            id: TargetId::generate(),
            month,
            category,
            goal,
            actual: 0,
            status: TargetStatus::Pending,
            agent: agent.into(),
        }
    }

    /// Replace the generated id (builder pattern).
    pub fn with_id(mut self, id: impl Into<TargetId>) -> Self {
        self.id = id.into();
        self
    }

    /// Whether this target sits in the given (agent, month, category) slot.
    pub fn occupies(&self, agent: &str, month: Month, category: TargetCategory) -> bool {
        self.agent == agent && self.month == month && self.category == category
    }

    pub fn rejection_reason(&self) -> Option<&str> {
        match &self.status {
            TargetStatus::Rejected { reason } => Some(reason),
            _ => None,
        }
    }

    pub fn progress(&self) -> Progress {
        Progress::new(self.actual, self.goal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jan() -> Month {
        "2026-01".parse().unwrap()
    }

    #[test]
    fn new_target_is_pending_with_no_progress() {
        let t = Target::new("张三", jan(), TargetCategory::TrainingMeeting, 10);
        assert_eq!(t.status, TargetStatus::Pending);
        assert_eq!(t.actual, 0);
        assert_eq!(t.goal, 10);
        assert!(t.rejection_reason().is_none());
        assert!(!t.id.as_str().is_empty());
    }

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(TargetId::generate(), TargetId::generate());
    }

    #[test]
    fn only_pending_can_be_answered() {
        let rejected = TargetStatus::Rejected {
            reason: "排班冲突".to_string(),
        };
        assert!(TargetStatus::Pending.can_transition_to(&TargetStatus::Accepted));
        assert!(TargetStatus::Pending.can_transition_to(&rejected));
        assert!(!TargetStatus::Accepted.can_transition_to(&rejected));
        assert!(!rejected.can_transition_to(&TargetStatus::Accepted));
        assert!(!TargetStatus::Accepted.can_transition_to(&TargetStatus::Pending));
    }

    #[test]
    fn open_states_are_pending_and_accepted() {
        assert!(TargetStatus::Pending.is_open());
        assert!(TargetStatus::Accepted.is_open());
        assert!(!TargetStatus::Rejected {
            reason: String::new()
        }
        .is_open());
    }

    #[test]
    fn category_parses_labels_and_aliases() {
        assert_eq!(
            "培训会议".parse::<TargetCategory>().unwrap(),
            TargetCategory::TrainingMeeting
        );
        assert_eq!(
            "1v1".parse::<TargetCategory>().unwrap(),
            TargetCategory::OneOnOneInterview
        );
        assert!("sales".parse::<TargetCategory>().is_err());
        assert_eq!(TargetCategory::OneOnOneInterview.to_string(), "1v1面谈");
    }

    #[test]
    fn rejected_status_carries_reason_in_json() {
        let mut t = Target::new("张三", jan(), TargetCategory::OneOnOneInterview, 20).with_id("t9");
        t.status = TargetDecision::Reject {
            reason: "本月面谈人数不足".to_string(),
        }
        .into_status();
        let json = serde_json::to_string(&t).unwrap();
        assert!(json.contains("\"state\":\"rejected\""));
        assert!(json.contains("本月面谈人数不足"));
        assert!(json.contains("\"month\":\"2026-01\""));
        let restored: Target = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, t);
        assert_eq!(restored.rejection_reason(), Some("本月面谈人数不足"));
    }
}
