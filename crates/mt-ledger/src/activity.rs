// activity.rs — Activity: one concrete meeting or interview.
//
// Activities are created Ongoing and end Completed. The path depends on
// the kind:
//   Meeting:   Ongoing → Completed { summary }       (summary auto-generated at check-in)
//   Interview: Ongoing → PendingSummary → Completed  (summary written by the agent)
//
// Completing an activity credits the owner's accepted target of the
// mapped category (see `ActivityKind::category`).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::month::Month;
use crate::target::TargetCategory;

/// Opaque activity identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityId(String);

impl ActivityId {
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

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActivityId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ActivityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Meeting or interview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Meeting,
    Interview,
}

impl ActivityKind {
    /// The target category an activity of this kind counts toward.
    pub fn category(&self) -> TargetCategory {
        match self {
            ActivityKind::Meeting => TargetCategory::TrainingMeeting,
            ActivityKind::Interview => TargetCategory::OneOnOneInterview,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ActivityKind::Meeting => "会议培训",
            ActivityKind::Interview => "1v1面谈",
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivityKind::Meeting => write!(f, "meeting"),
            ActivityKind::Interview => write!(f, "interview"),
        }
    }
}

impl FromStr for ActivityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "meeting" | "MEETING" => Ok(ActivityKind::Meeting),
            "interview" | "INTERVIEW" => Ok(ActivityKind::Interview),
            other => Err(format!("unknown activity kind '{other}'")),
        }
    }
}

/// Kind-specific fields. Meetings have a venue and attendees; interviews
/// name the single person interviewed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActivityDetails {
    Meeting {
        #[serde(default)]
        location: String,
        #[serde(default)]
        speaker: String,
        #[serde(default)]
        participants: Vec<String>,
    },
    Interview {
        #[serde(default)]
        person_name: String,
        /// Staff number of the interviewee.
        #[serde(default)]
        person_id: String,
    },
}

impl ActivityDetails {
    pub fn kind(&self) -> ActivityKind {
        match self {
            ActivityDetails::Meeting { .. } => ActivityKind::Meeting,
            ActivityDetails::Interview { .. } => ActivityKind::Interview,
        }
    }

    /// Empty details for the given kind.
    pub fn blank(kind: ActivityKind) -> Self {
        match kind {
            ActivityKind::Meeting => ActivityDetails::Meeting {
                location: String::new(),
                speaker: String::new(),
                participants: Vec::new(),
            },
            ActivityKind::Interview => ActivityDetails::Interview {
                person_name: String::new(),
                person_id: String::new(),
            },
        }
    }
}

/// The lifecycle state of an Activity.
///
/// The summary lives inside `Completed`, so an activity has a summary
/// exactly when it is completed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ActivityStatus {
    /// Created, not yet checked in.
    Ongoing,

    /// Interview checked in, waiting for the written summary.
    PendingSummary,

    /// Done. Terminal.
    Completed { summary: String },
}

impl fmt::Display for ActivityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivityStatus::Ongoing => write!(f, "ongoing"),
            ActivityStatus::PendingSummary => write!(f, "pending_summary"),
            ActivityStatus::Completed { .. } => write!(f, "completed"),
        }
    }
}

impl ActivityStatus {
    /// The legal edges for an activity of `kind`.
    ///
    /// Meetings skip PendingSummary; interviews must pass through it.
    pub fn can_transition_to(&self, next: &ActivityStatus, kind: ActivityKind) -> bool {
        match kind {
            ActivityKind::Meeting => matches!(
                (self, next),
                (ActivityStatus::Ongoing, ActivityStatus::Completed { .. })
            ),
            ActivityKind::Interview => matches!(
                (self, next),
                (ActivityStatus::Ongoing, ActivityStatus::PendingSummary)
                    | (ActivityStatus::PendingSummary, ActivityStatus::Completed { .. })
            ),
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, ActivityStatus::Completed { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            ActivityStatus::Ongoing => "进行中",
            ActivityStatus::PendingSummary => "待录入",
            ActivityStatus::Completed { .. } => "已完成",
        }
    }
}

/// One meeting or interview run by an agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,

    /// Free-form sub-category (e.g., "早会", "新人班", "陪访").
    pub subtype: String,

    pub title: String,

    /// Scheduled date. Its month decides which target the activity counts toward.
    pub date: NaiveDate,

    pub details: ActivityDetails,

    /// Theme tags, in the order they were picked.
    #[serde(default)]
    pub themes: Vec<String>,

    pub status: ActivityStatus,

    /// The agent who runs the activity.
    pub owner: String,

    pub created_at: DateTime<Utc>,
}

impl Activity {
    /// Create a new Ongoing activity with a fresh id.
    pub fn new(
        owner: impl Into<String>,
        title: impl Into<String>,
        subtype: impl Into<String>,
        date: NaiveDate,
        details: ActivityDetails,
    ) -> Self {
        Self {
            id: ActivityId::generate(),
            subtype: subtype.into(),
            title: title.into(),
            date,
            details,
            themes: Vec::new(),
            status: ActivityStatus::Ongoing,
            owner: owner.into(),
            created_at: Utc::now(),
        }
    }

    pub fn with_id(mut self, id: impl Into<ActivityId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_themes<I, S>(mut self, themes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.themes = themes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn kind(&self) -> ActivityKind {
        self.details.kind()
    }

    /// The month of the scheduled date.
    pub fn month(&self) -> Month {
        Month::of(self.date)
    }

    pub fn summary(&self) -> Option<&str> {
        match &self.status {
            ActivityStatus::Completed { summary } => Some(summary),
            _ => None,
        }
    }
}
