// script.rs — Replayable command scripts.
//
// A script is JSONL: one `Command` per line, tagged by `op`. Blank lines and
// lines starting with `#` are skipped. Replaying a script against a fresh
// workbench reproduces the same ledger, which makes a session auditable.
//
// Example:
//   {"op":"issue_target","id":"t3","agent":"李四","month":"2026-02","category":"training_meeting","goal":5}
//   {"op":"accept_target","id":"t3"}

use std::fs;
use std::path::Path;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use mt_ledger::{
    Activity, ActivityDetails, ActivityId, ActivityStatus, Month, Outcome, Target, TargetCategory,
    TargetDecision, TargetId,
};

use crate::error::WorkbenchError;
use crate::forms::ActivityDraft;
use crate::surface::{AgentDesk, Surface};
use crate::workbench::Workbench;

/// One workbench operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    SelectMonth {
        month: Month,
    },
    IssueTarget {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<TargetId>,
        agent: String,
        month: Month,
        category: TargetCategory,
        goal: u32,
    },
    AcceptTarget {
        id: TargetId,
    },
    RejectTarget {
        id: TargetId,
        reason: String,
    },
    CreateActivity {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<ActivityId>,
        /// Defaults to the configured acting agent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        owner: Option<String>,
        title: String,
        /// Defaults to the kind's first subtype option.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        subtype: Option<String>,
        date: NaiveDate,
        details: ActivityDetails,
        #[serde(default)]
        themes: Vec<String>,
    },
    CompleteActivity {
        id: ActivityId,
        summary: String,
    },
    UpdateActivityStatus {
        id: ActivityId,
        status: ActivityStatus,
    },
    /// Check in through an agent desk.
    CheckIn {
        id: ActivityId,
        #[serde(default)]
        surface: Surface,
    },
    /// Submit an interview summary through an agent desk.
    SubmitSummary {
        id: ActivityId,
        summary: String,
    },
}

impl Command {
    pub fn op_name(&self) -> &'static str {
        match self {
            Command::SelectMonth { .. } => "select_month",
            Command::IssueTarget { .. } => "issue_target",
            Command::AcceptTarget { .. } => "accept_target",
            Command::RejectTarget { .. } => "reject_target",
            Command::CreateActivity { .. } => "create_activity",
            Command::CompleteActivity { .. } => "complete_activity",
            Command::UpdateActivityStatus { .. } => "update_activity_status",
            Command::CheckIn { .. } => "check_in",
            Command::SubmitSummary { .. } => "submit_summary",
        }
    }

    /// Apply to the workbench. `None` means the command changed only view
    /// state (the selected month).
    pub fn apply(&self, bench: &mut Workbench) -> Result<Option<Outcome>, WorkbenchError> {
        let outcome = match self {
            Command::SelectMonth { month } => {
                bench.select_month(*month);
                return Ok(None);
            }
            Command::IssueTarget {
                id,
                agent,
                month,
                category,
                goal,
            } => {
                let mut target = Target::new(agent.clone(), *month, *category, *goal);
                if let Some(id) = id {
                    target = target.with_id(id.clone());
                }
                bench.add_target(target)?
            }
            Command::AcceptTarget { id } => bench.respond_to_target(id, TargetDecision::Accept),
            Command::RejectTarget { id, reason } => bench.respond_to_target(
                id,
                TargetDecision::Reject {
                    reason: reason.clone(),
                },
            ),
            Command::CreateActivity {
                id,
                owner,
                title,
                subtype,
                date,
                details,
                themes,
            } => {
                let owner = owner
                    .clone()
                    .unwrap_or_else(|| bench.config().acting_agent.clone());
                let subtype = subtype.clone().unwrap_or_else(|| {
                    ActivityDraft::subtype_options(details.kind())[0].to_string()
                });
                let mut activity = Activity::new(owner, title.clone(), subtype, *date, details.clone())
                    .with_themes(themes.iter().cloned())
                    .with_created_at(Utc::now());
                if let Some(id) = id {
                    activity = activity.with_id(id.clone());
                }
                bench.create_activity(activity)?
            }
            Command::CompleteActivity { id, summary } => {
                bench.complete_activity(id, summary.clone())
            }
            Command::UpdateActivityStatus { id, status } => {
                bench.update_activity_status(id, status.clone())
            }
            Command::CheckIn { id, surface } => AgentDesk::new(bench, *surface).check_in(id)?,
            Command::SubmitSummary { id, summary } => {
                AgentDesk::new(bench, Surface::Desktop).submit_summary(id, summary)?
            }
        };
        Ok(Some(outcome))
    }
}

/// What happened when one script line was applied.
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    /// 1-based line number in the script.
    pub line: usize,
    pub op: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StepReport {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// A parsed command script.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script {
    steps: Vec<(usize, Command)>,
}

impl Script {
    /// Parse JSONL. Fails on the first malformed line.
    pub fn parse_jsonl(src: &str) -> Result<Self, WorkbenchError> {
        let mut steps = Vec::new();
        for (idx, raw) in src.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let command: Command = serde_json::from_str(line)
                .map_err(|source| WorkbenchError::InvalidScriptLine {
                    line: idx + 1,
                    source,
                })?;
            steps.push((idx + 1, command));
        }
        Ok(Self { steps })
    }

    pub fn load(path: &Path) -> Result<Self, WorkbenchError> {
        let src = fs::read_to_string(path).map_err(|source| WorkbenchError::IoError {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_jsonl(&src)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn commands(&self) -> impl Iterator<Item = &Command> {
        self.steps.iter().map(|(_, c)| c)
    }

    /// Apply every command in order. A refused command is reported and the
    /// run continues with the next line.
    pub fn run(&self, bench: &mut Workbench) -> Vec<StepReport> {
        self.steps
            .iter()
            .map(|(line, command)| {
                let (outcome, error) = match command.apply(bench) {
                    Ok(outcome) => (outcome, None),
                    Err(e) => {
                        tracing::info!(line, op = command.op_name(), "script step refused: {}", e);
                        (None, Some(e.to_string()))
                    }
                };
                StepReport {
                    line: *line,
                    op: command.op_name().to_string(),
                    outcome,
                    error,
                }
            })
            .collect()
    }
}
