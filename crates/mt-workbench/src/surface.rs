// surface.rs — Supervisor and agent dashboards over one shared Workbench.
//
// A desk borrows the workbench mutably for as long as it is in use. The
// desktop and mobile agent desks differ only in the summary text written
// when a meeting is checked in, so both are the same type parameterised by
// `Surface`. An agent desk only acts on the agent's own targets and
// activities; ids it does not know fall through to the workbench, which
// reports them as not found.

use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use mt_ledger::{
    Activity, ActivityId, ActivityKind, ActivityStatus, Month, Outcome, Progress, Target,
    TargetCategory, TargetDecision, TargetId, TargetStatus,
};

use crate::error::WorkbenchError;
use crate::forms::{ActivityDraft, TargetDirective};
use crate::workbench::Workbench;

/// Which agent dashboard is in use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    #[default]
    Desktop,
    Mobile,
}

impl Surface {
    /// Summary recorded when a meeting is checked in from this surface.
    pub fn meeting_summary(&self) -> &'static str {
        match self {
            Surface::Desktop => "系统自动生成：会议圆满结束，参会人员全员到齐。",
            Surface::Mobile => "移动端自动总结：会议圆满成功。",
        }
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Surface::Desktop => write!(f, "desktop"),
            Surface::Mobile => write!(f, "mobile"),
        }
    }
}

impl FromStr for Surface {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "desktop" | "pc" => Ok(Surface::Desktop),
            "mobile" | "phone" => Ok(Surface::Mobile),
            other => Err(format!("unknown surface: {}", other)),
        }
    }
}

/// One row of the supervisor's target board.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardRow {
    pub target_id: TargetId,
    pub agent: String,
    pub month: Month,
    pub category: TargetCategory,
    pub status: TargetStatus,
    pub actual: u32,
    pub goal: u32,
}

impl BoardRow {
    fn of(target: &Target) -> Self {
        Self {
            target_id: target.id.clone(),
            agent: target.agent.clone(),
            month: target.month,
            category: target.category,
            status: target.status.clone(),
            actual: target.actual,
            goal: target.goal,
        }
    }

    pub fn progress(&self) -> Progress {
        Progress::new(self.actual, self.goal)
    }
}

/// The supervisor dashboard: issues targets and watches every agent's progress.
pub struct SupervisorDesk<'a> {
    bench: &'a mut Workbench,
}

impl<'a> SupervisorDesk<'a> {
    pub fn new(bench: &'a mut Workbench) -> Self {
        Self { bench }
    }

    /// Issue a target from the form. Refused when the slot already holds a
    /// pending or accepted target; a rejected one may be re-issued.
    pub fn issue(&mut self, directive: &TargetDirective) -> Result<Outcome, WorkbenchError> {
        let taken = self.bench.store().targets().iter().any(|t| {
            t.status.is_open() && t.occupies(&directive.agent, directive.month, directive.category)
        });
        if taken {
            return Err(WorkbenchError::DirectiveExists {
                agent: directive.agent.clone(),
                month: directive.month,
                category: directive.category,
            });
        }
        self.bench.add_target(directive.to_target())
    }

    /// Every target, newest first.
    pub fn board(&self) -> Vec<BoardRow> {
        self.bench
            .store()
            .targets()
            .iter()
            .rev()
            .map(BoardRow::of)
            .collect()
    }
}

/// An agent's dashboard, scoped to the acting agent.
pub struct AgentDesk<'a> {
    bench: &'a mut Workbench,
    agent: String,
    surface: Surface,
}

impl<'a> AgentDesk<'a> {
    /// Desk for the configured acting agent.
    pub fn new(bench: &'a mut Workbench, surface: Surface) -> Self {
        let agent = bench.config().acting_agent.clone();
        Self::for_agent(bench, agent, surface)
    }

    pub fn for_agent(bench: &'a mut Workbench, agent: impl Into<String>, surface: Surface) -> Self {
        Self {
            bench,
            agent: agent.into(),
            surface,
        }
    }

    pub fn agent(&self) -> &str {
        &self.agent
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }

    pub fn selected_month(&self) -> Month {
        self.bench.selected_month()
    }

    pub fn select_month(&mut self, month: Month) {
        self.bench.select_month(month);
    }

    /// Accepted targets in the selected month.
    pub fn current_targets(&self) -> Vec<&Target> {
        self.bench
            .store()
            .targets_for(&self.agent, self.bench.selected_month())
            .into_iter()
            .filter(|t| t.status == TargetStatus::Accepted)
            .collect()
    }

    /// Targets awaiting a response, across all months.
    pub fn pending_targets(&self) -> Vec<&Target> {
        self.bench.store().pending_for(&self.agent)
    }

    /// The agent's activities in the selected month, most recent first.
    pub fn activities(&self) -> Vec<&Activity> {
        self.bench
            .store()
            .activities_in(self.bench.selected_month())
            .into_iter()
            .filter(|a| a.owner == self.agent)
            .collect()
    }

    fn ensure_owns_target(&self, id: &TargetId) -> Result<(), WorkbenchError> {
        match self.bench.store().target(id) {
            Some(t) if t.agent != self.agent => Err(WorkbenchError::NotOwner {
                id: id.to_string(),
                owner: t.agent.clone(),
                agent: self.agent.clone(),
            }),
            _ => Ok(()),
        }
    }

    fn ensure_owns_activity(&self, id: &ActivityId) -> Result<(), WorkbenchError> {
        match self.bench.store().activity(id) {
            Some(a) if a.owner != self.agent => Err(WorkbenchError::NotOwner {
                id: id.to_string(),
                owner: a.owner.clone(),
                agent: self.agent.clone(),
            }),
            _ => Ok(()),
        }
    }

    pub fn accept(&mut self, id: &TargetId) -> Result<Outcome, WorkbenchError> {
        self.ensure_owns_target(id)?;
        Ok(self.bench.respond_to_target(id, TargetDecision::Accept))
    }

    pub fn reject(&mut self, id: &TargetId, reason: &str) -> Result<Outcome, WorkbenchError> {
        self.ensure_owns_target(id)?;
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(WorkbenchError::EmptyReason);
        }
        Ok(self.bench.respond_to_target(
            id,
            TargetDecision::Reject {
                reason: reason.to_string(),
            },
        ))
    }

    /// Start an activity from the form, owned by this desk's agent.
    pub fn create_activity(
        &mut self,
        draft: &ActivityDraft,
    ) -> Result<(ActivityId, Outcome), WorkbenchError> {
        let activity = draft.submit(self.agent.clone(), Utc::now());
        let id = activity.id.clone();
        let outcome = self.bench.create_activity(activity)?;
        Ok((id, outcome))
    }

    /// Check in an ongoing activity. A meeting completes with this
    /// surface's summary; an interview waits for a written summary.
    pub fn check_in(&mut self, id: &ActivityId) -> Result<Outcome, WorkbenchError> {
        self.ensure_owns_activity(id)?;
        let kind = match self.bench.store().activity(id) {
            Some(a) => a.kind(),
            None => {
                return Ok(Outcome::NotFound {
                    id: id.to_string(),
                })
            }
        };
        Ok(match kind {
            ActivityKind::Meeting => self
                .bench
                .complete_activity(id, self.surface.meeting_summary()),
            ActivityKind::Interview => self
                .bench
                .update_activity_status(id, ActivityStatus::PendingSummary),
        })
    }

    /// Complete an activity with a written summary.
    pub fn submit_summary(
        &mut self,
        id: &ActivityId,
        summary: &str,
    ) -> Result<Outcome, WorkbenchError> {
        self.ensure_owns_activity(id)?;
        let summary = summary.trim();
        if summary.is_empty() {
            return Err(WorkbenchError::EmptySummary);
        }
        Ok(self.bench.complete_activity(id, summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorkbenchConfig;

    fn bench() -> Workbench {
        Workbench::new(WorkbenchConfig::default())
    }

    fn feb() -> Month {
        "2026-02".parse().unwrap()
    }

    #[test]
    fn surface_summaries_differ() {
        assert_ne!(
            Surface::Desktop.meeting_summary(),
            Surface::Mobile.meeting_summary()
        );
        assert_eq!("PC".parse::<Surface>().unwrap(), Surface::Desktop);
        assert!("tablet".parse::<Surface>().is_err());
    }

    #[test]
    fn supervisor_refuses_open_slot() {
        let mut bench = bench();
        let mut desk = SupervisorDesk::new(&mut bench);
        let directive = TargetDirective {
            agent: "李四".to_string(),
            month: feb(),
            category: TargetCategory::OneOnOneInterview,
            goal: 4,
        };
        desk.issue(&directive).unwrap();

        // The core would replace a pending target; the form does not.
        let err = desk.issue(&directive).unwrap_err();
        assert!(matches!(err, WorkbenchError::DirectiveExists { .. }));
        assert_eq!(desk.board().len(), 3);
    }

    #[test]
    fn supervisor_can_reissue_after_rejection() {
        let mut bench = bench();
        let directive = TargetDirective {
            agent: "张三".to_string(),
            month: feb(),
            category: TargetCategory::TrainingMeeting,
            goal: 6,
        };
        SupervisorDesk::new(&mut bench).issue(&directive).unwrap();
        let id = bench.store().pending_for("张三")[0].id.clone();
        AgentDesk::new(&mut bench, Surface::Desktop)
            .reject(&id, "人手不足")
            .unwrap();

        let outcome = SupervisorDesk::new(&mut bench).issue(&directive).unwrap();
        assert!(matches!(outcome, Outcome::TargetIssued { .. }));
        assert_eq!(bench.store().targets().len(), 4);
    }

    #[test]
    fn board_lists_newest_first() {
        let mut bench = bench();
        let mut desk = SupervisorDesk::new(&mut bench);
        let mut directive = TargetDirective::defaults(&WorkbenchConfig::default());
        directive.agent = "王五".to_string();
        desk.issue(&directive).unwrap();

        let board = desk.board();
        assert_eq!(board[0].agent, "王五");
        assert_eq!(board[0].status, TargetStatus::Pending);
        assert_eq!(board.last().unwrap().target_id, TargetId::new("t1"));
        assert_eq!(board.last().unwrap().progress().percent(), 80);
    }

    #[test]
    fn agent_views_are_scoped() {
        let mut bench = bench();
        let desk = AgentDesk::new(&mut bench, Surface::Desktop);
        assert_eq!(desk.agent(), "张三");
        assert_eq!(desk.current_targets().len(), 2);
        assert!(desk.pending_targets().is_empty());
        assert_eq!(desk.activities().len(), 2);

        let other = AgentDesk::for_agent(&mut bench, "李四", Surface::Mobile);
        assert!(other.current_targets().is_empty());
        assert!(other.activities().is_empty());
    }

    #[test]
    fn empty_reason_is_refused() {
        let mut bench = bench();
        let directive = TargetDirective {
            agent: "张三".to_string(),
            month: feb(),
            category: TargetCategory::TrainingMeeting,
            goal: 3,
        };
        SupervisorDesk::new(&mut bench).issue(&directive).unwrap();

        let mut desk = AgentDesk::new(&mut bench, Surface::Mobile);
        let id = desk.pending_targets()[0].id.clone();
        assert!(matches!(
            desk.reject(&id, "   "),
            Err(WorkbenchError::EmptyReason)
        ));
        assert_eq!(desk.pending_targets().len(), 1);
    }

    #[test]
    fn meeting_check_in_completes_with_surface_summary() {
        let mut bench = bench();
        let mut desk = AgentDesk::new(&mut bench, Surface::Mobile);
        let mut draft = ActivityDraft::new(ActivityKind::Meeting);
        draft.date = chrono::NaiveDate::from_ymd_opt(2026, 1, 18).unwrap();
        let (id, _) = desk.create_activity(&draft).unwrap();

        let outcome = desk.check_in(&id).unwrap();
        assert_eq!(
            outcome,
            Outcome::ActivityCompleted {
                activity_id: id.clone(),
                credited: Some(TargetId::new("t1")),
            }
        );
        let a = bench.store().activity(&id).unwrap();
        assert_eq!(a.summary(), Some("移动端自动总结：会议圆满成功。"));
        assert_eq!(bench.store().target(&TargetId::new("t1")).unwrap().actual, 9);
    }

    #[test]
    fn interview_needs_written_summary() {
        let mut bench = bench();
        let mut desk = AgentDesk::new(&mut bench, Surface::Desktop);
        let mut draft = ActivityDraft::new(ActivityKind::Interview);
        draft.date = chrono::NaiveDate::from_ymd_opt(2026, 1, 19).unwrap();
        let (id, _) = desk.create_activity(&draft).unwrap();

        desk.check_in(&id).unwrap();
        assert!(matches!(
            desk.submit_summary(&id, ""),
            Err(WorkbenchError::EmptySummary)
        ));
        desk.submit_summary(&id, "沟通顺利").unwrap();

        assert_eq!(bench.store().target(&TargetId::new("t2")).unwrap().actual, 16);
    }

    #[test]
    fn check_in_unknown_activity_is_not_found() {
        let mut bench = bench();
        let mut desk = AgentDesk::new(&mut bench, Surface::Desktop);
        assert!(matches!(
            desk.check_in(&ActivityId::new("nope")),
            Ok(Outcome::NotFound { .. })
        ));
    }

    #[test]
    fn desk_refuses_another_agents_records() {
        let mut bench = bench();
        let directive = TargetDirective {
            agent: "李四".to_string(),
            month: feb(),
            category: TargetCategory::OneOnOneInterview,
            goal: 4,
        };
        SupervisorDesk::new(&mut bench).issue(&directive).unwrap();
        let target_id = bench.store().pending_for("李四")[0].id.clone();

        let mut draft = ActivityDraft::new(ActivityKind::Interview);
        draft.date = chrono::NaiveDate::from_ymd_opt(2026, 2, 5).unwrap();
        let (activity_id, _) = AgentDesk::for_agent(&mut bench, "李四", Surface::Desktop)
            .create_activity(&draft)
            .unwrap();
        let before = bench.store().snapshot();

        let mut desk = AgentDesk::new(&mut bench, Surface::Mobile);
        assert_eq!(desk.agent(), "张三");
        assert!(matches!(
            desk.accept(&target_id),
            Err(WorkbenchError::NotOwner { ref owner, .. }) if owner == "李四"
        ));
        assert!(matches!(
            desk.reject(&target_id, "不是我的"),
            Err(WorkbenchError::NotOwner { .. })
        ));
        assert!(matches!(
            desk.check_in(&activity_id),
            Err(WorkbenchError::NotOwner { .. })
        ));
        assert!(matches!(
            desk.submit_summary(&activity_id, "代写总结"),
            Err(WorkbenchError::NotOwner { .. })
        ));

        assert_eq!(bench.store().snapshot(), before);
        assert_eq!(
            bench.store().target(&target_id).unwrap().status,
            TargetStatus::Pending
        );
    }
}
