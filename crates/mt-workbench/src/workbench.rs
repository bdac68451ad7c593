// workbench.rs — Workbench: the application shell shared by every surface.
//
// The workbench owns the one StateStore that the supervisor dashboard and
// both agent dashboards read. Each operation:
//   1. snapshots the store
//   2. runs the pure lifecycle operation
//   3. commits the returned ledger (whole-collection replace)
//   4. dispatches the resulting events, drops expired notices and posts
//      a toast notice
// A refused operation returns before step 3, so the store is untouched.

use chrono::{DateTime, Duration, Utc};

use mt_ledger::lifecycle::{self, Transition};
use mt_ledger::{
    Activity, ActivityId, ActivityStatus, EventDispatcher, Ledger, LedgerEvent, LogSink, Month,
    MonthScope, Notice, NoticeBoard, NotificationSink, Outcome, StateStore, Target,
    TargetDecision, TargetId,
};

use crate::config::{WorkbenchConfig, MAX_NOTICE_TTL_MS};
use crate::error::WorkbenchError;
use crate::seed::demo_ledger;

pub struct Workbench {
    store: StateStore,
    dispatcher: EventDispatcher,
    notices: NoticeBoard,
    config: WorkbenchConfig,
}

impl Workbench {
    /// Open a workbench as configured: demo data when `seed_demo_data` is
    /// set, and a JSONL event sink when `events_log` is set.
    pub fn new(config: WorkbenchConfig) -> Self {
        let ledger = if config.seed_demo_data {
            demo_ledger(Utc::now())
        } else {
            Ledger::default()
        };
        Self::with_ledger(config, ledger)
    }

    /// Open a workbench over an explicit starting ledger.
    pub fn with_ledger(config: WorkbenchConfig, ledger: Ledger) -> Self {
        let mut dispatcher = EventDispatcher::new();
        if let Some(path) = &config.events_log {
            dispatcher.add_sink(Box::new(LogSink::new(path)));
        }
        // Configs built in code skip the TOML range check.
        let ttl_ms = config.notices.ttl_ms.clamp(0, MAX_NOTICE_TTL_MS);
        let notices = NoticeBoard::new(Duration::milliseconds(ttl_ms));
        let store = StateStore::with_ledger(ledger, config.selected_month);

        tracing::info!(
            targets = store.targets().len(),
            activities = store.activities().len(),
            month = %store.selected_month(),
            "workbench opened"
        );

        Self {
            store,
            dispatcher,
            notices,
            config,
        }
    }

    pub fn add_sink(&mut self, sink: Box<dyn NotificationSink>) {
        self.dispatcher.add_sink(sink);
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn config(&self) -> &WorkbenchConfig {
        &self.config
    }

    pub fn selected_month(&self) -> Month {
        self.store.selected_month()
    }

    pub fn select_month(&mut self, month: Month) {
        tracing::debug!(%month, "month selected");
        self.store.select_month(month);
    }

    /// The month scope completions are credited against right now.
    pub fn month_scope(&self) -> MonthScope {
        self.config.completion.scope(self.store.selected_month())
    }

    /// Issue a target. Fails without touching the store when the agent has
    /// already accepted a target in the same slot.
    pub fn add_target(&mut self, target: Target) -> Result<Outcome, WorkbenchError> {
        let transition = lifecycle::add_target(&self.store.snapshot(), target).inspect_err(|e| {
            tracing::info!("target refused: {}", e);
        })?;
        Ok(self.apply(transition))
    }

    pub fn respond_to_target(&mut self, id: &TargetId, decision: TargetDecision) -> Outcome {
        let transition = lifecycle::respond_to_target(&self.store.snapshot(), id, decision);
        self.apply(transition)
    }

    /// Add an activity. Fails without touching the store when its id is
    /// already in use.
    pub fn create_activity(&mut self, activity: Activity) -> Result<Outcome, WorkbenchError> {
        let transition =
            lifecycle::create_activity(&self.store.snapshot(), activity).inspect_err(|e| {
                tracing::info!("activity refused: {}", e);
            })?;
        Ok(self.apply(transition))
    }

    pub fn complete_activity(&mut self, id: &ActivityId, summary: impl Into<String>) -> Outcome {
        let scope = self.month_scope();
        let transition = lifecycle::complete_activity(&self.store.snapshot(), id, summary, scope);
        self.apply(transition)
    }

    pub fn update_activity_status(&mut self, id: &ActivityId, status: ActivityStatus) -> Outcome {
        let transition = lifecycle::update_activity_status(&self.store.snapshot(), id, status);
        self.apply(transition)
    }

    /// Notices still visible at `now`; expired ones are dropped.
    pub fn notices_at(&mut self, now: DateTime<Utc>) -> Vec<Notice> {
        self.notices.prune(now);
        self.notices.active(now).into_iter().cloned().collect()
    }

    /// Notices visible right now.
    pub fn notices(&mut self) -> Vec<Notice> {
        self.notices_at(Utc::now())
    }

    fn apply(&mut self, transition: Transition) -> Outcome {
        self.apply_at(transition, Utc::now())
    }

    fn apply_at(&mut self, transition: Transition, now: DateTime<Utc>) -> Outcome {
        let Transition { ledger, outcome } = transition;
        if !outcome.is_applied() {
            return outcome;
        }

        self.store.commit(ledger);
        tracing::info!(?outcome, "ledger updated");

        self.notices.prune(now);
        for event in self.events_for(&outcome) {
            self.dispatcher.dispatch(&event);
            if let Some(text) = event.notice_text() {
                self.notices.push(text, now);
            }
        }
        outcome
    }

    /// Events describing an applied outcome, read from the committed store.
    fn events_for(&self, outcome: &Outcome) -> Vec<LedgerEvent> {
        let now = Utc::now();
        match outcome {
            Outcome::TargetIssued { target_id } | Outcome::TargetReplaced { target_id } => {
                let Some(t) = self.store.target(target_id) else {
                    return Vec::new();
                };
                let (target_id, agent, month, category, goal) =
                    (t.id.clone(), t.agent.clone(), t.month, t.category, t.goal);
                let event = if matches!(outcome, Outcome::TargetIssued { .. }) {
                    LedgerEvent::TargetIssued {
                        target_id,
                        agent,
                        month,
                        category,
                        goal,
                        timestamp: now,
                    }
                } else {
                    LedgerEvent::TargetReplaced {
                        target_id,
                        agent,
                        month,
                        category,
                        goal,
                        timestamp: now,
                    }
                };
                vec![event]
            }
            Outcome::TargetResponded { target_id, status } => vec![LedgerEvent::TargetResponded {
                target_id: target_id.clone(),
                status: status.clone(),
                timestamp: now,
            }],
            Outcome::ActivityCreated { activity_id } => self
                .store
                .activity(activity_id)
                .map(|a| LedgerEvent::ActivityCreated {
                    activity_id: a.id.clone(),
                    kind: a.kind(),
                    title: a.title.clone(),
                    timestamp: now,
                })
                .into_iter()
                .collect(),
            Outcome::ActivityStatusChanged {
                activity_id,
                from,
                to,
            } => vec![LedgerEvent::activity_status_changed(
                activity_id.clone(),
                from,
                to,
            )],
            Outcome::ActivityCompleted {
                activity_id,
                credited,
            } => {
                let mut events = Vec::new();
                if let Some(summary) = self
                    .store
                    .activity(activity_id)
                    .and_then(|a| a.summary())
                {
                    events.push(LedgerEvent::ActivityCompleted {
                        activity_id: activity_id.clone(),
                        summary: summary.to_string(),
                        timestamp: now,
                    });
                }
                if let Some(t) = credited.as_ref().and_then(|id| self.store.target(id)) {
                    events.push(LedgerEvent::TargetProgressed {
                        target_id: t.id.clone(),
                        activity_id: activity_id.clone(),
                        actual: t.actual,
                        goal: t.goal,
                        timestamp: now,
                    });
                }
                events
            }
            Outcome::NotFound { .. } | Outcome::Unchanged { .. } => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use mt_ledger::{ActivityDetails, ActivityKind, LedgerError, TargetCategory, TargetStatus};
    use std::fs;
    use tempfile::tempdir;

    fn empty_bench() -> Workbench {
        let config = WorkbenchConfig {
            seed_demo_data: false,
            ..WorkbenchConfig::default()
        };
        Workbench::new(config)
    }

    fn jan() -> Month {
        "2026-01".parse().unwrap()
    }

    #[test]
    fn seeded_bench_opens_on_demo_data() {
        let bench = Workbench::new(WorkbenchConfig::default());
        assert_eq!(bench.store().targets().len(), 2);
        assert_eq!(bench.store().activities().len(), 2);
        assert_eq!(bench.selected_month(), jan());
    }

    #[test]
    fn applied_operations_post_notices() {
        let mut bench = empty_bench();
        bench
            .add_target(Target::new("张三", jan(), TargetCategory::OneOnOneInterview, 5))
            .unwrap();
        let texts: Vec<String> = bench.notices().into_iter().map(|n| n.text).collect();
        assert_eq!(texts, vec!["新目标下达: 1v1面谈"]);
    }

    #[test]
    fn notices_expire_after_configured_ttl() {
        let mut bench = empty_bench();
        let activity = Activity::new(
            "张三",
            "x",
            "早会",
            NaiveDate::from_ymd_opt(2026, 1, 3).unwrap(),
            ActivityDetails::blank(ActivityKind::Meeting),
        );
        bench.create_activity(activity).unwrap();
        let later = Utc::now() + Duration::milliseconds(bench.config().notices.ttl_ms + 1);
        assert!(bench.notices_at(later).is_empty());
    }

    #[test]
    fn applying_prunes_expired_notices() {
        let mut bench = empty_bench();
        let meeting = |day| {
            Activity::new(
                "张三",
                "早会",
                "早会",
                NaiveDate::from_ymd_opt(2026, 1, day).unwrap(),
                ActivityDetails::blank(ActivityKind::Meeting),
            )
        };

        let t0 = Utc::now();
        for day in 1..=3 {
            let t = lifecycle::create_activity(&bench.store.snapshot(), meeting(day)).unwrap();
            bench.apply_at(t, t0);
        }
        assert_eq!(bench.notices.len(), 3);

        let t = lifecycle::create_activity(&bench.store.snapshot(), meeting(4)).unwrap();
        bench.apply_at(t, t0 + Duration::seconds(10));
        assert_eq!(bench.notices.len(), 1);
    }

    #[test]
    fn oversized_ttl_from_code_is_clamped() {
        let mut config = WorkbenchConfig {
            seed_demo_data: false,
            ..WorkbenchConfig::default()
        };
        config.notices.ttl_ms = i64::MAX;
        let mut bench = Workbench::new(config);
        bench
            .create_activity(Activity::new(
                "张三",
                "x",
                "早会",
                NaiveDate::from_ymd_opt(2026, 1, 3).unwrap(),
                ActivityDetails::blank(ActivityKind::Meeting),
            ))
            .unwrap();
        assert_eq!(bench.notices().len(), 1);
        assert!(bench
            .notices_at(Utc::now() + Duration::milliseconds(MAX_NOTICE_TTL_MS + 1))
            .is_empty());
    }

    #[test]
    fn duplicate_activity_id_is_refused() {
        let mut bench = Workbench::new(WorkbenchConfig::default());
        let existing = bench.store().activities()[0].id.clone();
        let before = bench.store().snapshot();

        let clash = Activity::new(
            "张三",
            "重复",
            "早会",
            NaiveDate::from_ymd_opt(2026, 1, 3).unwrap(),
            ActivityDetails::blank(ActivityKind::Meeting),
        )
        .with_id(existing);
        let result = bench.create_activity(clash);
        assert!(matches!(
            result,
            Err(WorkbenchError::Ledger(LedgerError::DuplicateId { .. }))
        ));
        assert_eq!(bench.store().snapshot(), before);
    }

    #[test]
    fn refused_target_leaves_store_and_notices_untouched() {
        let mut bench = Workbench::new(WorkbenchConfig::default());
        let before = bench.store().snapshot();
        let result = bench.add_target(Target::new("张三", jan(), TargetCategory::TrainingMeeting, 3));
        assert!(matches!(
            result,
            Err(WorkbenchError::Ledger(LedgerError::DuplicateAcceptedTarget { .. }))
        ));
        assert_eq!(bench.store().snapshot(), before);
        assert!(bench.notices().is_empty());
    }

    #[test]
    fn status_overwrite_is_silent() {
        let mut bench = empty_bench();
        let activity = Activity::new(
            "张三",
            "面谈",
            "面谈",
            NaiveDate::from_ymd_opt(2026, 1, 3).unwrap(),
            ActivityDetails::blank(ActivityKind::Interview),
        );
        let id = activity.id.clone();
        bench.create_activity(activity).unwrap();
        let before = bench.notices().len();
        bench.update_activity_status(&id, ActivityStatus::PendingSummary);
        assert_eq!(bench.notices().len(), before);
    }

    #[test]
    fn completion_respects_selected_month_source() {
        let mut config = WorkbenchConfig::default();
        config.completion.month_source = crate::config::MonthSource::Selected;
        let mut bench = Workbench::new(config);
        bench.select_month("2026-02".parse().unwrap());

        let activity = Activity::new(
            "张三",
            "一月早会",
            "早会",
            NaiveDate::from_ymd_opt(2026, 1, 20).unwrap(),
            ActivityDetails::blank(ActivityKind::Meeting),
        );
        let id = activity.id.clone();
        bench.create_activity(activity).unwrap();
        let outcome = bench.complete_activity(&id, "ok");

        // February is selected and has no accepted target: nothing credited.
        assert!(matches!(
            outcome,
            Outcome::ActivityCompleted { credited: None, .. }
        ));
        let t1 = bench.store().target(&TargetId::new("t1")).unwrap();
        assert_eq!(t1.actual, 8);
    }

    #[test]
    fn events_are_written_to_configured_log() {
        let dir = tempdir().unwrap();
        let log = dir.path().join("events.jsonl");
        let config = WorkbenchConfig {
            events_log: Some(log.clone()),
            ..WorkbenchConfig::default()
        };
        let mut bench = Workbench::new(config);

        let activity = Activity::new(
            "张三",
            "早会",
            "早会",
            NaiveDate::from_ymd_opt(2026, 1, 21).unwrap(),
            ActivityDetails::blank(ActivityKind::Meeting),
        );
        let id = activity.id.clone();
        bench.create_activity(activity).unwrap();
        bench.complete_activity(&id, "ok");

        let content = fs::read_to_string(&log).unwrap();
        let types: Vec<String> = content
            .lines()
            .map(|l| {
                let v: serde_json::Value = serde_json::from_str(l).unwrap();
                v["event_type"].as_str().unwrap().to_string()
            })
            .collect();
        assert_eq!(
            types,
            vec!["activity_created", "activity_completed", "target_progressed"]
        );
        assert_eq!(
            bench.store().target(&TargetId::new("t1")).unwrap().status,
            TargetStatus::Accepted
        );
        assert_eq!(bench.store().target(&TargetId::new("t1")).unwrap().actual, 9);
    }
}
