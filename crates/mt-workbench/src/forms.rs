// forms.rs — Form state for issuing targets and starting activities.
//
// These are the inputs a surface collects before it calls a lifecycle
// operation. They hold defaults and the toggle logic of the pickers; they
// never touch the store themselves.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use mt_ledger::{Activity, ActivityDetails, ActivityKind, Month, Target, TargetCategory};

use crate::config::WorkbenchConfig;
use crate::seed::{Department, StaffMember};

/// Theme tag that takes a free-text explanation.
pub const OTHER_THEME: &str = "其他";

/// The supervisor's target form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetDirective {
    pub agent: String,
    pub month: Month,
    pub category: TargetCategory,
    pub goal: u32,
}

impl TargetDirective {
    /// Form defaults: first configured agent, second month option,
    /// training meetings, ten sessions.
    pub fn defaults(config: &WorkbenchConfig) -> Self {
        Self {
            agent: config
                .agents
                .first()
                .cloned()
                .unwrap_or_else(|| config.acting_agent.clone()),
            month: config.default_directive_month(),
            category: TargetCategory::TrainingMeeting,
            goal: 10,
        }
    }

    /// A fresh Pending target for this directive.
    pub fn to_target(&self) -> Target {
        Target::new(self.agent.clone(), self.month, self.category, self.goal)
    }
}

/// The activity form shared by the desktop and mobile dashboards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityDraft {
    pub kind: ActivityKind,
    pub title: String,
    pub subtype: String,
    pub date: NaiveDate,
    pub location: String,
    pub speaker: String,
    pub person_name: String,
    pub person_id: String,
    /// Picked theme tags, in pick order.
    pub themes: Vec<String>,
    /// Free text for the "其他" theme.
    pub other_theme: String,
    /// Meeting attendees, in pick order, without duplicates.
    pub participants: Vec<String>,
}

impl ActivityDraft {
    pub fn new(kind: ActivityKind) -> Self {
        Self {
            kind,
            title: String::new(),
            subtype: Self::subtype_options(kind)[0].to_string(),
            date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap_or_default(),
            location: String::new(),
            speaker: String::new(),
            person_name: String::new(),
            person_id: String::new(),
            themes: Vec::new(),
            other_theme: String::new(),
            participants: Vec::new(),
        }
    }

    pub fn subtype_options(kind: ActivityKind) -> &'static [&'static str] {
        match kind {
            ActivityKind::Meeting => &["早会", "新人班", "培训会议"],
            ActivityKind::Interview => &["面谈", "陪访"],
        }
    }

    pub fn theme_options(kind: ActivityKind) -> &'static [&'static str] {
        match kind {
            ActivityKind::Meeting => &["方案政策", "氛围营造", "专业知识", OTHER_THEME],
            ActivityKind::Interview => &["业绩跟进", "增员意愿", "日常沟通", OTHER_THEME],
        }
    }

    /// Title used when the form is submitted blank.
    pub fn untitled(kind: ActivityKind) -> &'static str {
        match kind {
            ActivityKind::Meeting => "未命名会议",
            ActivityKind::Interview => "未命名面谈",
        }
    }

    pub fn toggle_theme(&mut self, theme: &str) {
        toggle(&mut self.themes, theme);
    }

    pub fn toggle_participant(&mut self, name: &str) {
        toggle(&mut self.participants, name);
    }

    /// Select every member of `dept`, or deselect them all when every
    /// member is already selected.
    pub fn toggle_department(&mut self, dept: &Department) {
        let names: Vec<&str> = dept.staff_names().collect();
        let all_selected = names
            .iter()
            .all(|n| self.participants.iter().any(|p| p == n));

        if all_selected {
            self.participants.retain(|p| !names.contains(&p.as_str()));
        } else {
            for name in names {
                if !self.participants.iter().any(|p| p == name) {
                    self.participants.push(name.to_string());
                }
            }
        }
    }

    /// Pick the interviewee.
    pub fn pick_person(&mut self, member: &StaffMember) {
        self.person_name = member.name.clone();
        self.person_id = member.id.clone();
    }

    /// Theme tags as stored: "其他" becomes "其他: <text>".
    pub fn final_themes(&self) -> Vec<String> {
        self.themes
            .iter()
            .map(|t| {
                if t == OTHER_THEME {
                    format!("{}: {}", OTHER_THEME, self.other_theme)
                } else {
                    t.clone()
                }
            })
            .collect()
    }

    /// Build the Ongoing activity this form describes.
    pub fn submit(&self, owner: impl Into<String>, now: DateTime<Utc>) -> Activity {
        let title = if self.title.trim().is_empty() {
            Self::untitled(self.kind).to_string()
        } else {
            self.title.clone()
        };

        let details = match self.kind {
            ActivityKind::Meeting => ActivityDetails::Meeting {
                location: self.location.clone(),
                speaker: self.speaker.clone(),
                participants: self.participants.clone(),
            },
            ActivityKind::Interview => ActivityDetails::Interview {
                person_name: self.person_name.clone(),
                person_id: self.person_id.clone(),
            },
        };

        Activity::new(owner, title, self.subtype.clone(), self.date, details)
            .with_themes(self.final_themes())
            .with_created_at(now)
    }
}

fn toggle(list: &mut Vec<String>, value: &str) {
    if let Some(idx) = list.iter().position(|v| v == value) {
        list.remove(idx);
    } else {
        list.push(value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::default_roster;
    use mt_ledger::ActivityStatus;

    #[test]
    fn directive_defaults_follow_config() {
        let d = TargetDirective::defaults(&WorkbenchConfig::default());
        assert_eq!(d.agent, "张三");
        assert_eq!(d.month.to_string(), "2026-01");
        assert_eq!(d.category, TargetCategory::TrainingMeeting);
        assert_eq!(d.goal, 10);

        let t = d.to_target();
        assert_eq!(t.agent, "张三");
        assert_eq!(t.actual, 0);
    }

    #[test]
    fn draft_defaults_per_kind() {
        let m = ActivityDraft::new(ActivityKind::Meeting);
        assert_eq!(m.subtype, "早会");
        assert_eq!(m.date, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        let i = ActivityDraft::new(ActivityKind::Interview);
        assert_eq!(i.subtype, "面谈");
    }

    #[test]
    fn blank_title_gets_placeholder() {
        let a = ActivityDraft::new(ActivityKind::Interview).submit("张三", Utc::now());
        assert_eq!(a.title, "未命名面谈");
        assert_eq!(a.status, ActivityStatus::Ongoing);
        assert_eq!(a.owner, "张三");
    }

    #[test]
    fn other_theme_expands_with_text() {
        let mut d = ActivityDraft::new(ActivityKind::Meeting);
        d.toggle_theme("方案政策");
        d.toggle_theme(OTHER_THEME);
        d.other_theme = "节日活动".to_string();
        assert_eq!(d.final_themes(), vec!["方案政策", "其他: 节日活动"]);

        d.toggle_theme("方案政策");
        assert_eq!(d.final_themes(), vec!["其他: 节日活动"]);
    }

    #[test]
    fn department_toggle_selects_then_clears() {
        let roster = default_roster();
        let mut d = ActivityDraft::new(ActivityKind::Meeting);
        d.toggle_participant("赵六");
        d.toggle_participant("小明");

        d.toggle_department(&roster[0]);
        assert_eq!(d.participants, vec!["赵六", "小明", "王五"]);

        d.toggle_department(&roster[0]);
        assert_eq!(d.participants, vec!["小明"]);
    }

    #[test]
    fn meeting_submission_carries_participants() {
        let mut d = ActivityDraft::new(ActivityKind::Meeting);
        d.title = "新人班第一期".to_string();
        d.location = "第二会议室".to_string();
        d.toggle_department(&default_roster()[1]);
        let a = d.submit("张三", Utc::now());

        match a.details {
            ActivityDetails::Meeting {
                ref location,
                ref participants,
                ..
            } => {
                assert_eq!(location, "第二会议室");
                assert_eq!(participants, &vec!["小明".to_string(), "小红".to_string()]);
            }
            _ => panic!("expected meeting details"),
        }
        assert_eq!(a.title, "新人班第一期");
    }

    #[test]
    fn interview_submission_carries_person() {
        let roster = default_roster();
        let mut d = ActivityDraft::new(ActivityKind::Interview);
        d.pick_person(&roster[0].staff[1]);
        let a = d.submit("张三", Utc::now());
        assert_eq!(
            a.details,
            ActivityDetails::Interview {
                person_name: "赵六".to_string(),
                person_id: "600124".to_string(),
            }
        );
    }
}
