// seed.rs — Demo data and the department roster.
//
// The demo opens on January 2026 with two accepted targets for 张三 and
// two completed activities, so both dashboards have something to show
// before anyone issues a target.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use mt_ledger::{
    Activity, ActivityDetails, ActivityStatus, Ledger, Month, Target, TargetCategory, TargetStatus,
};

/// A member of a sales department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    pub name: String,
    /// Staff number.
    pub id: String,
}

/// A department and its staff, used to pick meeting attendees and interviewees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub name: String,
    #[serde(default)]
    pub staff: Vec<StaffMember>,
}

impl Department {
    pub fn staff_names(&self) -> impl Iterator<Item = &str> {
        self.staff.iter().map(|s| s.name.as_str())
    }
}

fn staff(name: &str, id: &str) -> StaffMember {
    StaffMember {
        name: name.to_string(),
        id: id.to_string(),
    }
}

pub fn default_roster() -> Vec<Department> {
    vec![
        Department {
            name: "第一营业部".to_string(),
            staff: vec![staff("王五", "600123"), staff("赵六", "600124")],
        },
        Department {
            name: "第二营业部".to_string(),
            staff: vec![staff("小明", "600201"), staff("小红", "600202")],
        },
    ]
}

pub fn default_agents() -> Vec<String> {
    ["张三", "李四", "王五"].iter().map(|s| s.to_string()).collect()
}

pub fn default_month_options() -> Vec<Month> {
    [(2025, 12), (2026, 1), (2026, 2)]
        .iter()
        .filter_map(|&(y, m)| Month::new(y, m).ok())
        .collect()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

/// The demo ledger, with activity timestamps relative to `now`.
pub fn demo_ledger(now: DateTime<Utc>) -> Ledger {
    let jan = Month::of(date(2026, 1, 1));

    let mut meetings = Target::new("张三", jan, TargetCategory::TrainingMeeting, 10).with_id("t1");
    meetings.actual = 8;
    meetings.status = TargetStatus::Accepted;

    let mut interviews =
        Target::new("张三", jan, TargetCategory::OneOnOneInterview, 20).with_id("t2");
    interviews.actual = 15;
    interviews.status = TargetStatus::Accepted;

    let mut kickoff = Activity::new(
        "张三",
        "2026开年首战宣导",
        "早会",
        date(2026, 1, 5),
        ActivityDetails::Meeting {
            location: "第一会议室".to_string(),
            speaker: "李总".to_string(),
            participants: Vec::new(),
        },
    )
    .with_id("a1")
    .with_themes(["方案政策"])
    .with_created_at(now - Duration::days(5));
    kickoff.status = ActivityStatus::Completed {
        summary: "会议顺利进行，明确了1月业务节奏。".to_string(),
    };

    let mut checkup = Activity::new(
        "张三",
        "王五绩优月度沟通",
        "面谈",
        date(2026, 1, 8),
        ActivityDetails::Interview {
            person_name: "王五".to_string(),
            person_id: "600123".to_string(),
        },
    )
    .with_id("a2")
    .with_themes(["意愿沟通"])
    .with_created_at(now - Duration::days(2));
    checkup.status = ActivityStatus::Completed {
        summary: "王五表示对1月目标非常有信心。".to_string(),
    };

    Ledger::new(vec![meetings, interviews], vec![kickoff, checkup])
}
