// demo.rs — Scripted walkthrough of one month across all three dashboards.

use chrono::{Datelike, NaiveDate};
use mt_ledger::{ActivityKind, TargetCategory};
use mt_workbench::{
    ActivityDraft, AgentDesk, Surface, SupervisorDesk, TargetDirective, Workbench,
    WorkbenchConfig,
};

use super::board::{print_board, print_desk, print_notices};

pub fn execute(config: WorkbenchConfig) -> anyhow::Result<()> {
    let agent = config.acting_agent.clone();
    let month = config.default_directive_month();
    let roster = config.roster.clone();
    let mut bench = Workbench::new(config);
    bench.select_month(month);

    step("Supervisor issues an interview target");
    let directive = TargetDirective {
        agent: agent.clone(),
        month,
        category: TargetCategory::OneOnOneInterview,
        goal: 3,
    };
    match SupervisorDesk::new(&mut bench).issue(&directive) {
        Ok(_) => {}
        // Seeded data may already hold this slot; the rest still runs.
        Err(e) => println!("refused: {}", e),
    }
    print_notices(&bench.notices());

    step("Mobile dashboard accepts every pending target");
    let pending: Vec<_> = AgentDesk::new(&mut bench, Surface::Mobile)
        .pending_targets()
        .iter()
        .map(|t| t.id.clone())
        .collect();
    for id in &pending {
        AgentDesk::new(&mut bench, Surface::Mobile).accept(id)?;
    }
    print_notices(&bench.notices());

    step("Desktop dashboard runs a meeting and an interview");
    let day = NaiveDate::from_ymd_opt(month.year(), month.month(), 20)
        .ok_or_else(|| anyhow::anyhow!("no day 20 in {}", month))?;

    let mut meeting = ActivityDraft::new(ActivityKind::Meeting);
    meeting.title = "月中业务推动会".to_string();
    meeting.location = "第一会议室".to_string();
    meeting.date = day;
    meeting.toggle_theme("专业知识");
    if let Some(dept) = roster.first() {
        meeting.toggle_department(dept);
    }

    let mut interview = ActivityDraft::new(ActivityKind::Interview);
    interview.title = "月度绩效面谈".to_string();
    interview.date = day.with_day(21).unwrap_or(day);
    if let Some(member) = roster.first().and_then(|d| d.staff.first()) {
        interview.pick_person(member);
    }

    let mut desk = AgentDesk::new(&mut bench, Surface::Desktop);
    let (meeting_id, _) = desk.create_activity(&meeting)?;
    let (interview_id, _) = desk.create_activity(&interview)?;
    desk.check_in(&meeting_id)?;
    desk.check_in(&interview_id)?;
    desk.submit_summary(&interview_id, "明确了下月增员计划。")?;
    print_notices(&bench.notices());

    step("Agent desk (mobile)");
    print_desk(&AgentDesk::new(&mut bench, Surface::Mobile));

    step("Supervisor board");
    let rows = SupervisorDesk::new(&mut bench).board();
    print_board(&rows);

    Ok(())
}

fn step(title: &str) {
    println!("\n== {} ==", title);
}
