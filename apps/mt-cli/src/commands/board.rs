// board.rs — Target board and agent desk printing.

use mt_ledger::{Month, Notice};
use mt_workbench::{AgentDesk, BoardRow, SupervisorDesk, Workbench, WorkbenchConfig};

use super::truncate;

pub fn execute(config: WorkbenchConfig, month: Option<&str>) -> anyhow::Result<()> {
    let month = month.map(str::parse::<Month>).transpose()?;
    let mut bench = Workbench::new(config);
    let rows: Vec<BoardRow> = SupervisorDesk::new(&mut bench)
        .board()
        .into_iter()
        .filter(|r| month.map_or(true, |m| r.month == m))
        .collect();
    print_board(&rows);
    Ok(())
}

pub fn print_board(rows: &[BoardRow]) {
    if rows.is_empty() {
        println!("No targets issued.");
        return;
    }

    println!(
        "{:<34} {:<8} {:<8} {:<10} {:<10} {:<24}",
        "ID", "AGENT", "MONTH", "CATEGORY", "STATUS", "PROGRESS"
    );
    println!("{}", "-".repeat(98));

    for r in rows {
        println!(
            "{:<34} {:<8} {:<8} {:<10} {:<10} {} {}",
            truncate(r.target_id.as_str(), 32),
            r.agent,
            r.month.to_string(),
            r.category.label(),
            r.status.label(),
            r.progress().bar(10),
            r.progress(),
        );
    }
    println!("\n{} target(s) total.", rows.len());
}

pub fn print_desk(desk: &AgentDesk<'_>) {
    println!(
        "{} · {} · {}",
        desk.agent(),
        desk.surface(),
        desk.selected_month()
    );

    let pending = desk.pending_targets();
    if !pending.is_empty() {
        println!("\nAwaiting your response:");
        for t in pending {
            println!(
                "  {}  {} {} goal {}",
                t.id,
                t.month,
                t.category.label(),
                t.goal
            );
        }
    }

    println!("\nTargets:");
    let current = desk.current_targets();
    if current.is_empty() {
        println!("  (none accepted this month)");
    }
    for t in current {
        println!(
            "  {:<10} {} {}",
            t.category.label(),
            t.progress().bar(20),
            t.progress()
        );
    }

    println!("\nActivities:");
    let activities = desk.activities();
    if activities.is_empty() {
        println!("  (none this month)");
    }
    for a in activities {
        println!(
            "  {}  {} {:<6} {:<24} {}",
            a.id,
            a.date,
            a.subtype,
            truncate(&a.title, 22),
            a.status.label()
        );
        if let Some(summary) = a.summary() {
            println!("      {}", summary);
        }
    }
}

pub fn print_notices(notices: &[Notice]) {
    for n in notices {
        println!("» {}", n.text);
    }
}
