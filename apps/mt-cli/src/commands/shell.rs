// shell.rs — Interactive session on one shared workbench.
//
// Every line is parsed into a `ShellAction` first, so the parser can be
// tested without a terminal. Desk commands act as the configured acting
// agent on the current surface, which `surface` switches.

use chrono::NaiveDate;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use mt_ledger::{ActivityId, ActivityKind, Month, TargetCategory, TargetId};
use mt_workbench::{
    ActivityDraft, AgentDesk, Command, Surface, SupervisorDesk, TargetDirective, Workbench,
    WorkbenchConfig,
};

use super::board::{print_board, print_desk, print_notices};

const HELP: &str = "\
Commands:
  month <YYYY-MM>                          select month
  issue <agent> <YYYY-MM> <category> <goal>  supervisor: issue a target
  board                                    supervisor: all targets
  accept <target-id>                       accept a pending target
  reject <target-id> <reason...>           reject with a reason
  meeting <YYYY-MM-DD> <title...>          start a meeting
  interview <YYYY-MM-DD> <person> [title...] start an interview
  checkin <activity-id>                    check in on the current surface
  summary <activity-id> <text...>          submit an interview summary
  surface <desktop|mobile>                 switch agent surface
  desk                                     agent dashboard
  notices                                  live notices
  help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellAction {
    Run(Command),
    Issue(TargetDirective),
    Reject { id: TargetId, reason: String },
    Create(ActivityDraft),
    SwitchSurface(Surface),
    Board,
    Desk,
    Notices,
    Help,
    Quit,
}

/// Parse one input line. `Ok(None)` for a blank line.
pub fn parse_line(line: &str, config: &WorkbenchConfig) -> Result<Option<ShellAction>, String> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();
    let rest = |from: usize| args.get(from..).map(|a| a.join(" ")).unwrap_or_default();
    let arg = |idx: usize, name: &str| {
        args.get(idx)
            .copied()
            .ok_or_else(|| format!("{}: missing <{}>", head, name))
    };

    let action = match head {
        "month" => ShellAction::Run(Command::SelectMonth {
            month: parse_month(arg(0, "month")?)?,
        }),
        "issue" => ShellAction::Issue(TargetDirective {
            agent: arg(0, "agent")?.to_string(),
            month: parse_month(arg(1, "month")?)?,
            category: arg(2, "category")?
                .parse::<TargetCategory>()
                .map_err(|e| e.to_string())?,
            goal: arg(3, "goal")?
                .parse()
                .map_err(|_| "issue: goal must be a positive number".to_string())?,
        }),
        "board" => ShellAction::Board,
        "accept" => ShellAction::Run(Command::AcceptTarget {
            id: TargetId::new(arg(0, "target-id")?),
        }),
        "reject" => ShellAction::Reject {
            id: TargetId::new(arg(0, "target-id")?),
            reason: rest(1),
        },
        "meeting" => {
            let mut draft = ActivityDraft::new(ActivityKind::Meeting);
            draft.date = parse_date(arg(0, "date")?)?;
            draft.title = rest(1);
            ShellAction::Create(draft)
        }
        "interview" => {
            let mut draft = ActivityDraft::new(ActivityKind::Interview);
            draft.date = parse_date(arg(0, "date")?)?;
            let person = arg(1, "person")?;
            match config
                .roster
                .iter()
                .flat_map(|d| d.staff.iter())
                .find(|s| s.name == person)
            {
                Some(member) => draft.pick_person(member),
                None => draft.person_name = person.to_string(),
            }
            draft.title = rest(2);
            ShellAction::Create(draft)
        }
        "checkin" => ShellAction::Run(Command::CheckIn {
            id: ActivityId::new(arg(0, "activity-id")?),
            surface: Surface::default(),
        }),
        "summary" => ShellAction::Run(Command::SubmitSummary {
            id: ActivityId::new(arg(0, "activity-id")?),
            summary: rest(1),
        }),
        "surface" => ShellAction::SwitchSurface(arg(0, "surface")?.parse()?),
        "desk" => ShellAction::Desk,
        "notices" => ShellAction::Notices,
        "help" | "?" => ShellAction::Help,
        "quit" | "exit" => ShellAction::Quit,
        other => return Err(format!("unknown command '{}' (try help)", other)),
    };
    Ok(Some(action))
}

fn parse_month(s: &str) -> Result<Month, String> {
    s.parse().map_err(|e: mt_ledger::LedgerError| e.to_string())
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| format!("invalid date '{}'", s))
}

pub fn execute(config: WorkbenchConfig) -> anyhow::Result<()> {
    let mut rl = DefaultEditor::new()?;
    let mut bench = Workbench::new(config.clone());
    let mut surface = Surface::Desktop;

    println!("Monthly Targets shell. Type 'help' for commands.");

    loop {
        let prompt = format!("mt[{} {}]> ", surface, bench.selected_month());
        let line = match rl.readline(&prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };
        let _ = rl.add_history_entry(line.as_str());

        let action = match parse_line(&line, &config) {
            Ok(Some(action)) => action,
            Ok(None) => continue,
            Err(msg) => {
                eprintln!("{}", msg);
                continue;
            }
        };

        let mutates = matches!(
            action,
            ShellAction::Run(_)
                | ShellAction::Issue(_)
                | ShellAction::Reject { .. }
                | ShellAction::Create(_)
        );
        match action {
            ShellAction::Quit => break,
            ShellAction::Help => println!("{}", HELP),
            ShellAction::SwitchSurface(next) => surface = next,
            ShellAction::Board => {
                let rows = SupervisorDesk::new(&mut bench).board();
                print_board(&rows);
            }
            ShellAction::Desk => print_desk(&AgentDesk::new(&mut bench, surface)),
            ShellAction::Notices => print_notices(&bench.notices()),
            ShellAction::Issue(directive) => {
                report(SupervisorDesk::new(&mut bench).issue(&directive).map(Some))
            }
            ShellAction::Reject { id, reason } => {
                report(AgentDesk::new(&mut bench, surface).reject(&id, &reason).map(Some))
            }
            ShellAction::Create(draft) => {
                match AgentDesk::new(&mut bench, surface).create_activity(&draft) {
                    Ok((id, _)) => println!("created {}", id),
                    Err(e) => eprintln!("refused: {}", e),
                }
            }
            ShellAction::Run(command) => {
                let command = match command {
                    Command::CheckIn { id, .. } => Command::CheckIn { id, surface },
                    other => other,
                };
                report(command.apply(&mut bench));
            }
        }
        if mutates {
            print_notices(&bench.notices());
        }
    }

    Ok(())
}

fn report(result: Result<Option<mt_ledger::Outcome>, mt_workbench::WorkbenchError>) {
    match result {
        Ok(Some(outcome)) if !outcome.is_applied() => {
            println!("no change: {}", serde_json::to_string(&outcome).unwrap_or_default())
        }
        Ok(_) => {}
        Err(e) => eprintln!("refused: {}", e),
    }
}
