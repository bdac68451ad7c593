// replay.rs — Apply a JSONL command script and report each step.

use std::path::Path;

use anyhow::Context;
use mt_workbench::{Script, Workbench, WorkbenchConfig};

use super::board::print_board;

pub fn execute(
    config: WorkbenchConfig,
    file: &Path,
    json: bool,
    export: Option<&Path>,
) -> anyhow::Result<()> {
    let script = Script::load(file)?;
    let mut bench = Workbench::new(config);
    let reports = script.run(&mut bench);

    let mut refused = 0;
    for r in &reports {
        if r.is_error() {
            refused += 1;
        }
        if json {
            println!("{}", serde_json::to_string(r)?);
            continue;
        }
        match (&r.outcome, &r.error) {
            (_, Some(err)) => println!("{:>4}  {:<24} refused: {}", r.line, r.op, err),
            (Some(outcome), None) => println!(
                "{:>4}  {:<24} {}",
                r.line,
                r.op,
                serde_json::to_string(outcome)?
            ),
            (None, None) => println!("{:>4}  {:<24} ok", r.line, r.op),
        }
    }

    if !json {
        println!(
            "\n{} step(s) applied, {} refused.\n",
            reports.len() - refused,
            refused
        );
        let rows = mt_workbench::SupervisorDesk::new(&mut bench).board();
        print_board(&rows);
    }

    if let Some(path) = export {
        bench
            .store()
            .export_json(path)
            .with_context(|| format!("exporting ledger to {}", path.display()))?;
        tracing::info!("ledger exported to {}", path.display());
    }

    Ok(())
}
