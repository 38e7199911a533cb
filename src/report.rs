use crate::engine::Interlocking;
use crate::scenario::{Command, Outcome, StepRecord};
use serde_json::json;
use std::path::Path;

pub fn write_report_json(
    filename: &Path,
    records: &[StepRecord],
    engine: &Interlocking,
) -> std::io::Result<()> {
    std::fs::write(
        filename,
        serde_json::to_string_pretty(&report_json(records, engine))?,
    )?;
    Ok(())
}

fn report_json(records: &[StepRecord], engine: &Interlocking) -> serde_json::Value {
    let occupancy = engine
        .occupancy()
        .into_iter()
        .map(|(id, train)| json!({ "section": id, "train": train }))
        .collect::<Vec<_>>();
    json!({ "steps": records, "occupancy": occupancy })
}

fn describe(command: &Command) -> String {
    match command {
        Command::Add {
            name,
            entry,
            destination,
        } => format!("add {} {}->{}", name, entry, destination),
        Command::Move { trains } => format!("move {}", trains.join(",")),
        Command::Section { id } => format!("section {}", id),
        Command::Train { name } => format!("train {}", name),
    }
}

fn outcome(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Added => "added".to_string(),
        Outcome::Moved(n) => format!("moved {}", n),
        Outcome::Section(Some(train)) => format!("= {}", train),
        Outcome::Section(None) => "= ___".to_string(),
        Outcome::Train(section) => format!("@ s{}", section),
        Outcome::Rejected(reason) => format!("rejected: {}", reason),
    }
}

/// One line per step, followed by the final occupancy with `___` for empty
/// sections.
pub fn print_report(records: &[StepRecord], engine: &Interlocking) -> String {
    let mut summary = String::new();
    for record in records.iter() {
        summary.push_str(&format!(
            "Step {}: {:<24} {}\n",
            record.step,
            describe(&record.command),
            outcome(&record.outcome)
        ));
    }
    summary.push_str("Occupancy: ");
    summary.push_str(
        &engine
            .occupancy()
            .iter()
            .map(|(id, train)| format!("{:>4} {:<6}", format!("s{}", id), train.unwrap_or("___")))
            .collect::<Vec<_>>()
            .join(" "),
    );
    summary.push('\n');
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::{run, Scenario};
    use crate::topology::Topology;

    fn driver() -> (Vec<StepRecord>, Interlocking) {
        let scenario = Scenario::from_json_str(include_str!("../scenarios/driver.json")).unwrap();
        let mut engine = Interlocking::new(&Topology::standard()).unwrap();
        engine.add_train("x", 10, 2).unwrap();
        let records = run(&mut engine, &scenario);
        (records, engine)
    }

    #[test]
    fn report_lists_steps_and_occupancy() {
        let (records, engine) = driver();
        let report = print_report(&records, &engine);
        let lines = report.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), records.len() + 1);
        assert!(lines[0].starts_with("Step 0: add t 3->4"));
        assert!(lines[0].ends_with("added"));
        assert!(lines[2].ends_with("@ s4"));
        assert!(lines[5].contains("rejected: train t is not in service"));
        assert!(lines[6].contains(" s10 x "));
        assert!(lines[6].contains("  s4 ___"));
    }

    #[test]
    fn json_report_has_steps_and_occupancy() {
        let (records, engine) = driver();
        let value = report_json(&records, &engine);
        assert_eq!(value["steps"].as_array().unwrap().len(), 6);
        assert_eq!(value["steps"][0]["command"]["add"]["entry"], 3);
        assert_eq!(value["steps"][1]["outcome"]["moved"], 1);
        assert_eq!(value["steps"][4]["outcome"]["section"], serde_json::Value::Null);
        assert_eq!(value["occupancy"][9], json!({ "section": 10, "train": "x" }));
        assert_eq!(value["occupancy"][0]["train"], serde_json::Value::Null);
    }
}
