use crate::engine::Interlocking;
use crate::error::{InterlockingError, ScenarioError};
use crate::section::SectionId;
use log::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One call against the interlocking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    Add {
        name: String,
        entry: SectionId,
        destination: SectionId,
    },
    Move {
        trains: Vec<String>,
    },
    Section {
        id: SectionId,
    },
    Train {
        name: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub steps: Vec<Command>,
}

impl Scenario {
    pub fn from_json_str(json: &str) -> Result<Self, ScenarioError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ScenarioError> {
        trace!("Loading scenario file {}", path.display());
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Added,
    Moved(usize),
    Section(Option<String>),
    Train(SectionId),
    Rejected(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepRecord {
    pub step: usize,
    pub command: Command,
    pub outcome: Outcome,
}

pub fn execute(engine: &mut Interlocking, command: &Command) -> Result<Outcome, InterlockingError> {
    Ok(match command {
        Command::Add {
            name,
            entry,
            destination,
        } => {
            engine.add_train(name, *entry, *destination)?;
            Outcome::Added
        }
        Command::Move { trains } => Outcome::Moved(engine.move_trains(trains.as_slice())?),
        Command::Section { id } => Outcome::Section(engine.section(*id)?.map(str::to_string)),
        Command::Train { name } => Outcome::Train(engine.train(name)?),
    })
}

/// Runs every step in order. A rejected command is recorded and the run
/// continues with the next step.
pub fn run(engine: &mut Interlocking, scenario: &Scenario) -> Vec<StepRecord> {
    let _p = hprof::enter("run scenario");
    scenario
        .steps
        .iter()
        .enumerate()
        .map(|(step, command)| {
            let outcome = execute(engine, command).unwrap_or_else(|e| {
                info!("Step {}: {:?} rejected: {}", step, command, e);
                Outcome::Rejected(e.to_string())
            });
            trace!("Step {}: {:?}", step, outcome);
            StepRecord {
                step,
                command: command.clone(),
                outcome,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::Topology;

    #[test]
    fn parses_all_commands() {
        let scenario = Scenario::from_json_str(
            r#"{ "steps": [
                { "add": { "name": "t", "entry": 3, "destination": 4 } },
                { "move": { "trains": ["t"] } },
                { "section": { "id": 4 } },
                { "train": { "name": "t" } }
            ] }"#,
        )
        .unwrap();
        assert_eq!(
            scenario.steps,
            vec![
                Command::Add {
                    name: "t".to_string(),
                    entry: 3,
                    destination: 4
                },
                Command::Move {
                    trains: vec!["t".to_string()]
                },
                Command::Section { id: 4 },
                Command::Train {
                    name: "t".to_string()
                },
            ]
        );
    }

    #[test]
    fn unknown_command_is_a_parse_error() {
        assert!(matches!(
            Scenario::from_json_str(r#"{ "steps": [ { "remove": { "name": "t" } } ] }"#),
            Err(ScenarioError::Json(_))
        ));
    }

    #[test]
    fn driver_scenario_runs_to_departure() {
        let json = include_str!("../scenarios/driver.json");
        let scenario = Scenario::from_json_str(json).unwrap();
        let mut engine = Interlocking::new(&Topology::standard()).unwrap();
        let outcomes = run(&mut engine, &scenario)
            .into_iter()
            .map(|r| r.outcome)
            .collect::<Vec<_>>();
        assert_eq!(
            outcomes,
            vec![
                Outcome::Added,
                Outcome::Moved(1),
                Outcome::Train(4),
                Outcome::Moved(1),
                Outcome::Section(None),
                Outcome::Rejected("train t is not in service".to_string()),
            ]
        );
    }

    #[test]
    fn junction_scenario_gives_way_to_priority_trains() {
        let json = include_str!("../scenarios/junction_priority.json");
        let scenario = Scenario::from_json_str(json).unwrap();
        let mut engine = Interlocking::new(&Topology::standard()).unwrap();
        let outcomes = run(&mut engine, &scenario)
            .into_iter()
            .map(|r| r.outcome)
            .collect::<Vec<_>>();
        assert_eq!(
            outcomes,
            vec![
                Outcome::Added,
                Outcome::Added,
                Outcome::Added,
                Outcome::Moved(1),
                Outcome::Moved(0),
                Outcome::Moved(1),
                Outcome::Moved(1),
                Outcome::Moved(1),
                Outcome::Train(4),
                Outcome::Moved(2),
                Outcome::Moved(1),
                Outcome::Train(2),
                Outcome::Moved(1),
            ]
        );
        assert_eq!(engine.trains().count(), 0);
    }

    #[test]
    fn rejected_step_does_not_stop_the_run() {
        let scenario = Scenario {
            steps: vec![
                Command::Move {
                    trains: vec!["ghost".to_string()],
                },
                Command::Add {
                    name: "a".to_string(),
                    entry: 1,
                    destination: 8,
                },
                Command::Section { id: 1 },
            ],
        };
        let mut engine = Interlocking::new(&Topology::standard()).unwrap();
        let records = run(&mut engine, &scenario);
        assert_eq!(records.len(), 3);
        assert_eq!(
            records[0].outcome,
            Outcome::Rejected("train ghost is not in service".to_string())
        );
        assert_eq!(records[2].outcome, Outcome::Section(Some("a".to_string())));
        assert_eq!(records[2].step, 2);
    }
}
