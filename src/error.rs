use crate::section::SectionId;
use crate::topology::{Transition, Watch};

/// Errors returned by the interlocking engine. All of them are caused by
/// caller input; a failed operation leaves the engine state unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InterlockingError {
    #[error("track section {0} does not exist")]
    InvalidSection(SectionId),
    #[error("train {0} is not in service")]
    UnknownTrain(String),
    #[error("no route from section {entry} to section {destination}")]
    InvalidRoute {
        entry: SectionId,
        destination: SectionId,
    },
    #[error("train name {0} is already in service")]
    DuplicateName(String),
    #[error("constraint not met: route {route} conflicts with a train {watch}")]
    ConstraintViolation { route: Transition, watch: Watch },
    #[error("track section {section} is occupied by {occupant}")]
    SectionOccupied { section: SectionId, occupant: String },
    #[error("train {0} has completed its journey")]
    NotInService(String),
}

/// Errors raised while loading or validating a topology.
#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
    #[error("could not read topology file")]
    Io(#[from] std::io::Error),
    #[error("could not parse topology")]
    Json(#[from] serde_json::Error),
    #[error("section {0} is listed more than once")]
    DuplicateSection(SectionId),
    #[error("section {section} used in {context} is not part of the topology")]
    UnknownSection { section: SectionId, context: String },
    #[error("route {entry} -> {destination} has an empty path")]
    EmptyRoute {
        entry: SectionId,
        destination: SectionId,
    },
    #[error("route {entry} -> {destination} has path {path:?} which does not start and end there")]
    RouteEndpoints {
        entry: SectionId,
        destination: SectionId,
        path: Vec<SectionId>,
    },
    #[error("route {entry} -> {destination} enters section {section} twice in a row")]
    RepeatedSection {
        entry: SectionId,
        destination: SectionId,
        section: SectionId,
    },
    #[error("route {entry} -> {destination} is defined more than once")]
    DuplicateRoute {
        entry: SectionId,
        destination: SectionId,
    },
    #[error("{table} rule for {transition} is defined more than once")]
    DuplicateRule {
        table: &'static str,
        transition: Transition,
    },
}

/// Errors raised while loading a scenario script.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("could not read scenario file")]
    Io(#[from] std::io::Error),
    #[error("could not parse scenario")]
    Json(#[from] serde_json::Error),
}
