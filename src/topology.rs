use crate::error::TopologyError;
use crate::section::SectionId;
use log::*;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;

/// An ordered pair of sections: a hop `from -> to`, or an `entry ->
/// destination` route request when used as a constraint key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Transition(pub SectionId, pub SectionId);

impl Transition {
    pub fn from(&self) -> SectionId {
        self.0
    }

    pub fn to(&self) -> SectionId {
        self.1
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.0, self.1)
    }
}

/// A rule observation: `section` holds a train heading `toward` some
/// section. Constraints compare `toward` with the train's destination,
/// priorities with its next section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Watch(pub SectionId, pub SectionId);

impl Watch {
    pub fn section(&self) -> SectionId {
        self.0
    }

    pub fn toward(&self) -> SectionId {
        self.1
    }

    /// The hop a train on the watched section would take.
    pub fn as_transition(&self) -> Transition {
        Transition(self.0, self.1)
    }
}

impl fmt::Display for Watch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "on section {} heading for {}", self.0, self.1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDef {
    pub entry: SectionId,
    pub destination: SectionId,
    pub path: Vec<SectionId>,
}

/// Trains requesting `route` are refused while any of the `conflicts` is
/// observed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintDef {
    pub route: Transition,
    pub conflicts: Vec<Watch>,
}

/// Trains about to take `transition` wait while any of `yield_to` is
/// observed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityDef {
    pub transition: Transition,
    pub yield_to: Vec<Watch>,
}

/// Static description of a track network and its interlocking rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topology {
    pub sections: Vec<SectionId>,
    pub routes: Vec<RouteDef>,
    #[serde(default)]
    pub constraints: Vec<ConstraintDef>,
    #[serde(default)]
    pub priorities: Vec<PriorityDef>,
}

fn route(entry: SectionId, destination: SectionId, path: Vec<SectionId>) -> RouteDef {
    RouteDef {
        entry,
        destination,
        path,
    }
}

fn constraint(route: (SectionId, SectionId), conflicts: Vec<Watch>) -> ConstraintDef {
    ConstraintDef {
        route: Transition(route.0, route.1),
        conflicts,
    }
}

fn priority(transition: (SectionId, SectionId), yield_to: Vec<Watch>) -> PriorityDef {
    PriorityDef {
        transition: Transition(transition.0, transition.1),
        yield_to,
    }
}

impl Topology {
    /// The eleven-section network with two junctions: 1/10 -> 5/6 -> 8/9/2
    /// on one side, the 3 <-> 4 and 3 <-> 7 <-> 11 lines on the other.
    pub fn standard() -> Self {
        Topology {
            sections: velcro::vec![..(1..=11)],
            routes: vec![
                route(1, 8, vec![1, 5, 8]),
                route(1, 9, vec![1, 5, 9]),
                route(3, 4, vec![3, 4]),
                route(4, 3, vec![4, 3]),
                route(9, 2, vec![9, 6, 2]),
                route(10, 2, vec![10, 6, 2]),
                route(3, 11, vec![3, 7, 11]),
                route(11, 3, vec![11, 7, 3]),
            ],
            // Not symmetric: (3, 11) and (9, 2) watch sections that their
            // reverse routes do not.
            constraints: vec![
                constraint((4, 3), vec![Watch(3, 4)]),
                constraint((3, 4), vec![Watch(4, 3)]),
                constraint((3, 11), vec![Watch(11, 3), Watch(7, 3)]),
                constraint((11, 3), vec![Watch(3, 11), Watch(7, 11)]),
                constraint((1, 9), vec![Watch(9, 2)]),
                constraint((9, 2), vec![Watch(1, 9), Watch(5, 9)]),
            ],
            priorities: vec![
                priority((3, 4), vec![Watch(1, 5), Watch(6, 2)]),
                priority((4, 3), vec![Watch(1, 5), Watch(6, 2)]),
                priority((9, 6), vec![Watch(5, 8), Watch(10, 6)]),
            ],
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, TopologyError> {
        let topology: Topology = serde_json::from_str(json)?;
        trace!(
            "Parsed topology with {} sections {} routes",
            topology.sections.len(),
            topology.routes.len()
        );
        Ok(topology)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, TopologyError> {
        trace!("Loading topology file {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Checks that every table only refers to configured sections, that
    /// route paths run from entry to destination, and that no section,
    /// route or rule key is listed twice.
    pub fn validate(&self) -> Result<(), TopologyError> {
        let mut sections = HashSet::new();
        for id in self.sections.iter() {
            if !sections.insert(*id) {
                return Err(TopologyError::DuplicateSection(*id));
            }
        }
        let known = |section: SectionId, context: String| {
            if sections.contains(&section) {
                Ok(())
            } else {
                Err(TopologyError::UnknownSection { section, context })
            }
        };

        let mut routes = HashSet::new();
        for r in self.routes.iter() {
            let (entry, destination) = (r.entry, r.destination);
            if !routes.insert((entry, destination)) {
                return Err(TopologyError::DuplicateRoute { entry, destination });
            }
            if r.path.is_empty() {
                return Err(TopologyError::EmptyRoute { entry, destination });
            }
            if r.path.first() != Some(&entry) || r.path.last() != Some(&destination) {
                return Err(TopologyError::RouteEndpoints {
                    entry,
                    destination,
                    path: r.path.clone(),
                });
            }
            for s in r.path.iter() {
                known(*s, format!("route {} -> {}", entry, destination))?;
            }
            if let Some(pair) = r.path.windows(2).find(|pair| pair[0] == pair[1]) {
                return Err(TopologyError::RepeatedSection {
                    entry,
                    destination,
                    section: pair[0],
                });
            }
        }

        let mut keys = HashSet::new();
        for c in self.constraints.iter() {
            if !keys.insert(c.route) {
                return Err(TopologyError::DuplicateRule {
                    table: "constraint",
                    transition: c.route,
                });
            }
            for w in c.conflicts.iter() {
                known(w.section(), format!("constraint for {}", c.route))?;
            }
            if !routes.contains(&(c.route.from(), c.route.to())) {
                warn!("Constraint for {} does not match any route", c.route);
            }
        }

        let mut keys = HashSet::new();
        for p in self.priorities.iter() {
            if !keys.insert(p.transition) {
                return Err(TopologyError::DuplicateRule {
                    table: "priority",
                    transition: p.transition,
                });
            }
            for w in p.yield_to.iter() {
                known(w.section(), format!("priority for {}", p.transition))?;
                if !sections.contains(&w.toward()) {
                    warn!(
                        "Priority for {} waits for a train heading to unknown section {}",
                        p.transition,
                        w.toward()
                    );
                }
            }
        }

        Ok(())
    }

    /// The route table keyed by `(entry, destination)`.
    pub fn route_table(&self) -> HashMap<(SectionId, SectionId), Vec<SectionId>> {
        self.routes
            .iter()
            .map(|r| ((r.entry, r.destination), r.path.clone()))
            .collect()
    }
}
