use crate::error::InterlockingError;
use crate::section::SectionRegistry;
use crate::topology::{Topology, Transition, Watch};
use crate::train::{Fleet, Train};
use std::collections::{HashMap, HashSet};

/// The constraint and priority tables of a topology, indexed for lookup.
#[derive(Debug, Clone, Default)]
pub struct RuleBook {
    constraints: HashMap<Transition, Vec<Watch>>,
    priorities: HashMap<Transition, Vec<Watch>>,
    /// Hops that some priority rule waits for. Trains about to take one of
    /// these are moved first within a tick.
    priority_transitions: HashSet<Transition>,
}

fn observed<'a>(
    watch: &Watch,
    sections: &'a SectionRegistry,
    fleet: &'a Fleet,
) -> Result<Option<&'a Train>, InterlockingError> {
    Ok(sections
        .occupant(watch.section())?
        .and_then(|name| fleet.get(name)))
}

impl RuleBook {
    pub fn new(topology: &Topology) -> Self {
        let constraints = topology
            .constraints
            .iter()
            .map(|c| (c.route, c.conflicts.clone()))
            .collect::<HashMap<_, _>>();
        let priorities = topology
            .priorities
            .iter()
            .map(|p| (p.transition, p.yield_to.clone()))
            .collect::<HashMap<_, _>>();
        let priority_transitions = priorities
            .values()
            .flat_map(|watches| watches.iter().map(Watch::as_transition))
            .collect();
        RuleBook {
            constraints,
            priorities,
            priority_transitions,
        }
    }

    pub fn has_priority(&self, transition: &Transition) -> bool {
        self.priority_transitions.contains(transition)
    }

    pub fn priority_transitions(&self) -> &HashSet<Transition> {
        &self.priority_transitions
    }

    /// Returns the first conflict that forbids admitting a train on `route`:
    /// a watched section holding a train whose destination is the watched
    /// one.
    pub fn admission_conflict(
        &self,
        route: Transition,
        sections: &SectionRegistry,
        fleet: &Fleet,
    ) -> Result<Option<Watch>, InterlockingError> {
        for watch in self.constraints.get(&route).into_iter().flatten() {
            if let Some(train) = observed(watch, sections, fleet)? {
                if train.destination() == watch.toward() {
                    return Ok(Some(*watch));
                }
            }
        }
        Ok(None)
    }

    /// Returns the first priority movement that `transition` has to wait
    /// for: a watched section holding a train whose next hop goes to the
    /// watched section.
    pub fn yields_to(
        &self,
        transition: Transition,
        sections: &SectionRegistry,
        fleet: &Fleet,
    ) -> Result<Option<Watch>, InterlockingError> {
        for watch in self.priorities.get(&transition).into_iter().flatten() {
            if let Some(train) = observed(watch, sections, fleet)? {
                if train.next_section() == Some(watch.toward()) {
                    return Ok(Some(*watch));
                }
            }
        }
        Ok(None)
    }
}
