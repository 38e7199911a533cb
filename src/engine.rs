use crate::error::{InterlockingError, TopologyError};
use crate::rules::RuleBook;
use crate::section::{SectionId, SectionRegistry};
use crate::topology::{Topology, Transition};
use crate::train::{Fleet, Progress, Train};
use log::*;

/// Tracks trains on a track network and decides which of them may move.
///
/// Each call to [`Interlocking::move_trains`] is one simulation tick. Within
/// a tick trains are moved one at a time, so a train that moves early in the
/// batch changes what later trains in the same batch see.
#[derive(Debug, Clone)]
pub struct Interlocking {
    sections: SectionRegistry,
    fleet: Fleet,
    rules: RuleBook,
}

impl Interlocking {
    pub fn new(topology: &Topology) -> Result<Self, TopologyError> {
        topology.validate()?;
        let engine = Interlocking {
            sections: SectionRegistry::new(topology.sections.iter().copied()),
            fleet: Fleet::new(topology.route_table()),
            rules: RuleBook::new(topology),
        };
        debug!(
            "Interlocking with {} sections, {} routes, {} priority transitions",
            engine.sections.len(),
            topology.routes.len(),
            engine.rules.priority_transitions().len()
        );
        Ok(engine)
    }

    /// Admits a new train on its entry section. Nothing changes if the
    /// admission is refused.
    pub fn add_train(
        &mut self,
        name: &str,
        entry: SectionId,
        destination: SectionId,
    ) -> Result<(), InterlockingError> {
        let route = Transition(entry, destination);
        if let Some(watch) = self
            .rules
            .admission_conflict(route, &self.sections, &self.fleet)?
        {
            debug!("Refusing train {} on {}: train {}", name, route, watch);
            return Err(InterlockingError::ConstraintViolation { route, watch });
        }

        self.fleet.check_admission(name, entry, destination)?;
        if let Some(occupant) = self.sections.occupant(entry)? {
            return Err(InterlockingError::SectionOccupied {
                section: entry,
                occupant: occupant.to_string(),
            });
        }

        self.sections.place(entry, name)?;
        self.fleet.commission(name, entry, destination)?;
        debug!("Train {} entered on section {} heading for {}", name, entry, destination);
        Ok(())
    }

    /// Tries to advance every named train by one section and returns how
    /// many moved. Trains about to take a priority transition go first;
    /// otherwise the batch order is kept. Trains that cannot move are
    /// skipped. If any name is not in service, nothing moves.
    pub fn move_trains<S: AsRef<str>>(&mut self, names: &[S]) -> Result<usize, InterlockingError> {
        let mut first = Vec::new();
        let mut rest = Vec::new();
        for name in names.iter() {
            let name = name.as_ref();
            let train = self
                .fleet
                .get(name)
                .ok_or_else(|| InterlockingError::UnknownTrain(name.to_string()))?;
            match train.pending_transition() {
                Some(t) if self.rules.has_priority(&t) => first.push(name),
                _ => rest.push(name),
            }
        }

        let mut moved = 0;
        for name in first.into_iter().chain(rest) {
            if self.move_train(name)? {
                moved += 1;
            }
        }
        debug!("Moved {} of {} trains", moved, names.len());
        Ok(moved)
    }

    fn move_train(&mut self, name: &str) -> Result<bool, InterlockingError> {
        let (current, next) = match self.fleet.get(name) {
            Some(train) => (
                train
                    .current_section()
                    .ok_or_else(|| InterlockingError::NotInService(name.to_string()))?,
                train.next_section(),
            ),
            None => {
                trace!("Train {} already left the network during this tick", name);
                return Ok(false);
            }
        };

        if let Some(next) = next {
            if let Some(occupant) = self.sections.occupant(next)? {
                trace!("Train {} waits: section {} is occupied by {}", name, next, occupant);
                return Ok(false);
            }
            let hop = Transition(current, next);
            if let Some(watch) = self.rules.yields_to(hop, &self.sections, &self.fleet)? {
                trace!("Train {} waits on {} for the train {}", name, hop, watch);
                return Ok(false);
            }
        }

        self.sections.vacate(current);
        match self.fleet.advance(name)? {
            Progress::Advanced(section) => {
                self.sections.place(section, name)?;
                trace!("Train {} moved {} -> {}", name, current, section);
            }
            Progress::Completed => trace!("Train {} departed from section {}", name, current),
        }
        Ok(true)
    }

    /// The name of the train on a section, if any.
    pub fn section(&self, id: SectionId) -> Result<Option<&str>, InterlockingError> {
        self.sections.occupant(id)
    }

    /// The section a train in service currently occupies.
    pub fn train(&self, name: &str) -> Result<SectionId, InterlockingError> {
        self.fleet
            .get(name)
            .and_then(Train::current_section)
            .ok_or_else(|| InterlockingError::UnknownTrain(name.to_string()))
    }

    /// Every section with its occupant, in ascending section order.
    pub fn occupancy(&self) -> Vec<(SectionId, Option<&str>)> {
        self.sections.iter().map(|s| (s.id(), s.occupant())).collect()
    }

    pub fn trains(&self) -> impl Iterator<Item = &Train> {
        self.fleet.iter()
    }

    /// Removes all trains, keeping the topology.
    pub fn reset(&mut self) {
        self.sections.clear();
        self.fleet.clear();
    }
}
