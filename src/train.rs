use crate::error::InterlockingError;
use crate::section::SectionId;
use crate::topology::Transition;
use log::*;
use std::collections::HashMap;

/// Outcome of advancing a train's journey cursor by one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// The train is now on this section.
    Advanced(SectionId),
    /// The train has left the network.
    Completed,
}

/// A train following a fixed path from its entry to its destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Train {
    name: String,
    entry: SectionId,
    destination: SectionId,
    path: Vec<SectionId>,
    cursor: usize,
}

impl Train {
    /// Fails with `InvalidRoute` unless `path` runs from `entry` to
    /// `destination`.
    pub fn new(
        name: &str,
        entry: SectionId,
        destination: SectionId,
        path: Vec<SectionId>,
    ) -> Result<Self, InterlockingError> {
        if path.first() != Some(&entry) || path.last() != Some(&destination) {
            return Err(InterlockingError::InvalidRoute { entry, destination });
        }
        Ok(Train {
            name: name.to_string(),
            entry,
            destination,
            path,
            cursor: 0,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entry(&self) -> SectionId {
        self.entry
    }

    pub fn destination(&self) -> SectionId {
        self.destination
    }

    pub fn path(&self) -> &[SectionId] {
        &self.path
    }

    pub fn is_in_service(&self) -> bool {
        self.cursor < self.path.len()
    }

    /// `None` once the journey is complete.
    pub fn current_section(&self) -> Option<SectionId> {
        self.path.get(self.cursor).copied()
    }

    /// `None` when the current section is the last one on the path.
    pub fn next_section(&self) -> Option<SectionId> {
        self.path.get(self.cursor + 1).copied()
    }

    pub fn pending_transition(&self) -> Option<Transition> {
        Some(Transition(self.current_section()?, self.next_section()?))
    }

    pub fn advance(&mut self) -> Result<Progress, InterlockingError> {
        if !self.is_in_service() {
            return Err(InterlockingError::NotInService(self.name.clone()));
        }
        self.cursor += 1;
        Ok(match self.current_section() {
            Some(section) => Progress::Advanced(section),
            None => Progress::Completed,
        })
    }
}

/// The in-service trains together with the route table they are created
/// from. A train leaves the fleet as soon as it completes its journey, which
/// frees its name for reuse.
#[derive(Debug, Clone)]
pub struct Fleet {
    routes: HashMap<(SectionId, SectionId), Vec<SectionId>>,
    trains: HashMap<String, Train>,
}

impl Fleet {
    pub fn new(routes: HashMap<(SectionId, SectionId), Vec<SectionId>>) -> Self {
        Fleet {
            routes,
            trains: HashMap::new(),
        }
    }

    pub fn route(&self, entry: SectionId, destination: SectionId) -> Option<&[SectionId]> {
        self.routes.get(&(entry, destination)).map(|p| p.as_slice())
    }

    /// Checks that a train could be created, without creating it.
    pub fn check_admission(
        &self,
        name: &str,
        entry: SectionId,
        destination: SectionId,
    ) -> Result<&[SectionId], InterlockingError> {
        let path = self
            .route(entry, destination)
            .ok_or(InterlockingError::InvalidRoute { entry, destination })?;
        if self.trains.contains_key(name) {
            return Err(InterlockingError::DuplicateName(name.to_string()));
        }
        Ok(path)
    }

    pub fn commission(
        &mut self,
        name: &str,
        entry: SectionId,
        destination: SectionId,
    ) -> Result<&Train, InterlockingError> {
        let path = self.check_admission(name, entry, destination)?.to_vec();
        let train = Train::new(name, entry, destination, path)?;
        trace!("Commissioning train {} on path {:?}", name, train.path());
        Ok(self.trains.entry(name.to_string()).or_insert(train))
    }

    pub fn get(&self, name: &str) -> Option<&Train> {
        self.trains.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.trains.contains_key(name)
    }

    /// Advances the named train and removes it from service if that
    /// completed its journey.
    pub fn advance(&mut self, name: &str) -> Result<Progress, InterlockingError> {
        let progress = self
            .trains
            .get_mut(name)
            .ok_or_else(|| InterlockingError::NotInService(name.to_string()))?
            .advance()?;
        if progress == Progress::Completed {
            trace!("Train {} has left the network", name);
            self.trains.remove(name);
        }
        Ok(progress)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Train> {
        self.trains.values()
    }

    pub fn len(&self) -> usize {
        self.trains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trains.is_empty()
    }

    pub fn clear(&mut self) {
        self.trains.clear();
    }
}
