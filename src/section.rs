use crate::error::InterlockingError;
use std::collections::BTreeMap;

pub type SectionId = u32;

/// A segment of track that can hold at most one train.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackSection {
    id: SectionId,
    occupant: Option<String>,
}

impl TrackSection {
    pub fn new(id: SectionId) -> Self {
        TrackSection { id, occupant: None }
    }

    pub fn id(&self) -> SectionId {
        self.id
    }

    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    pub fn occupant(&self) -> Option<&str> {
        self.occupant.as_deref()
    }

    /// Puts `train` on the section. Placing the train that is already here
    /// is a no-op.
    pub fn place(&mut self, train: &str) -> Result<(), InterlockingError> {
        match &self.occupant {
            None => {
                self.occupant = Some(train.to_string());
                Ok(())
            }
            Some(current) if current == train => Ok(()),
            Some(current) => Err(InterlockingError::SectionOccupied {
                section: self.id,
                occupant: current.clone(),
            }),
        }
    }

    pub fn vacate(&mut self) -> Option<String> {
        self.occupant.take()
    }
}

/// The configured track sections, keyed by ID.
#[derive(Debug, Clone)]
pub struct SectionRegistry {
    sections: BTreeMap<SectionId, TrackSection>,
}

impl SectionRegistry {
    pub fn new(ids: impl IntoIterator<Item = SectionId>) -> Self {
        SectionRegistry {
            sections: ids.into_iter().map(|id| (id, TrackSection::new(id))).collect(),
        }
    }

    fn get(&self, id: SectionId) -> Result<&TrackSection, InterlockingError> {
        self.sections
            .get(&id)
            .ok_or(InterlockingError::InvalidSection(id))
    }

    pub fn contains(&self, id: SectionId) -> bool {
        self.sections.contains_key(&id)
    }

    pub fn occupied(&self, id: SectionId) -> Result<bool, InterlockingError> {
        Ok(self.get(id)?.is_occupied())
    }

    pub fn occupant(&self, id: SectionId) -> Result<Option<&str>, InterlockingError> {
        Ok(self.get(id)?.occupant())
    }

    pub fn place(&mut self, id: SectionId, train: &str) -> Result<(), InterlockingError> {
        self.sections
            .get_mut(&id)
            .ok_or(InterlockingError::InvalidSection(id))?
            .place(train)
    }

    /// Clears the section and returns whoever was on it. Unknown IDs are
    /// treated like empty sections.
    pub fn vacate(&mut self, id: SectionId) -> Option<String> {
        self.sections.get_mut(&id).and_then(TrackSection::vacate)
    }

    pub fn ids(&self) -> impl Iterator<Item = SectionId> + '_ {
        self.sections.keys().copied()
    }

    /// Sections in ascending ID order.
    pub fn iter(&self) -> impl Iterator<Item = &TrackSection> {
        self.sections.values()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn clear(&mut self) {
        for section in self.sections.values_mut() {
            section.vacate();
        }
    }
}
