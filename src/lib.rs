//! Rail interlocking simulator: tracks trains on the sections of a fixed
//! network and arbitrates their movement requests one tick at a time.

pub mod engine;
pub mod error;
pub mod report;
pub mod rules;
pub mod scenario;
pub mod section;
pub mod topology;
pub mod train;

pub use engine::Interlocking;
pub use error::{InterlockingError, ScenarioError, TopologyError};
pub use section::SectionId;
pub use topology::{Topology, Transition, Watch};
