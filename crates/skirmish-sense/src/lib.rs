//! Human-like sensory model: vision cone, hearing, memory, reaction time.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod perception;
pub mod profile;

pub use perception::{MemoryEntry, Perception, Sighting};
pub use profile::SenseProfile;
