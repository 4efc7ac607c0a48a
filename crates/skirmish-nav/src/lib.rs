//! Grid pathfinding: obstacle rasterization, bounded A*, path cache.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod grid;
pub mod manager;

pub use grid::NavGrid;
pub use manager::{NavConfig, PathfindingManager, SharedPath};
