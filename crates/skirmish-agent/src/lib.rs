//! Role-based agent controllers tying perception, blackboard, and tree
//! execution into one per-tick decision pipeline.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod actions;
pub mod conditions;
pub mod controller;
pub mod role;
pub mod trees;

pub use controller::{ActionIntent, AgentController};
pub use role::{ParseRoleError, Role};
