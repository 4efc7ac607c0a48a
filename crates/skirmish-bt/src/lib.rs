//! Behavior-tree engine built on `skirmish-core`.
//!
//! The node-kind set is fixed, so nodes are a closed enum dispatched by
//! `match` rather than an open trait hierarchy. Per-agent state (resume
//! cursors, leaf timers) lives inside each node instance; build one tree
//! per agent so structurally identical trees never alias state.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod node;

pub use node::{Node, Status};
