//! Deterministic, engine-agnostic combat-AI kernel primitives.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod agent;
pub mod blackboard;
pub mod math;
pub mod rng;
pub mod tick;
pub mod world;

pub use agent::{AgentBody, AgentId, Team};
pub use blackboard::{
    default_target_score, AgentMode, AllyInfo, Blackboard, PerceivedEnemy, PerceivedState,
    TargetScorer,
};
pub use math::{segment_intersects_aabb, wrap_angle, Aabb, Vec3};
pub use rng::{derive_seed, mix64, shuffle, DeterministicRng, SplitMix64};
pub use tick::TickContext;
pub use world::{Grenade, PlayerState, WorldSnapshot};
