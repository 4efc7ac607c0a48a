use crate::agent::AgentId;
use crate::rng::{derive_seed, SplitMix64};

/// Per-frame tick inputs handed down by the host loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickContext {
    pub tick: u64,
    pub dt_seconds: f32,
    pub seed: u64,
}

impl TickContext {
    pub fn rng_for_agent(&self, agent: AgentId, stream: u64) -> SplitMix64 {
        SplitMix64::new(derive_seed(self.seed, agent.stable_id(), stream))
    }
}
