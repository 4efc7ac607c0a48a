//! Tree guard predicates over the blackboard.

use skirmish_core::{AgentBody, Blackboard};

pub(crate) const GRENADE_DANGER_RADIUS: f32 = 6.0;
pub(crate) const LOW_HEALTH_FRAC: f32 = 0.35;
pub(crate) const ALLY_HELP_THRESHOLD: f32 = 0.4;
pub(crate) const ALERT_THRESHOLD: f32 = 0.3;

pub fn grenade_near(_agent: &AgentBody, bb: &Blackboard) -> bool {
    bb.nearest_grenade_distance < GRENADE_DANGER_RADIUS
}

pub fn low_health(agent: &AgentBody, _bb: &Blackboard) -> bool {
    agent.health_frac() < LOW_HEALTH_FRAC
}

pub fn has_cover(_agent: &AgentBody, bb: &Blackboard) -> bool {
    bb.nearest_cover.is_some()
}

pub fn has_visible_target(_agent: &AgentBody, bb: &Blackboard) -> bool {
    bb.current_target.is_some()
}

pub fn has_investigation(_agent: &AgentBody, bb: &Blackboard) -> bool {
    bb.investigation_target.is_some()
}

pub fn is_alert(_agent: &AgentBody, bb: &Blackboard) -> bool {
    bb.alertness > ALERT_THRESHOLD
}

pub fn ally_needs_help(_agent: &AgentBody, bb: &Blackboard) -> bool {
    bb.allies
        .iter()
        .any(|a| a.health_frac < ALLY_HELP_THRESHOLD)
}
