use crate::agent::{AgentBody, AgentId, Team};
use crate::math::{segment_intersects_aabb, Aabb, Vec3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlayerState {
    pub position: Vec3,
    pub health: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Grenade {
    pub position: Vec3,
    pub alive: bool,
}

/// Read-only view of the world handed in by the host each frame.
///
/// Agent entries are copies, not live references; the only live state the
/// core mutates is the controlled agent's own body, passed separately.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WorldSnapshot {
    pub player: PlayerState,
    pub agents: Vec<AgentBody>,
    pub obstacles: Vec<Aabb>,
    pub grenades: Vec<Grenade>,
    pub difficulty: f32,
    pub bounds: Aabb,
}

impl WorldSnapshot {
    pub fn agent(&self, id: AgentId) -> Option<&AgentBody> {
        self.agents.iter().find(|a| a.id == id)
    }

    /// Position of any trackable target, the player included.
    pub fn position_of(&self, id: AgentId) -> Option<Vec3> {
        if id.is_player() {
            return Some(self.player.position);
        }
        self.agent(id).map(|a| a.position)
    }

    pub fn health_frac_of(&self, id: AgentId) -> Option<f32> {
        if id.is_player() {
            return Some((self.player.health / 100.0).clamp(0.0, 1.0));
        }
        self.agent(id).map(|a| a.health_frac())
    }

    pub fn is_target_alive(&self, id: AgentId) -> bool {
        if id.is_player() {
            return self.player.health > 0.0;
        }
        self.agent(id).map(|a| a.is_alive()).unwrap_or(false)
    }

    /// Everything hostile to `team`: the opposing roster, plus the player
    /// when `team` is the enemy side.
    pub fn hostiles_of(&self, team: Team) -> Vec<(AgentId, Vec3)> {
        let mut out = Vec::new();
        if team == Team::Enemy && self.player.health > 0.0 {
            out.push((AgentId::PLAYER, self.player.position));
        }
        for a in &self.agents {
            if a.team == team.opposing() && a.is_alive() {
                out.push((a.id, a.position));
            }
        }
        out
    }

    pub fn allies_of(&self, team: Team, excluding: AgentId) -> Vec<&AgentBody> {
        self.agents
            .iter()
            .filter(|a| a.team == team && a.id != excluding && a.is_alive())
            .collect()
    }

    /// Straight-line visibility against the obstacle set.
    pub fn line_of_sight(&self, from: Vec3, to: Vec3) -> bool {
        self.obstacles
            .iter()
            .all(|ob| !segment_intersects_aabb(from, to, ob))
    }
}
