use crate::math::Vec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Stable identifier for an agent.
///
/// Deterministic simulation requires stable ordering and a stable numeric id
/// for seeding and logs, so this is a plain `u64` newtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AgentId(pub u64);

impl AgentId {
    /// Reserved id for the human player, which is a valid shoot/track target
    /// for enemy agents but never owns a controller.
    pub const PLAYER: AgentId = AgentId(0);

    pub fn stable_id(self) -> u64 {
        self.0
    }

    pub fn is_player(self) -> bool {
        self == Self::PLAYER
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Team {
    Ally,
    Enemy,
}

impl Team {
    pub fn opposing(self) -> Team {
        match self {
            Team::Ally => Team::Enemy,
            Team::Enemy => Team::Ally,
        }
    }
}

/// Mutable body state for one agent.
///
/// The world owns these; the AI core receives a mutable reference for the
/// agent it controls and read-only copies of everyone else through the
/// snapshot. Movement leaves advance `position` directly.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AgentBody {
    pub id: AgentId,
    pub team: Team,
    pub position: Vec3,
    pub health: f32,
    pub max_health: f32,
    pub move_speed: f32,
}

impl AgentBody {
    pub fn new(id: AgentId, team: Team, position: Vec3) -> Self {
        Self {
            id,
            team,
            position,
            health: 100.0,
            max_health: 100.0,
            move_speed: 4.0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    pub fn health_frac(&self) -> f32 {
        if self.max_health <= 0.0 {
            0.0
        } else {
            (self.health / self.max_health).clamp(0.0, 1.0)
        }
    }
}
