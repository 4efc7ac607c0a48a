use std::fmt;
use std::str::FromStr;

use skirmish_sense::SenseProfile;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Error)]
#[error("unknown agent role: {0:?}")]
pub struct ParseRoleError(String);

/// The closed set of agent archetypes. Each variant selects a behavior-tree
/// shape, a sensory profile, and engagement tuning at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Role {
    Assault,
    Sniper,
    Flanker,
    Support,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Assault => "assault",
            Role::Sniper => "sniper",
            Role::Flanker => "flanker",
            Role::Support => "support",
        }
    }

    pub fn profile(self) -> SenseProfile {
        match self {
            Role::Assault => SenseProfile::assault(),
            Role::Sniper => SenseProfile::sniper(),
            Role::Flanker => SenseProfile::flanker(),
            Role::Support => SenseProfile::support(),
        }
    }

    /// Preferred engagement distance band (min, max). Inside the band the
    /// agent strafes and fires; outside it closes or backs off.
    pub fn engage_band(self) -> (f32, f32) {
        match self {
            Role::Assault => (5.0, 15.0),
            Role::Sniper => (20.0, 50.0),
            Role::Flanker => (3.0, 10.0),
            Role::Support => (8.0, 20.0),
        }
    }

    /// Seconds between shoot intents, before difficulty scaling.
    pub fn shoot_cooldown(self) -> f32 {
        match self {
            Role::Assault => 0.6,
            Role::Sniper => 1.8,
            Role::Flanker => 0.45,
            Role::Support => 0.8,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "assault" => Ok(Role::Assault),
            "sniper" => Ok(Role::Sniper),
            "flanker" => Ok(Role::Flanker),
            "support" => Ok(Role::Support),
            _ => Err(ParseRoleError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Sniper".parse::<Role>().unwrap(), Role::Sniper);
        assert_eq!("FLANKER".parse::<Role>().unwrap(), Role::Flanker);
    }

    #[test]
    fn rejects_unknown_names() {
        assert!("medic".parse::<Role>().is_err());
    }

    #[test]
    fn display_round_trips() {
        for role in [Role::Assault, Role::Sniper, Role::Flanker, Role::Support] {
            assert_eq!(role.to_string().parse::<Role>().unwrap(), role);
        }
    }
}
