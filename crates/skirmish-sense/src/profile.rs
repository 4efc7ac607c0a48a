#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Sensory tuning for one agent. Role presets trade field of view against
/// range and reaction speed; all angles are radians.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SenseProfile {
    /// Full vision-cone angle.
    pub fov: f32,
    pub vision_range: f32,
    /// Motion inside this range can register outside the cone.
    pub peripheral_range: f32,
    pub hearing_range: f32,
    /// Seconds of continuous tracking before a target is engageable.
    pub reaction_time: f32,
    /// Body turn rate, radians per second.
    pub turn_rate: f32,
    /// How far off-bearing the facing may be while still engaging.
    pub facing_tolerance: f32,
}

impl SenseProfile {
    /// Wide cone, mid range, quick trigger.
    pub fn assault() -> Self {
        Self {
            fov: 100f32.to_radians(),
            vision_range: 35.0,
            peripheral_range: 12.0,
            hearing_range: 25.0,
            reaction_time: 0.35,
            turn_rate: 4.0,
            facing_tolerance: 0.35,
        }
    }

    /// Narrow cone, long range, slow to commit.
    pub fn sniper() -> Self {
        Self {
            fov: 60f32.to_radians(),
            vision_range: 60.0,
            peripheral_range: 8.0,
            hearing_range: 20.0,
            reaction_time: 0.8,
            turn_rate: 2.5,
            facing_tolerance: 0.15,
        }
    }

    /// Very wide cone, short range, fast everything.
    pub fn flanker() -> Self {
        Self {
            fov: 140f32.to_radians(),
            vision_range: 28.0,
            peripheral_range: 15.0,
            hearing_range: 30.0,
            reaction_time: 0.25,
            turn_rate: 5.0,
            facing_tolerance: 0.45,
        }
    }

    /// Balanced tuning for support allies.
    pub fn support() -> Self {
        Self {
            fov: 120f32.to_radians(),
            vision_range: 40.0,
            peripheral_range: 12.0,
            hearing_range: 28.0,
            reaction_time: 0.4,
            turn_rate: 4.0,
            facing_tolerance: 0.35,
        }
    }
}
