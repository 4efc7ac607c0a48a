use std::collections::BTreeMap;

use skirmish_core::rng::{DeterministicRng, SplitMix64};
use skirmish_core::{
    wrap_angle, AgentBody, AgentId, PerceivedEnemy, PerceivedState, Vec3, WorldSnapshot,
};

use crate::profile::SenseProfile;

/// Memory entries older than this are forgotten entirely.
const MEMORY_HORIZON: f32 = 10.0;
/// Entries at least this stale (and not yet forgotten) spawn an
/// investigation target when none is active.
const INVESTIGATION_MIN_AGE: f32 = 2.0;
/// An investigation target nobody reaches is abandoned after this long.
const INVESTIGATION_TIMEOUT: f32 = 12.0;
/// A target's memory must be at most this old to shoot at it.
const ENGAGE_FRESHNESS: f32 = 0.5;
const ENGAGE_MIN_CONFIDENCE: f32 = 0.5;
/// Peripheral vision only registers things that moved at least this far.
const PERIPHERAL_MOTION_THRESHOLD: f32 = 0.3;

const ALERT_DECAY_PER_SECOND: f32 = 0.1;
const SIGHTING_ALERT_BUMP: f32 = 0.3;
const SOUND_ALERT_FACTOR: f32 = 0.15;
const INVESTIGATION_ALERT_BUMP: f32 = 0.2;

const SCAN_INTERVAL_MIN: f32 = 0.4;
const SCAN_INTERVAL_MAX: f32 = 0.7;

const ARRIVAL_DISTANCE: f32 = 0.15;

/// What the agent remembers about one sensed entity. Confidence reflects
/// distance and angle at the time of sighting and is never recomputed
/// retroactively.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemoryEntry {
    pub position: Vec3,
    /// Finite difference of the last two sightings.
    pub velocity: Vec3,
    pub last_seen: f32,
    pub confidence: f32,
    pub peripheral: bool,
    /// Set once the entry has spawned an investigation; a fresh sighting
    /// resets it.
    pub investigated: bool,
}

/// One entity registered during the most recent scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sighting {
    pub id: AgentId,
    pub position: Vec3,
    pub distance: f32,
    pub confidence: f32,
    pub peripheral: bool,
}

#[derive(Debug, Clone, Copy)]
struct Investigation {
    position: Vec3,
    created: f32,
}

/// Per-agent sensory state machine, ticked every frame.
///
/// Owned by exactly one agent's controller; all cross-agent information
/// arrives through the read-only world snapshot.
pub struct Perception {
    profile: SenseProfile,
    clock: f32,
    alertness: f32,
    facing: f32,
    target_facing: f32,
    memory: BTreeMap<AgentId, MemoryEntry>,
    visible: Vec<Sighting>,
    investigation: Option<Investigation>,
    next_scan_at: f32,
    rng: SplitMix64,
    current_target: Option<AgentId>,
    target_acquired_at: f32,
}

impl Perception {
    pub fn new(profile: SenseProfile, seed: u64) -> Self {
        Self {
            profile,
            clock: 0.0,
            alertness: 0.0,
            facing: 0.0,
            target_facing: 0.0,
            memory: BTreeMap::new(),
            visible: Vec::new(),
            investigation: None,
            next_scan_at: 0.0,
            rng: SplitMix64::new(seed),
            current_target: None,
            target_acquired_at: 0.0,
        }
    }

    pub fn profile(&self) -> &SenseProfile {
        &self.profile
    }

    pub fn alertness(&self) -> f32 {
        self.alertness
    }

    pub fn facing(&self) -> f32 {
        self.facing
    }

    pub fn visible(&self) -> &[Sighting] {
        &self.visible
    }

    pub fn investigation_target(&self) -> Option<Vec3> {
        self.investigation.map(|i| i.position)
    }

    pub fn clear_investigation(&mut self) {
        self.investigation = None;
    }

    pub fn memory_of(&self, id: AgentId) -> Option<&MemoryEntry> {
        self.memory.get(&id)
    }

    pub fn memory_len(&self) -> usize {
        self.memory.len()
    }

    /// Advance the sensory state machine by one frame.
    pub fn update(&mut self, agent: &AgentBody, world: &WorldSnapshot, dt: f32) {
        if !agent.is_alive() {
            // No body to sense with; report nothing.
            self.visible.clear();
            return;
        }

        self.clock += dt;
        self.alertness = (self.alertness - ALERT_DECAY_PER_SECOND * dt).max(0.0);

        let step = self.profile.turn_rate * dt;
        let delta = wrap_angle(self.target_facing - self.facing);
        self.facing = wrap_angle(self.facing + delta.clamp(-step, step));

        if self.clock >= self.next_scan_at {
            self.scan_now(agent, world);
            // Jittered interval, tightened toward the lower bound as
            // alertness rises.
            let base = self
                .rng
                .next_f32_range(SCAN_INTERVAL_MIN, SCAN_INTERVAL_MAX);
            let interval =
                SCAN_INTERVAL_MIN + (base - SCAN_INTERVAL_MIN) * (1.0 - self.alertness);
            self.next_scan_at = self.clock + interval;
        }

        self.sweep_memory();
    }

    /// Run the vision scan immediately, outside the jittered schedule.
    pub fn scan_now(&mut self, agent: &AgentBody, world: &WorldSnapshot) {
        self.visible.clear();
        let eye = agent.position;
        let half_fov = self.profile.fov * 0.5;

        for (id, pos) in world.hostiles_of(agent.team) {
            let distance = eye.distance(pos);
            if distance > self.profile.vision_range {
                continue;
            }

            let bearing = eye.yaw_to(pos);
            let off_angle = wrap_angle(bearing - self.facing).abs();

            let in_cone = off_angle <= half_fov;
            let peripheral = !in_cone
                && off_angle <= core::f32::consts::FRAC_PI_2
                && distance < self.profile.peripheral_range
                && self.moved_since_last_seen(id, pos);
            if !in_cone && !peripheral {
                continue;
            }

            if !world.line_of_sight(eye, pos) {
                continue;
            }

            let mut confidence = (1.0 - distance / self.profile.vision_range).max(0.4)
                * (1.0 - off_angle / half_fov).max(0.6);
            if peripheral {
                confidence *= 0.5;
            }

            self.remember(id, pos, confidence, peripheral);
            self.alertness = (self.alertness + SIGHTING_ALERT_BUMP).min(1.0);
            if !peripheral {
                // Direct re-acquisition ends any pending investigation.
                self.investigation = None;
            }

            self.visible.push(Sighting {
                id,
                position: pos,
                distance,
                confidence,
                peripheral,
            });
        }

        self.visible
            .sort_by(|a, b| a.distance.total_cmp(&b.distance));
    }

    fn moved_since_last_seen(&self, id: AgentId, pos: Vec3) -> bool {
        match self.memory.get(&id) {
            Some(entry) => entry.position.distance(pos) >= PERIPHERAL_MOTION_THRESHOLD,
            // Never seen before: any presence counts as motion.
            None => true,
        }
    }

    fn remember(&mut self, id: AgentId, pos: Vec3, confidence: f32, peripheral: bool) {
        let velocity = match self.memory.get(&id) {
            Some(prev) if self.clock - prev.last_seen > 1e-3 => {
                (pos - prev.position) * (1.0 / (self.clock - prev.last_seen))
            }
            _ => Vec3::ZERO,
        };
        self.memory.insert(
            id,
            MemoryEntry {
                position: pos,
                velocity,
                last_seen: self.clock,
                confidence,
                peripheral,
                investigated: false,
            },
        );
    }

    /// Purge stale memories and turn lingering ones into an investigation
    /// target; drop investigations nobody resolved in time.
    fn sweep_memory(&mut self) {
        let clock = self.clock;
        self.memory
            .retain(|_, entry| clock - entry.last_seen <= MEMORY_HORIZON);

        if self.investigation.is_none() {
            let candidate = self.memory.iter().find_map(|(id, entry)| {
                let age = clock - entry.last_seen;
                (!entry.investigated && age >= INVESTIGATION_MIN_AGE)
                    .then(|| (*id, entry.position + entry.velocity * age))
            });
            if let Some((id, position)) = candidate {
                // One investigation per stale entry; a resolved one does not
                // respawn from the same memory.
                if let Some(entry) = self.memory.get_mut(&id) {
                    entry.investigated = true;
                }
                tracing::debug!(x = position.x, z = position.z, "investigation target created");
                self.investigation = Some(Investigation {
                    position,
                    created: clock,
                });
                self.alertness = (self.alertness + INVESTIGATION_ALERT_BUMP).min(1.0);
            }
        } else if let Some(inv) = self.investigation {
            if clock - inv.created > INVESTIGATION_TIMEOUT {
                self.investigation = None;
            }
        }

        // Continuity gate: a target whose memory went stale is no longer
        // "continuously tracked" and must re-earn the reaction timer.
        if let Some(target) = self.current_target {
            let fresh = self
                .memory
                .get(&target)
                .map(|e| clock - e.last_seen <= ENGAGE_FRESHNESS)
                .unwrap_or(false);
            if !fresh {
                self.current_target = None;
            }
        }
    }

    /// React to a sound event raised by the host (gunfire, footsteps).
    pub fn hear_sound(&mut self, agent: &AgentBody, source: Vec3, volume: f32) {
        if !agent.is_alive() {
            return;
        }
        let distance = agent.position.distance(source);
        if distance >= self.profile.hearing_range * volume {
            return;
        }
        self.alertness = (self.alertness + SOUND_ALERT_FACTOR * volume).min(1.0);
        if self.investigation.is_none() {
            self.investigation = Some(Investigation {
                position: source,
                created: self.clock,
            });
        }
    }

    /// Whether the agent may open fire on `target` right now.
    ///
    /// Requires a fresh, confident memory of the target, a facing within
    /// tolerance (otherwise the body starts turning and this tick reports
    /// false), and continuous acquisition for at least the profile's
    /// reaction time. Switching targets restarts the timer.
    pub fn can_engage(&mut self, agent: &AgentBody, target: AgentId) -> bool {
        let Some(entry) = self.memory.get(&target).copied() else {
            return false;
        };
        if self.clock - entry.last_seen > ENGAGE_FRESHNESS {
            return false;
        }
        if entry.confidence < ENGAGE_MIN_CONFIDENCE {
            return false;
        }

        let bearing = agent.position.yaw_to(entry.position);
        if wrap_angle(bearing - self.facing).abs() > self.profile.facing_tolerance {
            self.target_facing = bearing;
            return false;
        }

        if self.current_target != Some(target) {
            self.current_target = Some(target);
            self.target_acquired_at = self.clock;
            return false;
        }

        self.clock - self.target_acquired_at >= self.profile.reaction_time
    }

    /// Turn the body toward `point` over the next frames.
    pub fn face_towards(&mut self, from: Vec3, point: Vec3) {
        self.target_facing = from.yaw_to(point);
    }

    /// Offset the desired facing, for scan sweeps.
    pub fn sweep_by(&mut self, delta_yaw: f32) {
        self.target_facing = wrap_angle(self.facing + delta_yaw);
    }

    /// Advance the agent directly toward `target`, turning the body along
    /// the movement direction. Returns true on arrival.
    pub fn move_towards(&mut self, agent: &mut AgentBody, target: Vec3, dt: f32) -> bool {
        let to_target = target - agent.position;
        let dist = to_target.length();
        if dist <= ARRIVAL_DISTANCE {
            return true;
        }
        let step = (agent.move_speed * dt).min(dist);
        agent.position += to_target.normalize_or_zero() * step;
        self.target_facing = agent.position.yaw_to(target);
        dist - step <= ARRIVAL_DISTANCE
    }

    /// Project the sensory state for the blackboard.
    pub fn perceived_state(&self) -> PerceivedState {
        let visible = self
            .visible
            .iter()
            .map(|s| PerceivedEnemy {
                id: s.id,
                position: s.position,
                distance: s.distance,
                confidence: s.confidence,
            })
            .collect();
        let last_known_enemy_position = self
            .memory
            .values()
            .max_by(|a, b| a.last_seen.total_cmp(&b.last_seen))
            .map(|e| e.position);
        PerceivedState {
            visible,
            investigation: self.investigation_target(),
            last_known_enemy_position,
            alertness: self.alertness,
        }
    }
}
