use crate::agent::{AgentBody, AgentId};
use crate::math::{Aabb, Vec3};
use crate::world::WorldSnapshot;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Coarse behavior label published by the tree for HUD/debug consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AgentMode {
    #[default]
    Idle,
    Patrol,
    Scan,
    Investigate,
    Engage,
    TakeCover,
    Support,
    Evade,
}

/// One enemy the agent currently perceives (not the omniscient world list).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PerceivedEnemy {
    pub id: AgentId,
    pub position: Vec3,
    pub distance: f32,
    pub confidence: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AllyInfo {
    pub id: AgentId,
    pub position: Vec3,
    pub health_frac: f32,
}

/// Perception output projected onto the blackboard each cycle.
#[derive(Debug, Clone, Default)]
pub struct PerceivedState {
    pub visible: Vec<PerceivedEnemy>,
    pub investigation: Option<Vec3>,
    pub last_known_enemy_position: Option<Vec3>,
    pub alertness: f32,
}

/// Scores a candidate target; the highest-scoring visible enemy becomes the
/// current target. Policy, not contract: hosts may swap in their own blend.
pub type TargetScorer = fn(distance: f32, target_health_frac: f32) -> f32;

/// Default blend: prefer close targets, with a finishing bonus for hurt ones.
pub fn default_target_score(distance: f32, target_health_frac: f32) -> f32 {
    1.0 / (1.0 + distance.max(0.0)) + 0.3 * (1.0 - target_health_frac.clamp(0.0, 1.0))
}

const COVER_SEARCH_RADIUS: f32 = 30.0;
const COVER_MARGIN: f32 = 1.0;
const ALLY_NEARBY_RADIUS: f32 = 15.0;
const FLANK_OFFSET: f32 = 8.0;

/// Per-agent scratch record of currently perceived world facts.
///
/// `populate_from` rebuilds every field each decision cycle; nothing here is
/// merged with stale values. Exactly one agent owns each instance.
#[derive(Debug, Clone, Default)]
pub struct Blackboard {
    pub player_position: Vec3,
    pub player_health: f32,

    /// Distance-sorted, perception-derived. Never the omniscient roster.
    pub visible_enemies: Vec<PerceivedEnemy>,
    pub nearest_enemy: Option<AgentId>,
    pub current_target: Option<AgentId>,
    pub target_position: Option<Vec3>,
    pub target_distance: f32,
    pub last_known_enemy_position: Option<Vec3>,

    pub allies: Vec<AllyInfo>,
    pub nearby_ally_count: usize,

    pub grenades: Vec<Vec3>,
    pub nearest_grenade_distance: f32,

    pub obstacles: Vec<Aabb>,
    pub cover_points: Vec<Vec3>,
    pub nearest_cover: Option<Vec3>,
    pub flanking_route: Vec<Vec3>,

    pub world_bounds: Aabb,
    pub world_center: Vec3,

    pub investigation_target: Option<Vec3>,
    pub alertness: f32,

    // Written by tree leaves during the tick, read back by the controller.
    pub wants_to_shoot: bool,
    pub mode: AgentMode,
}

impl Blackboard {
    pub fn new() -> Self {
        Self {
            nearest_grenade_distance: f32::INFINITY,
            ..Self::default()
        }
    }

    /// Overwrite every field from this cycle's perception output and world
    /// snapshot. Target choice uses `score` over the visible list.
    pub fn populate_from(
        &mut self,
        agent: &AgentBody,
        perceived: &PerceivedState,
        world: &WorldSnapshot,
        score: TargetScorer,
    ) {
        self.player_position = world.player.position;
        self.player_health = world.player.health;

        self.visible_enemies = perceived.visible.clone();
        self.visible_enemies
            .sort_by(|a, b| a.distance.total_cmp(&b.distance));
        self.nearest_enemy = self.visible_enemies.first().map(|e| e.id);

        let mut best: Option<(&PerceivedEnemy, f32)> = None;
        for enemy in &self.visible_enemies {
            let health = world.health_frac_of(enemy.id).unwrap_or(1.0);
            let s = score(enemy.distance, health);
            if best.map(|(_, bs)| s > bs).unwrap_or(true) {
                best = Some((enemy, s));
            }
        }
        self.current_target = best.map(|(e, _)| e.id);
        self.target_position = best.map(|(e, _)| e.position);
        self.target_distance = best.map(|(e, _)| e.distance).unwrap_or(f32::INFINITY);

        self.last_known_enemy_position = perceived.last_known_enemy_position;
        self.investigation_target = perceived.investigation;
        self.alertness = perceived.alertness;

        self.allies = world
            .allies_of(agent.team, agent.id)
            .iter()
            .map(|a| AllyInfo {
                id: a.id,
                position: a.position,
                health_frac: a.health_frac(),
            })
            .collect();
        self.nearby_ally_count = self
            .allies
            .iter()
            .filter(|a| a.position.flat_distance(agent.position) <= ALLY_NEARBY_RADIUS)
            .count();

        self.grenades = world
            .grenades
            .iter()
            .filter(|g| g.alive)
            .map(|g| g.position)
            .collect();
        self.nearest_grenade_distance = self
            .grenades
            .iter()
            .map(|g| g.flat_distance(agent.position))
            .fold(f32::INFINITY, f32::min);

        self.obstacles = world.obstacles.clone();
        self.world_bounds = world.bounds;
        self.world_center = world.bounds.center;

        let threat = self
            .target_position
            .or(self.last_known_enemy_position);
        self.recompute_cover(agent.position, threat);
        self.recompute_flank_route(agent);

        self.wants_to_shoot = false;
        self.mode = AgentMode::Idle;
    }

    /// Evaluate up to 4 axis-aligned offset points around each nearby
    /// obstacle; a point is cover when the obstacle sits between it and the
    /// threat (positive dot product between point->threat and point->obstacle).
    fn recompute_cover(&mut self, agent_pos: Vec3, threat: Option<Vec3>) {
        self.cover_points.clear();
        self.nearest_cover = None;
        let Some(threat) = threat else {
            return;
        };

        for ob in &self.obstacles {
            if ob.center.flat_distance(agent_pos) > COVER_SEARCH_RADIUS {
                continue;
            }
            let dx = ob.half_extents.x + COVER_MARGIN;
            let dz = ob.half_extents.z + COVER_MARGIN;
            let candidates = [
                ob.center + Vec3::new(dx, 0.0, 0.0),
                ob.center + Vec3::new(-dx, 0.0, 0.0),
                ob.center + Vec3::new(0.0, 0.0, dz),
                ob.center + Vec3::new(0.0, 0.0, -dz),
            ];
            for p in candidates {
                let to_threat = threat - p;
                let to_obstacle = ob.center - p;
                if to_threat.dot(to_obstacle) > 0.0 {
                    self.cover_points.push(p);
                }
            }
        }

        self.nearest_cover = self
            .cover_points
            .iter()
            .copied()
            .min_by(|a, b| {
                a.flat_distance(agent_pos)
                    .total_cmp(&b.flat_distance(agent_pos))
            });
    }

    /// A two-leg route that approaches the current target from the side.
    /// Side choice is stable per agent so pairs of flankers split naturally.
    fn recompute_flank_route(&mut self, agent: &AgentBody) {
        self.flanking_route.clear();
        let Some(target) = self.target_position else {
            return;
        };

        let dir = (target - agent.position).normalize_or_zero();
        if dir == Vec3::ZERO {
            return;
        }
        let side = if agent.id.stable_id() % 2 == 0 { 1.0 } else { -1.0 };
        let midpoint = agent.position
            + dir * (self.target_distance * 0.5)
            + dir.flat_perp() * (FLANK_OFFSET * side);
        self.flanking_route.push(midpoint);
        self.flanking_route.push(target);
    }
}
