//! Leaf action factories. Each returns a [`Node`] whose closure owns its own
//! movement state and shares the agent's perception and the pathfinding
//! service through `Rc<RefCell<_>>` handles captured at tree-build time.
//!
//! Actions do one increment of work per tick and report `Success`, so the
//! root selector re-evaluates priorities every frame instead of latching
//! onto a long-running branch.

use std::cell::RefCell;
use std::rc::Rc;

use skirmish_bt::{Node, Status};
use skirmish_core::rng::{DeterministicRng, SplitMix64};
use skirmish_core::{AgentBody, AgentMode, Vec3};
use skirmish_nav::{PathfindingManager, SharedPath};
use skirmish_sense::Perception;

use crate::conditions::{ALLY_HELP_THRESHOLD, GRENADE_DANGER_RADIUS};
use crate::role::Role;

/// Shared handle to the owning agent's perception.
pub type Sense = Rc<RefCell<Perception>>;
/// Shared handle to the injected pathfinding service.
pub type Paths = Rc<RefCell<PathfindingManager>>;

/// Re-plan when the requested goal drifts this far from the planned one.
const REPLAN_DISTANCE: f32 = 2.0;
const SUPPORT_RADIUS: f32 = 4.0;
const STRAFE_STEP: f32 = 2.5;
const SWEEP_ANGLE: f32 = 1.2;

/// Per-action path-following state: the current plan plus a waypoint cursor.
struct PathFollower {
    path: Option<SharedPath>,
    index: usize,
    goal: Vec3,
}

impl PathFollower {
    fn new() -> Self {
        Self {
            path: None,
            index: 0,
            goal: Vec3::ZERO,
        }
    }

    /// Advance one movement step toward `goal` along a cached plan,
    /// re-planning when the goal moves. Returns true on arrival.
    fn step(
        &mut self,
        paths: &Paths,
        sense: &Sense,
        agent: &mut AgentBody,
        goal: Vec3,
        dt: f32,
    ) -> bool {
        if self.path.is_none() || self.goal.flat_distance(goal) > REPLAN_DISTANCE {
            self.path = Some(paths.borrow_mut().find_path(agent.position, goal));
            self.index = 0;
            self.goal = goal;
        }
        let Some(path) = self.path.clone() else {
            return true;
        };
        if self.index >= path.len() {
            self.path = None;
            return true;
        }
        if sense
            .borrow_mut()
            .move_towards(agent, path[self.index], dt)
        {
            self.index += 1;
            if self.index >= path.len() {
                self.path = None;
                return true;
            }
        }
        false
    }
}

/// Sprint directly away from the nearest live grenade.
pub fn evade_grenade(sense: Sense) -> Node {
    Node::action("evade_grenade", move |agent, bb, dt| {
        let Some(grenade) = bb
            .grenades
            .iter()
            .copied()
            .min_by(|a, b| {
                a.flat_distance(agent.position)
                    .total_cmp(&b.flat_distance(agent.position))
            })
        else {
            return Status::Failure;
        };
        bb.mode = AgentMode::Evade;
        let mut away = (agent.position - grenade).normalize_or_zero();
        if away == Vec3::ZERO {
            // Standing on the grenade; any direction beats none.
            away = Vec3::new(1.0, 0.0, 0.0);
        }
        let goal = agent.position + away * GRENADE_DANGER_RADIUS;
        sense.borrow_mut().move_towards(agent, goal, dt);
        Status::Success
    })
}

/// Move toward the blackboard's nearest cover point.
pub fn take_cover(sense: Sense, paths: Paths) -> Node {
    let mut follower = PathFollower::new();
    Node::action("take_cover", move |agent, bb, dt| {
        let Some(cover) = bb.nearest_cover else {
            return Status::Failure;
        };
        bb.mode = AgentMode::TakeCover;
        follower.step(&paths, &sense, agent, cover, dt);
        Status::Success
    })
}

/// Fight the current target: close, back off, or strafe to hold the role's
/// preferred range band, and raise the shoot flag while inside it.
pub fn engage(sense: Sense, paths: Paths, role: Role) -> Node {
    let (min_range, max_range) = role.engage_band();
    let mut follower = PathFollower::new();
    Node::action("engage", move |agent, bb, dt| {
        if bb.current_target.is_none() {
            return Status::Failure;
        }
        let Some(target_pos) = bb.target_position else {
            return Status::Failure;
        };
        bb.mode = AgentMode::Engage;

        let dist = agent.position.flat_distance(target_pos);
        if dist > max_range {
            // Flankers approach via the side route, everyone else head-on.
            let goal = if role == Role::Flanker {
                bb.flanking_route.first().copied().unwrap_or(target_pos)
            } else {
                target_pos
            };
            follower.step(&paths, &sense, agent, goal, dt);
            sense.borrow_mut().face_towards(agent.position, target_pos);
        } else {
            let mut s = sense.borrow_mut();
            if dist < min_range {
                let back = (target_pos - agent.position).normalize_or_zero();
                let goal = agent.position - back * (min_range - dist);
                s.move_towards(agent, goal, dt);
            } else {
                let side = if agent.id.stable_id() % 2 == 0 { 1.0 } else { -1.0 };
                let perp = (target_pos - agent.position)
                    .normalize_or_zero()
                    .flat_perp();
                let goal = agent.position + perp * (STRAFE_STEP * side);
                s.move_towards(agent, goal, dt);
            }
            // Movement re-aimed the body; snap it back onto the target.
            s.face_towards(agent.position, target_pos);
            bb.wants_to_shoot = true;
        }
        Status::Success
    })
}

/// Walk to the active investigation point; clear it on arrival.
pub fn investigate(sense: Sense, paths: Paths) -> Node {
    let mut follower = PathFollower::new();
    Node::action("investigate", move |agent, bb, dt| {
        let Some(point) = bb.investigation_target else {
            return Status::Failure;
        };
        bb.mode = AgentMode::Investigate;
        if follower.step(&paths, &sense, agent, point, dt) {
            sense.borrow_mut().clear_investigation();
        }
        Status::Success
    })
}

pub fn mark_scanning() -> Node {
    Node::action("mark_scanning", |_agent, bb, _dt| {
        bb.mode = AgentMode::Scan;
        Status::Success
    })
}

pub fn sweep_left(sense: Sense) -> Node {
    Node::action("sweep_left", move |_agent, _bb, _dt| {
        sense.borrow_mut().sweep_by(SWEEP_ANGLE);
        Status::Success
    })
}

pub fn sweep_right(sense: Sense) -> Node {
    Node::action("sweep_right", move |_agent, _bb, _dt| {
        sense.borrow_mut().sweep_by(-SWEEP_ANGLE);
        Status::Success
    })
}

/// Move adjacent to the most wounded nearby ally.
pub fn support_ally(sense: Sense, paths: Paths) -> Node {
    let mut follower = PathFollower::new();
    Node::action("support_ally", move |agent, bb, dt| {
        let Some(ally_pos) = bb
            .allies
            .iter()
            .filter(|a| a.health_frac < ALLY_HELP_THRESHOLD)
            .min_by(|a, b| a.health_frac.total_cmp(&b.health_frac))
            .map(|a| a.position)
        else {
            return Status::Failure;
        };
        bb.mode = AgentMode::Support;
        if agent.position.flat_distance(ally_pos) > SUPPORT_RADIUS {
            follower.step(&paths, &sense, agent, ally_pos, dt);
        }
        Status::Success
    })
}

/// Wander between random points inside the world bounds.
pub fn patrol(sense: Sense, paths: Paths, seed: u64) -> Node {
    let mut rng = SplitMix64::new(seed);
    let mut waypoint: Option<Vec3> = None;
    let mut follower = PathFollower::new();
    Node::action("patrol", move |agent, bb, dt| {
        bb.mode = AgentMode::Patrol;
        let goal = match waypoint {
            Some(p) => p,
            None => {
                let b = bb.world_bounds;
                let p = Vec3::new(
                    rng.next_f32_range(b.center.x - b.half_extents.x, b.center.x + b.half_extents.x),
                    agent.position.y,
                    rng.next_f32_range(b.center.z - b.half_extents.z, b.center.z + b.half_extents.z),
                );
                waypoint = Some(p);
                p
            }
        };
        if follower.step(&paths, &sense, agent, goal, dt) {
            waypoint = None;
        }
        Status::Success
    })
}
