use std::cell::RefCell;
use std::rc::Rc;

use skirmish_bt::Node;
use skirmish_core::rng::derive_seed;
use skirmish_core::{
    default_target_score, AgentBody, AgentId, AgentMode, Blackboard, TargetScorer, TickContext,
    Vec3, WorldSnapshot,
};
use skirmish_nav::PathfindingManager;
use skirmish_sense::Perception;

use crate::role::Role;
use crate::trees;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Discrete output of one decision tick, consumed by the host's combat
/// layer. Damage resolution happens outside this core.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ActionIntent {
    pub wants_to_shoot: bool,
    pub target: Option<AgentId>,
    pub mode: AgentMode,
}

/// Per-agent orchestrator: perception refresh, blackboard projection, tree
/// tick, shoot resolution. One instance per agent; the pathfinding service
/// is injected and may be shared across controllers.
pub struct AgentController {
    role: Role,
    tree: Node,
    blackboard: Blackboard,
    sense: Rc<RefCell<Perception>>,
    paths: Rc<RefCell<PathfindingManager>>,
    scorer: TargetScorer,
    cooldown: f32,
    cooldown_remaining: f32,
}

impl AgentController {
    pub fn new(
        role: Role,
        agent: AgentId,
        paths: Rc<RefCell<PathfindingManager>>,
        seed: u64,
    ) -> Self {
        let sense = Rc::new(RefCell::new(Perception::new(
            role.profile(),
            derive_seed(seed, agent.stable_id(), 1),
        )));
        let tree = trees::build_tree(role, &sense, &paths, derive_seed(seed, agent.stable_id(), 2));
        tracing::debug!(agent = agent.stable_id(), role = role.as_str(), "controller built");
        Self {
            role,
            tree,
            blackboard: Blackboard::new(),
            sense,
            paths,
            scorer: default_target_score,
            cooldown: role.shoot_cooldown(),
            cooldown_remaining: 0.0,
        }
    }

    /// Swap the target-selection policy. The default blends distance with a
    /// finishing bonus for wounded targets.
    pub fn with_scorer(mut self, scorer: TargetScorer) -> Self {
        self.scorer = scorer;
        self
    }

    /// Run one decision tick for this agent.
    pub fn update(
        &mut self,
        ctx: &TickContext,
        agent: &mut AgentBody,
        world: &WorldSnapshot,
    ) -> ActionIntent {
        if !agent.is_alive() {
            return ActionIntent::default();
        }
        let dt = ctx.dt_seconds;
        self.cooldown_remaining = (self.cooldown_remaining - dt).max(0.0);

        self.paths.borrow_mut().begin_frame(ctx);
        self.sense.borrow_mut().update(agent, world, dt);
        let perceived = self.sense.borrow().perceived_state();
        self.blackboard
            .populate_from(agent, &perceived, world, self.scorer);

        self.tree.tick(agent, &mut self.blackboard, dt);

        let mut intent = ActionIntent {
            wants_to_shoot: false,
            target: self.blackboard.current_target,
            mode: self.blackboard.mode,
        };
        if self.blackboard.wants_to_shoot && self.cooldown_remaining <= 0.0 {
            if let Some(target) = self.blackboard.current_target {
                if self.sense.borrow_mut().can_engage(agent, target) {
                    intent.wants_to_shoot = true;
                    // Higher difficulty shortens the interval between shots.
                    self.cooldown_remaining = self.cooldown / world.difficulty.max(0.1);
                    tracing::debug!(
                        agent = agent.id.stable_id(),
                        target = target.stable_id(),
                        "shoot intent"
                    );
                }
            }
        }
        intent
    }

    /// Forward a host-raised sound event into this agent's perception.
    pub fn hear_sound(&mut self, agent: &AgentBody, source: Vec3, volume: f32) {
        self.sense.borrow_mut().hear_sound(agent, source, volume);
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn mode(&self) -> AgentMode {
        self.blackboard.mode
    }

    pub fn blackboard(&self) -> &Blackboard {
        &self.blackboard
    }
}
