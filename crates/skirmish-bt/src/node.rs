use skirmish_core::rng::{shuffle, SplitMix64};
use skirmish_core::{AgentBody, Blackboard};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Running,
    Success,
    Failure,
}

pub type ConditionFn = Box<dyn Fn(&AgentBody, &Blackboard) -> bool>;
pub type ActionFn = Box<dyn FnMut(&mut AgentBody, &mut Blackboard, f32) -> Status>;

/// A behavior-tree node.
///
/// `Running` is a data-level suspension: composites persist a resume cursor
/// and leaf timers accumulate `dt`, so the next tick continues where this
/// one left off. Tree shape is fixed after construction; only cursors and
/// timers mutate.
pub enum Node {
    Sequence {
        children: Vec<Node>,
        cursor: usize,
    },
    Selector {
        children: Vec<Node>,
        cursor: usize,
    },
    Parallel {
        children: Vec<Node>,
        success_threshold: usize,
    },
    Inverter {
        child: Box<Node>,
    },
    Repeater {
        child: Box<Node>,
        /// Negative = repeat forever.
        times: i32,
        completed: i32,
    },
    RandomSelector {
        children: Vec<Node>,
        rng: SplitMix64,
    },
    Condition {
        name: &'static str,
        pred: ConditionFn,
    },
    Action {
        name: &'static str,
        run: ActionFn,
    },
    Wait {
        duration: f32,
        elapsed: f32,
    },
}

impl Node {
    pub fn sequence(children: Vec<Node>) -> Node {
        Node::Sequence {
            children,
            cursor: 0,
        }
    }

    pub fn selector(children: Vec<Node>) -> Node {
        Node::Selector {
            children,
            cursor: 0,
        }
    }

    pub fn parallel(children: Vec<Node>, success_threshold: usize) -> Node {
        Node::Parallel {
            children,
            success_threshold,
        }
    }

    pub fn inverter(child: Node) -> Node {
        Node::Inverter {
            child: Box::new(child),
        }
    }

    pub fn repeater(child: Node, times: i32) -> Node {
        Node::Repeater {
            child: Box::new(child),
            times,
            completed: 0,
        }
    }

    pub fn random_selector(children: Vec<Node>, seed: u64) -> Node {
        Node::RandomSelector {
            children,
            rng: SplitMix64::new(seed),
        }
    }

    pub fn condition(
        name: &'static str,
        pred: impl Fn(&AgentBody, &Blackboard) -> bool + 'static,
    ) -> Node {
        Node::Condition {
            name,
            pred: Box::new(pred),
        }
    }

    pub fn action(
        name: &'static str,
        run: impl FnMut(&mut AgentBody, &mut Blackboard, f32) -> Status + 'static,
    ) -> Node {
        Node::Action {
            name,
            run: Box::new(run),
        }
    }

    pub fn wait(duration: f32) -> Node {
        Node::Wait {
            duration,
            elapsed: 0.0,
        }
    }

    /// Resume cursor of a Sequence/Selector, for introspection and tests.
    pub fn resume_index(&self) -> Option<usize> {
        match self {
            Node::Sequence { cursor, .. } | Node::Selector { cursor, .. } => Some(*cursor),
            _ => None,
        }
    }

    pub fn tick(&mut self, agent: &mut AgentBody, bb: &mut Blackboard, dt: f32) -> Status {
        match self {
            Node::Sequence { children, cursor } => {
                while *cursor < children.len() {
                    match children[*cursor].tick(agent, bb, dt) {
                        Status::Running => return Status::Running,
                        Status::Failure => {
                            *cursor = 0;
                            for c in children.iter_mut() {
                                c.reset();
                            }
                            return Status::Failure;
                        }
                        Status::Success => *cursor += 1,
                    }
                }
                *cursor = 0;
                for c in children.iter_mut() {
                    c.reset();
                }
                Status::Success
            }

            Node::Selector { children, cursor } => {
                while *cursor < children.len() {
                    match children[*cursor].tick(agent, bb, dt) {
                        Status::Running => return Status::Running,
                        Status::Success => {
                            *cursor = 0;
                            for c in children.iter_mut() {
                                c.reset();
                            }
                            return Status::Success;
                        }
                        Status::Failure => *cursor += 1,
                    }
                }
                *cursor = 0;
                for c in children.iter_mut() {
                    c.reset();
                }
                Status::Failure
            }

            Node::Parallel {
                children,
                success_threshold,
            } => {
                // No short-circuit: every child ticks every call.
                let mut successes = 0usize;
                let mut failures = 0usize;
                for child in children.iter_mut() {
                    match child.tick(agent, bb, dt) {
                        Status::Success => successes += 1,
                        Status::Failure => failures += 1,
                        Status::Running => {}
                    }
                }
                let threshold = (*success_threshold).min(children.len());
                if successes >= threshold {
                    for c in children.iter_mut() {
                        c.reset();
                    }
                    Status::Success
                } else if failures > children.len() - threshold {
                    for c in children.iter_mut() {
                        c.reset();
                    }
                    Status::Failure
                } else {
                    Status::Running
                }
            }

            Node::Inverter { child } => match child.tick(agent, bb, dt) {
                Status::Success => Status::Failure,
                Status::Failure => Status::Success,
                Status::Running => Status::Running,
            },

            Node::Repeater {
                child,
                times,
                completed,
            } => {
                match child.tick(agent, bb, dt) {
                    Status::Running => Status::Running,
                    Status::Success | Status::Failure => {
                        child.reset();
                        *completed += 1;
                        if *times >= 0 && *completed >= *times {
                            *completed = 0;
                            Status::Success
                        } else {
                            // Next completion starts on the following tick.
                            Status::Running
                        }
                    }
                }
            }

            Node::RandomSelector { children, rng } => {
                // Fresh shuffle every tick; no cursor survives a Running result.
                let mut order: Vec<usize> = (0..children.len()).collect();
                shuffle(rng, &mut order);
                for i in order {
                    match children[i].tick(agent, bb, dt) {
                        Status::Success => {
                            for c in children.iter_mut() {
                                c.reset();
                            }
                            return Status::Success;
                        }
                        Status::Running => return Status::Running,
                        Status::Failure => {}
                    }
                }
                for c in children.iter_mut() {
                    c.reset();
                }
                Status::Failure
            }

            Node::Condition { pred, .. } => {
                if pred(agent, bb) {
                    Status::Success
                } else {
                    Status::Failure
                }
            }

            Node::Action { run, .. } => run(agent, bb, dt),

            Node::Wait { duration, elapsed } => {
                *elapsed += dt;
                if *elapsed >= *duration {
                    *elapsed = 0.0;
                    Status::Success
                } else {
                    Status::Running
                }
            }
        }
    }

    /// Clear cursors, timers, and repeat counts, recursively.
    pub fn reset(&mut self) {
        match self {
            Node::Sequence { children, cursor } | Node::Selector { children, cursor } => {
                *cursor = 0;
                for c in children.iter_mut() {
                    c.reset();
                }
            }
            Node::Parallel { children, .. } | Node::RandomSelector { children, .. } => {
                for c in children.iter_mut() {
                    c.reset();
                }
            }
            Node::Inverter { child } => child.reset(),
            Node::Repeater {
                child, completed, ..
            } => {
                *completed = 0;
                child.reset();
            }
            Node::Wait { elapsed, .. } => *elapsed = 0.0,
            Node::Condition { .. } | Node::Action { .. } => {}
        }
    }
}
