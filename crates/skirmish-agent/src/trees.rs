//! Behavior-tree assembly, one builder per role.

use skirmish_bt::Node;

use crate::actions::{self, Paths, Sense};
use crate::conditions;
use crate::role::Role;

/// Build the decision tree for `role`. Priority runs top-down: grenade
/// evasion, then survival, then the role's main loop, with patrol as the
/// unconditional fallback. Support agents put ally aid above engagement.
pub fn build_tree(role: Role, sense: &Sense, paths: &Paths, seed: u64) -> Node {
    let evade = Node::sequence(vec![
        Node::condition("grenade_near", conditions::grenade_near),
        actions::evade_grenade(sense.clone()),
    ]);

    let survive = Node::sequence(vec![
        Node::condition("low_health", conditions::low_health),
        Node::condition("has_cover", conditions::has_cover),
        actions::take_cover(sense.clone(), paths.clone()),
    ]);

    let engage = Node::sequence(vec![
        Node::condition("has_visible_target", conditions::has_visible_target),
        actions::engage(sense.clone(), paths.clone(), role),
    ]);

    let investigate = Node::sequence(vec![
        Node::condition("has_investigation", conditions::has_investigation),
        actions::investigate(sense.clone(), paths.clone()),
    ]);

    // Two randomized sweeps per bout; the mode marker runs alongside the
    // sweep loop so the label holds through the pauses.
    let scan = Node::sequence(vec![
        Node::condition("is_alert", conditions::is_alert),
        Node::parallel(
            vec![
                actions::mark_scanning(),
                Node::repeater(
                    Node::sequence(vec![
                        Node::random_selector(
                            vec![
                                actions::sweep_left(sense.clone()),
                                actions::sweep_right(sense.clone()),
                            ],
                            seed ^ 0x5eed,
                        ),
                        Node::wait(0.4),
                    ]),
                    2,
                ),
            ],
            2,
        ),
    ]);

    // Only tend allies while no target is visible.
    let support = Node::sequence(vec![
        Node::inverter(Node::condition(
            "has_visible_target",
            conditions::has_visible_target,
        )),
        Node::condition("ally_needs_help", conditions::ally_needs_help),
        actions::support_ally(sense.clone(), paths.clone()),
    ]);

    let patrol = actions::patrol(sense.clone(), paths.clone(), seed ^ 0x9a7e);

    let branches = match role {
        Role::Support => vec![evade, survive, support, engage, investigate, scan, patrol],
        _ => vec![evade, survive, engage, investigate, scan, support, patrol],
    };
    Node::selector(branches)
}
