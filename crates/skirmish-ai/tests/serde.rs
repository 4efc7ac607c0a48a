#![cfg(feature = "serde")]

use skirmish_ai::core::{AgentBody, AgentId, Team, Vec3, WorldSnapshot};

#[test]
fn agent_body_round_trips_through_json() {
    let body = AgentBody::new(AgentId(3), Team::Ally, Vec3::new(1.0, 0.0, 2.0));
    let json = serde_json::to_string(&body).expect("serialize");
    let back: AgentBody = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, body);
}

#[test]
fn world_snapshot_deserializes_from_host_json() {
    let json = r#"{
        "player": {"position": {"x": 0.0, "y": 0.0, "z": 0.0}, "health": 100.0},
        "agents": [],
        "obstacles": [],
        "grenades": [],
        "difficulty": 1.0,
        "bounds": {
            "center": {"x": 0.0, "y": 0.0, "z": 0.0},
            "half_extents": {"x": 50.0, "y": 5.0, "z": 50.0}
        }
    }"#;
    let world: WorldSnapshot = serde_json::from_str(json).expect("deserialize");
    assert_eq!(world.player.health, 100.0);
    assert!(world.agents.is_empty());
}
