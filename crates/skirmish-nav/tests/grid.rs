use skirmish_core::{Aabb, Vec3};
use skirmish_nav::NavGrid;

fn bounds_10x10() -> Aabb {
    // Min corner at the origin: cells line up with whole coordinates.
    Aabb::new(Vec3::new(5.0, 0.0, 5.0), Vec3::new(5.0, 2.0, 5.0))
}

fn block(x: f32, z: f32) -> Aabb {
    // Tiny box; with the +0.5 rasterization padding it blocks the 3x3
    // cell patch centered on its cell.
    Aabb::new(Vec3::new(x, 0.0, z), Vec3::new(0.2, 1.0, 0.2))
}

#[test]
fn empty_grid_path_is_diagonal_optimal() {
    let grid = NavGrid::build(bounds_10x10(), 1.0, &[]);
    let from = Vec3::new(0.5, 0.0, 0.5);
    let to = Vec3::new(9.5, 0.0, 9.5);
    let path = grid.find_path(from, to);

    assert_eq!(*path.last().unwrap(), to);

    // Walk the polyline; on an obstacle-free grid the diagonal-weighted
    // shortest distance between those cells is 9 * sqrt(2) cells.
    let mut length = 0.0;
    let mut prev = from;
    for p in &path {
        length += prev.flat_distance(*p);
        prev = *p;
    }
    let optimal = 9.0 * std::f32::consts::SQRT_2;
    assert!(
        (length - optimal).abs() < 0.3,
        "path length {length} vs optimal {optimal}"
    );
}

#[test]
fn routes_around_blocked_cell() {
    // Blocker centered on cell (5,5) of a 10x10 grid.
    let grid = NavGrid::build(bounds_10x10(), 1.0, &[block(5.5, 5.5)]);
    assert!(grid.is_blocked(5, 5));

    let from = Vec3::new(0.5, 0.0, 0.5);
    let to = Vec3::new(9.5, 0.0, 9.5);
    let path = grid.find_path(from, to);

    assert_eq!(*path.last().unwrap(), to);
    let mut prev = from;
    for p in &path {
        // No sampled point along any leg may land on the blocked cell.
        let dist = prev.flat_distance(*p);
        let steps = ((dist / 0.25).ceil() as usize).max(1);
        for i in 0..=steps {
            let s = prev.lerp(*p, i as f32 / steps as f32);
            assert!(
                !(s.x.floor() as i32 == 5 && s.z.floor() as i32 == 5),
                "path crosses blocked cell at {s:?}"
            );
        }
        prev = *p;
    }
}

#[test]
fn smoothed_waypoints_stay_mutually_visible() {
    let mut obstacles = Vec::new();
    // A wall across the middle with a gap at z=8.
    for z in 0..8 {
        obstacles.push(block(5.5, z as f32 + 0.5));
    }
    let grid = NavGrid::build(bounds_10x10(), 1.0, &obstacles);

    let from = Vec3::new(0.5, 0.0, 0.5);
    let path = grid.find_path(from, Vec3::new(9.5, 0.0, 0.5));
    assert!(path.len() >= 2, "wall must force intermediate waypoints");

    let mut prev = from;
    for p in &path {
        assert!(
            grid.has_direct_path(prev, *p),
            "smoothed leg {prev:?} -> {p:?} is obstructed"
        );
        prev = *p;
    }
}

#[test]
fn blocked_destination_is_substituted_with_nearest_walkable() {
    let obstacle = Aabb::new(Vec3::new(5.0, 0.0, 5.0), Vec3::new(1.0, 1.0, 1.0));
    let grid = NavGrid::build(bounds_10x10(), 1.0, &[obstacle]);

    let path = grid.find_path(Vec3::new(0.5, 0.0, 0.5), Vec3::new(5.0, 0.0, 5.0));
    let end = *path.last().unwrap();
    assert!(
        grid.is_walkable_point(end),
        "substituted endpoint {end:?} must be walkable"
    );
    // Still reasonably near the requested destination.
    assert!(end.flat_distance(Vec3::new(5.0, 0.0, 5.0)) < 4.0);
}

#[test]
fn unreachable_goal_degrades_to_direct_line() {
    // Big grid with the goal sealed inside a walled pocket: the goal cell
    // itself is walkable (no substitution), but no route exists, so the
    // search budget runs out and the direct-line fallback applies.
    let bounds = Aabb::new(Vec3::new(50.0, 0.0, 50.0), Vec3::new(50.0, 2.0, 50.0));
    let mut obstacles = Vec::new();
    for i in 40..=60 {
        obstacles.push(block(i as f32 + 0.5, 40.5));
        obstacles.push(block(i as f32 + 0.5, 60.5));
        obstacles.push(block(40.5, i as f32 + 0.5));
        obstacles.push(block(60.5, i as f32 + 0.5));
    }
    let grid = NavGrid::build(bounds, 1.0, &obstacles);

    let to = Vec3::new(50.5, 0.0, 50.5);
    assert!(grid.is_walkable_point(to));
    let path = grid.find_path(Vec3::new(5.5, 0.0, 5.5), to);
    assert_eq!(path.as_slice(), &[to]);
}

#[test]
fn direct_path_sampling_detects_obstruction() {
    let grid = NavGrid::build(bounds_10x10(), 1.0, &[block(5.5, 5.5)]);
    assert!(!grid.has_direct_path(Vec3::new(2.5, 0.0, 5.5), Vec3::new(8.5, 0.0, 5.5)));
    assert!(grid.has_direct_path(Vec3::new(0.5, 0.0, 0.5), Vec3::new(0.5, 0.0, 9.5)));
}
