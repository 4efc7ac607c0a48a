use core::cmp::Ordering;
use std::collections::BinaryHeap;

use skirmish_core::{Aabb, Vec3};

/// Extra clearance rasterized around every obstacle, in world units.
const OBSTACLE_PADDING: f32 = 0.5;
/// Hard bound on A* expansions; hitting it degrades to the direct-line fallback.
const MAX_EXPANSIONS: usize = 1000;
/// How far the ring search will look for a walkable substitute cell.
const MAX_SUBSTITUTE_RADIUS: i32 = 10;

const ORTHO_COST: u32 = 10;
const DIAGONAL_COST: u32 = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct Cell {
    x: i32,
    z: i32,
}

#[derive(Debug)]
struct OpenNode {
    f: u32,
    g: u32,
    cell: Cell,
    tie: u64,
}

impl OpenNode {
    fn key(&self) -> (u32, u32, Cell, u64) {
        (self.f, self.g, self.cell, self.tie)
    }
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for OpenNode {}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering to make BinaryHeap behave like a min-heap.
        other.key().cmp(&self.key())
    }
}

/// Binary walkable/blocked rasterization of the world's obstacles on the
/// ground (x/z) plane. Rebuilt wholesale when obstacles change.
#[derive(Debug, Clone)]
pub struct NavGrid {
    origin: Vec3,
    width: i32,
    depth: i32,
    cell_size: f32,
    blocked: Vec<bool>,
}

impl NavGrid {
    pub fn build(bounds: Aabb, cell_size: f32, obstacles: &[Aabb]) -> Self {
        assert!(cell_size > 0.0, "cell_size must be > 0");
        let min = bounds.min();
        let max = bounds.max();
        let width = (((max.x - min.x) / cell_size).ceil() as i32).max(1);
        let depth = (((max.z - min.z) / cell_size).ceil() as i32).max(1);

        let mut grid = Self {
            origin: min,
            width,
            depth,
            cell_size,
            blocked: vec![false; (width * depth) as usize],
        };
        for ob in obstacles {
            grid.rasterize(ob);
        }
        grid
    }

    fn rasterize(&mut self, obstacle: &Aabb) {
        let padded = obstacle.expanded(OBSTACLE_PADDING);
        let lo = padded.min();
        let hi = padded.max();
        let x0 = (((lo.x - self.origin.x) / self.cell_size).floor() as i32).max(0);
        let z0 = (((lo.z - self.origin.z) / self.cell_size).floor() as i32).max(0);
        let x1 = (((hi.x - self.origin.x) / self.cell_size).floor() as i32).min(self.width - 1);
        let z1 = (((hi.z - self.origin.z) / self.cell_size).floor() as i32).min(self.depth - 1);
        for z in z0..=z1 {
            for x in x0..=x1 {
                let idx = (z * self.width + x) as usize;
                self.blocked[idx] = true;
            }
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn is_blocked(&self, x: i32, z: i32) -> bool {
        self.idx(Cell { x, z })
            .map(|idx| self.blocked[idx])
            .unwrap_or(true)
    }

    pub fn is_walkable_point(&self, p: Vec3) -> bool {
        let cell = self.cell_of(p);
        self.in_bounds(cell) && !self.is_blocked(cell.x, cell.z)
    }

    fn in_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.z >= 0 && cell.x < self.width && cell.z < self.depth
    }

    fn idx(&self, cell: Cell) -> Option<usize> {
        if !self.in_bounds(cell) {
            return None;
        }
        Some((cell.z * self.width + cell.x) as usize)
    }

    fn cell_of(&self, p: Vec3) -> Cell {
        Cell {
            x: ((p.x - self.origin.x) / self.cell_size).floor() as i32,
            z: ((p.z - self.origin.z) / self.cell_size).floor() as i32,
        }
    }

    fn cell_of_clamped(&self, p: Vec3) -> Cell {
        let c = self.cell_of(p);
        Cell {
            x: c.x.clamp(0, self.width - 1),
            z: c.z.clamp(0, self.depth - 1),
        }
    }

    fn cell_center(&self, cell: Cell, y: f32) -> Vec3 {
        Vec3::new(
            self.origin.x + (cell.x as f32 + 0.5) * self.cell_size,
            y,
            self.origin.z + (cell.z as f32 + 0.5) * self.cell_size,
        )
    }

    fn heuristic(a: Cell, b: Cell) -> u32 {
        (((a.x - b.x).abs() + (a.z - b.z).abs()) as u32) * ORTHO_COST
    }

    fn neighbors(cell: Cell) -> [(Cell, u32); 8] {
        // Fixed order for determinism: N, NE, E, SE, S, SW, W, NW.
        let Cell { x, z } = cell;
        [
            (Cell { x, z: z - 1 }, ORTHO_COST),
            (Cell { x: x + 1, z: z - 1 }, DIAGONAL_COST),
            (Cell { x: x + 1, z }, ORTHO_COST),
            (Cell { x: x + 1, z: z + 1 }, DIAGONAL_COST),
            (Cell { x, z: z + 1 }, ORTHO_COST),
            (Cell { x: x - 1, z: z + 1 }, DIAGONAL_COST),
            (Cell { x: x - 1, z }, ORTHO_COST),
            (Cell { x: x - 1, z: z - 1 }, DIAGONAL_COST),
        ]
    }

    /// Closest walkable cell found by expanding square rings around `cell`.
    fn nearest_walkable(&self, cell: Cell) -> Option<Cell> {
        if self.in_bounds(cell) && !self.is_blocked(cell.x, cell.z) {
            return Some(cell);
        }
        for r in 1..=MAX_SUBSTITUTE_RADIUS {
            let mut best: Option<(i64, Cell)> = None;
            for dz in -r..=r {
                for dx in -r..=r {
                    if dx.abs() != r && dz.abs() != r {
                        continue; // Perimeter of the ring only.
                    }
                    let c = Cell {
                        x: cell.x + dx,
                        z: cell.z + dz,
                    };
                    if !self.in_bounds(c) || self.is_blocked(c.x, c.z) {
                        continue;
                    }
                    let d = (dx as i64) * (dx as i64) + (dz as i64) * (dz as i64);
                    if best.map(|(bd, _)| d < bd).unwrap_or(true) {
                        best = Some((d, c));
                    }
                }
            }
            if let Some((_, c)) = best {
                return Some(c);
            }
        }
        None
    }

    /// Cell path via A* over the 8-connected grid, or `None` when the search
    /// budget is exhausted or no route exists.
    fn a_star(&self, start: Cell, goal: Cell) -> Option<Vec<Cell>> {
        let start_idx = self.idx(start)?;
        let goal_idx = self.idx(goal)?;
        if self.blocked[start_idx] || self.blocked[goal_idx] {
            return None;
        }

        let mut open = BinaryHeap::<OpenNode>::new();
        let mut tie: u64 = 0;

        let grid_len = (self.width * self.depth) as usize;
        let mut g_score = vec![u32::MAX; grid_len];
        let mut came_from: Vec<Option<usize>> = vec![None; grid_len];

        g_score[start_idx] = 0;
        open.push(OpenNode {
            f: Self::heuristic(start, goal),
            g: 0,
            cell: start,
            tie,
        });
        tie += 1;

        let mut expansions = 0usize;
        while let Some(node) = open.pop() {
            expansions += 1;
            if expansions > MAX_EXPANSIONS {
                return None;
            }

            if node.cell == goal {
                let idx_path = self.reconstruct_path(&came_from, goal_idx);
                return Some(idx_path.into_iter().map(|i| self.cell_from_idx(i)).collect());
            }

            let node_idx = self.idx(node.cell)?;
            if node.g != g_score[node_idx] {
                // Stale heap entry.
                continue;
            }

            for (n, step_cost) in Self::neighbors(node.cell) {
                let Some(n_idx) = self.idx(n) else { continue };
                if self.blocked[n_idx] {
                    continue;
                }

                let tentative_g = node.g.saturating_add(step_cost);
                if tentative_g >= g_score[n_idx] {
                    continue;
                }

                came_from[n_idx] = Some(node_idx);
                g_score[n_idx] = tentative_g;
                open.push(OpenNode {
                    f: tentative_g.saturating_add(Self::heuristic(n, goal)),
                    g: tentative_g,
                    cell: n,
                    tie,
                });
                tie += 1;
            }
        }

        None
    }

    fn reconstruct_path(&self, came_from: &[Option<usize>], mut current: usize) -> Vec<usize> {
        let mut out = vec![current];
        while let Some(prev) = came_from[current] {
            current = prev;
            out.push(current);
        }
        out.reverse();
        out
    }

    fn cell_from_idx(&self, idx: usize) -> Cell {
        let idx = idx as i32;
        Cell {
            x: idx % self.width,
            z: idx / self.width,
        }
    }

    /// True when the straight segment between `a` and `b` crosses only
    /// walkable cells, sampled at cell-size resolution.
    pub fn has_direct_path(&self, a: Vec3, b: Vec3) -> bool {
        let dist = a.flat_distance(b);
        let steps = ((dist / self.cell_size).ceil() as usize).max(1);
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            if !self.is_walkable_point(a.lerp(b, t)) {
                return false;
            }
        }
        true
    }

    /// Greedily skip waypoints while the line from the current anchor to a
    /// farther waypoint stays walkable.
    pub fn smooth(&self, points: &[Vec3]) -> Vec<Vec3> {
        if points.len() <= 2 {
            return points.to_vec();
        }
        let mut out = vec![points[0]];
        let mut anchor = 0;
        while anchor + 1 < points.len() {
            let mut far = anchor + 1;
            for next in (anchor + 2)..points.len() {
                if self.has_direct_path(points[anchor], points[next]) {
                    far = next;
                } else {
                    break;
                }
            }
            out.push(points[far]);
            anchor = far;
        }
        out
    }

    /// Waypoints from `from` to `to`. Degrades rather than fails: a blocked
    /// destination is substituted with the nearest walkable cell, and an
    /// exhausted search budget yields the direct-line `[to]`.
    pub fn find_path(&self, from: Vec3, to: Vec3) -> Vec<Vec3> {
        let fallback = vec![to];

        let Some(start) = self.nearest_walkable(self.cell_of_clamped(from)) else {
            return fallback;
        };
        let goal_cell = self.cell_of_clamped(to);
        let Some(goal) = self.nearest_walkable(goal_cell) else {
            return fallback;
        };

        let Some(cells) = self.a_star(start, goal) else {
            return fallback;
        };

        // Exact endpoints; interior waypoints at cell centers on from's plane.
        let end = if goal == goal_cell {
            to
        } else {
            self.cell_center(goal, to.y)
        };
        let mut points = Vec::with_capacity(cells.len() + 1);
        points.push(from);
        if cells.len() >= 2 {
            for cell in cells.iter().skip(1).take(cells.len().saturating_sub(2)) {
                points.push(self.cell_center(*cell, from.y));
            }
        }
        points.push(end);

        let mut smoothed = self.smooth(&points);
        // Consumers walk toward successive waypoints; the start point is theirs.
        if smoothed.len() > 1 {
            smoothed.remove(0);
        }
        smoothed
    }
}
