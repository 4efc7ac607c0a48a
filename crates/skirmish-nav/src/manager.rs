use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use skirmish_core::{Aabb, TickContext, Vec3};

use crate::grid::NavGrid;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Immutable once computed; shared between the cache and any number of
/// consumers, so a cached hit is a pointer copy.
pub type SharedPath = Rc<[Vec3]>;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NavConfig {
    pub cell_size: f32,
    /// Seconds a cached path stays fresh.
    pub cache_ttl: f32,
    /// Retained entry bound; oldest inserted is evicted first.
    pub cache_capacity: usize,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            cell_size: 1.0,
            cache_ttl: 3.0,
            cache_capacity: 64,
        }
    }
}

/// Cache key: endpoints rounded to whole world units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct PathKey {
    from: (i32, i32, i32),
    to: (i32, i32, i32),
}

impl PathKey {
    fn new(from: Vec3, to: Vec3) -> Self {
        let r = |p: Vec3| (p.x.round() as i32, p.y.round() as i32, p.z.round() as i32);
        Self {
            from: r(from),
            to: r(to),
        }
    }
}

struct CacheEntry {
    path: SharedPath,
    created: f32,
}

/// The consumer-facing pathfinding API: a [`NavGrid`] behind a time-windowed
/// path cache. One instance is shared by every controller (injected at
/// construction, never a global).
pub struct PathfindingManager {
    config: NavConfig,
    bounds: Aabb,
    grid: Option<NavGrid>,
    cache: HashMap<PathKey, CacheEntry>,
    insertion_order: VecDeque<PathKey>,
    clock: f32,
    last_tick: Option<u64>,
}

impl PathfindingManager {
    pub fn new(config: NavConfig) -> Self {
        Self {
            config,
            bounds: Aabb::new(Vec3::ZERO, Vec3::ZERO),
            grid: None,
            cache: HashMap::new(),
            insertion_order: VecDeque::new(),
            clock: 0.0,
            last_tick: None,
        }
    }

    /// (Re)build the grid for `bounds` and clear the cache.
    pub fn initialize(&mut self, bounds: Aabb, obstacles: &[Aabb]) {
        self.bounds = bounds;
        self.rebuild(obstacles);
    }

    /// Rebuild on world change; invalidates the whole cache.
    pub fn update(&mut self, obstacles: &[Aabb]) {
        self.rebuild(obstacles);
    }

    fn rebuild(&mut self, obstacles: &[Aabb]) {
        self.grid = Some(NavGrid::build(
            self.bounds,
            self.config.cell_size,
            obstacles,
        ));
        self.cache.clear();
        self.insertion_order.clear();
        tracing::debug!(obstacles = obstacles.len(), "nav grid rebuilt, cache cleared");
    }

    /// Advance the cache clock. Idempotent per `ctx.tick`, so every
    /// controller sharing this manager may call it each frame.
    pub fn begin_frame(&mut self, ctx: &TickContext) {
        if self.last_tick != Some(ctx.tick) {
            self.last_tick = Some(ctx.tick);
            self.clock += ctx.dt_seconds;
        }
    }

    pub fn grid(&self) -> Option<&NavGrid> {
        self.grid.as_ref()
    }

    /// True when the straight line between two points stays walkable.
    pub fn has_direct_path(&self, from: Vec3, to: Vec3) -> bool {
        self.grid
            .as_ref()
            .map(|g| g.has_direct_path(from, to))
            .unwrap_or(true)
    }

    /// Never fails: degrades through nearest-walkable substitution and the
    /// direct-line fallback, always yielding at least `[to]`.
    pub fn find_path(&mut self, from: Vec3, to: Vec3) -> SharedPath {
        let key = PathKey::new(from, to);
        if let Some(entry) = self.cache.get(&key) {
            if self.clock - entry.created < self.config.cache_ttl {
                tracing::trace!(?key.from, ?key.to, "path cache hit");
                return Rc::clone(&entry.path);
            }
        }

        let points = match &self.grid {
            Some(grid) => grid.find_path(from, to),
            None => vec![to],
        };
        let path: SharedPath = points.into();

        self.insert(key, Rc::clone(&path));
        path
    }

    fn insert(&mut self, key: PathKey, path: SharedPath) {
        if self.cache.insert(
            key,
            CacheEntry {
                path,
                created: self.clock,
            },
        )
        .is_some()
        {
            // A refreshed entry counts as newest for eviction order.
            self.insertion_order.retain(|k| *k != key);
        }
        self.insertion_order.push_back(key);

        while self.cache.len() > self.config.cache_capacity {
            let Some(oldest) = self.insertion_order.pop_front() else {
                break;
            };
            self.cache.remove(&oldest);
            tracing::trace!(?oldest.from, ?oldest.to, "path cache entry evicted");
        }
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }
}
