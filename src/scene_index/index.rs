//! Scene-time index: fast "which scene is active at time t" lookups.
//!
//! Built from the ordered scene list as sorted (start, end, index) triples;
//! scene i ends where scene i+1 starts and the last scene is unbounded
//! above. Must be rebuilt whenever the scene list changes.

use crate::models::Scene;

#[derive(Debug, Clone, Copy, PartialEq)]
struct SceneRange {
    start: f64,
    end: f64,
    scene_index: usize,
}

#[derive(Debug, Default)]
pub struct SceneTimeIndex {
    ranges: Vec<SceneRange>,
    /// Single-entry cache for repeated queries at nearly the same playback
    /// time; cleared on rebuild.
    last_query: Option<(f64, Option<usize>)>,
}

impl SceneTimeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// O(n) build from the ordered scene list.
    pub fn build(scenes: &[Scene]) -> Self {
        let mut ranges = Vec::with_capacity(scenes.len());
        for (i, scene) in scenes.iter().enumerate() {
            let end = scenes
                .get(i + 1)
                .map(|next| next.start_time)
                .unwrap_or(f64::INFINITY);
            ranges.push(SceneRange {
                start: scene.start_time,
                end,
                scene_index: scene.index,
            });
        }
        Self {
            ranges,
            last_query: None,
        }
    }

    /// Rebuild in place after the scene list changed. Invalidates the cache.
    pub fn rebuild(&mut self, scenes: &[Scene]) {
        *self = Self::build(scenes);
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Binary search for the scene containing `t`.
    ///
    /// Returns `None` for times before the first scene's start. A time
    /// exactly equal to a scene's start belongs to that scene; the last
    /// scene has no upper bound.
    pub fn find_scene_at_time(&mut self, t: f64) -> Option<usize> {
        if let Some((last_t, last_result)) = self.last_query {
            if last_t == t {
                return last_result;
            }
        }

        let result = self.search(t);
        self.last_query = Some((t, result));
        result
    }

    /// Lookup without touching the cache; used by immutable callers.
    pub fn find_scene_at_time_uncached(&self, t: f64) -> Option<usize> {
        self.search(t)
    }

    fn search(&self, t: f64) -> Option<usize> {
        if self.ranges.is_empty() || t < self.ranges[0].start {
            return None;
        }

        let mut lo = 0usize;
        let mut hi = self.ranges.len() - 1;
        while lo < hi {
            let mid = (lo + hi + 1) / 2;
            if self.ranges[mid].start <= t {
                lo = mid;
            } else {
                hi = mid - 1;
            }
        }
        let range = &self.ranges[lo];
        debug_assert!(t < range.end || lo == self.ranges.len() - 1);
        Some(range.scene_index)
    }
}
