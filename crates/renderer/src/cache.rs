//! Rotated-frame cache.

use std::collections::HashMap;
use std::sync::Arc;

use image::RgbaImage;

/// Entries held before the cache is wiped.
pub const DEFAULT_ROTATION_CACHE_LIMIT: usize = 64;

/// Rotated copies of slide frames keyed by `(frame index, whole degrees)`.
///
/// Eviction is deliberately blunt: once `limit` entries are held the whole
/// map is cleared before the next insert. Values are `Arc`s so a caller
/// holding one across a clear keeps a valid frame.
#[derive(Debug)]
pub struct RotationCache {
    entries: HashMap<(usize, i32), Arc<RgbaImage>>,
    limit: usize,
    clears: u64,
}

impl RotationCache {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: HashMap::new(),
            limit: limit.max(1),
            clears: 0,
        }
    }

    /// Discretise an angle to the cache key granularity.
    pub fn key_degrees(degrees: f32) -> i32 {
        degrees.round() as i32
    }

    /// Cached frame for `(index, degrees)`, computing it with `render` on a miss.
    pub fn get_or_insert_with<F>(&mut self, index: usize, degrees: i32, render: F) -> Arc<RgbaImage>
    where
        F: FnOnce() -> RgbaImage,
    {
        if let Some(hit) = self.entries.get(&(index, degrees)) {
            return Arc::clone(hit);
        }
        if self.entries.len() >= self.limit {
            tracing::debug!(entries = self.entries.len(), "Clearing rotation cache");
            self.entries.clear();
            self.clears += 1;
        }
        let frame = Arc::new(render());
        self.entries.insert((index, degrees), Arc::clone(&frame));
        frame
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// How many times the cache has been wiped.
    pub fn clears(&self) -> u64 {
        self.clears
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for RotationCache {
    fn default() -> Self {
        Self::new(DEFAULT_ROTATION_CACHE_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> RgbaImage {
        RgbaImage::new(1, 1)
    }

    #[test]
    fn hit_does_not_render_again() {
        let mut cache = RotationCache::default();
        let mut renders = 0;
        cache.get_or_insert_with(0, 10, || {
            renders += 1;
            frame()
        });
        cache.get_or_insert_with(0, 10, || {
            renders += 1;
            frame()
        });
        assert_eq!(renders, 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn keys_distinguish_index_and_angle() {
        let mut cache = RotationCache::default();
        cache.get_or_insert_with(0, 10, frame);
        cache.get_or_insert_with(1, 10, frame);
        cache.get_or_insert_with(0, 11, frame);
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn cache_is_cleared_at_limit() {
        let mut cache = RotationCache::new(4);
        for deg in 0..4 {
            cache.get_or_insert_with(0, deg, frame);
        }
        assert_eq!(cache.len(), 4);
        cache.get_or_insert_with(0, 99, frame);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.clears(), 1);
    }

    #[test]
    fn size_stays_bounded_over_long_runs() {
        let mut cache = RotationCache::new(16);
        for i in 0..1000 {
            cache.get_or_insert_with(i % 7, (i % 181) as i32, frame);
            assert!(cache.len() <= 16);
        }
    }

    #[test]
    fn key_degrees_rounds() {
        assert_eq!(RotationCache::key_degrees(0.018), 0);
        assert_eq!(RotationCache::key_degrees(89.6), 90);
    }
}
