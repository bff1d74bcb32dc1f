//! Animated tiles.
//!
//! [`Animation`] is the static frame list loaded with the tileset and never
//! changes. Playback state lives in an [`AnimationCursor`], and the cursors
//! for a whole map live in an [`AnimationClock`] keyed by tileset and local
//! tile id. Two renders of the same map with their own clocks never share
//! state.
//!
//! Time only moves when the caller says so: every advance takes an elapsed
//! millisecond count, there is no wall clock in here.

use crate::tileset::Tileset;
use std::collections::HashMap;

/// A single frame of a tile animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    /// Local tile index shown during this frame.
    pub tile_id: u32,
    pub duration_ms: u64,
}

/// The frame sequence declared for one tile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Animation {
    frames: Vec<Frame>,
}

impl Animation {
    pub fn new(frames: Vec<Frame>) -> Self {
        Animation { frames }
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Fewer than two frames never change.
    pub fn is_static(&self) -> bool {
        self.frames.len() < 2
    }
}

#[derive(Debug, Clone)]
struct Timeline {
    /// Cumulative end time of each frame.
    ends: Vec<u64>,
    total: u64,
}

impl Timeline {
    fn compute(animation: &Animation) -> Self {
        let mut total = 0u64;
        let ends = animation
            .frames()
            .iter()
            .map(|f| {
                total = total.saturating_add(f.duration_ms);
                total
            })
            .collect();
        Timeline { ends, total }
    }
}

/// Playback position within one [`Animation`].
///
/// Starts uninitialized; the first advance computes the frame end times and
/// the cursor is running from then on.
#[derive(Debug, Clone, Default)]
pub struct AnimationCursor {
    clock_ms: u64,
    active: usize,
    timeline: Option<Timeline>,
}

impl AnimationCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the clock forward by `elapsed_ms`.
    ///
    /// Past the total duration the clock wraps and playback restarts at the
    /// first frame, then walks forward frame by frame until the clock is
    /// inside the active frame, so uneven durations and jumps across several
    /// frames land on the right one.
    pub fn advance(&mut self, animation: &Animation, elapsed_ms: u64) {
        if animation.is_static() {
            return;
        }

        let stale = self
            .timeline
            .as_ref()
            .map_or(true, |t| t.ends.len() != animation.len());
        if stale {
            self.timeline = Some(Timeline::compute(animation));
            self.active = 0;
        }
        let Some(timeline) = &self.timeline else {
            return;
        };
        if timeline.total == 0 {
            return;
        }

        self.clock_ms = self.clock_ms.saturating_add(elapsed_ms);
        if self.clock_ms >= timeline.total {
            self.clock_ms %= timeline.total;
            self.active = 0;
        }
        // ends.last() == total > clock, so this stops on a valid frame
        while self.clock_ms >= timeline.ends[self.active] {
            self.active += 1;
        }
    }

    /// The frame on screen, or `None` for an animation without frames.
    pub fn current_frame<'a>(&self, animation: &'a Animation) -> Option<&'a Frame> {
        animation
            .frames()
            .get(self.active)
            .or_else(|| animation.frames().first())
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.clock_ms
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn is_running(&self) -> bool {
        self.timeline.is_some()
    }
}

/// Identifies an animated tile within a map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimationKey {
    /// Index into the map's tileset list.
    pub tileset: usize,
    pub tile: u32,
}

/// All animation cursors for one map.
#[derive(Debug, Clone, Default)]
pub struct AnimationClock {
    cursors: HashMap<AnimationKey, AnimationCursor>,
}

impl AnimationClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances every animated tile of every tileset by `elapsed_ms`.
    pub fn advance(&mut self, tilesets: &[Tileset], elapsed_ms: u64) {
        for (tileset, ts) in tilesets.iter().enumerate() {
            for tile in &ts.tiles {
                if let Some(animation) = &tile.animation {
                    self.cursors
                        .entry(AnimationKey {
                            tileset,
                            tile: tile.id,
                        })
                        .or_default()
                        .advance(animation, elapsed_ms);
                }
            }
        }
    }

    /// The local tile index to draw for `local_id` right now.
    ///
    /// Non-animated tiles, and animations without frames, show themselves.
    pub fn displayed_tile(&self, tileset_index: usize, tileset: &Tileset, local_id: u32) -> u32 {
        let Some(animation) = tileset.tile(local_id).and_then(|t| t.animation.as_ref()) else {
            return local_id;
        };
        let key = AnimationKey {
            tileset: tileset_index,
            tile: local_id,
        };
        let frame = match self.cursors.get(&key) {
            Some(cursor) => cursor.current_frame(animation),
            None => animation.frames().first(),
        };
        frame.map_or(local_id, |f| f.tile_id)
    }

    pub fn cursor(&self, key: AnimationKey) -> Option<&AnimationCursor> {
        self.cursors.get(&key)
    }

    /// Drops all playback state; every animation restarts at its first frame.
    pub fn reset(&mut self) {
        self.cursors.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frames(timings: &[(u32, u64)]) -> Animation {
        Animation::new(
            timings.iter()
                .map(|&(tile_id, duration_ms)| Frame {
                    tile_id,
                    duration_ms,
                })
                .collect(),
        )
    }

    fn shown(cursor: &AnimationCursor, anim: &Animation) -> u32 {
        cursor.current_frame(anim).expect("frame").tile_id
    }

    #[test]
    fn walks_uneven_frames() {
        let anim = frames(&[(3, 100), (1, 50), (2, 150)]);
        let mut cursor = AnimationCursor::new();
        assert_eq!(shown(&cursor, &anim), 3);

        cursor.advance(&anim, 99);
        assert_eq!(shown(&cursor, &anim), 3);
        cursor.advance(&anim, 2);
        assert_eq!(shown(&cursor, &anim), 1);
        cursor.advance(&anim, 100);
        assert_eq!(shown(&cursor, &anim), 2);
        cursor.advance(&anim, 100);
        assert_eq!(cursor.elapsed_ms(), 1);
        assert_eq!(shown(&cursor, &anim), 3);
    }

    #[test]
    fn frame_boundary_belongs_to_the_next_frame() {
        let anim = frames(&[(3, 100), (1, 50), (2, 150)]);
        let mut cursor = AnimationCursor::new();
        cursor.advance(&anim, 100);
        assert_eq!(shown(&cursor, &anim), 1);
        cursor.advance(&anim, 200);
        assert_eq!(cursor.elapsed_ms(), 0);
        assert_eq!(shown(&cursor, &anim), 3);
    }

    #[test]
    fn large_jump_wraps_then_walks() {
        let anim = frames(&[(3, 100), (1, 50), (2, 150)]);
        let mut cursor = AnimationCursor::new();
        cursor.advance(&anim, 10 * 300 + 160);
        assert_eq!(cursor.elapsed_ms(), 160);
        assert_eq!(shown(&cursor, &anim), 2);
    }

    #[test]
    fn single_frame_is_static() {
        let anim = frames(&[(7, 100)]);
        let mut cursor = AnimationCursor::new();
        cursor.advance(&anim, 1_000);
        assert_eq!(cursor.elapsed_ms(), 0);
        assert!(!cursor.is_running());
        assert_eq!(shown(&cursor, &anim), 7);
    }

    #[test]
    fn zero_frames_has_no_frame() {
        let anim = Animation::default();
        let mut cursor = AnimationCursor::new();
        cursor.advance(&anim, 50);
        assert!(cursor.current_frame(&anim).is_none());
    }

    #[test]
    fn zero_total_duration_stays_on_first_frame() {
        let anim = frames(&[(4, 0), (5, 0)]);
        let mut cursor = AnimationCursor::new();
        cursor.advance(&anim, 500);
        assert_eq!(shown(&cursor, &anim), 4);
    }

    #[test]
    fn zero_delta_is_a_no_op() {
        let anim = frames(&[(3, 100), (1, 50)]);
        let mut cursor = AnimationCursor::new();
        cursor.advance(&anim, 0);
        assert!(cursor.is_running());
        assert_eq!(shown(&cursor, &anim), 3);
    }
}
