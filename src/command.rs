use crate::tile::Orientation;
use std::path::Path;

/// An axis-aligned pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TileRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl TileRegion {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        TileRegion {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// The overlap of two regions, if any.
    pub fn intersect(&self, other: &TileRegion) -> Option<TileRegion> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= x || bottom <= y {
            return None;
        }
        Some(TileRegion::new(x, y, right - x, bottom - y))
    }
}

/// One tile blit handed to a [`TileCanvas`](crate::TileCanvas): the canvas
/// owns the tileset pixels and applies the orientation itself.
#[derive(Debug, Clone, Copy)]
pub struct DrawCommand<'a> {
    pub layer_index: usize,
    pub tileset_index: usize,
    /// Region of the source image, before orientation.
    pub source: TileRegion,
    pub dest: TileRegion,
    pub orientation: Orientation,
    /// Key of the source image (its resolved path).
    pub image: &'a Path,
}
