//! Destination surfaces.
//!
//! A surface either takes finished tile images ([`ImageCanvas`]) or takes
//! draw commands and does cropping and orientation on its own
//! ([`TileCanvas`]). [`Surface`] picks one of the two once per render.

use crate::command::{DrawCommand, TileRegion};
use crate::error::MapError;
use crate::map::Map;
use image::{imageops, Rgba, RgbaImage};

pub trait Canvas {
    /// Replaces every pixel of `region` with `color`.
    fn fill(&mut self, color: Rgba<u8>, region: TileRegion);
    fn bounds(&self) -> TileRegion;
}

/// A canvas that is handed tiles already cropped and oriented.
pub trait ImageCanvas: Canvas {
    /// Draws `tile` at the top-left of `dest` with source-over blending,
    /// clipped to `dest`.
    fn draw(&mut self, tile: &RgbaImage, dest: TileRegion);
}

/// A canvas that owns the tileset pixels and draws straight from a source
/// rectangle, applying the orientation itself.
pub trait TileCanvas: Canvas {
    fn draw_tile(&mut self, command: &DrawCommand<'_>) -> Result<(), MapError>;
}

/// The destination of one render.
pub enum Surface<'c> {
    Pixels(&'c mut dyn ImageCanvas),
    Tiles(&'c mut dyn TileCanvas),
}

impl<'c> Surface<'c> {
    pub fn pixels(canvas: &'c mut dyn ImageCanvas) -> Self {
        Surface::Pixels(canvas)
    }

    pub fn tiles(canvas: &'c mut dyn TileCanvas) -> Self {
        Surface::Tiles(canvas)
    }

    pub fn fill(&mut self, color: Rgba<u8>, region: TileRegion) {
        match self {
            Surface::Pixels(c) => c.fill(color, region),
            Surface::Tiles(c) => c.fill(color, region),
        }
    }

    pub fn bounds(&self) -> TileRegion {
        match self {
            Surface::Pixels(c) => c.bounds(),
            Surface::Tiles(c) => c.bounds(),
        }
    }
}

/// An in-memory RGBA canvas, handy for snapshots and offline renders.
#[derive(Debug, Clone)]
pub struct PixelCanvas {
    target: RgbaImage,
}

impl PixelCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        PixelCanvas {
            target: RgbaImage::new(width, height),
        }
    }

    /// A transparent canvas exactly the map's pixel size.
    pub fn for_map(map: &Map) -> Self {
        let (width, height) = map.pixel_size();
        Self::new(width, height)
    }

    pub fn image(&self) -> &RgbaImage {
        &self.target
    }

    pub fn into_image(self) -> RgbaImage {
        self.target
    }
}

impl Canvas for PixelCanvas {
    fn fill(&mut self, color: Rgba<u8>, region: TileRegion) {
        let Some(clip) = region.intersect(&self.bounds()) else {
            return;
        };
        for y in clip.y..clip.bottom() {
            for x in clip.x..clip.right() {
                self.target.put_pixel(x, y, color);
            }
        }
    }

    fn bounds(&self) -> TileRegion {
        TileRegion::new(0, 0, self.target.width(), self.target.height())
    }
}

impl ImageCanvas for PixelCanvas {
    fn draw(&mut self, tile: &RgbaImage, dest: TileRegion) {
        if dest.is_empty() {
            return;
        }
        let (x, y) = (i64::from(dest.x), i64::from(dest.y));
        if tile.width() <= dest.width && tile.height() <= dest.height {
            imageops::overlay(&mut self.target, tile, x, y);
        } else {
            let clipped = imageops::crop_imm(tile, 0, 0, dest.width, dest.height).to_image();
            imageops::overlay(&mut self.target, &clipped, x, y);
        }
    }
}
