//! Tiled JSON maps for Macroquad: tile data decoding, GID resolution,
//! tile animations and layer compositing.

mod animation;
mod canvas;
mod codec;
mod color;
mod command;
mod config;
mod error;
mod layer;
mod loader {
    pub mod json_loader;
}
mod map;
mod properties;
mod render;
mod resource;
mod tile;
mod tileset;

pub use animation::{Animation, AnimationClock, AnimationCursor, AnimationKey, Frame};
pub use canvas::{Canvas, ImageCanvas, PixelCanvas, Surface, TileCanvas};
pub use codec::{cells_from_bytes, cells_to_bytes, decode_tile_data, Compression, Encoding};
pub use color::{HexColor, DEFAULT_BACKGROUND};
pub use command::{DrawCommand, TileRegion};
pub use config::{LoadOptions, RenderOptions};
pub use error::MapError;
pub use layer::{Layer, MapObject, ObjectGroup, ObjectShape};
pub use map::{Map, ResolvedTile};
pub use properties::{Properties, Property};
pub use render::{ImageFlipper, MacroquadCanvas, RenderStats, Renderer, TileFlipper};
pub use resource::{CachingLocator, FilesystemLocator, ResourceLocator};
pub use tile::{
    FlipMode, Orientation, TileCell, TileId, FLIP_D, FLIP_H, FLIP_MASK, FLIP_V, GID_MASK,
};
pub use tileset::{TileOverride, Tileset, TilesetImage};
