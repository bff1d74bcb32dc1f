mod compositor;
pub mod flip;
mod macroquad_canvas;

pub use compositor::{RenderStats, Renderer};
pub use flip::{ImageFlipper, TileFlipper};
pub use macroquad_canvas::MacroquadCanvas;
