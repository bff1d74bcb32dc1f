use crate::color::DEFAULT_BACKGROUND;
use image::Rgba;

/// Options for [`Map::load_with`](crate::Map::load_with).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Run [`Map::validate`](crate::Map::validate) after loading. Skipping it
    /// saves a pass over every cell for maps already known to be good.
    pub validate: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions { validate: true }
    }
}

/// Options for [`Renderer`](crate::Renderer).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Fill used when the map's background color is missing or malformed.
    pub default_background: Rgba<u8>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            default_background: DEFAULT_BACKGROUND,
        }
    }
}
