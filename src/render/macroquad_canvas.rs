use crate::canvas::{Canvas, TileCanvas};
use crate::command::{DrawCommand, TileRegion};
use crate::error::MapError;
use crate::map::Map;
use crate::resource::ResourceLocator;
use crate::tile::Orientation;
use image::{Rgba, RgbaImage};
use log::debug;
use macroquad::prelude::{
    draw_rectangle, draw_texture_ex, vec2, Color, DrawTextureParams, FilterMode, Rect, Texture2D,
    WHITE,
};
use std::collections::HashMap;
use std::f32::consts::FRAC_PI_2;
use std::path::{Path, PathBuf};

/// Draws straight to the macroquad window from GPU textures.
///
/// Textures are keyed by the resolved image path carried in each
/// [`DrawCommand`], so they must be uploaded (see
/// [`MacroquadCanvas::load_tilesets`]) before the first render.
pub struct MacroquadCanvas {
    textures: HashMap<PathBuf, Texture2D>,
    bounds: TileRegion,
}

impl MacroquadCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        MacroquadCanvas {
            textures: HashMap::new(),
            bounds: TileRegion::new(0, 0, width, height),
        }
    }

    pub fn for_map(map: &Map) -> Self {
        let (width, height) = map.pixel_size();
        Self::new(width, height)
    }

    /// Uploads `pixels` and registers the texture under `path`.
    pub fn insert_image(
        &mut self,
        path: impl Into<PathBuf>,
        pixels: &RgbaImage,
    ) -> Result<(), MapError> {
        let path = path.into();
        let width = to_u16(pixels.width(), &path)?;
        let height = to_u16(pixels.height(), &path)?;
        let tex = Texture2D::from_rgba8(width, height, pixels.as_raw());
        tex.set_filter(FilterMode::Nearest);
        self.textures.insert(path, tex);
        Ok(())
    }

    pub fn insert_texture(&mut self, path: impl Into<PathBuf>, tex: Texture2D) {
        self.textures.insert(path.into(), tex);
    }

    pub fn has_texture(&self, path: &Path) -> bool {
        self.textures.contains_key(path)
    }

    /// Uploads every image the map's tilesets reference.
    pub fn load_tilesets(
        &mut self,
        map: &Map,
        locator: &impl ResourceLocator,
    ) -> Result<(), MapError> {
        for ts in &map.tilesets {
            let sheet = (!ts.is_image_collection()).then_some(&ts.image);
            let own = ts.tiles.iter().filter_map(|t| t.image.as_ref());

            for image in sheet.into_iter().chain(own) {
                let path = map.image_path(&image.source);
                if self.textures.contains_key(&path) {
                    continue;
                }
                let pixels = locator.locate(&path)?;
                self.insert_image(path, &pixels)?;
            }
        }
        debug!("uploaded {} tileset textures", self.textures.len());
        Ok(())
    }
}

fn to_u16(extent: u32, path: &Path) -> Result<u16, MapError> {
    u16::try_from(extent).map_err(|_| {
        MapError::InvalidMap(format!(
            "image {} is too large for a texture ({extent}px)",
            path.display()
        ))
    })
}

fn to_color(color: Rgba<u8>) -> Color {
    let [r, g, b, a] = color.0;
    Color::from_rgba(r, g, b, a)
}

/// Rotation (clockwise, radians) and source flips reproducing `orientation`.
///
/// macroquad flips the source before rotating, so a diagonal flag becomes a
/// quarter turn of a vertically flipped tile, and the other two flags swap
/// axes under it.
fn orientation_params(orientation: Orientation) -> (f32, bool, bool) {
    let Orientation {
        horizontal,
        vertical,
        diagonal,
    } = orientation;
    if diagonal {
        (FRAC_PI_2, vertical, !horizontal)
    } else {
        (0.0, horizontal, vertical)
    }
}

impl Canvas for MacroquadCanvas {
    fn fill(&mut self, color: Rgba<u8>, region: TileRegion) {
        draw_rectangle(
            region.x as f32,
            region.y as f32,
            region.width as f32,
            region.height as f32,
            to_color(color),
        );
    }

    fn bounds(&self) -> TileRegion {
        self.bounds
    }
}

impl TileCanvas for MacroquadCanvas {
    fn draw_tile(&mut self, command: &DrawCommand<'_>) -> Result<(), MapError> {
        let tex = self
            .textures
            .get(command.image)
            .ok_or_else(|| MapError::ResourceMissing {
                path: command.image.to_path_buf(),
            })?;

        let (rotation, flip_x, flip_y) = orientation_params(command.orientation);
        let src = command.source;
        let dest = command.dest;
        let (dw, dh) = (dest.width as f32, dest.height as f32);

        // a rotated quad turns about its center, so lay it out with swapped
        // sides for it to cover `dest` once turned
        let size = if rotation == 0.0 { vec2(dw, dh) } else { vec2(dh, dw) };
        let center = vec2(dest.x as f32 + dw / 2.0, dest.y as f32 + dh / 2.0);
        let origin = center - size / 2.0;

        draw_texture_ex(
            tex,
            origin.x,
            origin.y,
            WHITE,
            DrawTextureParams {
                source: Some(Rect::new(
                    src.x as f32,
                    src.y as f32,
                    src.width as f32,
                    src.height as f32,
                )),
                dest_size: Some(size),
                rotation,
                flip_x,
                flip_y,
                ..Default::default()
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::flip::{ImageFlipper, TileFlipper};
    use image::imageops;

    /// What macroquad does with the params: flip the source, then turn.
    fn apply(tile: &RgbaImage, (rotation, flip_x, flip_y): (f32, bool, bool)) -> RgbaImage {
        let mut out = tile.clone();
        if flip_x {
            out = imageops::flip_horizontal(&out);
        }
        if flip_y {
            out = imageops::flip_vertical(&out);
        }
        if rotation != 0.0 {
            out = imageops::rotate90(&out);
        }
        out
    }

    #[test]
    fn params_match_the_pixel_flipper_for_every_flag_combination() {
        let src = RgbaImage::from_fn(3, 2, |x, y| Rgba([x as u8, y as u8, 7, 255]));
        for bits in 0..8u32 {
            let bits = bits << 29;
            let orientation = Orientation::from_bits(bits);
            let expected = ImageFlipper.orient(src.clone(), orientation);
            assert_eq!(
                apply(&src, orientation_params(orientation)),
                expected,
                "flags {bits:#010x}"
            );
        }
    }

    #[test]
    fn unflipped_tiles_are_not_rotated() {
        assert_eq!(orientation_params(Orientation::NONE), (0.0, false, false));
    }
}
