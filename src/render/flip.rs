use crate::tile::Orientation;
use image::{imageops, RgbaImage};

/// Pixel transforms for flipped tiles, pluggable into the
/// [`Renderer`](crate::Renderer).
pub trait TileFlipper {
    fn flip_horizontal(&self, tile: &RgbaImage) -> RgbaImage;
    fn flip_vertical(&self, tile: &RgbaImage) -> RgbaImage;
    /// Mirrors across the top-left to bottom-right diagonal.
    fn flip_diagonal(&self, tile: &RgbaImage) -> RgbaImage;

    /// Applies every set flag, diagonal first, then horizontal, then
    /// vertical.
    fn orient(&self, tile: RgbaImage, orientation: Orientation) -> RgbaImage {
        let mut tile = tile;
        if orientation.diagonal {
            tile = self.flip_diagonal(&tile);
        }
        if orientation.horizontal {
            tile = self.flip_horizontal(&tile);
        }
        if orientation.vertical {
            tile = self.flip_vertical(&tile);
        }
        tile
    }
}

/// The default flipper, built on `image::imageops`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageFlipper;

impl TileFlipper for ImageFlipper {
    fn flip_horizontal(&self, tile: &RgbaImage) -> RgbaImage {
        imageops::flip_horizontal(tile)
    }

    fn flip_vertical(&self, tile: &RgbaImage) -> RgbaImage {
        imageops::flip_vertical(tile)
    }

    // a 270° counter-clockwise turn then a mirror, as the map format defines it
    fn flip_diagonal(&self, tile: &RgbaImage) -> RgbaImage {
        imageops::flip_horizontal(&imageops::rotate90(tile))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::{FLIP_D, FLIP_H, FLIP_V};
    use image::Rgba;

    fn numbered(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| Rgba([x as u8, y as u8, 0, 255]))
    }

    #[test]
    fn diagonal_is_a_transpose() {
        let src = numbered(3, 2);
        let out = ImageFlipper.flip_diagonal(&src);
        assert_eq!(out.dimensions(), (2, 3));
        for (x, y, px) in out.enumerate_pixels() {
            assert_eq!(px, src.get_pixel(y, x));
        }
    }

    #[test]
    fn horizontal_and_vertical_make_a_half_turn() {
        let src = numbered(3, 3);
        let out = ImageFlipper.orient(src.clone(), Orientation::from_bits(FLIP_H | FLIP_V));
        assert_eq!(out, imageops::rotate180(&src));
    }

    #[test]
    fn diagonal_then_horizontal_is_a_clockwise_quarter_turn() {
        let src = numbered(3, 3);
        let out = ImageFlipper.orient(src.clone(), Orientation::from_bits(FLIP_D | FLIP_H));
        assert_eq!(out, imageops::rotate90(&src));
    }

    #[test]
    fn no_flags_leaves_the_tile_alone() {
        let src = numbered(2, 2);
        assert_eq!(ImageFlipper.orient(src.clone(), Orientation::NONE), src);
    }
}
