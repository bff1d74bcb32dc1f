use crate::color::HexColor;
use crate::config::LoadOptions;
use crate::error::MapError;
use crate::layer::{Layer, ObjectGroup};
use crate::loader::json_loader::{decode_map_file, decode_map_str};
use crate::properties::Properties;
use crate::tile::GID_MASK;
use crate::tileset::Tileset;
use image::Rgba;
use log::debug;
use std::path::{Path, PathBuf};

/// A loaded tile map: tilesets, layers and the attributes needed to draw
/// them.
#[derive(Debug, Clone, Default)]
pub struct Map {
    pub version: String,
    pub orientation: String,
    pub render_order: String,
    /// Size in tiles.
    pub width: u32,
    pub height: u32,
    /// Size of one grid cell in pixels.
    pub tile_width: u32,
    pub tile_height: u32,
    pub background_color: HexColor,
    pub properties: Properties,
    /// Ascending by `first_gid`.
    pub tilesets: Vec<Tileset>,
    pub layers: Vec<Layer>,
    pub object_groups: Vec<ObjectGroup>,
    /// Directory image paths are resolved against.
    pub base_dir: PathBuf,
}

/// A GID resolved to the tileset that defines it.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedTile<'m> {
    pub tileset_index: usize,
    pub tileset: &'m Tileset,
    /// `gid - tileset.first_gid`.
    pub local_id: u32,
}

impl Map {
    /// Loads a Tiled JSON map and validates it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MapError> {
        Self::load_with(path, &LoadOptions::default())
    }

    pub fn load_with(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Self, MapError> {
        let map = decode_map_file(path.as_ref())?;
        map.finish_load(options)
    }

    /// Parses a Tiled JSON map from memory. External tilesets and images
    /// resolve against `base_dir`.
    pub fn from_json_str(
        text: &str,
        base_dir: impl Into<PathBuf>,
        options: &LoadOptions,
    ) -> Result<Self, MapError> {
        let map = decode_map_str(text, base_dir.into())?;
        map.finish_load(options)
    }

    fn finish_load(self, options: &LoadOptions) -> Result<Self, MapError> {
        if options.validate {
            self.validate()?;
        }
        debug!(
            "loaded {}x{} map: {} tilesets, {} layers, {} object groups",
            self.width,
            self.height,
            self.tilesets.len(),
            self.layers.len(),
            self.object_groups.len()
        );
        Ok(self)
    }

    /// Finds the tileset owning `gid`.
    ///
    /// Flags are stripped first. `Ok(None)` for the empty tile 0, an error
    /// if no tileset's range contains the identifier.
    pub fn resolve(&self, gid: u32) -> Result<Option<ResolvedTile<'_>>, MapError> {
        let gid = gid & GID_MASK;
        if gid == 0 {
            return Ok(None);
        }

        self.tilesets
            .iter()
            .enumerate()
            .find(|(_, ts)| ts.contains(gid))
            .map(|(tileset_index, tileset)| {
                Some(ResolvedTile {
                    tileset_index,
                    tileset,
                    local_id: gid - tileset.first_gid,
                })
            })
            .ok_or(MapError::GidOutOfRange { gid })
    }

    /// The tileset owning `gid`, see [`Map::resolve`].
    pub fn tileset_for_gid(&self, gid: u32) -> Result<Option<&Tileset>, MapError> {
        Ok(self.resolve(gid)?.map(|r| r.tileset))
    }

    /// Pixel size of the whole map.
    pub fn pixel_size(&self) -> (u32, u32) {
        (
            self.width.saturating_mul(self.tile_width),
            self.height.saturating_mul(self.tile_height),
        )
    }

    pub fn background(&self) -> Rgba<u8> {
        self.background_color.rgba()
    }

    /// Resolves an image path from the map file against the map directory.
    pub fn image_path(&self, source: &str) -> PathBuf {
        self.base_dir.join(source)
    }

    /// Checks the map is drawable: sizes are positive, tileset ranges are
    /// ascending and disjoint, animation frames stay inside their tileset,
    /// layers match their declared size and every cell resolves to a
    /// tileset.
    pub fn validate(&self) -> Result<(), MapError> {
        if self.width == 0 || self.height == 0 {
            return Err(MapError::InvalidMap(format!(
                "map size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.tile_width == 0 || self.tile_height == 0 {
            return Err(MapError::InvalidMap(format!(
                "tile size must be positive, got {}x{}",
                self.tile_width, self.tile_height
            )));
        }
        if self.background_color.is_set() && self.background_color.parse().is_none() {
            return Err(MapError::InvalidMap(format!(
                "background color '{}' is not #RRGGBB",
                self.background_color.0
            )));
        }

        let mut next_free = 1u32;
        for ts in &self.tilesets {
            if ts.tile_width == 0 || ts.tile_height == 0 {
                return Err(MapError::InvalidMap(format!(
                    "tileset '{}' has a zero tile size",
                    ts.name
                )));
            }
            if ts.first_gid < next_free {
                return Err(MapError::InvalidMap(format!(
                    "tileset '{}' starts at GID {} inside the previous tileset's range",
                    ts.name, ts.first_gid
                )));
            }
            let tile_count = ts.tile_count();
            next_free = ts.first_gid.saturating_add(tile_count);

            for tile in &ts.tiles {
                let bad = tile
                    .animation
                    .iter()
                    .flat_map(|a| a.frames())
                    .find(|f| f.tile_id >= tile_count);
                if let Some(bad) = bad {
                    return Err(MapError::InvalidMap(format!(
                        "tileset '{}' tile {} animates to tile {}, past its {tile_count} tiles",
                        ts.name, tile.id, bad.tile_id
                    )));
                }
            }
        }

        for layer in &self.layers {
            let expected = layer.width as usize * layer.height as usize;
            if !layer.cells.is_empty() && layer.cells.len() != expected {
                return Err(MapError::InvalidLayerSize {
                    layer: layer.name.clone(),
                    expected,
                    actual: layer.cells.len(),
                });
            }
            for cell in &layer.cells {
                self.resolve(cell.gid)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::{TileCell, FLIP_H};
    use crate::animation::{Animation, Frame};
    use crate::tileset::{TileOverride, TilesetImage};

    fn tileset(first_gid: u32, side: u32) -> Tileset {
        Tileset {
            first_gid,
            name: format!("ts{first_gid}"),
            tile_width: 32,
            tile_height: 32,
            image: TilesetImage {
                source: "tiles.png".into(),
                width: side,
                height: side,
            },
            ..Default::default()
        }
    }

    fn map() -> Map {
        Map {
            width: 10,
            height: 10,
            tile_width: 32,
            tile_height: 32,
            tilesets: vec![tileset(1, 320), tileset(101, 16_000)],
            ..Default::default()
        }
    }

    #[test]
    fn zero_is_no_tile() {
        assert!(map().resolve(0).expect("resolve").is_none());
        assert!(Map::default().resolve(0).expect("resolve").is_none());
    }

    #[test]
    fn resolves_range_boundaries() {
        let map = map();
        let first = map.resolve(1).expect("resolve").expect("tile");
        assert_eq!((first.tileset_index, first.local_id), (0, 0));
        let last_small = map.resolve(100).expect("resolve").expect("tile");
        assert_eq!((last_small.tileset_index, last_small.local_id), (0, 99));
        let first_giant = map.resolve(101).expect("resolve").expect("tile");
        assert_eq!((first_giant.tileset_index, first_giant.local_id), (1, 0));
        let last_giant = map.resolve(250_100).expect("resolve").expect("tile");
        assert_eq!(last_giant.local_id, 249_999);
    }

    #[test]
    fn past_the_last_range_is_an_error() {
        let err = map().resolve(250_101).expect_err("out of range");
        assert!(matches!(err, MapError::GidOutOfRange { gid: 250_101 }));
        assert!(err.to_string().contains("250101"));
    }

    #[test]
    fn flags_are_ignored_when_resolving() {
        let map = map();
        let tile = map.resolve(FLIP_H | 2).expect("resolve").expect("tile");
        assert_eq!(tile.local_id, 1);
    }

    #[test]
    fn validates_a_sane_map() {
        map().validate().expect("valid");
    }

    #[test]
    fn rejects_overlapping_tilesets() {
        let mut map = map();
        map.tilesets[1].first_gid = 100;
        assert!(matches!(map.validate(), Err(MapError::InvalidMap(_))));
    }

    #[test]
    fn rejects_bad_background_when_validating() {
        let mut map = map();
        map.background_color = HexColor::from("nocolor");
        assert!(matches!(map.validate(), Err(MapError::InvalidMap(_))));
    }

    #[test]
    fn rejects_animation_frames_outside_the_tileset() {
        let mut map = map();
        map.tilesets[0].tiles.push(TileOverride {
            id: 0,
            animation: Some(Animation::new(vec![
                Frame {
                    tile_id: 1,
                    duration_ms: 100,
                },
                Frame {
                    tile_id: 4_000_000_000,
                    duration_ms: 100,
                },
            ])),
            ..Default::default()
        });
        let err = map.validate().expect_err("frame past the tileset");
        assert!(matches!(err, MapError::InvalidMap(msg) if msg.contains("4000000000")));

        map.tilesets[0].tiles[0].animation = Some(Animation::new(vec![Frame {
            tile_id: 99,
            duration_ms: 100,
        }]));
        map.validate().expect("last tile of the tileset is fine");
    }

    #[test]
    fn rejects_out_of_range_cells_when_validating() {
        let mut map = map();
        map.layers.push(Layer {
            name: "ground".into(),
            width: 1,
            height: 1,
            cells: vec![TileCell::from_raw(999_999)],
            ..Default::default()
        });
        assert!(matches!(
            map.validate(),
            Err(MapError::GidOutOfRange { gid: 999_999 })
        ));
    }

    #[test]
    fn rejects_layer_size_mismatch() {
        let mut map = map();
        map.layers.push(Layer {
            name: "oops".into(),
            width: 2,
            height: 2,
            cells: vec![TileCell::EMPTY; 3],
            ..Default::default()
        });
        assert!(matches!(
            map.validate(),
            Err(MapError::InvalidLayerSize { layer, expected: 4, actual: 3 }) if layer == "oops"
        ));
    }
}
