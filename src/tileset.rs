use crate::animation::Animation;
use crate::command::TileRegion;
use crate::properties::Properties;

/// An image referenced by a tileset or by a single tile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TilesetImage {
    /// Path relative to the map file.
    pub source: String,
    pub width: u32,
    pub height: u32,
}

/// Per-tile data a tileset declares for some of its tiles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TileOverride {
    /// Local tile id within the tileset.
    pub id: u32,
    /// Own image, for image-collection tilesets.
    pub image: Option<TilesetImage>,
    pub animation: Option<Animation>,
    pub properties: Properties,
}

/// A tileset: one atlas image cut into a regular grid (or a collection of
/// per-tile images), owning the GIDs `first_gid..first_gid + tile_count()`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tileset {
    pub first_gid: u32,
    pub name: String,
    /// External tileset file, when the map referenced one.
    pub source: Option<String>,
    pub tile_width: u32,
    pub tile_height: u32,
    pub spacing: u32,
    pub margin: u32,
    pub image: TilesetImage,
    /// Sorted by id.
    pub tiles: Vec<TileOverride>,
    pub properties: Properties,
}

impl Tileset {
    /// The file this tileset came from: the external tileset when there is
    /// one, else its image.
    pub fn filename(&self) -> &str {
        match &self.source {
            Some(source) if !source.is_empty() => source,
            _ => &self.image.source,
        }
    }

    pub fn is_image_collection(&self) -> bool {
        self.image.source.is_empty()
    }

    /// Tiles per row of the atlas.
    pub fn columns(&self) -> u32 {
        grid_span(self.image.width, self.tile_width, self.spacing, self.margin)
    }

    /// Tiles per column of the atlas.
    pub fn rows(&self) -> u32 {
        grid_span(self.image.height, self.tile_height, self.spacing, self.margin)
    }

    pub fn tile_count(&self) -> u32 {
        if self.is_image_collection() {
            return self.tiles.iter().map(|t| t.id + 1).max().unwrap_or(0);
        }
        self.columns().saturating_mul(self.rows())
    }

    /// Whether `gid` (flags already removed) falls in this tileset's range.
    pub fn contains(&self, gid: u32) -> bool {
        gid >= self.first_gid && gid - self.first_gid < self.tile_count()
    }

    pub fn tile(&self, local_id: u32) -> Option<&TileOverride> {
        self.tiles
            .binary_search_by_key(&local_id, |t| t.id)
            .ok()
            .map(|i| &self.tiles[i])
    }

    /// Source rectangle of a local tile index in the atlas.
    ///
    /// Indices past the end of the atlas saturate to a rectangle outside the
    /// image, which crops to nothing.
    pub fn tile_region(&self, local_id: u32) -> TileRegion {
        let columns = self.columns().max(1);
        let col = local_id % columns;
        let row = local_id / columns;
        let step = |index: u32, tile: u32| {
            index
                .saturating_mul(tile.saturating_add(self.spacing))
                .saturating_add(self.margin)
        };
        TileRegion::new(
            step(col, self.tile_width),
            step(row, self.tile_height),
            self.tile_width,
            self.tile_height,
        )
    }

    /// Keeps `tiles` sorted so [`Tileset::tile`] can binary search.
    pub fn sort_tiles(&mut self) {
        self.tiles.sort_by_key(|t| t.id);
    }
}

fn grid_span(extent: u32, tile: u32, spacing: u32, margin: u32) -> u32 {
    if tile == 0 {
        return 0;
    }
    let usable = extent.saturating_sub(margin.saturating_mul(2)) + spacing;
    usable / (tile + spacing)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atlas(first_gid: u32, width: u32, height: u32) -> Tileset {
        Tileset {
            first_gid,
            tile_width: 32,
            tile_height: 32,
            image: TilesetImage {
                source: "tiles.png".into(),
                width,
                height,
            },
            ..Default::default()
        }
    }

    #[test]
    fn derived_grid_counts() {
        let ts = atlas(1, 320, 96);
        assert_eq!(ts.columns(), 10);
        assert_eq!(ts.rows(), 3);
        assert_eq!(ts.tile_count(), 30);
        assert!(ts.contains(1));
        assert!(ts.contains(30));
        assert!(!ts.contains(31));
        assert!(!ts.contains(0));
    }

    #[test]
    fn tile_region_walks_rows() {
        let ts = atlas(1, 320, 96);
        assert_eq!(ts.tile_region(0), TileRegion::new(0, 0, 32, 32));
        assert_eq!(ts.tile_region(11), TileRegion::new(32, 32, 32, 32));
    }

    #[test]
    fn spacing_and_margin_shift_regions() {
        let mut ts = atlas(1, 2 + 32 * 3 + 2 * 2 + 2, 2 + 32 + 2);
        ts.spacing = 2;
        ts.margin = 2;
        assert_eq!(ts.columns(), 3);
        assert_eq!(ts.rows(), 1);
        assert_eq!(ts.tile_region(2), TileRegion::new(2 + 2 * 34, 2, 32, 32));
    }

    #[test]
    fn huge_index_saturates_instead_of_overflowing() {
        let ts = atlas(1, 32, 32);
        let region = ts.tile_region(4_000_000_000);
        assert_eq!(region.y, u32::MAX);
        assert_eq!((region.width, region.height), (32, 32));
    }

    #[test]
    fn zero_sized_tiles_own_nothing() {
        let mut ts = atlas(1, 320, 320);
        ts.tile_width = 0;
        assert_eq!(ts.tile_count(), 0);
        assert!(!ts.contains(1));
    }

    #[test]
    fn image_collection_counts_declared_tiles() {
        let ts = Tileset {
            first_gid: 5,
            tiles: vec![
                TileOverride {
                    id: 0,
                    ..Default::default()
                },
                TileOverride {
                    id: 3,
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        assert!(ts.is_image_collection());
        assert_eq!(ts.tile_count(), 4);
        assert!(ts.tile(3).is_some());
        assert!(ts.tile(2).is_none());
    }

    #[test]
    fn filename_prefers_external_source() {
        let mut ts = atlas(1, 32, 32);
        assert_eq!(ts.filename(), "tiles.png");
        ts.source = Some("terrain.json".into());
        assert_eq!(ts.filename(), "terrain.json");
    }
}
