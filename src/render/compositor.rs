use crate::animation::AnimationClock;
use crate::canvas::Surface;
use crate::command::{DrawCommand, TileRegion};
use crate::config::RenderOptions;
use crate::error::MapError;
use crate::map::{Map, ResolvedTile};
use crate::render::flip::{ImageFlipper, TileFlipper};
use crate::resource::ResourceLocator;
use image::{imageops, RgbaImage};
use log::{debug, trace, warn};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Counters from one [`Renderer::render`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub drawn: usize,
    /// Cells whose GID no tileset owns.
    pub skipped: usize,
    pub hidden_layers: usize,
}

/// Where a cell's pixels come from and where they go.
struct Placement {
    image: PathBuf,
    source: TileRegion,
    dest: TileRegion,
}

/// Draws a [`Map`] onto a [`Surface`].
///
/// The renderer borrows the map and owns the animation state, so several
/// renderers over one map animate independently.
pub struct Renderer<'m, L> {
    map: &'m Map,
    locator: L,
    flipper: Box<dyn TileFlipper>,
    clock: AnimationClock,
    options: RenderOptions,
}

impl<'m, L: ResourceLocator> Renderer<'m, L> {
    pub fn new(map: &'m Map, locator: L) -> Self {
        Self::with_options(map, locator, RenderOptions::default())
    }

    pub fn with_options(map: &'m Map, locator: L, options: RenderOptions) -> Self {
        Renderer {
            map,
            locator,
            flipper: Box::new(ImageFlipper),
            clock: AnimationClock::new(),
            options,
        }
    }

    /// Swaps the pixel transforms used for flipped tiles.
    pub fn with_flipper(mut self, flipper: impl TileFlipper + 'static) -> Self {
        self.flipper = Box::new(flipper);
        self
    }

    pub fn map(&self) -> &'m Map {
        self.map
    }

    pub fn clock(&self) -> &AnimationClock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut AnimationClock {
        &mut self.clock
    }

    /// Renders one frame.
    ///
    /// Animations advance by `elapsed_ms` before anything is drawn. Cells
    /// with a GID outside every tileset are skipped; a tileset image that
    /// cannot be loaded aborts the render.
    pub fn render(
        &mut self,
        mut surface: Surface<'_>,
        elapsed_ms: u64,
    ) -> Result<RenderStats, MapError> {
        let map = self.map;

        let background = map
            .background_color
            .rgba_or(self.options.default_background);
        let bounds = surface.bounds();
        surface.fill(background, bounds);

        self.clock.advance(&map.tilesets, elapsed_ms);

        let mut stats = RenderStats::default();
        let mut sheets: HashMap<PathBuf, Rc<RgbaImage>> = HashMap::new();

        for (layer_index, layer) in map.layers.iter().enumerate() {
            if !layer.visible {
                stats.hidden_layers += 1;
                continue;
            }

            for (index, cell) in layer.cells.iter().enumerate() {
                let resolved = match map.resolve(cell.gid) {
                    Ok(Some(resolved)) => resolved,
                    Ok(None) => continue,
                    Err(err) => {
                        trace!("layer '{}' cell {index}: {err}", layer.name);
                        stats.skipped += 1;
                        continue;
                    }
                };

                let (col, row) = layer.position(index);
                let placement = self.placement(&resolved, col, row);

                match &mut surface {
                    Surface::Tiles(canvas) => canvas.draw_tile(&DrawCommand {
                        layer_index,
                        tileset_index: resolved.tileset_index,
                        source: placement.source,
                        dest: placement.dest,
                        orientation: cell.orientation,
                        image: &placement.image,
                    })?,
                    Surface::Pixels(canvas) => {
                        let sheet = self.sheet(&mut sheets, &placement.image)?;
                        let src = placement.source;
                        let tile =
                            imageops::crop_imm(&*sheet, src.x, src.y, src.width, src.height)
                                .to_image();
                        let tile = if cell.orientation.is_none() {
                            tile
                        } else {
                            self.flipper.orient(tile, cell.orientation)
                        };
                        canvas.draw(&tile, placement.dest);
                    }
                }
                stats.drawn += 1;
            }
        }

        if stats.skipped > 0 {
            warn!("skipped {} cells with GIDs no tileset owns", stats.skipped);
        }
        debug!(
            "rendered {} tiles ({} skipped, {} hidden layers) after {elapsed_ms}ms",
            stats.drawn, stats.skipped, stats.hidden_layers
        );
        Ok(stats)
    }

    fn placement(&self, resolved: &ResolvedTile<'_>, col: u32, row: u32) -> Placement {
        let map = self.map;
        let tileset = resolved.tileset;
        let shown = self
            .clock
            .displayed_tile(resolved.tileset_index, tileset, resolved.local_id);

        let (image, source) = match tileset.tile(shown).and_then(|t| t.image.as_ref()) {
            Some(own) => (
                map.image_path(&own.source),
                TileRegion::new(0, 0, own.width, own.height),
            ),
            None => (
                map.image_path(&tileset.image.source),
                tileset.tile_region(shown),
            ),
        };

        let dest = TileRegion::new(
            col.saturating_mul(map.tile_width),
            row.saturating_mul(map.tile_height),
            map.tile_width,
            map.tile_height,
        );

        Placement {
            image,
            source,
            dest,
        }
    }

    /// Tileset pixels for this render, asking the locator once per image.
    fn sheet(
        &self,
        sheets: &mut HashMap<PathBuf, Rc<RgbaImage>>,
        path: &Path,
    ) -> Result<Rc<RgbaImage>, MapError> {
        if let Some(sheet) = sheets.get(path) {
            return Ok(Rc::clone(sheet));
        }
        let sheet = self.locator.locate(path)?;
        sheets.insert(path.to_path_buf(), Rc::clone(&sheet));
        Ok(sheet)
    }
}
