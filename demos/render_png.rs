// Renders a Tiled JSON map to a PNG.
//
//     cargo run --example render_png -- assets/map.json out.png [elapsed_ms]

use anyhow::{bail, Context};
use macroquad_tiled_compositor::{
    CachingLocator, FilesystemLocator, Map, PixelCanvas, Renderer, Surface,
};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let (Some(map_path), Some(out_path)) = (args.next(), args.next()) else {
        bail!("usage: render_png <map.json> <out.png> [elapsed_ms]");
    };
    let elapsed_ms: u64 = match args.next() {
        Some(ms) => ms.parse().context("elapsed_ms must be a whole number")?,
        None => 0,
    };

    let map = Map::load(&map_path).with_context(|| format!("Loading map {map_path}"))?;
    let locator = CachingLocator::new(FilesystemLocator);
    let mut renderer = Renderer::new(&map, &locator);

    let mut canvas = PixelCanvas::for_map(&map);
    let stats = renderer.render(Surface::pixels(&mut canvas), elapsed_ms)?;
    log::info!(
        "{} tiles drawn, {} skipped, {} hidden layers",
        stats.drawn,
        stats.skipped,
        stats.hidden_layers
    );

    canvas
        .into_image()
        .save(&out_path)
        .with_context(|| format!("Writing {out_path}"))?;
    Ok(())
}
