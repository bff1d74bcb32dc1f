use anyhow::Context;
use macroquad::prelude::*;
use macroquad_tiled_compositor::{
    CachingLocator, FilesystemLocator, MacroquadCanvas, Map, Renderer, Surface,
};

fn window_conf() -> Conf {
    Conf {
        window_title: "Animated Map".into(),
        window_width: 1280,
        window_height: 720,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::init();

    if let Err(err) = run().await {
        log::error!("{err:#}");
    }
}

async fn run() -> anyhow::Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "assets/map.json".to_owned());
    let map = Map::load(&path).with_context(|| format!("Loading map {path}"))?;

    let locator = CachingLocator::new(FilesystemLocator);
    let mut canvas = MacroquadCanvas::for_map(&map);
    canvas.load_tilesets(&map, &locator)?;
    let mut renderer = Renderer::new(&map, &locator);

    loop {
        clear_background(BLACK);

        let elapsed_ms = (get_frame_time() * 1000.0) as u64;
        renderer.render(Surface::tiles(&mut canvas), elapsed_ms)?;

        draw_text(
            &format!("FPS: {}", get_fps()),
            screen_width() - 135.0,
            55.0,
            30.0,
            RED,
        );

        next_frame().await;
    }
}
