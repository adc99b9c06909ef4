//! Blocks entry point
//!
//! Native builds open a macroquad window; the WASM build draws into the
//! page's `#canvas` element.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    use screen_arcade::{BlocksGame, BlocksTuning, Settings};

    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

    let settings = Settings::load();
    screen_arcade::platform::web::run(BlocksGame::new(BlocksTuning::default()), &settings)
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main
}

#[cfg(not(target_arch = "wasm32"))]
fn window_conf() -> macroquad::window::Conf {
    use std::path::Path;

    use screen_arcade::{BlocksTuning, consts::BLOCKS_TITLE, tuning};

    // Window matches the tuned playfield
    let tuning: BlocksTuning = tuning::load_or_default(Path::new(BlocksTuning::FILE_NAME));
    let (width, height) = tuning.window_size();
    macroquad::window::Conf {
        window_title: BLOCKS_TITLE.to_string(),
        window_width: width,
        window_height: height,
        window_resizable: false,
        ..Default::default()
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[macroquad::main(window_conf)]
async fn main() {
    use std::path::Path;

    use screen_arcade::{BlocksGame, BlocksTuning, Settings, platform::native, tuning};

    env_logger::init();
    log::info!("Blocks (native) starting...");

    let settings = Settings::load();
    let tuning: BlocksTuning = tuning::load_or_default(Path::new(BlocksTuning::FILE_NAME));
    log::info!(
        "{} bricks in {} rows, {} lives",
        tuning.brick_rows * tuning.bricks_per_row,
        tuning.brick_rows,
        tuning.lives
    );

    native::run(BlocksGame::new(tuning), &settings).await;
}
