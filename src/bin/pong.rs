//! Pong entry point
//!
//! Native builds open a macroquad window; the WASM build draws into the
//! page's `#canvas` element.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    use screen_arcade::{PongGame, PongTuning, Settings};

    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

    let settings = Settings::load();
    screen_arcade::platform::web::run(PongGame::new(PongTuning::default()), &settings)
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main
}

#[cfg(not(target_arch = "wasm32"))]
fn window_conf() -> macroquad::window::Conf {
    use std::path::Path;

    use screen_arcade::{PongTuning, consts::PONG_TITLE, tuning};

    // Window matches the tuned playfield
    let tuning: PongTuning = tuning::load_or_default(Path::new(PongTuning::FILE_NAME));
    let (width, height) = tuning.window_size();
    macroquad::window::Conf {
        window_title: PONG_TITLE.to_string(),
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

    use screen_arcade::{PongGame, PongTuning, Settings, platform::native, tuning};

    env_logger::init();
    log::info!("Pong (native) starting...");

    let settings = Settings::load();
    let tuning: PongTuning = tuning::load_or_default(Path::new(PongTuning::FILE_NAME));
    log::info!("Enemy vision range starts at {}", tuning.vision_range);

    native::run(PongGame::new(tuning), &settings).await;
}
