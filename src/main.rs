//! Flick Pong entry point
//!
//! Sets up logging, reads settings and runs the native game loop.

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Flick Pong (native) starting...");

    let settings = flick_pong::Settings::load();
    log::debug!("{:?}", settings);

    flick_pong::platform::run(settings)
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No browser driver; the library still builds for wasm32
}
