//! Main application entry point (native).

#[cfg(feature = "native")]
fn main() {
    env_logger::init();
    log::info!("Starting Scribble");
    scribble_app::ShortcutRegistry::log_all();

    if let Err(e) = scribble_app::App::new().run() {
        log::error!("Event loop error: {e}");
        std::process::exit(1);
    }
}

#[cfg(not(feature = "native"))]
fn main() {
    eprintln!("Native feature not enabled. Use `cargo run --features native`");
}
