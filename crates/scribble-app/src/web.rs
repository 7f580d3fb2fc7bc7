//! WebAssembly entry point and platform-specific code.

use wasm_bindgen::prelude::*;

/// Browser viewport size in physical pixels, falling back to the given
/// logical size.
pub fn viewport_size(fallback_width: u32, fallback_height: u32) -> (u32, u32) {
    let Some(web_window) = web_sys::window() else {
        return (fallback_width, fallback_height);
    };
    let dpr = web_window.device_pixel_ratio();
    let width = web_window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(fallback_width as f64);
    let height = web_window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(fallback_height as f64);
    ((width * dpr) as u32, (height * dpr) as u32)
}

/// Find or create the `<canvas>` the app renders into and stretch it over
/// the page.
pub fn attach_canvas(
    fallback_width: u32,
    fallback_height: u32,
) -> Option<web_sys::HtmlCanvasElement> {
    let document = web_sys::window()?.document()?;

    if let Some(loading) = document.get_element_by_id("loading") {
        loading.remove();
    }

    let canvas = document
        .get_element_by_id("scribble-canvas")
        .and_then(|e| e.dyn_into::<web_sys::HtmlCanvasElement>().ok())
        .or_else(|| {
            let parent = document
                .get_element_by_id("app")
                .map(|e| e.dyn_into::<web_sys::HtmlElement>().ok())
                .unwrap_or_else(|| document.body())?;
            let canvas = document.create_element("canvas").ok()?;
            canvas.set_id("scribble-canvas");
            parent.append_child(&canvas).ok()?;
            canvas.dyn_into::<web_sys::HtmlCanvasElement>().ok()
        })?;

    let (width, height) = viewport_size(fallback_width, fallback_height);
    canvas.set_width(width);
    canvas.set_height(height);
    let style = canvas.style();
    let _ = style.set_property("width", "100%");
    let _ = style.set_property("height", "100%");
    let _ = style.set_property("display", "block");
    let _ = style.set_property("position", "fixed");
    let _ = style.set_property("top", "0");
    let _ = style.set_property("left", "0");

    log::info!("Canvas created: {}x{} physical pixels", width, height);
    Some(canvas)
}

/// Initialize and run the WASM application.
#[wasm_bindgen(start)]
pub fn run_wasm() {
    // Set up panic hook for better error messages
    console_error_panic_hook::set_once();

    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }

    log::info!("Starting Scribble (WASM)");
    crate::ShortcutRegistry::log_all();

    if let Err(e) = crate::App::new().run() {
        log::error!("Event loop error: {e}");
    }
}
