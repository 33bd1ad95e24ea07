mod app;
mod page;
mod platform;
mod theme;

pub use app::PortfolioApp;

use folio_core::SiteConfig;

/// Bundled site content with contact details taken from the environment
/// where there is one.
pub fn load_config() -> anyhow::Result<SiteConfig> {
    let config = SiteConfig::builtin()?;
    #[cfg(not(target_arch = "wasm32"))]
    let config = config.with_contact_env(|key| std::env::var(key).ok());
    Ok(config)
}

// WASM entry point
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("folio: logger already installed: {e}").into());
    }

    let config = load_config().map_err(|e| JsValue::from_str(&e.to_string()))?;
    let canvas = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?
        .get_element_by_id("folio_canvas")
        .ok_or_else(|| JsValue::from_str("no canvas element with id 'folio_canvas'"))?
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .map_err(|_| JsValue::from_str("element is not a canvas"))?;

    let web_options = eframe::WebOptions::default();
    wasm_bindgen_futures::spawn_local(async move {
        let start_result = eframe::WebRunner::new()
            .start(
                canvas,
                web_options,
                Box::new(|cc| Ok(Box::new(PortfolioApp::new(cc, config)))),
            )
            .await;
        if let Err(e) = start_result {
            log::error!("failed to start eframe: {e:?}");
        }
    });
    Ok(())
}
