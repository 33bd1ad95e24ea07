#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = folio_ui::load_config()?;
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!("{} · {}", config.name, config.title))
            .with_inner_size([1200.0, 860.0])
            .with_min_inner_size([360.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "folio",
        options,
        Box::new(|cc| Ok(Box::new(folio_ui::PortfolioApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}

// The web build starts from `folio_ui::start`.
#[cfg(target_arch = "wasm32")]
fn main() {}
