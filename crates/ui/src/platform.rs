//! Platform capabilities: where the theme preference lives and how the OS
//! color scheme is read.

use folio_core::CapabilityError;
use folio_core::PreferenceStore;
use folio_core::theme::ColorSchemeSource;
#[cfg(not(target_arch = "wasm32"))]
use folio_core::theme::{JsonFileStore, MemoryStore};

/// The OS color scheme as eframe reports it (`prefers-color-scheme` on the
/// web, the window system's setting natively).
pub struct SystemTheme<'a>(pub &'a egui::Context);

impl ColorSchemeSource for SystemTheme<'_> {
    fn prefers_dark(&self) -> Result<bool, CapabilityError> {
        self.0
            .system_theme()
            .map(|theme| theme == egui::Theme::Dark)
            .ok_or(CapabilityError::Unavailable("system color scheme"))
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn preference_store() -> Box<dyn PreferenceStore> {
    match dirs::config_dir() {
        Some(dir) => {
            let store = JsonFileStore::in_config_dir(&dir);
            log::debug!("theme preference file: {}", store.path().display());
            Box::new(store)
        }
        None => {
            log::warn!("no config directory, theme preference will not persist");
            Box::new(MemoryStore::new())
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub fn preference_store() -> Box<dyn PreferenceStore> {
    Box::new(folio_core::theme::LocalStorage)
}
