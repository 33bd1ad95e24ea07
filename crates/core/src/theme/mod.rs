//! Theme preference resolution and persistence.
//!
//! Three inputs feed the applied theme: an explicit choice persisted in a
//! [`PreferenceStore`], the OS color scheme read at startup, and live OS
//! change events. An explicit choice locks out OS events for the session.

mod scheme;
mod store;

use folio_protocol::ThemeMode;

pub use scheme::{ColorSchemeSource, FixedScheme, SchemeWatcher};
pub use store::{JsonFileStore, MemoryStore, PreferenceStore, StoreError, THEME_KEY};
pub use store::LocalStorage;

/// Where the current theme came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceOrigin {
    /// The user picked it; OS changes are ignored.
    Explicit,
    /// Derived from the OS; follows OS changes.
    Implicit,
}

/// Resolved theme state. Construction performs the startup read, so an
/// unresolved controller cannot be observed.
#[derive(Debug)]
pub struct ThemeController<S> {
    store: S,
    mode: ThemeMode,
    origin: PreferenceOrigin,
    /// Cleared after the first storage failure; the rest of the session is
    /// in-memory only.
    storage_ok: bool,
}

impl<S: PreferenceStore> ThemeController<S> {
    /// Startup resolution: a stored `"light"`/`"dark"` wins, otherwise ask
    /// the OS once, otherwise light.
    pub fn resolve(store: S, scheme: &dyn ColorSchemeSource) -> Self {
        let mut storage_ok = true;
        let stored = match store.get(THEME_KEY) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("theme preference unreadable, using memory only: {e}");
                storage_ok = false;
                None
            }
        };

        let explicit = stored.as_deref().and_then(|value| match value.parse::<ThemeMode>() {
            Ok(mode) => Some(mode),
            Err(()) => {
                log::warn!("ignoring unrecognised stored theme {value:?}");
                None
            }
        });

        let (mode, origin) = match explicit {
            Some(mode) => (mode, PreferenceOrigin::Explicit),
            None => (system_mode(scheme), PreferenceOrigin::Implicit),
        };
        log::debug!("resolved theme {mode} ({origin:?})");

        Self {
            store,
            mode,
            origin,
            storage_ok,
        }
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    pub fn is_dark(&self) -> bool {
        self.mode.is_dark()
    }

    pub fn origin(&self) -> PreferenceOrigin {
        self.origin
    }

    pub fn is_explicit(&self) -> bool {
        self.origin == PreferenceOrigin::Explicit
    }

    /// Whether writes still reach durable storage.
    pub fn is_persistent(&self) -> bool {
        self.storage_ok
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// OS color scheme changed. Applied only while the preference is
    /// implicit. Returns whether the applied theme changed.
    pub fn on_system_change(&mut self, prefers_dark: bool) -> bool {
        if self.is_explicit() {
            log::debug!("ignoring OS scheme change: explicit preference {}", self.mode);
            return false;
        }
        let next = ThemeMode::from_dark(prefers_dark);
        if next == self.mode {
            return false;
        }
        self.mode = next;
        log::debug!("theme follows OS: {next}");
        true
    }

    /// Flip the theme and make it explicit. The new value is written before
    /// the in-memory state changes, so closing the page right after a toggle
    /// never loses it.
    pub fn toggle(&mut self) -> ThemeMode {
        let next = self.mode.toggled();
        self.write(|store| store.set(THEME_KEY, next.as_str()));
        self.mode = next;
        self.origin = PreferenceOrigin::Explicit;
        log::debug!("theme toggled to {next}");
        next
    }

    /// Forget the explicit choice and go back to following the OS.
    pub fn follow_system(&mut self, scheme: &dyn ColorSchemeSource) -> ThemeMode {
        self.write(|store| store.remove(THEME_KEY));
        self.origin = PreferenceOrigin::Implicit;
        self.mode = system_mode(scheme);
        self.mode
    }

    fn write(&mut self, op: impl FnOnce(&mut S) -> Result<(), StoreError>) {
        if !self.storage_ok {
            return;
        }
        if let Err(e) = op(&mut self.store) {
            log::warn!("theme preference not persisted, using memory only: {e}");
            self.storage_ok = false;
        }
    }
}

fn system_mode(scheme: &dyn ColorSchemeSource) -> ThemeMode {
    match scheme.prefers_dark() {
        Ok(dark) => ThemeMode::from_dark(dark),
        Err(e) => {
            log::warn!("OS color scheme unknown, defaulting to light: {e}");
            ThemeMode::Light
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::CapabilityError;

    struct NoScheme;

    impl ColorSchemeSource for NoScheme {
        fn prefers_dark(&self) -> Result<bool, CapabilityError> {
            Err(CapabilityError::Unavailable("matchMedia"))
        }
    }

    /// Storage that throws on every call, like `localStorage` in a
    /// sandboxed iframe.
    struct ThrowingStore;

    impl PreferenceStore for ThrowingStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Unavailable("SecurityError".into()))
        }
        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("SecurityError".into()))
        }
        fn remove(&mut self, _key: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("SecurityError".into()))
        }
    }

    /// Accepts reads, throws on writes.
    #[derive(Default)]
    struct ReadOnlyStore {
        writes: usize,
    }

    impl PreferenceStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Ok(None)
        }
        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
            self.writes += 1;
            Err(StoreError::Unavailable("QuotaExceededError".into()))
        }
        fn remove(&mut self, _key: &str) -> Result<(), StoreError> {
            Ok(())
        }
    }

    fn stored(controller: &ThemeController<MemoryStore>) -> Option<String> {
        controller.store().get(THEME_KEY).unwrap()
    }

    #[test]
    fn stored_dark_is_explicit_and_ignores_os() {
        let mut theme = ThemeController::resolve(
            MemoryStore::with(THEME_KEY, "dark"),
            &FixedScheme(false),
        );
        assert!(theme.is_dark());
        assert!(theme.is_explicit());
        assert!(!theme.on_system_change(false));
        assert!(theme.is_dark());
    }

    #[test]
    fn no_stored_value_follows_os() {
        let mut theme = ThemeController::resolve(MemoryStore::new(), &FixedScheme(true));
        assert!(theme.is_dark());
        assert_eq!(theme.origin(), PreferenceOrigin::Implicit);
        assert!(theme.on_system_change(false));
        assert!(!theme.is_dark());
        // OS-driven changes are not persisted.
        assert_eq!(stored(&theme), None);
    }

    #[test]
    fn unknown_stored_value_is_treated_as_unset() {
        let theme = ThemeController::resolve(
            MemoryStore::with(THEME_KEY, "sepia"),
            &FixedScheme(true),
        );
        assert!(theme.is_dark());
        assert!(!theme.is_explicit());
    }

    #[test]
    fn toggle_persists_every_step() {
        let mut theme = ThemeController::resolve(MemoryStore::new(), &FixedScheme(false));
        let original = theme.is_dark();

        theme.toggle();
        assert_eq!(stored(&theme).as_deref(), Some(theme.mode().as_str()));
        assert!(theme.is_explicit());

        theme.toggle();
        assert_eq!(stored(&theme).as_deref(), Some(theme.mode().as_str()));
        assert_eq!(theme.is_dark(), original);
    }

    #[test]
    fn toggle_locks_out_os_changes() {
        let mut theme = ThemeController::resolve(MemoryStore::new(), &FixedScheme(false));
        theme.toggle();
        assert!(!theme.on_system_change(false));
        assert!(theme.is_dark());
    }

    #[test]
    fn follow_system_clears_explicit_choice() {
        let mut theme = ThemeController::resolve(
            MemoryStore::with(THEME_KEY, "light"),
            &FixedScheme(true),
        );
        assert!(!theme.is_dark());
        assert_eq!(theme.follow_system(&FixedScheme(true)), ThemeMode::Dark);
        assert_eq!(stored(&theme), None);
        assert!(theme.on_system_change(false));
    }

    #[test]
    fn missing_os_query_defaults_to_light() {
        let theme = ThemeController::resolve(MemoryStore::new(), &NoScheme);
        assert_eq!(theme.mode(), ThemeMode::Light);
    }

    #[test]
    fn throwing_storage_degrades_to_memory() {
        let mut theme = ThemeController::resolve(ThrowingStore, &FixedScheme(true));
        assert!(theme.is_dark());
        assert!(!theme.is_persistent());
        assert_eq!(theme.toggle(), ThemeMode::Light);
        assert!(theme.is_explicit());
    }

    #[test]
    fn write_failure_stops_further_writes() {
        let mut theme = ThemeController::resolve(ReadOnlyStore::default(), &FixedScheme(false));
        assert!(theme.is_persistent());
        theme.toggle();
        theme.toggle();
        assert!(!theme.is_persistent());
        assert_eq!(theme.store().writes, 1);
        assert_eq!(theme.mode(), ThemeMode::Light);
    }
}
