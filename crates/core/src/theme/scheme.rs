use crate::capability::CapabilityError;

/// OS-level color-scheme preference (`prefers-color-scheme`, desktop setting).
pub trait ColorSchemeSource {
    fn prefers_dark(&self) -> Result<bool, CapabilityError>;
}

/// A source that always answers the same. Hosts with no way to ask the OS
/// use `FixedScheme(false)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedScheme(pub bool);

impl ColorSchemeSource for FixedScheme {
    fn prefers_dark(&self) -> Result<bool, CapabilityError> {
        Ok(self.0)
    }
}

/// Turns a pollable source into change events for hosts without a native
/// change notification.
#[derive(Debug, Clone, Default)]
pub struct SchemeWatcher {
    last: Option<bool>,
}

impl SchemeWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a known value so the first poll only reports real changes.
    pub fn seeded(prefers_dark: bool) -> Self {
        Self {
            last: Some(prefers_dark),
        }
    }

    /// `Some(prefers_dark)` when the OS value differs from the previous poll.
    /// Query failures are not changes.
    pub fn poll(&mut self, source: &dyn ColorSchemeSource) -> Option<bool> {
        let current = source.prefers_dark().ok()?;
        if self.last == Some(current) {
            return None;
        }
        self.last = Some(current);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    impl ColorSchemeSource for Broken {
        fn prefers_dark(&self) -> Result<bool, CapabilityError> {
            Err(CapabilityError::Unavailable("matchMedia"))
        }
    }

    #[test]
    fn watcher_reports_only_changes() {
        let mut watcher = SchemeWatcher::seeded(false);
        assert_eq!(watcher.poll(&FixedScheme(false)), None);
        assert_eq!(watcher.poll(&FixedScheme(true)), Some(true));
        assert_eq!(watcher.poll(&FixedScheme(true)), None);
        assert_eq!(watcher.poll(&Broken), None);
        assert_eq!(watcher.poll(&FixedScheme(false)), Some(false));
    }
}
