use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Section the page starts on before any visibility report arrives.
pub const HOME_SECTION: &str = "home";

/// Fraction of a section's area that must be on screen to count as in view.
pub const DEFAULT_THRESHOLD: f64 = 0.3;

/// The hero fills the first screen, so it asks for half of itself.
pub const HERO_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SectionIdError {
    #[error("section id must not be empty")]
    Empty,
    #[error("section id {0:?} contains whitespace")]
    Whitespace(String),
}

/// Identifier of a scroll-addressable page region.
///
/// Backed by `Arc<str>`: visibility callbacks fire on every scroll frame and
/// each report clones the id, so clones must stay a refcount bump.
#[derive(Debug, Clone, Eq, Hash)]
pub struct SectionId(Arc<str>);

impl SectionId {
    /// Build an id, rejecting empty strings and ids that could not be used as
    /// a DOM `id` attribute.
    pub fn new(id: &str) -> Result<Self, SectionIdError> {
        if id.is_empty() {
            return Err(SectionIdError::Empty);
        }
        if id.chars().any(char::is_whitespace) {
            return Err(SectionIdError::Whitespace(id.to_string()));
        }
        Ok(Self(Arc::from(id)))
    }

    /// The initial active section.
    pub fn home() -> Self {
        Self(Arc::from(HOME_SECTION))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SectionId {
    fn default() -> Self {
        Self::home()
    }
}

impl PartialEq for SectionId {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || *self.0 == *other.0
    }
}

impl PartialEq<str> for SectionId {
    #[inline]
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for SectionId {
    #[inline]
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl AsRef<str> for SectionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for SectionId {
    type Error = SectionIdError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl Serialize for SectionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for SectionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::new(&s).map_err(serde::de::Error::custom)
    }
}

/// A registered section: its id plus the visibility threshold it reports at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionSpec {
    pub id: SectionId,
    /// In `(0, 1]`. Out-of-range values are clamped by [`SectionSpec::with_threshold`].
    pub threshold: f64,
}

impl SectionSpec {
    pub fn new(id: SectionId) -> Self {
        Self {
            id,
            threshold: DEFAULT_THRESHOLD,
        }
    }

    pub fn with_threshold(id: SectionId, threshold: f64) -> Self {
        let threshold = if threshold.is_finite() && threshold > 0.0 {
            threshold.min(1.0)
        } else {
            DEFAULT_THRESHOLD
        };
        Self { id, threshold }
    }

    /// Whether a visible fraction counts as "in view" for this section.
    pub fn is_in_view(&self, visible_fraction: f64) -> bool {
        visible_fraction >= self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_and_spaced_ids() {
        assert_eq!(SectionId::new(""), Err(SectionIdError::Empty));
        assert!(matches!(
            SectionId::new("my story"),
            Err(SectionIdError::Whitespace(_))
        ));
        assert_eq!(SectionId::new("story").unwrap(), "story");
    }

    #[test]
    fn default_is_home() {
        assert_eq!(SectionId::default(), HOME_SECTION);
    }

    #[test]
    fn threshold_is_clamped_into_range() {
        let id = SectionId::new("skills").unwrap();
        assert_eq!(SectionSpec::with_threshold(id.clone(), 2.0).threshold, 1.0);
        assert_eq!(
            SectionSpec::with_threshold(id.clone(), 0.0).threshold,
            DEFAULT_THRESHOLD
        );
        assert_eq!(
            SectionSpec::with_threshold(id, f64::NAN).threshold,
            DEFAULT_THRESHOLD
        );
    }

    #[test]
    fn in_view_is_inclusive_at_threshold() {
        let spec = SectionSpec::with_threshold(SectionId::home(), HERO_THRESHOLD);
        assert!(spec.is_in_view(0.5));
        assert!(!spec.is_in_view(0.499));
    }

    #[test]
    fn serde_rejects_empty_id() {
        let err = serde_json::from_str::<SectionId>("\"\"");
        assert!(err.is_err());
        let ok: SectionId = serde_json::from_str("\"journey\"").unwrap();
        assert_eq!(ok, "journey");
    }
}
