use thiserror::Error;

/// A host capability (observer API, storage, media query) is missing or threw.
///
/// Never surfaced to the user: every caller turns this into a safe default.
#[derive(Debug, Error)]
pub enum CapabilityError {
    #[error("{0} is not available in this environment")]
    Unavailable(&'static str),
    #[error("{capability} failed: {reason}")]
    Failed {
        capability: &'static str,
        reason: String,
    },
}

impl CapabilityError {
    pub fn failed(capability: &'static str, reason: impl Into<String>) -> Self {
        Self::Failed {
            capability,
            reason: reason.into(),
        }
    }
}
