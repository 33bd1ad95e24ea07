pub mod section;
pub mod theme;
pub mod types;

pub use section::{
    DEFAULT_THRESHOLD, HERO_THRESHOLD, HOME_SECTION, SectionId, SectionIdError, SectionSpec,
};
pub use theme::{ThemeMode, ThemeToken};
pub use types::{Rect, ScrollBehavior, ScrollTarget, Severity};
