//! Page logic for folio, independent of any renderer.
//!
//! Hosts (the egui app, the DOM bridge, the terminal preview) own one of each
//! controller and feed them browser- or toolkit-specific signals through the
//! capability traits defined here.

pub mod capability;
pub mod config;
pub mod contact;
pub mod nav;
pub mod scroll;
pub mod sections;
pub mod theme;
pub mod timeline;

pub use capability::CapabilityError;
pub use config::{ConfigError, SiteConfig};
pub use sections::{ActiveSection, ScrollSpy, SectionTracker};
pub use scroll::{ScrollHost, SmoothScrollNavigator};
pub use theme::{PreferenceStore, ThemeController};
