use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The applied theme. Always binary, whatever the preference source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn from_dark(is_dark: bool) -> Self {
        if is_dark { Self::Dark } else { Self::Light }
    }

    pub fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// The literal persisted in the preference store.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Label for the toggle control, describing what a click will do.
    pub fn toggle_label(self) -> &'static str {
        match self {
            Self::Light => "Switch to dark mode",
            Self::Dark => "Switch to light mode",
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = ();

    /// Only the exact stored literals parse; anything else is not a preference.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            _ => Err(()),
        }
    }
}

/// Semantic color tokens resolved by each renderer's palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeToken {
    Background,
    Paper,
    Divider,

    TextPrimary,
    TextSecondary,

    Primary,
    PrimaryLight,
    PrimaryDark,
    Secondary,

    // Navigation bar
    NavBackground,
    NavItemActive,
    NavItemActiveText,
    NavItemText,

    // Journey timeline
    TimelineCurrent,
    TimelineRecent,
    TimelinePast,

    // Contact notices
    NoticeSuccess,
    NoticeError,
    FieldError,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_only_stored_literals() {
        assert_eq!("dark".parse::<ThemeMode>(), Ok(ThemeMode::Dark));
        assert_eq!("light".parse::<ThemeMode>(), Ok(ThemeMode::Light));
        assert!("Dark".parse::<ThemeMode>().is_err());
        assert!("".parse::<ThemeMode>().is_err());
    }

    #[test]
    fn toggle_label_names_the_other_mode() {
        assert_eq!(ThemeMode::Dark.toggle_label(), "Switch to light mode");
        assert_eq!(ThemeMode::Light.toggled(), ThemeMode::Dark);
    }
}
