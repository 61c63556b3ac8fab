use serde::{Deserialize, Serialize};

/// A concrete color scheme applied to the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// What the visitor (or the site owner) asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Light,
    Dark,
    System,
}

impl ThemePreference {
    /// Anything other than an explicit "light" or "dark" means "follow the system".
    pub fn from_stored(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("light") => ThemePreference::Light,
            Some("dark") => ThemePreference::Dark,
            _ => ThemePreference::System,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ThemePreference::Light => "light",
            ThemePreference::Dark => "dark",
            ThemePreference::System => "system",
        }
    }

    pub fn resolve(self, system_prefers_dark: bool) -> Theme {
        match self {
            ThemePreference::Light => Theme::Light,
            ThemePreference::Dark => Theme::Dark,
            ThemePreference::System if system_prefers_dark => Theme::Dark,
            ThemePreference::System => Theme::Light,
        }
    }
}

/// Process-wide theme defaults. Built once at startup and shared read-only
/// through the application state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThemeConfig {
    pub preference: ThemePreference,
    pub system_prefers_dark: bool,
}

impl ThemeConfig {
    pub fn new(preference: ThemePreference, system_prefers_dark: bool) -> Self {
        Self {
            preference,
            system_prefers_dark,
        }
    }

    /// Theme used for the first server-rendered paint.
    pub fn default_theme(&self) -> Theme {
        self.preference.resolve(self.system_prefers_dark)
    }

    /// A visitor's stored choice overrides the configured default.
    pub fn theme_for(&self, stored: Option<&str>) -> Theme {
        match ThemePreference::from_stored(stored) {
            ThemePreference::System => self.default_theme(),
            explicit => explicit.resolve(self.system_prefers_dark),
        }
    }
}
