//! # User Preferences
//!
//! Persisted, per-user configuration: display theme and advisory generation
//! settings. Nothing here affects formula results.
//!
//! ## Structure
//!
//! ```text
//! Preferences
//! ├── version: schema version of the preferences file
//! ├── theme: Theme (light, dark, midnight, high-contrast)
//! ├── advisory: AdvisorySettings (model, temperature, token limits)
//! └── modified: last change timestamp
//! ```
//!
//! ## Example
//!
//! ```rust
//! use medcalc_core::settings::{Preferences, Theme};
//!
//! let mut prefs = Preferences::default();
//! prefs.set_theme("midnight".parse().unwrap());
//! assert_eq!(prefs.theme, Theme::Midnight);
//!
//! let json = serde_json::to_string_pretty(&prefs).unwrap();
//! assert!(json.contains("\"midnight\""));
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::advisory::AdvisorySettings;
use crate::errors::CalcError;

/// Current schema version for preferences files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Color theme of the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Midnight,
    HighContrast,
}

impl Theme {
    pub const ALL: [Theme; 4] = [Theme::Light, Theme::Dark, Theme::Midnight, Theme::HighContrast];

    /// Stored/parsed name (e.g., "high-contrast")
    pub fn name(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::Midnight => "midnight",
            Theme::HighContrast => "high-contrast",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Theme {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        Theme::ALL
            .into_iter()
            .find(|t| t.name() == wanted)
            .ok_or_else(|| CalcError::unknown_theme(s))
    }
}

/// Everything persisted in the preferences file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    /// Schema version (e.g., "0.1.0")
    pub version: String,

    pub theme: Theme,

    /// Generation settings for the clinical assistant
    #[serde(default)]
    pub advisory: AdvisorySettings,

    /// When the preferences were last changed
    pub modified: DateTime<Utc>,
}

impl Default for Preferences {
    fn default() -> Self {
        Preferences {
            version: SCHEMA_VERSION.to_string(),
            theme: Theme::default(),
            advisory: AdvisorySettings::default(),
            modified: Utc::now(),
        }
    }
}

impl Preferences {
    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.touch();
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.modified = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_parse() {
        assert_eq!("dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert_eq!("High-Contrast".parse::<Theme>().unwrap(), Theme::HighContrast);
        assert_eq!("high_contrast".parse::<Theme>().unwrap(), Theme::HighContrast);
        assert_eq!(
            "sepia".parse::<Theme>().unwrap_err(),
            CalcError::unknown_theme("sepia")
        );
    }

    #[test]
    fn test_theme_names_roundtrip() {
        for theme in Theme::ALL {
            assert_eq!(theme.to_string().parse::<Theme>().unwrap(), theme);
            let json = serde_json::to_string(&theme).unwrap();
            assert_eq!(json, format!("\"{}\"", theme.name()));
        }
    }

    #[test]
    fn test_default_preferences() {
        let prefs = Preferences::default();
        assert_eq!(prefs.version, SCHEMA_VERSION);
        assert_eq!(prefs.theme, Theme::Light);
        assert_eq!(prefs.advisory.max_output_tokens, 500);
    }

    #[test]
    fn test_set_theme_touches() {
        let mut prefs = Preferences::default();
        let before = prefs.modified;
        prefs.set_theme(Theme::Dark);
        assert_eq!(prefs.theme, Theme::Dark);
        assert!(prefs.modified >= before);
    }

    #[test]
    fn test_missing_advisory_section_uses_defaults() {
        let json = r#"{"version":"0.1.0","theme":"dark","modified":"2026-01-01T00:00:00Z"}"#;
        let prefs: Preferences = serde_json::from_str(json).unwrap();
        assert_eq!(prefs.theme, Theme::Dark);
        assert_eq!(prefs.advisory, AdvisorySettings::default());
    }
}
