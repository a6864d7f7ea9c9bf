use chrono::Local;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn from_system(prefers_dark: bool) -> Self {
        if prefers_dark { Theme::Dark } else { Theme::Light }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Accessible label for the toggle button: it names the theme it switches to.
    pub fn toggle_label(self) -> &'static str {
        match self {
            Theme::Light => "Switch to dark mode",
            Theme::Dark => "Switch to light mode",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("theme must be 'light' or 'dark', got '{other}'")),
        }
    }
}

/// An explicit user choice. With no stored theme the OS preference applies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemePreference {
    pub theme: Option<Theme>,
    pub updated_at: Option<String>,
}

impl ThemePreference {
    pub fn resolve(&self, prefers_dark: bool) -> Theme {
        resolve_theme(self.theme, prefers_dark)
    }

    pub fn has_override(&self) -> bool {
        self.theme.is_some()
    }

    pub fn set(&mut self, theme: Theme) {
        self.theme = Some(theme);
        self.updated_at = Some(Local::now().to_rfc3339());
    }

    pub fn clear(&mut self) {
        self.theme = None;
        self.updated_at = Some(Local::now().to_rfc3339());
    }

    /// Flips `current` and stores the result as an explicit override.
    pub fn toggle(&mut self, current: Theme) -> Theme {
        let next = current.toggled();
        self.set(next);
        next
    }

    /// Follows an OS preference change, unless the user has chosen a theme.
    pub fn sync_with_system(&self, prefers_dark: bool) -> Option<Theme> {
        if self.has_override() {
            None
        } else {
            Some(Theme::from_system(prefers_dark))
        }
    }
}

pub fn resolve_theme(saved: Option<Theme>, prefers_dark: bool) -> Theme {
    saved.unwrap_or_else(|| Theme::from_system(prefers_dark))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saved_theme_wins_over_system() {
        assert_eq!(resolve_theme(Some(Theme::Light), true), Theme::Light);
        assert_eq!(resolve_theme(None, true), Theme::Dark);
        assert_eq!(resolve_theme(None, false), Theme::Light);
    }

    #[test]
    fn toggle_stores_override() {
        let mut pref = ThemePreference::default();
        let next = pref.toggle(Theme::Light);
        assert_eq!(next, Theme::Dark);
        assert_eq!(pref.theme, Some(Theme::Dark));
        assert!(pref.updated_at.is_some());
        assert_eq!(pref.toggle(next), Theme::Light);
    }

    #[test]
    fn system_changes_apply_only_without_override() {
        let mut pref = ThemePreference::default();
        assert_eq!(pref.sync_with_system(true), Some(Theme::Dark));
        pref.set(Theme::Light);
        assert_eq!(pref.sync_with_system(true), None);
        pref.clear();
        assert_eq!(pref.sync_with_system(false), Some(Theme::Light));
    }

    #[test]
    fn parses_theme_names() {
        assert_eq!(" Dark ".parse::<Theme>(), Ok(Theme::Dark));
        assert_eq!("light".parse::<Theme>(), Ok(Theme::Light));
        assert!("sepia".parse::<Theme>().is_err());
    }
}
