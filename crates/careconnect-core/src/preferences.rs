//! Presentation preferences persisted alongside the session.
//!
//! Language and theme survive logout; they are stored separately from the
//! session keys.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::Result;

/// UI language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Hi,
}

impl Language {
    pub fn toggled(self) -> Self {
        match self {
            Language::En => Language::Hi,
            Language::Hi => Language::En,
        }
    }

    /// Label of the language a toggle would switch to.
    pub fn toggle_label(self) -> &'static str {
        match self {
            Language::En => "हिंदी",
            Language::Hi => "English",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub language: Language,
    pub theme: Theme,
}

/// Persistence for [`Preferences`].
pub trait PreferenceRepository: Send + Sync {
    fn load(&self) -> Result<Preferences>;

    fn save(&self, preferences: &Preferences) -> Result<()>;

    /// Flips the language and persists it, returning the new value.
    fn toggle_language(&self) -> Result<Language> {
        let mut prefs = self.load()?;
        prefs.language = prefs.language.toggled();
        self.save(&prefs)?;
        Ok(prefs.language)
    }

    /// Flips the theme and persists it, returning the new value.
    fn toggle_theme(&self) -> Result<Theme> {
        let mut prefs = self.load()?;
        prefs.theme = prefs.theme.toggled();
        self.save(&prefs)?;
        Ok(prefs.theme)
    }
}
