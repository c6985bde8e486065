//! Site languages and per-language text values.
//!
//! Every translatable field is stored as a `Localized` value with one slot per
//! language. Japanese is the authoring (source) language; the others are
//! filled by the translation pipeline or by hand.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    Ja,
    En,
    Zh,
    Ko,
}

impl Lang {
    pub const ALL: [Lang; 4] = [Lang::Ja, Lang::En, Lang::Zh, Lang::Ko];
    pub const SOURCE: Lang = Lang::Ja;

    /// Every language except the source, in display order.
    pub fn targets() -> impl Iterator<Item = Lang> {
        Self::ALL.into_iter().filter(|l| *l != Self::SOURCE)
    }

    pub fn code(self) -> &'static str {
        match self {
            Lang::Ja => "ja",
            Lang::En => "en",
            Lang::Zh => "zh",
            Lang::Ko => "ko",
        }
    }

    /// English name, used in translation prompts.
    pub fn english_name(self) -> &'static str {
        match self {
            Lang::Ja => "Japanese",
            Lang::En => "English",
            Lang::Zh => "Simplified Chinese",
            Lang::Ko => "Korean",
        }
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Lang {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ja" => Ok(Lang::Ja),
            "en" => Ok(Lang::En),
            "zh" => Ok(Lang::Zh),
            "ko" => Ok(Lang::Ko),
            other => Err(AppError::Validation(format!(
                "Unsupported language '{other}' (expected ja, en, zh or ko)"
            ))),
        }
    }
}

/// One string per language. An empty string means the translation is missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Localized {
    pub ja: String,
    pub en: String,
    pub zh: String,
    pub ko: String,
}

impl Localized {
    pub fn source(text: impl Into<String>) -> Self {
        let mut value = Self::default();
        value.set(Lang::SOURCE, text);
        value
    }

    pub fn get(&self, lang: Lang) -> &str {
        match lang {
            Lang::Ja => &self.ja,
            Lang::En => &self.en,
            Lang::Zh => &self.zh,
            Lang::Ko => &self.ko,
        }
    }

    pub fn set(&mut self, lang: Lang, text: impl Into<String>) {
        let slot = match lang {
            Lang::Ja => &mut self.ja,
            Lang::En => &mut self.en,
            Lang::Zh => &mut self.zh,
            Lang::Ko => &mut self.ko,
        };
        *slot = text.into();
    }

    pub fn is_missing(&self, lang: Lang) -> bool {
        self.get(lang).trim().is_empty()
    }

    /// The value for `lang`, or the source-language value when `lang` is missing.
    pub fn resolve(&self, lang: Lang) -> &str {
        if self.is_missing(lang) {
            self.get(Lang::SOURCE)
        } else {
            self.get(lang)
        }
    }

    /// Non-empty values in language order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        Lang::ALL
            .into_iter()
            .map(|l| self.get(l))
            .filter(|s| !s.trim().is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.values().next().is_none()
    }
}
