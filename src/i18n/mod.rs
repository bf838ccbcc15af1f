//! Localized labels and deterministic locale fallback
//!
//! Entities and fields carry display labels keyed by locale tag. Lookup is
//! deterministic and side-effect-free:
//! 1. exact locale tag match
//! 2. any label whose locale shares the language subtag (first in tag order)
//! 3. the label set's designated default locale
//! 4. failure
//!
//! A label set that contains its default locale is total under `resolve`.
//! That invariant is enforced by the schema validator, not at lookup time,
//! so an unvalidated set can still be probed for diagnostics.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Result type for label resolution
pub type I18nResult<T> = Result<T, I18nError>;

/// Label resolution errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum I18nError {
    /// Locale tag is empty or structurally invalid
    #[error("malformed locale tag '{tag}'")]
    MalformedLocale { tag: String },

    /// No label matched the requested locale, its language, or the default
    #[error("no label for locale '{requested}' and no default-locale entry")]
    MissingLabel { requested: String },
}

/// A validated locale tag: `language` or `language-REGION`.
///
/// The language subtag is folded to lowercase and the region to uppercase,
/// so tags compare the way backends and HTTP stacks fold them.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locale {
    tag: String,
}

impl Locale {
    /// Parse a locale tag.
    pub fn parse(tag: &str) -> I18nResult<Self> {
        let mut parts = tag.split('-');
        let language = parts.next().unwrap_or("");
        if language.is_empty() || !language.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(I18nError::MalformedLocale { tag: tag.into() });
        }
        let mut canonical = language.to_ascii_lowercase();
        if let Some(region) = parts.next() {
            if region.is_empty() || !region.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(I18nError::MalformedLocale { tag: tag.into() });
            }
            canonical.push('-');
            canonical.push_str(&region.to_ascii_uppercase());
        }
        if parts.next().is_some() {
            return Err(I18nError::MalformedLocale { tag: tag.into() });
        }
        Ok(Self { tag: canonical })
    }

    /// The full canonical tag.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The language subtag only.
    pub fn language(&self) -> &str {
        self.tag.split('-').next().unwrap_or(&self.tag)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag)
    }
}

impl TryFrom<String> for Locale {
    type Error = I18nError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.tag
    }
}

/// A set of localized labels with a designated default locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelSet {
    default_locale: Locale,
    labels: BTreeMap<Locale, String>,
}

impl LabelSet {
    /// Create a label set. The default-locale entry is not required here;
    /// completeness is a validation pass so that all gaps in a schema are
    /// reported together.
    pub fn new(default_locale: Locale, labels: BTreeMap<Locale, String>) -> Self {
        Self {
            default_locale,
            labels,
        }
    }

    /// The designated default locale.
    pub fn default_locale(&self) -> &Locale {
        &self.default_locale
    }

    /// Returns true when the set carries an entry for its default locale.
    pub fn has_default(&self) -> bool {
        self.labels.contains_key(&self.default_locale)
    }

    /// Returns true when the set has no entries at all.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Resolve a label for the requested locale with deterministic fallback.
    pub fn resolve(&self, requested: &Locale) -> I18nResult<&str> {
        if let Some(label) = self.labels.get(requested) {
            return Ok(label);
        }
        // Language-only match: BTreeMap order makes the pick deterministic.
        if let Some((_, label)) = self
            .labels
            .iter()
            .find(|(locale, _)| locale.language() == requested.language())
        {
            return Ok(label);
        }
        if let Some(label) = self.labels.get(&self.default_locale) {
            return Ok(label);
        }
        Err(I18nError::MissingLabel {
            requested: requested.tag().to_string(),
        })
    }
}
