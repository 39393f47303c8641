//! Accessibility label derivation.
//!
//! A node's label is the first non-blank candidate among its explicit label,
//! its visible content text and its placeholder text. Strings are expected to
//! be localized already; derivation only trims surrounding whitespace.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A BCP 47 language tag identifying the language labels were supplied in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locale(String);

impl Locale {
    /// Create a locale from a language tag such as `"en"` or `"fr-CA"`.
    ///
    /// Underscores are normalized to hyphens; a blank tag becomes `"und"`.
    pub fn new(tag: impl AsRef<str>) -> Self {
        let tag = tag.as_ref().trim();
        if tag.is_empty() {
            return Self::undetermined();
        }
        Self(tag.replace('_', "-"))
    }

    /// The undetermined locale, `"und"`.
    pub fn undetermined() -> Self {
        Self("und".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The primary language subtag, e.g. `"fr"` for `"fr-CA"`.
    pub fn language(&self) -> &str {
        self.0.split('-').next().unwrap_or(&self.0)
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::undetermined()
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a derived label came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelSource {
    Explicit,
    Content,
    Placeholder,
    None,
}

/// The label derived for one node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DerivedLabel {
    /// Trimmed label text, or `None` when nothing usable was supplied.
    pub text: Option<String>,
    pub source: LabelSource,
    /// Locale the candidate strings were supplied in.
    pub locale: Locale,
}

impl DerivedLabel {
    /// A label with no text.
    pub fn none(locale: Locale) -> Self {
        Self {
            text: None,
            source: LabelSource::None,
            locale,
        }
    }

    /// Returns `true` if a label was found.
    pub fn is_present(&self) -> bool {
        self.text.is_some()
    }

    pub fn as_deref(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

/// Derive a label from the node's candidate strings.
///
/// Priority: `explicit`, then `content`, then `placeholder`. A candidate
/// that is blank after trimming is skipped. Never fails; absence of any
/// usable text yields [`LabelSource::None`].
///
/// ```
/// use horizon_lattice_compliance::{LabelSource, Locale, derive_label};
///
/// let label = derive_label(None, Some("  Sign in "), Some("Email"), &Locale::new("en"));
/// assert_eq!(label.text.as_deref(), Some("Sign in"));
/// assert_eq!(label.source, LabelSource::Content);
/// ```
pub fn derive_label(
    explicit: Option<&str>,
    content: Option<&str>,
    placeholder: Option<&str>,
    locale: &Locale,
) -> DerivedLabel {
    let candidates = [
        (explicit, LabelSource::Explicit),
        (content, LabelSource::Content),
        (placeholder, LabelSource::Placeholder),
    ];

    candidates
        .into_iter()
        .find_map(|(text, source)| {
            let text = text?.trim();
            (!text.is_empty()).then(|| DerivedLabel {
                text: Some(text.to_string()),
                source,
                locale: locale.clone(),
            })
        })
        .unwrap_or_else(|| DerivedLabel::none(locale.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn en() -> Locale {
        Locale::new("en")
    }

    #[test]
    fn test_priority() {
        let label = derive_label(Some("A"), Some("B"), Some("C"), &en());
        assert_eq!(label.as_deref(), Some("A"));
        assert_eq!(label.source, LabelSource::Explicit);

        let label = derive_label(None, Some("B"), Some("C"), &en());
        assert_eq!(label.as_deref(), Some("B"));
        assert_eq!(label.source, LabelSource::Content);

        let label = derive_label(None, None, Some("C"), &en());
        assert_eq!(label.as_deref(), Some("C"));
        assert_eq!(label.source, LabelSource::Placeholder);

        let label = derive_label(None, None, None, &en());
        assert_eq!(label.text, None);
        assert_eq!(label.source, LabelSource::None);
        assert!(!label.is_present());
    }

    #[test]
    fn test_blank_candidates_are_skipped() {
        let label = derive_label(Some(""), Some("   "), Some("\tSearch\n"), &en());
        assert_eq!(label.as_deref(), Some("Search"));
        assert_eq!(label.source, LabelSource::Placeholder);
    }

    #[test]
    fn test_text_is_not_otherwise_modified() {
        let label = derive_label(Some("  Sauvegarder   le  brouillon "), None, None, &en());
        assert_eq!(label.as_deref(), Some("Sauvegarder   le  brouillon"));
    }

    #[test]
    fn test_locale_is_carried() {
        let fr = Locale::new("fr_CA");
        let label = derive_label(None, Some("Enregistrer"), None, &fr);
        assert_eq!(label.locale.as_str(), "fr-CA");
        assert_eq!(label.locale.language(), "fr");
    }

    #[test]
    fn test_blank_locale_is_undetermined() {
        assert_eq!(Locale::new("  "), Locale::undetermined());
        assert_eq!(Locale::default().as_str(), "und");
    }
}
