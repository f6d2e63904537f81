//! Raw category label to canonical tag mapping.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// What to do with a label that has no taxonomy entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelFallback {
    /// Keep the label unchanged.
    #[default]
    Passthrough,
    /// Lowercase, trim and replace spaces with underscores ("Diagnostic lab" -> "diagnostic_lab").
    Slug,
}

impl fmt::Display for LabelFallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Passthrough => "passthrough",
            Self::Slug => "slug",
        })
    }
}

/// Lowercase, trim and underscore a free-text label.
///
/// ```
/// use geotax_model::slugify_label;
///
/// assert_eq!(slugify_label(" Medical Laboratory "), "medical_laboratory");
/// assert_eq!(slugify_label("medical_laboratory"), "medical_laboratory");
/// ```
pub fn slugify_label(label: &str) -> String {
    label.to_lowercase().trim().replace(' ', "_")
}

/// Exact-match lookup from raw labels to canonical tags.
///
/// Keys are compared case- and whitespace-sensitively, as they appear in the
/// source data. The mapping is a projection: applying it to its own output
/// is a no-op (enforced by [`TaxonomyTable::check_projection`]).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaxonomyTable {
    entries: BTreeMap<String, String>,
    fallback: LabelFallback,
}

impl TaxonomyTable {
    pub fn new(entries: BTreeMap<String, String>, fallback: LabelFallback) -> Self {
        Self { entries, fallback }
    }

    /// Add a single entry.
    #[must_use]
    pub fn with_entry(mut self, raw: impl Into<String>, canonical: impl Into<String>) -> Self {
        self.entries.insert(raw.into(), canonical.into());
        self
    }

    #[must_use]
    pub fn with_fallback(mut self, fallback: LabelFallback) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn fallback(&self) -> LabelFallback {
        self.fallback
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(raw, canonical)| (raw.as_str(), canonical.as_str()))
    }

    /// Map a raw label to its canonical tag, falling back per [`LabelFallback`].
    pub fn canonical(&self, raw: &str) -> String {
        if let Some(tag) = self.entries.get(raw) {
            return tag.clone();
        }
        match self.fallback {
            LabelFallback::Passthrough => raw.to_string(),
            LabelFallback::Slug => slugify_label(raw),
        }
    }

    /// Check that the mapping is idempotent.
    ///
    /// Returns the first offending `(key, target)` pair: a canonical tag that
    /// is itself a key mapping elsewhere, or (for slug fallback) a slug-stable
    /// key or tag that would change on a second pass.
    pub fn check_projection(&self) -> Option<(String, String)> {
        for canonical in self.entries.values() {
            if let Some(next) = self.entries.get(canonical)
                && next != canonical
            {
                return Some((canonical.clone(), next.clone()));
            }
            if self.fallback == LabelFallback::Slug
                && !self.entries.contains_key(canonical)
                && slugify_label(canonical) != *canonical
            {
                return Some((canonical.clone(), slugify_label(canonical)));
            }
        }
        if self.fallback == LabelFallback::Slug {
            for (raw, canonical) in &self.entries {
                if slugify_label(raw) == *raw && raw != canonical {
                    return Some((raw.clone(), canonical.clone()));
                }
            }
        }
        None
    }
}
