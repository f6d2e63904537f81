//! Domain profiles.
//!
//! A profile is the single configuration object that parameterizes the
//! pipeline for one target domain: the taxonomy table, the keyword sets used
//! by the domain filter, the optional derived attribute and the boundary
//! dataset. Built-in profiles are embedded TOML documents; custom profiles
//! use the same format.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::schema::{self, CATEGORY_SEPARATOR, MULTIPLE_CATEGORIES};
use crate::taxonomy::{LabelFallback, TaxonomyTable};

const AGRICULTURE_TOML: &str = include_str!("../profiles/agriculture.toml");
const LABORATORY_TOML: &str = include_str!("../profiles/laboratory.toml");

const BUILTIN_PROFILES: [(&str, &str); 2] = [
    ("agriculture", AGRICULTURE_TOML),
    ("laboratory", LABORATORY_TOML),
];

/// Keyword sets that define membership in the target domain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeywordSets {
    /// Primary categories that qualify a record for retention.
    pub broad: BTreeSet<String>,
    /// Tags a category list must contain at least one of; also the filter
    /// applied to the list itself.
    pub narrow: BTreeSet<String>,
    /// Subset of `narrow` specific enough to stand alone as a primary category.
    pub reclassify: BTreeSet<String>,
}

impl KeywordSets {
    pub fn new<I, S>(broad: I, narrow: I, reclassify: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            broad: broad.into_iter().map(Into::into).collect(),
            narrow: narrow.into_iter().map(Into::into).collect(),
            reclassify: reclassify.into_iter().map(Into::into).collect(),
        }
    }
}

fn default_derived_fallback() -> String {
    "other".to_string()
}

/// Attribute derived from the final primary category by table lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DerivedAttribute {
    /// Output column name (e.g. `animal_type`).
    pub column: String,
    /// Value for categories without a mapping entry.
    #[serde(default = "default_derived_fallback")]
    pub fallback: String,
    #[serde(default)]
    pub mapping: BTreeMap<String, String>,
}

impl DerivedAttribute {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            fallback: default_derived_fallback(),
            mapping: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_entry(mut self, category: impl Into<String>, value: impl Into<String>) -> Self {
        self.mapping.insert(category.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = fallback.into();
        self
    }

    /// Look up the derived value; unknown or missing categories resolve to the fallback.
    pub fn value_for(&self, category: Option<&str>) -> &str {
        category
            .and_then(|category| self.mapping.get(category))
            .map_or(self.fallback.as_str(), String::as_str)
    }
}

fn default_country_field() -> String {
    "COUNTRY".to_string()
}

fn default_state_field() -> String {
    "NAME_1".to_string()
}

fn default_department_field() -> String {
    "NAME_2".to_string()
}

/// Where the administrative boundaries come from and which feature
/// properties carry the region labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoundaryConfig {
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default = "default_country_field")]
    pub country_field: String,
    #[serde(default = "default_state_field")]
    pub state_field: String,
    #[serde(default = "default_department_field")]
    pub department_field: String,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            path: None,
            country_field: default_country_field(),
            state_field: default_state_field(),
            department_field: default_department_field(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProfileDocument {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    label_fallback: LabelFallback,
    #[serde(default)]
    taxonomy: BTreeMap<String, String>,
    keywords: KeywordSets,
    #[serde(default)]
    derived: Option<DerivedAttribute>,
    #[serde(default)]
    boundaries: BoundaryConfig,
}

/// Configuration for one target domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainProfile {
    pub name: String,
    pub description: Option<String>,
    pub taxonomy: TaxonomyTable,
    pub keywords: KeywordSets,
    pub derived: Option<DerivedAttribute>,
    pub boundaries: BoundaryConfig,
}

impl DomainProfile {
    pub fn new(name: impl Into<String>, taxonomy: TaxonomyTable, keywords: KeywordSets) -> Self {
        Self {
            name: name.into(),
            description: None,
            taxonomy,
            keywords,
            derived: None,
            boundaries: BoundaryConfig::default(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_derived(mut self, derived: DerivedAttribute) -> Self {
        self.derived = Some(derived);
        self
    }

    #[must_use]
    pub fn with_boundaries(mut self, boundaries: BoundaryConfig) -> Self {
        self.boundaries = boundaries;
        self
    }

    /// Override the boundary dataset path.
    #[must_use]
    pub fn with_boundaries_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.boundaries.path = Some(path.into());
        self
    }

    /// Names of the embedded profiles.
    pub fn builtin_names() -> Vec<&'static str> {
        BUILTIN_PROFILES.iter().map(|(name, _)| *name).collect()
    }

    /// Load an embedded profile by name.
    pub fn builtin(name: &str) -> Result<Self> {
        let Some((_, source)) = BUILTIN_PROFILES
            .iter()
            .find(|(builtin, _)| builtin.eq_ignore_ascii_case(name))
        else {
            return Err(ModelError::UnknownProfile {
                name: name.to_string(),
                available: Self::builtin_names().join(", "),
            });
        };
        Self::from_toml_str(source, name)
    }

    /// Load a profile from a TOML file.
    ///
    /// A relative boundary path is resolved against the profile's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut profile = Self::from_toml_str(&text, &path.display().to_string())?;
        if let Some(boundaries) = profile.boundaries.path.as_mut()
            && boundaries.is_relative()
            && let Some(parent) = path.parent()
        {
            *boundaries = parent.join(&*boundaries);
        }
        Ok(profile)
    }

    /// Resolve a built-in profile name, or else treat the argument as a file path.
    ///
    /// Built-in names win over a file of the same name in the working directory.
    pub fn resolve(name_or_path: &str) -> Result<Self> {
        let is_builtin = BUILTIN_PROFILES
            .iter()
            .any(|(builtin, _)| builtin.eq_ignore_ascii_case(name_or_path));
        let path = Path::new(name_or_path);
        if !is_builtin && (path.extension().is_some_and(|ext| ext == "toml") || path.is_file()) {
            return Self::load(path);
        }
        Self::builtin(name_or_path)
    }

    /// Parse and validate a profile document.
    pub fn from_toml_str(source: &str, origin: &str) -> Result<Self> {
        let document: ProfileDocument =
            toml::from_str(source).map_err(|source| ModelError::Toml {
                origin: origin.to_string(),
                source,
            })?;
        let profile = Self {
            name: document.name,
            description: document.description,
            taxonomy: TaxonomyTable::new(document.taxonomy, document.label_fallback),
            keywords: document.keywords,
            derived: document.derived,
            boundaries: document.boundaries,
        };
        profile.validate()?;
        Ok(profile)
    }

    /// Check the invariants the pipeline relies on.
    pub fn validate(&self) -> Result<()> {
        let name = self.name.as_str();
        if name.trim().is_empty() {
            return Err(ModelError::invalid(name, "profile name is empty"));
        }
        if self.keywords.broad.is_empty() {
            return Err(ModelError::invalid(name, "broad keyword set is empty"));
        }
        if self.keywords.narrow.is_empty() {
            return Err(ModelError::invalid(name, "narrow keyword set is empty"));
        }
        if let Some(tag) = self
            .keywords
            .reclassify
            .iter()
            .find(|tag| !self.keywords.narrow.contains(*tag))
        {
            return Err(ModelError::invalid(
                name,
                format!("reclassification tag '{tag}' is not in the narrow keyword set"),
            ));
        }
        if self.keywords.reclassify.contains(MULTIPLE_CATEGORIES) {
            return Err(ModelError::invalid(
                name,
                format!("'{MULTIPLE_CATEGORIES}' is reserved and cannot be a keyword"),
            ));
        }
        let tags = self
            .taxonomy
            .entries()
            .map(|(_, canonical)| canonical)
            .chain(self.keywords.narrow.iter().map(String::as_str));
        for tag in tags {
            if tag.is_empty() || tag.contains(CATEGORY_SEPARATOR) {
                return Err(ModelError::invalid(
                    name,
                    format!("canonical tag '{tag}' is empty or contains '{CATEGORY_SEPARATOR}'"),
                ));
            }
        }
        if let Some((tag, next)) = self.taxonomy.check_projection() {
            return Err(ModelError::invalid(
                name,
                format!("taxonomy is not idempotent: '{tag}' maps on to '{next}'"),
            ));
        }
        if let Some(derived) = &self.derived {
            let column = derived.column.as_str();
            let reserved = schema::LISTING_COLUMNS.contains(&column)
                || schema::REGION_COLUMNS.contains(&column)
                || column == schema::LATITUDE
                || column == schema::LONGITUDE;
            if column.trim().is_empty() || reserved {
                return Err(ModelError::invalid(
                    name,
                    format!("derived column name '{}' is empty or reserved", derived.column),
                ));
            }
        }
        Ok(())
    }

    /// Output column order for this profile.
    pub fn output_columns(&self) -> Vec<String> {
        let mut columns: Vec<String> = schema::LISTING_COLUMNS
            .iter()
            .map(ToString::to_string)
            .collect();
        columns.push(schema::LATITUDE.to_string());
        columns.push(schema::LONGITUDE.to_string());
        if let Some(derived) = &self.derived {
            columns.push(derived.column.clone());
        }
        columns.extend(schema::REGION_COLUMNS.iter().map(ToString::to_string));
        columns
    }
}
