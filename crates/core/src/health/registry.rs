//! Category definitions and the registry holding them.
//!
//! Categories are plain data: a key, display text, a grouping key, column
//! hints for the table browser and a [`RuleSet`]. A registry is built once
//! (from the embedded fabric catalog or a JSON file) and is read-only
//! afterwards.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::RegistryError;
use super::model::SeverityTier;
use super::rules::RuleSet;
use super::traits::Classifier;
use crate::errors::{Error, Result};
use crate::values::Record;

const BUILTIN_CATALOG: &str = include_str!("../../catalog/fabric_categories.json");

// =============================================================================
// Definitions
// =============================================================================

/// A diagnostic topic with its own classification rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDefinition {
    /// Unique, stable identifier; matches the snapshot key
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub description: String,
    /// Grouping key used by the dashboard's group filter
    pub group: String,
    /// Columns pinned first by the table browser, in order
    #[serde(default)]
    pub preferred_columns: Vec<String>,
    /// Columns never shown by the table browser
    #[serde(default)]
    pub hidden_columns: Vec<String>,
    #[serde(flatten)]
    pub classifier: RuleSet,
}

impl CategoryDefinition {
    pub fn new(key: impl Into<String>, label: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            description: String::new(),
            group: group.into(),
            preferred_columns: Vec::new(),
            hidden_columns: Vec::new(),
            classifier: RuleSet::default(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_rules(mut self, classifier: RuleSet) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_preferred_columns<S: Into<String>>(
        mut self,
        columns: impl IntoIterator<Item = S>,
    ) -> Self {
        self.preferred_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_hidden_columns<S: Into<String>>(
        mut self,
        columns: impl IntoIterator<Item = S>,
    ) -> Self {
        self.hidden_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    fn validate(&self) -> std::result::Result<(), RegistryError> {
        if self.key.trim().is_empty() {
            return Err(RegistryError::EmptyKey(self.label.clone()));
        }
        self.classifier.validate(&self.key)
    }
}

impl Classifier for CategoryDefinition {
    fn heuristic_tier(&self, record: &Record) -> SeverityTier {
        self.classifier.heuristic_tier(record)
    }

    fn heuristic_reason(&self, record: &Record) -> Option<String> {
        self.classifier.heuristic_reason(record)
    }

    fn reason_fields(&self) -> &[String] {
        self.classifier.reason_fields()
    }
}

/// Display metadata of a grouping key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupDefinition {
    pub key: String,
    pub label: String,
}

/// On-disk catalog shapes: a bare array of categories, or an object with
/// optional group labels.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    Categories(Vec<CategoryDefinition>),
    Full {
        #[serde(default)]
        groups: Vec<GroupDefinition>,
        categories: Vec<CategoryDefinition>,
    },
}

// =============================================================================
// Registry
// =============================================================================

/// Immutable, ordered set of category definitions.
#[derive(Debug, Clone, Default)]
pub struct CategoryRegistry {
    definitions: Vec<CategoryDefinition>,
    index: HashMap<String, usize>,
    groups: Vec<GroupDefinition>,
}

impl CategoryRegistry {
    /// Validates and indexes definitions.
    ///
    /// Groups referenced by a category but missing from `groups` are added
    /// with their key as label, in first-use order.
    pub fn new(
        definitions: Vec<CategoryDefinition>,
        groups: Vec<GroupDefinition>,
    ) -> std::result::Result<Self, RegistryError> {
        let mut index = HashMap::with_capacity(definitions.len());
        for (position, definition) in definitions.iter().enumerate() {
            definition.validate()?;
            if index.insert(definition.key.clone(), position).is_some() {
                return Err(RegistryError::DuplicateKey(definition.key.clone()));
            }
        }

        let mut groups = groups;
        for definition in &definitions {
            if !groups.iter().any(|g| g.key == definition.group) {
                groups.push(GroupDefinition {
                    key: definition.group.clone(),
                    label: definition.group.clone(),
                });
            }
        }

        Ok(Self {
            definitions,
            index,
            groups,
        })
    }

    /// Registry of the fabric catalog embedded in this crate.
    pub fn builtin() -> Result<Self> {
        Self::from_json_str(BUILTIN_CATALOG)
    }

    /// Parses a JSON catalog.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let (groups, categories) = match serde_json::from_str::<CatalogFile>(json)? {
            CatalogFile::Categories(categories) => (Vec::new(), categories),
            CatalogFile::Full { groups, categories } => (groups, categories),
        };
        let registry = Self::new(categories, groups)?;
        log::debug!(
            "Loaded category catalog: {} categories in {} groups",
            registry.len(),
            registry.groups.len()
        );
        Ok(registry)
    }

    /// Reads and parses a JSON catalog file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| Error::io(path.display().to_string(), e))?;
        Self::from_json_str(&json)
    }

    pub fn get(&self, key: &str) -> Option<&CategoryDefinition> {
        self.index.get(key).map(|&position| &self.definitions[position])
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Definitions in registration order.
    pub fn definitions(&self) -> &[CategoryDefinition] {
        &self.definitions
    }

    /// Groups in declaration order, then first-use order.
    pub fn groups(&self) -> &[GroupDefinition] {
        &self.groups
    }

    pub fn group_label<'a>(&'a self, key: &'a str) -> &'a str {
        self.groups
            .iter()
            .find(|g| g.key == key)
            .map(|g| g.label.as_str())
            .unwrap_or(key)
    }

    /// Definitions belonging to one group, in registration order.
    pub fn in_group<'a>(&'a self, group: &'a str) -> impl Iterator<Item = &'a CategoryDefinition> {
        self.definitions.iter().filter(move |d| d.group == group)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
