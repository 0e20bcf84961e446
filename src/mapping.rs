//! Ordered source → target column mapping.
//!
//! One [`ColumnMapping`] drives both projection (its keys, in order) and
//! renaming (its values), so the two steps cannot drift apart. Sources are
//! unique and so are targets, which keeps the renamed table free of repeated
//! column names. Insertion order is the output column order.
//!
//! Mappings can be built in code or loaded from YAML/JSON objects:
//!
//! ```yaml
//! ID: id
//! Val: value
//! ```

use std::fmt;
use std::fs;
use std::path::Path;

use itertools::Itertools;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{LoadError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMapping {
    entries: Vec<(String, String)>,
}

impl ColumnMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a mapping from `(source, target)` pairs, rejecting a repeated
    /// source or target.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let entries = pairs
            .into_iter()
            .map(|(source, target)| (source.into(), target.into()))
            .collect::<Vec<_>>();
        let repeated = entries
            .iter()
            .map(|(source, _)| source)
            .duplicates()
            .chain(entries.iter().map(|(_, target)| target).duplicates())
            .next();
        if let Some(column) = repeated {
            return Err(LoadError::DuplicateColumn {
                column: column.clone(),
            });
        }
        Ok(Self { entries })
    }

    pub fn insert(&mut self, source: impl Into<String>, target: impl Into<String>) -> Result<()> {
        let source = source.into();
        let target = target.into();
        if self.contains(&source) {
            return Err(LoadError::DuplicateColumn { column: source });
        }
        if self.values().any(|existing| existing == target) {
            return Err(LoadError::DuplicateColumn { column: target });
        }
        self.entries.push((source, target));
        Ok(())
    }

    pub fn contains(&self, source: &str) -> bool {
        self.get(source).is_some()
    }

    pub fn get(&self, source: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == source)
            .map(|(_, target)| target.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(source, _)| source.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, target)| target.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(source, target)| (source.as_str(), target.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn from_yaml_str(text: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }

    pub fn from_json_str(text: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Loads a mapping file; `.json` is parsed as JSON, anything else as YAML.
    pub fn load(path: &Path) -> Result<Self> {
        let mapping_error = |message: String| LoadError::MappingFile {
            path: path.to_path_buf(),
            message,
        };
        let text = fs::read_to_string(path).map_err(|err| mapping_error(err.to_string()))?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&text).map_err(|err| mapping_error(err.to_string()))
        } else {
            Self::from_yaml_str(&text).map_err(|err| mapping_error(err.to_string()))
        }
    }
}

impl<'a> IntoIterator for &'a ColumnMapping {
    type Item = (&'a str, &'a str);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a str)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

impl Serialize for ColumnMapping {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (source, target) in &self.entries {
            map.serialize_entry(source, target)?;
        }
        map.end()
    }
}

struct ColumnMappingVisitor;

impl<'de> Visitor<'de> for ColumnMappingVisitor {
    type Value = ColumnMapping;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of source column names to target column names")
    }

    fn visit_map<A>(self, mut access: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut mapping = ColumnMapping::new();
        while let Some((source, target)) = access.next_entry::<String, String>()? {
            mapping
                .insert(source, target)
                .map_err(<A::Error as de::Error>::custom)?;
        }
        Ok(mapping)
    }
}

impl<'de> Deserialize<'de> for ColumnMapping {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(ColumnMappingVisitor)
    }
}
