use crate::{MappingError, PATH_SEPARATOR};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

/// Per-function payload of the input document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionRecord {
    /// Loosely structured text with labeled sections.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    /// Callee names in source order, duplicates allowed.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub calls: Vec<String>,
}

impl FunctionRecord {
    pub fn with_calls<I, S>(calls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            documentation: None,
            calls: calls.into_iter().map(Into::into).collect(),
        }
    }

    pub fn documented(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

pub type FolderFunctions = IndexMap<String, FunctionRecord>;

/// Folder path -> function name -> record, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityMapping {
    folders: IndexMap<String, FolderFunctions>,
}

impl EntityMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a mapping document. An empty top-level object is rejected.
    pub fn from_json_str(json: &str) -> Result<Self, MappingError> {
        let mapping: Self = serde_json::from_str(json)?;
        if mapping.is_empty() {
            return Err(MappingError::Empty);
        }
        tracing::debug!("Parsed mapping with {} folder keys", mapping.len());
        Ok(mapping)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, MappingError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|source| MappingError::Unavailable {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_json_str(&content)
    }

    pub fn insert_folder(&mut self, folder: impl Into<String>) -> &mut FolderFunctions {
        self.folders.entry(folder.into()).or_default()
    }

    pub fn insert_function(
        &mut self,
        folder: impl Into<String>,
        name: impl Into<String>,
        record: FunctionRecord,
    ) {
        self.insert_folder(folder).insert(name.into(), record);
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }

    pub fn len(&self) -> usize {
        self.folders.len()
    }

    pub fn folders(&self) -> impl Iterator<Item = (&str, &FolderFunctions)> {
        self.folders.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn functions(&self, folder: &str) -> Option<&FolderFunctions> {
        self.folders.get(folder)
    }

    pub fn record(&self, folder: &str, name: &str) -> Option<&FunctionRecord> {
        self.folders.get(folder).and_then(|functions| functions.get(name))
    }

    /// Distinct first path segments of every key, in first-seen order.
    pub fn root_folders(&self) -> Vec<&str> {
        let roots: IndexSet<&str> = self
            .folders
            .keys()
            .map(|key| key.split(PATH_SEPARATOR).next().unwrap_or(key.as_str()))
            .collect();
        roots.into_iter().collect()
    }

    pub fn function_record_count(&self) -> usize {
        self.folders.values().map(IndexMap::len).sum()
    }
}
