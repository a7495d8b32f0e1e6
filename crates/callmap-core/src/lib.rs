use serde::{Deserialize, Serialize};
use std::fmt;

pub mod error;
pub mod mapping;

pub use error::MappingError;
pub use mapping::{EntityMapping, FolderFunctions, FunctionRecord};

/// Path separator used by folder keys and synthesized node ids.
pub const PATH_SEPARATOR: char = '/';

/// Unique identity of a graph node: a folder path or `folder/function`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Id of a function node owned by `folder`.
    pub fn function(folder: &str, name: &str) -> Self {
        Self(format!("{folder}{PATH_SEPARATOR}{name}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Folder,
    Function,
}

impl NodeKind {
    pub fn is_folder(self) -> bool {
        matches!(self, NodeKind::Folder)
    }

    pub fn is_function(self) -> bool {
        matches!(self, NodeKind::Function)
    }
}

/// A vertex of the structure graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: NodeId,
    /// Display label: the last path segment or the function name.
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// Depth in the folder tree.
    pub level: usize,
    /// Owning folder path; only set for functions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl GraphNode {
    pub fn folder(id: impl Into<NodeId>, name: impl Into<String>, level: usize) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: NodeKind::Folder,
            level,
            group: None,
        }
    }

    pub fn function(folder: &str, name: &str, level: usize) -> Self {
        Self {
            id: NodeId::function(folder, name),
            name: name.to_string(),
            kind: NodeKind::Function,
            level,
            group: Some(folder.to_string()),
        }
    }
}

/// Directed parent -> child relation used for layout attraction and drawing.
/// Not a call edge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: NodeId,
    pub target: NodeId,
}

impl GraphEdge {
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    pub fn touches(&self, id: &NodeId) -> bool {
        &self.source == id || &self.target == id
    }
}
