//! Collapsible, filterable sidebar model mirroring the folder tree.

use callmap_core::{EntityMapping, NodeId, PATH_SEPARATOR};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MenuEntryId(pub usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuTarget {
    Folder { path: String },
    Function { folder: String, name: String },
}

impl MenuTarget {
    pub fn node_id(&self) -> NodeId {
        match self {
            MenuTarget::Folder { path } => NodeId::new(path.as_str()),
            MenuTarget::Function { folder, name } => NodeId::function(folder, name),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MenuEntry {
    pub label: String,
    pub target: MenuTarget,
    pub depth: usize,
    pub children: Vec<MenuEntryId>,
    /// Display state of the child list; folders start collapsed.
    pub expanded: bool,
    /// Filter result for this entry's own label.
    pub visible: bool,
}

impl MenuEntry {
    pub fn is_folder(&self) -> bool {
        matches!(self.target, MenuTarget::Folder { .. })
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// What the caller should do after an entry was clicked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuActivation {
    RecenterFolder(NodeId),
    RecenterFunction {
        node_id: NodeId,
        folder: String,
        name: String,
    },
}

#[derive(Debug, Clone, Default)]
pub struct MenuTree {
    entries: Vec<MenuEntry>,
    roots: Vec<MenuEntryId>,
    folders: HashMap<String, MenuEntryId>,
    query: String,
}

impl MenuTree {
    /// Roots are the distinct first path segments. Each folder lists its
    /// immediate sub-folders first, then its own functions.
    pub fn build(mapping: &EntityMapping) -> Self {
        let mut tree = Self::default();

        for (folder, _) in mapping.folders() {
            tree.ensure_folder_path(folder);
        }

        for (folder, functions) in mapping.folders() {
            let Some(&parent) = tree.folders.get(folder) else {
                continue;
            };
            let depth = tree.entries[parent.0].depth + 1;
            for name in functions.keys() {
                let id = tree.push_entry(MenuEntry {
                    label: name.clone(),
                    target: MenuTarget::Function {
                        folder: folder.to_string(),
                        name: name.clone(),
                    },
                    depth,
                    children: Vec::new(),
                    expanded: false,
                    visible: true,
                });
                tree.entries[parent.0].children.push(id);
            }
        }

        tracing::debug!(
            "Built menu with {} entries under {} roots",
            tree.entries.len(),
            tree.roots.len()
        );
        tree
    }

    fn ensure_folder_path(&mut self, folder: &str) {
        let mut parent: Option<MenuEntryId> = None;
        let mut prefix = String::with_capacity(folder.len());

        for (depth, segment) in folder.split(PATH_SEPARATOR).enumerate() {
            if depth > 0 {
                prefix.push(PATH_SEPARATOR);
            }
            prefix.push_str(segment);

            let id = match self.folders.get(&prefix) {
                Some(&id) => id,
                None => {
                    let id = self.push_entry(MenuEntry {
                        label: segment.to_string(),
                        target: MenuTarget::Folder {
                            path: prefix.clone(),
                        },
                        depth,
                        children: Vec::new(),
                        expanded: false,
                        visible: true,
                    });
                    self.folders.insert(prefix.clone(), id);
                    match parent {
                        Some(parent) => self.entries[parent.0].children.push(id),
                        None => self.roots.push(id),
                    }
                    id
                }
            };
            parent = Some(id);
        }
    }

    fn push_entry(&mut self, entry: MenuEntry) -> MenuEntryId {
        let id = MenuEntryId(self.entries.len());
        self.entries.push(entry);
        id
    }

    pub fn roots(&self) -> &[MenuEntryId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: MenuEntryId) -> Option<&MenuEntry> {
        self.entries.get(id.0)
    }

    pub fn folder(&self, path: &str) -> Option<MenuEntryId> {
        self.folders.get(path).copied()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Flip the child-list display of a folder that has children.
    pub fn toggle(&mut self, id: MenuEntryId) {
        if let Some(entry) = self.entries.get_mut(id.0)
            && entry.has_children()
        {
            entry.expanded = !entry.expanded;
        }
    }

    /// Handle a click: folders toggle (when they have children) and request
    /// a recenter; functions request a recenter plus the detail panel.
    pub fn activate(&mut self, id: MenuEntryId) -> Option<MenuActivation> {
        let target = self.entries.get(id.0)?.target.clone();
        match target {
            MenuTarget::Folder { path } => {
                self.toggle(id);
                Some(MenuActivation::RecenterFolder(NodeId::new(path)))
            }
            MenuTarget::Function { folder, name } => Some(MenuActivation::RecenterFunction {
                node_id: NodeId::function(&folder, &name),
                folder,
                name,
            }),
        }
    }

    /// Case-insensitive substring match of every entry label against
    /// `query`, each entry independently. Expansion state is untouched.
    pub fn apply_filter(&mut self, query: &str) {
        self.query = query.to_string();
        let needle = query.to_lowercase();
        for entry in &mut self.entries {
            entry.visible = entry.label.to_lowercase().contains(&needle);
        }
    }

    /// Entries in display order (pre-order, ignoring collapse state).
    pub fn iter(&self) -> impl Iterator<Item = (MenuEntryId, &MenuEntry)> {
        let mut stack: Vec<MenuEntryId> = self.roots.iter().rev().copied().collect();
        std::iter::from_fn(move || {
            let id = stack.pop()?;
            let entry = &self.entries[id.0];
            stack.extend(entry.children.iter().rev().copied());
            Some((id, entry))
        })
    }

    pub fn visible_labels(&self) -> Vec<&str> {
        self.iter()
            .filter(|(_, entry)| entry.visible)
            .map(|(_, entry)| entry.label.as_str())
            .collect()
    }

    /// Rows a renderer draws: an entry shows when its own label passes the
    /// filter, and a child list shows when its folder is expanded, whether or
    /// not the folder's own label passed.
    pub fn rendered_rows(&self) -> Vec<MenuEntryId> {
        let mut rows = Vec::new();
        let mut stack: Vec<MenuEntryId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let entry = &self.entries[id.0];
            if entry.visible {
                rows.push(id);
            }
            if entry.expanded {
                stack.extend(entry.children.iter().rev().copied());
            }
        }
        rows
    }
}
