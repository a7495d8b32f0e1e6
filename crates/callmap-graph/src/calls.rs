use callmap_core::EntityMapping;
use indexmap::{IndexMap, IndexSet};
use std::collections::{HashSet, VecDeque};

/// Caller name -> callee names, merged across folders by function name.
#[derive(Debug, Clone, Default)]
pub struct CallIndex {
    calls: IndexMap<String, IndexSet<String>>,
}

impl CallIndex {
    pub fn build(mapping: &EntityMapping) -> Self {
        let mut calls: IndexMap<String, IndexSet<String>> = IndexMap::new();
        for (_, functions) in mapping.folders() {
            for (name, record) in functions {
                calls
                    .entry(name.clone())
                    .or_default()
                    .extend(record.calls.iter().cloned());
            }
        }
        Self { calls }
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    pub fn callees(&self, caller: &str) -> Option<&IndexSet<String>> {
        self.calls.get(caller)
    }

    /// Breadth-first walk from `entry`, keeping every visited caller that has
    /// an entry of its own. Unknown entries give an empty result.
    pub fn reachable_from(&self, entry: &str) -> CallIndex {
        let mut subgraph = IndexMap::new();
        if !self.calls.contains_key(entry) {
            return CallIndex { calls: subgraph };
        }

        let mut visited: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<&str> = VecDeque::from([entry]);
        while let Some(current) = queue.pop_front() {
            if !visited.insert(current) {
                continue;
            }
            if let Some(callees) = self.calls.get(current) {
                subgraph.insert(current.to_string(), callees.clone());
                queue.extend(callees.iter().map(String::as_str));
            }
        }
        CallIndex { calls: subgraph }
    }

    /// `(caller, callee)` pairs in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.calls.iter().flat_map(|(caller, callees)| {
            callees
                .iter()
                .map(move |callee| (caller.as_str(), callee.as_str()))
        })
    }
}
