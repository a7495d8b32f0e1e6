//! Flattens the folder -> function mapping into layout nodes and edges.

use crate::graph::CodeGraph;
use callmap_core::{EntityMapping, GraphNode, NodeId, PATH_SEPARATOR};

/// Build the node/edge lists for `mapping`.
///
/// Folder nodes are created once per distinct path prefix and linked from
/// their immediate parent. Function nodes are created on first sight of their
/// id, but the folder -> function edge is pushed every time, so an id that
/// recurs under another key (or collides with a folder path) yields a repeated
/// edge rather than a second node.
pub fn build_graph(mapping: &EntityMapping) -> CodeGraph {
    let mut graph = CodeGraph::new();

    for (folder, functions) in mapping.folders() {
        let segments: Vec<&str> = folder.split(PATH_SEPARATOR).collect();
        let mut parent: Option<NodeId> = None;
        let mut prefix = String::with_capacity(folder.len());

        for (level, segment) in segments.iter().enumerate() {
            if level > 0 {
                prefix.push(PATH_SEPARATOR);
            }
            prefix.push_str(segment);
            let folder_id = NodeId::new(prefix.as_str());

            graph.insert_node(GraphNode::folder(folder_id.clone(), *segment, level));
            if let Some(parent_id) = parent.take() {
                graph.push_edge(parent_id, folder_id.clone());
            }
            parent = Some(folder_id);
        }

        let Some(folder_id) = parent else {
            continue;
        };

        for name in functions.keys() {
            let node = GraphNode::function(folder, name, segments.len());
            let function_id = node.id.clone();
            if !graph.insert_node(node) {
                tracing::debug!("Node id {} already present, adding edge only", function_id);
            }
            graph.push_edge(folder_id.clone(), function_id);
        }
    }

    tracing::info!(
        "Built graph with {} nodes and {} edges from {} folder keys",
        graph.node_count(),
        graph.edge_count(),
        mapping.len()
    );
    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use callmap_core::{FunctionRecord, NodeKind};
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn edge_pairs(graph: &CodeGraph) -> Vec<(String, String)> {
        graph
            .edges()
            .iter()
            .map(|e| (e.source.to_string(), e.target.to_string()))
            .collect()
    }

    #[test]
    fn test_nested_folder_with_one_function() {
        let mapping =
            EntityMapping::from_json_str(r#"{"a/b": {"f": {"calls": ["f","g","f"]}}}"#).unwrap();
        let graph = build_graph(&mapping);

        let ids: Vec<_> = graph.nodes().iter().map(|n| n.id.to_string()).collect();
        assert_eq!(ids, vec!["a", "a/b", "a/b/f"]);
        assert_eq!(
            edge_pairs(&graph),
            vec![
                ("a".to_string(), "a/b".to_string()),
                ("a/b".to_string(), "a/b/f".to_string()),
            ]
        );

        let f = graph.node(&NodeId::from("a/b/f")).unwrap();
        assert_eq!(f.kind, NodeKind::Function);
        assert_eq!(f.name, "f");
        assert_eq!(f.level, 2);
        assert_eq!(f.group.as_deref(), Some("a/b"));

        let b = graph.node(&NodeId::from("a/b")).unwrap();
        assert_eq!(b.kind, NodeKind::Folder);
        assert_eq!(b.name, "b");
        assert_eq!(b.level, 1);
    }

    #[test]
    fn test_shared_prefix_creates_folder_once() {
        let mut mapping = EntityMapping::new();
        mapping.insert_function("lib/x", "f", FunctionRecord::default());
        mapping.insert_function("lib/y", "g", FunctionRecord::default());
        let graph = build_graph(&mapping);

        let lib_nodes = graph.nodes().iter().filter(|n| n.id.as_str() == "lib").count();
        assert_eq!(lib_nodes, 1);
        assert_eq!(graph.folder_count(), 3);
        assert_eq!(graph.function_count(), 2);
    }

    #[test]
    fn test_empty_folder_has_node_without_outgoing_edges() {
        let mut mapping = EntityMapping::new();
        mapping.insert_folder("empty");
        let graph = build_graph(&mapping);
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_colliding_function_id_adds_edge_not_node() {
        // "a" + "b/c" and "a/b" + "c" both synthesize "a/b/c".
        let mut mapping = EntityMapping::new();
        mapping.insert_function("a", "b/c", FunctionRecord::default());
        mapping.insert_function("a/b", "c", FunctionRecord::default());
        let graph = build_graph(&mapping);

        let count = graph
            .nodes()
            .iter()
            .filter(|n| n.id.as_str() == "a/b/c")
            .count();
        assert_eq!(count, 1);
        assert_eq!(
            graph.node(&NodeId::from("a/b/c")).unwrap().group.as_deref(),
            Some("a")
        );
        let into_abc = graph
            .edges()
            .iter()
            .filter(|e| e.target.as_str() == "a/b/c")
            .count();
        assert_eq!(into_abc, 2);
    }

    #[test]
    fn test_function_id_colliding_with_folder_keeps_folder() {
        let mut mapping = EntityMapping::new();
        mapping.insert_folder("a/f");
        mapping.insert_function("a", "f", FunctionRecord::default());
        let graph = build_graph(&mapping);

        assert_eq!(
            graph.node(&NodeId::from("a/f")).unwrap().kind,
            NodeKind::Folder
        );
        assert_eq!(graph.duplicate_edge_count(), 1);
    }

    fn mapping_strategy() -> impl Strategy<Value = EntityMapping> {
        let segment = "[a-c]{1,2}";
        let path = proptest::collection::vec(segment, 1..4).prop_map(|s| s.join("/"));
        let functions = proptest::collection::vec("[f-h]{1,2}", 0..3);
        proptest::collection::vec((path, functions), 1..8).prop_map(|entries| {
            let mut mapping = EntityMapping::new();
            for (folder, functions) in entries {
                mapping.insert_folder(folder.clone());
                for name in functions {
                    mapping.insert_function(folder.clone(), name, FunctionRecord::default());
                }
            }
            mapping
        })
    }

    proptest! {
        #[test]
        fn prop_every_prefix_is_exactly_one_node(mapping in mapping_strategy()) {
            let graph = build_graph(&mapping);
            let mut prefixes = HashSet::new();
            for (folder, _) in mapping.folders() {
                let segments: Vec<&str> = folder.split('/').collect();
                for i in 1..=segments.len() {
                    prefixes.insert(segments[..i].join("/"));
                }
            }
            for prefix in &prefixes {
                let count = graph.nodes().iter().filter(|n| n.id.as_str() == prefix).count();
                prop_assert_eq!(count, 1);
            }
        }

        #[test]
        fn prop_ids_unique_and_edges_resolve(mapping in mapping_strategy()) {
            let graph = build_graph(&mapping);
            let ids: HashSet<_> = graph.nodes().iter().map(|n| n.id.clone()).collect();
            prop_assert_eq!(ids.len(), graph.node_count());
            for edge in graph.edges() {
                prop_assert!(ids.contains(&edge.source));
                prop_assert!(ids.contains(&edge.target));
            }
            let folder_links: usize = mapping
                .folders()
                .map(|(folder, _)| folder.split('/').count() - 1)
                .sum();
            prop_assert_eq!(
                graph.edge_count(),
                folder_links + mapping.function_record_count()
            );
        }
    }
}
