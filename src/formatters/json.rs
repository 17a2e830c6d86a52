use anyhow::Result;
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use serde_json::json;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::core::graph::ArchitectureGraph;
use crate::core::model::ElementKind;

/// Compact JSON rendering of the architecture graph for programmatic
/// consumers.
pub struct JsonGraphFormatter {
    /// Essential fields only, or full metadata per node.
    minimal: bool,
}

impl JsonGraphFormatter {
    pub fn new() -> Self {
        Self { minimal: true }
    }

    #[allow(dead_code)]
    pub fn with_full_metadata(mut self) -> Self {
        self.minimal = false;
        self
    }

    pub fn format_to_file(&self, graph: &ArchitectureGraph, output_path: &Path) -> Result<()> {
        fs::write(output_path, self.format_graph(graph)?)?;
        Ok(())
    }

    pub fn format_graph(&self, graph: &ArchitectureGraph) -> Result<String> {
        let node_indices: Vec<NodeIndex> = graph.node_indices().collect();

        let mut nodes = Vec::new();
        let mut node_id_map = HashMap::new();

        for (position, &index) in node_indices.iter().enumerate() {
            let Some(node) = graph.node_weight(index) else {
                continue;
            };
            node_id_map.insert(index, position);

            let node_json = if self.minimal {
                json!({
                    "n": node.name,
                    "k": kind_code(node.kind),
                })
            } else {
                json!({
                    "name": node.name,
                    "kind": kind_code(node.kind),
                    "technology": node.technology,
                    "description": node.description,
                    "parent": node.parent,
                })
            };
            nodes.push(node_json);
        }

        let mut edges = Vec::new();
        for edge_ref in graph.edge_references() {
            let (Some(&source), Some(&target)) = (
                node_id_map.get(&edge_ref.source()),
                node_id_map.get(&edge_ref.target()),
            ) else {
                continue;
            };
            edges.push(json!([source, target, edge_ref.weight().description]));
        }

        let output = json!({
            "meta": {
                "nodes": graph.node_count(),
                "edges": graph.edge_count(),
                "format": if self.minimal { "compact" } else { "full" }
            },
            "nodes": nodes,
            "edges": edges
        });

        Ok(serde_json::to_string(&output)?)
    }
}

impl Default for JsonGraphFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn kind_code(kind: ElementKind) -> u8 {
    match kind {
        ElementKind::SoftwareSystem => 0,
        ElementKind::Container => 1,
        ElementKind::Component => 2,
    }
}
