use petgraph::{graph::NodeIndex, Directed, Graph};
use std::collections::HashMap;

use crate::core::model::{ElementId, ElementKind, Model};

/// Graph view of a populated model, the shape the formatters consume.
pub type ArchitectureGraph = Graph<ArchNode, ArchEdge, Directed>;

#[derive(Debug, Clone)]
pub struct ArchNode {
    pub name: String,
    pub kind: ElementKind,
    pub technology: Option<String>,
    pub description: String,
    /// Name of the parent element, when one exists.
    pub parent: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ArchEdge {
    pub description: String,
}

/// Assemble the model's elements and relationships into a petgraph graph.
pub fn model_graph(model: &Model) -> ArchitectureGraph {
    let mut graph = Graph::new();
    let mut node_map: HashMap<ElementId, NodeIndex> = HashMap::new();

    for element in model.elements() {
        let parent = element
            .parent
            .map(|parent| model.element(parent).name.clone());
        let index = graph.add_node(ArchNode {
            name: element.name.clone(),
            kind: element.kind,
            technology: element.technology.clone(),
            description: element.description.clone(),
            parent,
        });
        node_map.insert(element.id, index);
    }

    for relationship in model.relationships() {
        let (Some(&source), Some(&target)) = (
            node_map.get(&relationship.source),
            node_map.get(&relationship.target),
        ) else {
            continue;
        };
        graph.add_edge(
            source,
            target,
            ArchEdge {
                description: relationship.description.clone(),
            },
        );
    }

    graph
}
