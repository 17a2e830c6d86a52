pub mod diagnostics;
pub mod error;
pub mod finder;
pub mod graph;
pub mod model;
pub mod registry;

pub use diagnostics::{Diagnostic, Diagnostics};
pub use error::FinderError;
pub use finder::ComponentFinder;
pub use graph::{model_graph, ArchEdge, ArchNode, ArchitectureGraph};
pub use model::{Element, ElementId, ElementKind, Model, ModelDefinition, Relationship};
pub use registry::ComponentRegistry;
