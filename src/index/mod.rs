pub mod cache;
pub mod common;
pub mod java;
pub mod scanner;
pub mod source;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Declarative markers recognized on scanned types.
///
/// The first four are Spring stereotypes signalling that a type is an
/// architectural component; the last two are explicit point-to-point
/// dependency declarations that static reference scanning cannot infer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    Controller,
    Service,
    Repository,
    Component,
    SoftwareSystemDependency,
    ContainerDependency,
}

impl MarkerKind {
    pub fn simple_name(self) -> &'static str {
        match self {
            MarkerKind::Controller => "Controller",
            MarkerKind::Service => "Service",
            MarkerKind::Repository => "Repository",
            MarkerKind::Component => "Component",
            MarkerKind::SoftwareSystemDependency => "SoftwareSystemDependency",
            MarkerKind::ContainerDependency => "ContainerDependency",
        }
    }

    pub fn from_simple_name(name: &str) -> Option<Self> {
        match name {
            "Controller" => Some(MarkerKind::Controller),
            "Service" => Some(MarkerKind::Service),
            "Repository" => Some(MarkerKind::Repository),
            "Component" => Some(MarkerKind::Component),
            "SoftwareSystemDependency" => Some(MarkerKind::SoftwareSystemDependency),
            "ContainerDependency" => Some(MarkerKind::ContainerDependency),
            _ => None,
        }
    }
}

/// A single marker occurrence on a type, with its arguments when present.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MarkerUse {
    pub kind: MarkerKind,
    pub target: Option<String>,
    pub description: Option<String>,
}

impl MarkerUse {
    pub fn new(kind: MarkerKind) -> Self {
        Self {
            kind,
            target: None,
            description: None,
        }
    }

    pub fn with_target(mut self, target: String) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_description(mut self, description: String) -> Self {
        self.description = Some(description);
        self
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
}

/// Everything the engine needs to know about one scanned type.
///
/// Names are fully qualified once a `SourceIndex` has resolved them; records
/// fresh out of the parser may still carry simple names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeRecord {
    pub fully_qualified_name: String,
    pub kind: TypeKind,
    /// Declared interfaces in declaration order. Order matters: the first
    /// entry is the contract type for interface-style markers.
    pub interfaces: Vec<String>,
    pub superclass: Option<String>,
    pub markers: Vec<MarkerUse>,
    pub referenced_types: Vec<String>,
    pub file_path: PathBuf,
    pub line_number: usize,
}

impl TypeRecord {
    pub fn new(
        fully_qualified_name: String,
        kind: TypeKind,
        file_path: PathBuf,
        line_number: usize,
    ) -> Self {
        Self {
            fully_qualified_name,
            kind,
            interfaces: Vec::new(),
            superclass: None,
            markers: Vec::new(),
            referenced_types: Vec::new(),
            file_path,
            line_number,
        }
    }

    pub fn with_interfaces(mut self, interfaces: Vec<String>) -> Self {
        self.interfaces = interfaces;
        self
    }

    pub fn with_superclass(mut self, superclass: String) -> Self {
        self.superclass = Some(superclass);
        self
    }

    pub fn with_marker(mut self, marker: MarkerUse) -> Self {
        self.markers.push(marker);
        self
    }

    pub fn with_references(mut self, referenced_types: Vec<String>) -> Self {
        self.referenced_types = referenced_types;
        self
    }

    pub fn has_marker(&self, kind: MarkerKind) -> bool {
        self.markers.iter().any(|m| m.kind == kind)
    }

    pub fn markers_of(&self, kind: MarkerKind) -> impl Iterator<Item = &MarkerUse> {
        self.markers.iter().filter(move |m| m.kind == kind)
    }
}

/// The parse of one source file before cross-file name resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileParse {
    pub package: String,
    /// Fully qualified single-type imports.
    pub imports: Vec<String>,
    /// Package prefixes brought in by `import some.pkg.*;`.
    pub wildcard_imports: Vec<String>,
    pub types: Vec<TypeRecord>,
}

/// Raised by a [`ReferenceReader`] when a type cannot be located among the
/// scanned sources. Non-fatal: the caller abandons that branch of the walk.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("type {0} could not be resolved among the scanned sources")]
pub struct NotResolvable(pub String);

/// Answers marker and subtype queries against the scanned type set.
pub trait TypeIndex {
    /// All types carrying the given marker, in a stable order.
    fn types_with_marker(&self, marker: MarkerKind) -> Vec<&TypeRecord>;

    /// Transitive subtypes (implementations and subclasses) of a type.
    fn subtypes_of(&self, type_name: &str) -> Vec<String>;
}

/// Answers "what type names does this type reference" queries.
pub trait ReferenceReader {
    fn referenced_type_names(&self, type_name: &str) -> Result<&[String], NotResolvable>;
}
