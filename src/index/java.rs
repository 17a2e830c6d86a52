use anyhow::Result;
use std::collections::BTreeSet;
use std::path::Path;
use tree_sitter::Node as TSNode;

use super::common::{extract_text, find_child_by_kind, TreeSitterParser};
use super::{FileParse, MarkerKind, MarkerUse, TypeKind, TypeRecord};

/// Extracts type declarations, markers and type references from Java sources.
///
/// Only top-level type declarations become records; references found inside
/// nested declarations are attributed to the enclosing top-level type.
pub struct JavaSourceParser;

impl JavaSourceParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse_file(&self, file_path: &Path) -> Result<FileParse> {
        let mut parser = TreeSitterParser::new(tree_sitter_java::language())?;
        let (tree, source) = parser.parse_file(file_path)?;
        self.extract(&tree.root_node(), source.as_bytes(), file_path)
    }

    #[allow(dead_code)]
    pub fn parse_source(&self, source: &str, file_path: &Path) -> Result<FileParse> {
        let mut parser = TreeSitterParser::new(tree_sitter_java::language())?;
        let tree = parser.parse_source(source, file_path)?;
        self.extract(&tree.root_node(), source.as_bytes(), file_path)
    }

    fn extract(&self, root: &TSNode, source: &[u8], file_path: &Path) -> Result<FileParse> {
        let package = self.extract_package(root, source);
        let (imports, wildcard_imports) = self.extract_imports(root, source);

        let mut types = Vec::new();
        let mut cursor = root.walk();
        for child in root.children(&mut cursor) {
            let kind = match child.kind() {
                "class_declaration" => TypeKind::Class,
                "interface_declaration" => TypeKind::Interface,
                "enum_declaration" => TypeKind::Enum,
                _ => continue,
            };
            if let Some(record) = self.process_type(&child, kind, source, &package, file_path) {
                types.push(record);
            }
        }

        Ok(FileParse {
            package,
            imports,
            wildcard_imports,
            types,
        })
    }

    fn extract_package(&self, root: &TSNode, source: &[u8]) -> String {
        let mut cursor = root.walk();
        for child in root.children(&mut cursor) {
            if child.kind() == "package_declaration" {
                for name in child.children(&mut child.walk()) {
                    if name.kind() == "scoped_identifier" || name.kind() == "identifier" {
                        return extract_text(&name, source).to_string();
                    }
                }
            }
        }
        String::new()
    }

    fn extract_imports(&self, root: &TSNode, source: &[u8]) -> (Vec<String>, Vec<String>) {
        let mut imports = Vec::new();
        let mut wildcard_imports = Vec::new();

        let mut cursor = root.walk();
        for child in root.children(&mut cursor) {
            if child.kind() != "import_declaration" {
                continue;
            }
            let mut name = None;
            let mut wildcard = false;
            for part in child.children(&mut child.walk()) {
                match part.kind() {
                    "scoped_identifier" | "identifier" => {
                        name = Some(extract_text(&part, source).to_string());
                    }
                    "asterisk" => wildcard = true,
                    _ => {}
                }
            }
            if let Some(name) = name {
                if wildcard {
                    wildcard_imports.push(name);
                } else {
                    imports.push(name);
                }
            }
        }

        (imports, wildcard_imports)
    }

    fn process_type(
        &self,
        type_node: &TSNode,
        kind: TypeKind,
        source: &[u8],
        package: &str,
        file_path: &Path,
    ) -> Option<TypeRecord> {
        let name_node = find_child_by_kind(type_node, "identifier")?;
        let simple_name = extract_text(&name_node, source);
        let fully_qualified_name = qualify(package, simple_name);
        let line_number = type_node.start_position().row + 1;

        let mut record = TypeRecord::new(
            fully_qualified_name,
            kind,
            file_path.to_path_buf(),
            line_number,
        )
        .with_interfaces(self.extract_interfaces(type_node, source))
        .with_references(self.collect_references(type_node, source, simple_name));

        if let Some(superclass) = self.extract_superclass(type_node, source) {
            record = record.with_superclass(superclass);
        }
        for marker in self.extract_markers(type_node, source) {
            record = record.with_marker(marker);
        }

        Some(record)
    }

    /// Annotations on the declaration's modifier list.
    fn extract_markers(&self, type_node: &TSNode, source: &[u8]) -> Vec<MarkerUse> {
        let mut markers = Vec::new();
        let Some(modifiers) = find_child_by_kind(type_node, "modifiers") else {
            return markers;
        };

        for child in modifiers.children(&mut modifiers.walk()) {
            match child.kind() {
                "marker_annotation" | "annotation" => {}
                _ => continue,
            }
            let Some(name_node) = child.child_by_field_name("name") else {
                continue;
            };
            let name = extract_text(&name_node, source);
            let simple = name.rsplit('.').next().unwrap_or(name);
            let Some(kind) = MarkerKind::from_simple_name(simple) else {
                continue;
            };

            let mut marker = MarkerUse::new(kind);
            if let Some(arguments) = child.child_by_field_name("arguments") {
                for pair in arguments.children(&mut arguments.walk()) {
                    if pair.kind() != "element_value_pair" {
                        continue;
                    }
                    let (Some(key_node), Some(value_node)) = (
                        pair.child_by_field_name("key"),
                        pair.child_by_field_name("value"),
                    ) else {
                        continue;
                    };
                    let value = unquote(extract_text(&value_node, source));
                    match extract_text(&key_node, source) {
                        "target" => marker = marker.with_target(value),
                        "description" => marker = marker.with_description(value),
                        _ => {}
                    }
                }
            }
            markers.push(marker);
        }

        markers
    }

    /// `implements` list for classes and enums, `extends` list for interfaces,
    /// in declaration order.
    fn extract_interfaces(&self, type_node: &TSNode, source: &[u8]) -> Vec<String> {
        let mut interfaces = Vec::new();

        let list_parent = find_child_by_kind(type_node, "super_interfaces")
            .or_else(|| find_child_by_kind(type_node, "extends_interfaces"));
        let Some(list_parent) = list_parent else {
            return interfaces;
        };
        // "interface_type_list" through tree-sitter-java 0.20, "type_list" in
        // later grammars.
        let list = find_child_by_kind(&list_parent, "interface_type_list")
            .or_else(|| find_child_by_kind(&list_parent, "type_list"));
        let Some(list) = list else {
            return interfaces;
        };

        for entry in list.children(&mut list.walk()) {
            if let Some(name) = type_name_of(&entry, source) {
                interfaces.push(name);
            }
        }

        interfaces
    }

    fn extract_superclass(&self, type_node: &TSNode, source: &[u8]) -> Option<String> {
        let superclass = find_child_by_kind(type_node, "superclass")?;
        for entry in superclass.children(&mut superclass.walk()) {
            if let Some(name) = type_name_of(&entry, source) {
                return Some(name);
            }
        }
        None
    }

    /// Every type name the declaration references, deduplicated in a stable
    /// order. Approximates the compiled constant pool with source-level type
    /// uses: declared types, generics, object creation, and static accesses
    /// on capitalized identifiers.
    fn collect_references(
        &self,
        type_node: &TSNode,
        source: &[u8],
        own_simple_name: &str,
    ) -> Vec<String> {
        let mut found = BTreeSet::new();
        self.walk_references(type_node, source, &mut found);
        found.remove(own_simple_name);
        found.into_iter().collect()
    }

    fn walk_references(&self, node: &TSNode, source: &[u8], found: &mut BTreeSet<String>) {
        match node.kind() {
            "type_identifier" => {
                found.insert(extract_text(node, source).to_string());
                return;
            }
            "scoped_type_identifier" => {
                // Qualified type use: take the full name, skip the parts.
                found.insert(extract_text(node, source).to_string());
                return;
            }
            "method_invocation" | "field_access" => {
                // Static member access reads as a capitalized receiver.
                if let Some(object) = node.child_by_field_name("object") {
                    if object.kind() == "identifier" {
                        let text = extract_text(&object, source);
                        if text.chars().next().is_some_and(char::is_uppercase) {
                            found.insert(text.to_string());
                        }
                    }
                }
            }
            _ => {}
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.walk_references(&child, source, found);
        }
    }
}

impl Default for JavaSourceParser {
    fn default() -> Self {
        Self::new()
    }
}

fn qualify(package: &str, simple_name: &str) -> String {
    if package.is_empty() {
        simple_name.to_string()
    } else {
        format!("{}.{}", package, simple_name)
    }
}

fn unquote(text: &str) -> String {
    text.trim_matches('"').to_string()
}

/// Base type name of a list entry, erasing generics.
fn type_name_of(node: &TSNode, source: &[u8]) -> Option<String> {
    match node.kind() {
        "type_identifier" | "scoped_type_identifier" => {
            Some(extract_text(node, source).to_string())
        }
        "generic_type" => {
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                match child.kind() {
                    "type_identifier" | "scoped_type_identifier" => {
                        return Some(extract_text(&child, source).to_string());
                    }
                    _ => {}
                }
            }
            None
        }
        _ => None,
    }
}
