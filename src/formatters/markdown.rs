use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::core::model::{ElementKind, Model};

/// Human-readable architecture document: the system/container/component
/// hierarchy followed by every recorded dependency.
pub struct MarkdownFormatter;

impl MarkdownFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn format_to_file(&self, model: &Model, output_path: &Path) -> Result<()> {
        fs::write(output_path, self.format(model))?;
        Ok(())
    }

    pub fn format(&self, model: &Model) -> String {
        let mut out = String::new();
        out.push_str("# Architecture\n");

        for system in model
            .elements()
            .filter(|e| e.kind == ElementKind::SoftwareSystem)
        {
            out.push_str(&format!("\n## {}\n", system.name));
            if !system.description.is_empty() {
                out.push_str(&format!("\n{}\n", system.description));
            }

            for container in model
                .children_of(system.id)
                .filter(|e| e.kind == ElementKind::Container)
            {
                match &container.technology {
                    Some(technology) => {
                        out.push_str(&format!("\n### {} ({})\n", container.name, technology));
                    }
                    None => out.push_str(&format!("\n### {}\n", container.name)),
                }
                if !container.description.is_empty() {
                    out.push_str(&format!("\n{}\n", container.description));
                }

                let mut components: Vec<_> = model
                    .children_of(container.id)
                    .filter(|e| e.kind == ElementKind::Component)
                    .collect();
                components.sort_by(|a, b| a.name.cmp(&b.name));

                if !components.is_empty() {
                    out.push('\n');
                }
                for component in components {
                    let technology = component.technology.as_deref().unwrap_or("");
                    out.push_str(&format!(
                        "- **{}** `{}` [{}]\n",
                        simple_name(&component.name),
                        component.name,
                        technology
                    ));
                }
            }
        }

        if !model.relationships().is_empty() {
            out.push_str("\n## Dependencies\n\n");
            let mut lines: Vec<String> = model
                .relationships()
                .iter()
                .map(|relationship| {
                    let source = model.element(relationship.source);
                    let target = model.element(relationship.target);
                    if relationship.description.is_empty() {
                        format!(
                            "- {} -> {}\n",
                            simple_name(&source.name),
                            simple_name(&target.name)
                        )
                    } else {
                        format!(
                            "- {} -> {}: {}\n",
                            simple_name(&source.name),
                            simple_name(&target.name),
                            relationship.description
                        )
                    }
                })
                .collect();
            lines.sort();
            for line in lines {
                out.push_str(&line);
            }
        }

        out
    }
}

impl Default for MarkdownFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Trailing segment of a dotted type name; non-type element names pass
/// through unchanged.
fn simple_name(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}
