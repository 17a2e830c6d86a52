use std::collections::HashSet;

use crate::core::diagnostics::{Diagnostic, Diagnostics};
use crate::core::error::{FinderError, Result};
use crate::core::model::{ElementId, Model};
use crate::core::registry::ComponentRegistry;
use crate::index::{MarkerKind, ReferenceReader, TypeIndex, TypeRecord};

/// Hard cutoff for the reference walk. Bounds the work on cyclic or
/// pathological reference graphs.
const MAX_WALK_DEPTH: usize = 10;

/// Discovers components in a scanned type set and resolves their
/// dependencies into the model.
///
/// The four phases must run in order: stereotype discovery populates the
/// registry that every later phase reads. `run` does exactly that; the
/// individual phase methods are public for callers that want to interleave
/// their own reporting.
pub struct ComponentFinder<'a> {
    model: &'a mut Model,
    container: ElementId,
    package_to_scan: String,
    registry: ComponentRegistry,
    diagnostics: Diagnostics,
}

impl<'a> ComponentFinder<'a> {
    pub fn new(model: &'a mut Model, container: ElementId, package_to_scan: &str) -> Self {
        Self {
            model,
            container,
            package_to_scan: package_to_scan.to_string(),
            registry: ComponentRegistry::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    /// All four phases in their required order.
    pub fn run(&mut self, index: &dyn TypeIndex, references: &dyn ReferenceReader) -> Result<()> {
        self.find_components(index)?;
        self.find_component_dependencies(index, references);
        self.find_software_system_dependencies(index);
        self.find_container_dependencies(index);
        Ok(())
    }

    /// Phase 1: register a component for every stereotype-marked type.
    pub fn find_components(&mut self, index: &dyn TypeIndex) -> Result<()> {
        self.find_components_for_class(index, MarkerKind::Controller);
        self.find_components_for_interface(index, MarkerKind::Service)?;
        self.find_components_for_interface(index, MarkerKind::Repository)?;
        self.find_components_for_interface(index, MarkerKind::Component)?;
        Ok(())
    }

    /// Class-style stereotype: the marked type is its own contract.
    fn find_components_for_class(&mut self, index: &dyn TypeIndex, marker: MarkerKind) {
        for record in index.types_with_marker(marker) {
            let technology = format!("Spring {}", marker.simple_name());
            self.registry.register(
                self.model,
                self.container,
                &record.fully_qualified_name,
                &technology,
            );
        }
    }

    /// Interface-style stereotype: the contract is the first interface the
    /// marked implementation declares. Components are modeled at the level
    /// of their public contract so multiple implementations do not fragment
    /// the graph.
    fn find_components_for_interface(
        &mut self,
        index: &dyn TypeIndex,
        marker: MarkerKind,
    ) -> Result<()> {
        for record in index.types_with_marker(marker) {
            let contract = record.interfaces.first().ok_or_else(|| {
                FinderError::MissingContractInterface {
                    type_name: record.fully_qualified_name.clone(),
                    marker: marker.simple_name(),
                }
            })?;
            let technology = format!("Spring {}", marker.simple_name());
            self.registry
                .register(self.model, self.container, contract, &technology);
        }
        Ok(())
    }

    /// Phase 2: walk the static reference graph of every component's
    /// contract type and of all its known implementation subtypes.
    pub fn find_component_dependencies(
        &mut self,
        index: &dyn TypeIndex,
        references: &dyn ReferenceReader,
    ) {
        let components: Vec<(String, ElementId)> = self
            .registry
            .all()
            .map(|(name, id)| (name.to_string(), id))
            .collect();

        for (type_name, component) in components {
            self.add_efferent_dependencies(references, component, &type_name);

            for implementation in index.subtypes_of(&type_name) {
                self.add_efferent_dependencies(references, component, &implementation);
            }
        }
    }

    /// Depth-first walk over type references, explicit stack, bounded at
    /// [`MAX_WALK_DEPTH`]. A reference to another registered component is
    /// terminal: the edge is recorded and the walk does not pass through
    /// it. Unregistered in-package types are walked transitively; anything
    /// outside the scanned package is ignored.
    fn add_efferent_dependencies(
        &mut self,
        references: &dyn ReferenceReader,
        component: ElementId,
        implementation_type: &str,
    ) {
        let component_name = self.model.element(component).name.clone();

        let mut visited = HashSet::new();
        visited.insert(implementation_type.to_string());
        let mut stack = vec![(implementation_type.to_string(), 1usize)];

        while let Some((type_name, depth)) = stack.pop() {
            let referenced = match references.referenced_type_names(&type_name) {
                Ok(referenced) => referenced,
                Err(not_resolvable) => {
                    self.diagnostics.record(Diagnostic::UnresolvableReference {
                        type_name: not_resolvable.0,
                        component: component_name.clone(),
                    });
                    continue;
                }
            };

            for referenced_name in referenced {
                if !referenced_name.starts_with(&self.package_to_scan) {
                    continue;
                }

                if let Some(destination) = self.registry.lookup(referenced_name) {
                    if destination != component {
                        self.model.uses(component, destination, "");
                    }
                } else if depth < MAX_WALK_DEPTH && visited.insert(referenced_name.clone()) {
                    stack.push((referenced_name.clone(), depth + 1));
                }
            }
        }
    }

    /// Phase 3: explicit software-system dependency markers.
    pub fn find_software_system_dependencies(&mut self, index: &dyn TypeIndex) {
        for record in index.types_with_marker(MarkerKind::SoftwareSystemDependency) {
            let Some(component) = self.component_for(record) else {
                self.diagnostics.record(Diagnostic::ComponentNotFound {
                    type_name: record.fully_qualified_name.clone(),
                });
                continue;
            };
            let component_name = self.model.element(component).name.clone();

            for marker in record.markers_of(MarkerKind::SoftwareSystemDependency) {
                let target = marker.target.as_deref().unwrap_or("");
                let description = marker.description.as_deref().unwrap_or("");

                match self.model.software_system_by_name(target) {
                    Some(system) => {
                        self.model.uses(component, system, description);
                    }
                    None => {
                        self.diagnostics
                            .record(Diagnostic::UnresolvedSoftwareSystem {
                                component: component_name.clone(),
                                target: target.to_string(),
                            });
                    }
                }
            }
        }
    }

    /// Phase 4: explicit container dependency markers. The target catalog
    /// is the set of containers in the same software system as the
    /// component's own container.
    pub fn find_container_dependencies(&mut self, index: &dyn TypeIndex) {
        for record in index.types_with_marker(MarkerKind::ContainerDependency) {
            let Some(component) = self.component_for(record) else {
                self.diagnostics.record(Diagnostic::ComponentNotFound {
                    type_name: record.fully_qualified_name.clone(),
                });
                continue;
            };
            let component_name = self.model.element(component).name.clone();

            let Some(own_container) = self.model.parent_of(component) else {
                continue;
            };
            let Some(system) = self.model.parent_of(own_container) else {
                continue;
            };

            for marker in record.markers_of(MarkerKind::ContainerDependency) {
                let target = marker.target.as_deref().unwrap_or("");
                let description = marker.description.as_deref().unwrap_or("");

                match self.model.container_with_name(system, target) {
                    Some(target_container) => {
                        self.model.uses(component, target_container, description);
                    }
                    None => {
                        self.diagnostics.record(Diagnostic::UnresolvedContainer {
                            component: component_name.clone(),
                            target: target.to_string(),
                        });
                    }
                }
            }
        }
    }

    /// The component a cross-cutting marker belongs to: the first declared
    /// interface of the marked implementation that is a registered contract.
    fn component_for(&self, record: &TypeRecord) -> Option<ElementId> {
        record
            .interfaces
            .iter()
            .find_map(|name| self.registry.lookup(name))
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }
}
