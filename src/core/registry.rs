use std::collections::HashMap;

use crate::core::model::{ElementId, Model};

/// Maps contract type names to their components: the single source of truth
/// for "is this type a known component" during one discovery run.
///
/// Re-registering a contract type name is not guarded; the map write wins.
/// Single-threaded use only.
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    components_by_type: HashMap<String, ElementId>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a component for the contract type in the given container and
    /// remember it under the contract type name.
    pub fn register(
        &mut self,
        model: &mut Model,
        container: ElementId,
        contract_type_name: &str,
        technology: &str,
    ) -> ElementId {
        let component = model.add_component(container, contract_type_name, "");
        model.set_technology(component, technology);
        self.components_by_type
            .insert(contract_type_name.to_string(), component);
        component
    }

    /// Exact-match lookup by contract type name.
    pub fn lookup(&self, type_name: &str) -> Option<ElementId> {
        self.components_by_type.get(type_name).copied()
    }

    /// Every registered component, order undefined.
    pub fn all(&self) -> impl Iterator<Item = (&str, ElementId)> {
        self.components_by_type
            .iter()
            .map(|(name, id)| (name.as_str(), *id))
    }

    pub fn len(&self) -> usize {
        self.components_by_type.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.components_by_type.is_empty()
    }
}
