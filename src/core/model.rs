use serde::{Deserialize, Serialize};

/// Handle to an element in a [`Model`]. Cheap to copy and only meaningful
/// for the model that issued it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ElementId(usize);

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ElementKind {
    SoftwareSystem,
    Container,
    Component,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    pub kind: ElementKind,
    pub name: String,
    pub description: String,
    pub technology: Option<String>,
    pub parent: Option<ElementId>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Relationship {
    pub source: ElementId,
    pub target: ElementId,
    pub description: String,
}

/// Arena-owned architecture model: software systems contain containers,
/// containers contain components, and relationships are stored centrally.
/// One model instance is owned by one discovery run; elements are never
/// deleted.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Model {
    elements: Vec<Element>,
    relationships: Vec<Relationship>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_software_system(&mut self, name: &str, description: &str) -> ElementId {
        self.add_element(ElementKind::SoftwareSystem, name, description, None, None)
    }

    pub fn add_container(
        &mut self,
        system: ElementId,
        name: &str,
        description: &str,
        technology: &str,
    ) -> ElementId {
        let technology = if technology.is_empty() {
            None
        } else {
            Some(technology.to_string())
        };
        self.add_element(
            ElementKind::Container,
            name,
            description,
            technology,
            Some(system),
        )
    }

    pub fn add_component(
        &mut self,
        container: ElementId,
        name: &str,
        description: &str,
    ) -> ElementId {
        self.add_element(
            ElementKind::Component,
            name,
            description,
            None,
            Some(container),
        )
    }

    fn add_element(
        &mut self,
        kind: ElementKind,
        name: &str,
        description: &str,
        technology: Option<String>,
        parent: Option<ElementId>,
    ) -> ElementId {
        let id = ElementId(self.elements.len());
        self.elements.push(Element {
            id,
            kind,
            name: name.to_string(),
            description: description.to_string(),
            technology,
            parent,
        });
        id
    }

    pub fn element(&self, id: ElementId) -> &Element {
        &self.elements[id.0]
    }

    pub fn set_technology(&mut self, id: ElementId, technology: &str) {
        self.elements[id.0].technology = Some(technology.to_string());
    }

    #[allow(dead_code)]
    pub fn set_description(&mut self, id: ElementId, description: &str) {
        self.elements[id.0].description = description.to_string();
    }

    pub fn parent_of(&self, id: ElementId) -> Option<ElementId> {
        self.elements[id.0].parent
    }

    /// Record `source uses target`. An edge is stored at most once per
    /// (source, target) pair; repeated calls keep the first description.
    pub fn uses(&mut self, source: ElementId, target: ElementId, description: &str) -> bool {
        if self
            .relationships
            .iter()
            .any(|r| r.source == source && r.target == target)
        {
            return false;
        }
        self.relationships.push(Relationship {
            source,
            target,
            description: description.to_string(),
        });
        true
    }

    pub fn software_system_by_name(&self, name: &str) -> Option<ElementId> {
        self.elements
            .iter()
            .find(|e| e.kind == ElementKind::SoftwareSystem && e.name == name)
            .map(|e| e.id)
    }

    /// Named container lookup scoped to one software system.
    pub fn container_with_name(&self, system: ElementId, name: &str) -> Option<ElementId> {
        self.elements
            .iter()
            .find(|e| {
                e.kind == ElementKind::Container && e.parent == Some(system) && e.name == name
            })
            .map(|e| e.id)
    }

    pub fn children_of(&self, parent: ElementId) -> impl Iterator<Item = &Element> {
        self.elements
            .iter()
            .filter(move |e| e.parent == Some(parent))
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter()
    }

    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }
}

/// Declarative model definition loaded from JSON: the software systems and
/// containers that exist before discovery runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelDefinition {
    pub systems: Vec<SystemDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub containers: Vec<ContainerDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub technology: String,
}

impl ModelDefinition {
    pub fn build(&self) -> Model {
        let mut model = Model::new();
        for system in &self.systems {
            let system_id = model.add_software_system(&system.name, &system.description);
            for container in &system.containers {
                model.add_container(
                    system_id,
                    &container.name,
                    &container.description,
                    &container.technology,
                );
            }
        }
        model
    }
}
