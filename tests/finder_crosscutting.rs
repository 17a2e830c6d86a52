use archmap::core::{ComponentFinder, Diagnostic, ElementKind, Model};
use archmap::index::source::SourceIndex;
use archmap::index::{MarkerKind, MarkerUse, TypeKind, TypeRecord};
use std::path::PathBuf;

fn class(name: &str) -> TypeRecord {
    TypeRecord::new(name.to_string(), TypeKind::Class, PathBuf::from("Test.java"), 1)
}

/// Online Store (Web Application + Batch Jobs) next to a separate Billing
/// system with its own Reporting container.
fn setup_model() -> (Model, archmap::core::ElementId) {
    let mut model = Model::new();
    let store = model.add_software_system("Online Store", "");
    let web = model.add_container(store, "Web Application", "", "Java");
    model.add_container(store, "Batch Jobs", "", "Java");
    let billing = model.add_software_system("Billing", "");
    model.add_container(billing, "Reporting", "", "Java");
    (model, web)
}

fn orders_index() -> SourceIndex {
    let mut index = SourceIndex::new();
    index.insert(
        class("shop.order.DefaultOrders")
            .with_interfaces(vec!["shop.order.Orders".to_string()])
            .with_marker(MarkerUse::new(MarkerKind::Service)),
    );
    index
}

#[test]
fn software_system_dependency_records_a_described_edge() {
    let mut index = orders_index();
    index.insert(
        class("shop.order.BillingAwareOrders")
            .with_interfaces(vec!["shop.order.Orders".to_string()])
            .with_marker(
                MarkerUse::new(MarkerKind::SoftwareSystemDependency)
                    .with_target("Billing".to_string())
                    .with_description("reads invoices".to_string()),
            ),
    );

    let (mut model, container) = setup_model();
    let mut finder = ComponentFinder::new(&mut model, container, "shop");
    finder.find_components(&index).unwrap();
    finder.find_software_system_dependencies(&index);
    drop(finder);

    assert_eq!(model.relationships().len(), 1);
    let relationship = &model.relationships()[0];
    assert_eq!(model.element(relationship.source).name, "shop.order.Orders");
    assert_eq!(model.element(relationship.target).name, "Billing");
    assert_eq!(
        model.element(relationship.target).kind,
        ElementKind::SoftwareSystem
    );
    assert_eq!(relationship.description, "reads invoices");
}

#[test]
fn unknown_software_system_target_is_skipped_without_failure() {
    let mut index = orders_index();
    index.insert(
        class("shop.order.BillingAwareOrders")
            .with_interfaces(vec!["shop.order.Orders".to_string()])
            .with_marker(
                MarkerUse::new(MarkerKind::SoftwareSystemDependency)
                    .with_target("Biling".to_string())
                    .with_description("reads invoices".to_string()),
            ),
    );

    let (mut model, container) = setup_model();
    let mut finder = ComponentFinder::new(&mut model, container, "shop");
    finder.find_components(&index).unwrap();
    finder.find_software_system_dependencies(&index);

    assert!(finder
        .diagnostics()
        .entries()
        .iter()
        .any(|d| matches!(d, Diagnostic::UnresolvedSoftwareSystem { target, .. } if target == "Biling")));
    drop(finder);
    assert!(model.relationships().is_empty());
}

#[test]
fn container_dependency_targets_a_sibling_container() {
    let mut index = orders_index();
    index.insert(
        class("shop.order.ExportingOrders")
            .with_interfaces(vec!["shop.order.Orders".to_string()])
            .with_marker(
                MarkerUse::new(MarkerKind::ContainerDependency)
                    .with_target("Batch Jobs".to_string())
                    .with_description("queues exports".to_string()),
            ),
    );

    let (mut model, container) = setup_model();
    let mut finder = ComponentFinder::new(&mut model, container, "shop");
    finder.find_components(&index).unwrap();
    finder.find_container_dependencies(&index);
    drop(finder);

    assert_eq!(model.relationships().len(), 1);
    let relationship = &model.relationships()[0];
    assert_eq!(model.element(relationship.target).name, "Batch Jobs");
    assert_eq!(model.element(relationship.target).kind, ElementKind::Container);
    assert_eq!(relationship.description, "queues exports");
}

#[test]
fn container_dependency_does_not_cross_system_boundaries() {
    // "Reporting" exists, but under the Billing system, not as a sibling of
    // the component's own container.
    let mut index = orders_index();
    index.insert(
        class("shop.order.ReportingOrders")
            .with_interfaces(vec!["shop.order.Orders".to_string()])
            .with_marker(
                MarkerUse::new(MarkerKind::ContainerDependency)
                    .with_target("Reporting".to_string()),
            ),
    );

    let (mut model, container) = setup_model();
    let mut finder = ComponentFinder::new(&mut model, container, "shop");
    finder.find_components(&index).unwrap();
    finder.find_container_dependencies(&index);

    assert!(finder
        .diagnostics()
        .entries()
        .iter()
        .any(|d| matches!(d, Diagnostic::UnresolvedContainer { target, .. } if target == "Reporting")));
    drop(finder);
    assert!(model.relationships().is_empty());
}

#[test]
fn marker_on_type_without_a_registered_contract_is_skipped() {
    let mut index = orders_index();
    index.insert(
        class("shop.misc.Stray")
            .with_interfaces(vec!["shop.misc.NotAComponent".to_string()])
            .with_marker(
                MarkerUse::new(MarkerKind::SoftwareSystemDependency)
                    .with_target("Billing".to_string()),
            ),
    );

    let (mut model, container) = setup_model();
    let mut finder = ComponentFinder::new(&mut model, container, "shop");
    finder.find_components(&index).unwrap();
    finder.find_software_system_dependencies(&index);

    assert!(finder
        .diagnostics()
        .entries()
        .iter()
        .any(|d| matches!(d, Diagnostic::ComponentNotFound { type_name } if type_name == "shop.misc.Stray")));
    drop(finder);
    assert!(model.relationships().is_empty());
}

#[test]
fn owning_component_is_the_first_registered_interface() {
    let mut index = orders_index();
    // First declared interface is not a component; the second is.
    index.insert(
        class("shop.order.AuditedOrders")
            .with_interfaces(vec![
                "shop.order.Audited".to_string(),
                "shop.order.Orders".to_string(),
            ])
            .with_marker(
                MarkerUse::new(MarkerKind::SoftwareSystemDependency)
                    .with_target("Billing".to_string())
                    .with_description("posts ledger entries".to_string()),
            ),
    );

    let (mut model, container) = setup_model();
    let mut finder = ComponentFinder::new(&mut model, container, "shop");
    finder.find_components(&index).unwrap();
    finder.find_software_system_dependencies(&index);
    drop(finder);

    assert_eq!(model.relationships().len(), 1);
    assert_eq!(
        model.element(model.relationships()[0].source).name,
        "shop.order.Orders"
    );
}
