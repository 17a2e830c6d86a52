use archmap::index::java::JavaSourceParser;
use archmap::index::source::SourceIndex;
use archmap::index::{MarkerKind, TypeIndex, TypeKind, TypeRecord};
use std::path::{Path, PathBuf};

fn parse_source_file(source: &str) -> archmap::index::FileParse {
    JavaSourceParser::new()
        .parse_source(source, Path::new("Test.java"))
        .unwrap()
}

fn record(name: &str, kind: TypeKind) -> TypeRecord {
    TypeRecord::new(name.to_string(), kind, PathBuf::from("Test.java"), 1)
}

#[test]
fn parser_extracts_package_imports_and_type_shape() {
    let parse = parse_source_file(
        r#"
package shop.order;

import shop.billing.InvoiceService;
import shop.common.*;
import java.util.List;

@Service
public class DefaultOrderService implements OrderService, Auditable {
    private final InvoiceService invoices;
    private final List<OrderValidator> validators;

    public Money total(Order order) {
        return Prices.sum(order);
    }
}
"#,
    );

    assert_eq!(parse.package, "shop.order");
    assert!(parse.imports.contains(&"shop.billing.InvoiceService".to_string()));
    assert!(parse.imports.contains(&"java.util.List".to_string()));
    assert_eq!(parse.wildcard_imports, vec!["shop.common".to_string()]);

    assert_eq!(parse.types.len(), 1);
    let record = &parse.types[0];
    assert_eq!(record.fully_qualified_name, "shop.order.DefaultOrderService");
    assert_eq!(record.kind, TypeKind::Class);
    assert_eq!(
        record.interfaces,
        vec!["OrderService".to_string(), "Auditable".to_string()]
    );
    assert!(record.has_marker(MarkerKind::Service));

    // Field types, generics, parameters, return types and static receivers
    // all count as references.
    for expected in ["InvoiceService", "OrderValidator", "Order", "Money", "Prices", "List"] {
        assert!(
            record.referenced_types.contains(&expected.to_string()),
            "missing reference to {}",
            expected
        );
    }
    // The declaration's own name is not a reference to itself.
    assert!(!record
        .referenced_types
        .contains(&"DefaultOrderService".to_string()));
}

#[test]
fn parser_extracts_marker_arguments() {
    let parse = parse_source_file(
        r#"
package shop.order;

@SoftwareSystemDependency(target = "Billing", description = "reads invoices")
@ContainerDependency(target = "Batch Jobs", description = "queues exports")
public class BillingAwareOrders implements Orders {
}
"#,
    );

    let record = &parse.types[0];
    let system = record
        .markers_of(MarkerKind::SoftwareSystemDependency)
        .next()
        .unwrap();
    assert_eq!(system.target.as_deref(), Some("Billing"));
    assert_eq!(system.description.as_deref(), Some("reads invoices"));

    let container = record
        .markers_of(MarkerKind::ContainerDependency)
        .next()
        .unwrap();
    assert_eq!(container.target.as_deref(), Some("Batch Jobs"));
    assert_eq!(container.description.as_deref(), Some("queues exports"));
}

#[test]
fn parser_handles_interfaces_enums_and_superclasses() {
    let parse = parse_source_file(
        r#"
package shop.order;

interface PricedOrders extends Orders, Priced {
}
"#,
    );
    let record = &parse.types[0];
    assert_eq!(record.kind, TypeKind::Interface);
    assert_eq!(
        record.interfaces,
        vec!["Orders".to_string(), "Priced".to_string()]
    );

    let parse = parse_source_file(
        r#"
package shop.order;

public class SpecialOrders extends DefaultOrders {
}
"#,
    );
    assert_eq!(parse.types[0].superclass.as_deref(), Some("DefaultOrders"));

    let parse = parse_source_file(
        r#"
package shop.order;

public enum Status implements Describable {
    OPEN, CLOSED;
}
"#,
    );
    assert_eq!(parse.types[0].kind, TypeKind::Enum);
    assert_eq!(parse.types[0].interfaces, vec!["Describable".to_string()]);
}

#[test]
fn index_resolves_names_against_the_whole_scan() {
    let order_file = JavaSourceParser::new()
        .parse_source(
            r#"
package shop.order;

import shop.billing.InvoiceService;
import shop.common.*;

@Service
public class DefaultOrderService implements OrderService {
    private InvoiceService invoices;
    private Money total;
    private OrderValidator validator;
    private String label;
}
"#,
            Path::new("DefaultOrderService.java"),
        )
        .unwrap();
    let contract_file = JavaSourceParser::new()
        .parse_source(
            r#"
package shop.order;

public interface OrderService {
}
"#,
            Path::new("OrderService.java"),
        )
        .unwrap();
    let money_file = JavaSourceParser::new()
        .parse_source(
            r#"
package shop.common;

public class Money {
}
"#,
            Path::new("Money.java"),
        )
        .unwrap();

    let index = SourceIndex::from_file_parses(vec![order_file, contract_file, money_file]);

    let record = index.get("shop.order.DefaultOrderService").unwrap();
    // Explicit import.
    assert!(record
        .referenced_types
        .contains(&"shop.billing.InvoiceService".to_string()));
    // Wildcard import resolved against a type the scan knows.
    assert!(record
        .referenced_types
        .contains(&"shop.common.Money".to_string()));
    // Unknown simple name falls back to the file's own package.
    assert!(record
        .referenced_types
        .contains(&"shop.order.OrderValidator".to_string()));
    // java.lang stays out of the scanned package.
    assert!(record
        .referenced_types
        .contains(&"java.lang.String".to_string()));
    // The declared interface resolved to the sibling type.
    assert_eq!(record.interfaces, vec!["shop.order.OrderService".to_string()]);
}

#[test]
fn subtype_closure_is_transitive() {
    let mut index = SourceIndex::new();
    index.insert(record("shop.Orders", TypeKind::Interface));
    index.insert(
        record("shop.DefaultOrders", TypeKind::Class)
            .with_interfaces(vec!["shop.Orders".to_string()]),
    );
    index.insert(
        record("shop.SpecialOrders", TypeKind::Class)
            .with_superclass("shop.DefaultOrders".to_string()),
    );

    let subtypes = index.subtypes_of("shop.Orders");
    assert_eq!(
        subtypes,
        vec!["shop.DefaultOrders".to_string(), "shop.SpecialOrders".to_string()]
    );
    assert!(index.subtypes_of("shop.SpecialOrders").is_empty());
}

#[test]
fn types_with_marker_is_sorted_and_filtered() {
    let mut index = SourceIndex::new();
    index.insert(
        record("shop.B", TypeKind::Class)
            .with_marker(archmap::index::MarkerUse::new(MarkerKind::Controller)),
    );
    index.insert(
        record("shop.A", TypeKind::Class)
            .with_marker(archmap::index::MarkerUse::new(MarkerKind::Controller)),
    );
    index.insert(record("shop.C", TypeKind::Class));

    let names: Vec<&str> = index
        .types_with_marker(MarkerKind::Controller)
        .iter()
        .map(|r| r.fully_qualified_name.as_str())
        .collect();
    assert_eq!(names, vec!["shop.A", "shop.B"]);
}
