//! Lookup and resolution over the shared storefront model.

use crate::helpers::model_helpers::*;
use crate::helpers::source_fixtures::*;
use edm::hir::{
    CaseInsensitivePolicy, NavigationTarget, StrictPolicy, TargetRef, TypeReferenceKind,
    UnqualifiedNamePolicy,
};
use rstest::rstest;

#[test]
fn test_storefront_is_valid() {
    assert!(edm::validate(&SHOP).is_empty());
}

#[test]
fn test_inherited_members() {
    let customer = structured(&SHOP, "Shop.Customer");
    let names: Vec<_> = customer.properties().iter().map(|p| p.name()).collect();
    assert_eq!(names, ["Id", "Name", "Orders"]);
    assert!(customer.declared_key().is_none());
    let key: Vec<_> = customer.key().expect("inherited key").iter().map(|p| p.name()).collect();
    assert_eq!(key, ["Id"]);

    let entity = structured(&SHOP, "Shop.Entity");
    let mut derived: Vec<_> = entity.derived_types().iter().map(|t| t.name()).collect();
    derived.sort();
    assert_eq!(derived, ["Customer", "Order"]);
}

#[test]
fn test_navigation_partners_resolve() {
    let customer = structured(&SHOP, "Shop.Customer");
    let orders = customer
        .find_property("Orders")
        .and_then(|p| p.as_navigation())
        .expect("Orders");
    assert!(orders.is_collection());
    assert_eq!(orders.target_type().map(|t| t.name()), Some("Order"));

    let partner = orders.partner().expect("partner");
    assert_eq!(partner.name(), "Customer");
    assert_eq!(partner.partner().map(|p| p.name()), Some("Orders"));
}

#[test]
fn test_enum_members_number_from_the_last_value() {
    let status = SHOP
        .find_type("Shop.Status")
        .and_then(|r| r.declared())
        .and_then(|id| SHOP.element(id).as_enum())
        .expect("Status");
    let values: Vec<_> = status.members().iter().map(|m| (m.name(), m.value())).collect();
    assert_eq!(values, [("Open", 0), ("Shipped", 4), ("Closed", 5)]);
}

#[test]
fn test_bound_operations_include_base_bindings() {
    let order = SHOP.resolve_type("Shop.Order");
    let bound: Vec<_> = SHOP.find_bound_operations(&order).iter().map(|op| op.name()).collect();
    assert_eq!(bound, ["Ship"]);

    let orders = SHOP.resolve_type("Collection(Shop.Order)");
    assert!(SHOP.find_bound_operations(&orders).is_empty());
    assert_eq!(SHOP.find_operations("Shop.Ship").len(), 1);
}

#[test]
fn test_container_bindings_and_targets() {
    let container = SHOP.entity_container().expect("container");
    assert_eq!(container.full_name(), "Shop.Default");
    let customers = container.find_entity_set("Customers").expect("Customers");
    assert_eq!(customers.entity_type().map(|t| t.name()), Some("Customer"));

    match customers.find_navigation_target_by_path("Orders") {
        NavigationTarget::Source(source) => assert_eq!(source.name(), "Orders"),
        other => panic!("expected a source, got {:?}", other),
    }
    assert!(matches!(
        customers.find_navigation_target_by_path("Missing"),
        NavigationTarget::Unbound
    ));
}

#[test]
fn test_out_of_line_annotation_targets_a_property() {
    let annotations = SHOP.find_vocabulary_annotations("Shop.Customer/Name");
    assert_eq!(annotations.len(), 1);
    let annotation = &annotations[0];
    assert!(!annotation.is_inline());
    assert_eq!(annotation.term_definition().map(|t| t.name()), Some("Label"));
    assert!(matches!(annotation.target(), Some(TargetRef::Property(_))));
}

#[test]
fn test_type_names_print_resolved_references() {
    let reference = SHOP.resolve_type("Collection(Shop.Customer)");
    assert!(matches!(reference.kind, TypeReferenceKind::Collection(_)));
    assert_eq!(SHOP.type_name(&reference), "Collection(Shop.Customer)");
    assert_eq!(SHOP.type_name(&SHOP.resolve_type("Shop.Nope")), "Shop.Nope");
}

#[rstest]
#[case("Shop.Customer", true)]
#[case("shop.customer", false)]
#[case("Customer", false)]
fn test_default_policy_is_exact(#[case] name: &str, #[case] found: bool) {
    assert_eq!(SHOP.find_type_with(name, &StrictPolicy).is_some(), found);
}

#[rstest]
#[case("shop.customer")]
#[case("SHOP.CUSTOMER")]
fn test_case_insensitive_policy(#[case] name: &str) {
    let found = SHOP.find_type_with(name, &CaseInsensitivePolicy).and_then(|r| r.declared());
    assert_eq!(found, Some(structured(&SHOP, "Shop.Customer").id()));
}

#[test]
fn test_unqualified_policy_accepts_simple_names() {
    assert!(SHOP.find_type_with("Order", &UnqualifiedNamePolicy).is_some());
    assert!(SHOP.find_type_with("Order", &StrictPolicy).is_none());
}

#[test]
fn test_forcing_everything_twice_is_stable() {
    let model = model_from_xml(&SHOP_XML);
    model.force_all();
    let before = edm::validate(&model);
    model.force_all();
    assert_eq!(edm::validate(&model), before);
    assert!(before.is_empty());
}
