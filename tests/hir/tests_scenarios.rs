//! End-to-end checks over small, complete documents.

use crate::helpers::model_helpers::*;
use crate::helpers::source_fixtures::*;
use edm::ErrorCode;
use edm::hir::MaxLength;

#[test]
fn test_keyed_customer_is_valid() {
    let model = model_from_xml(&edmx(&schema("NS", CUSTOMER)));
    assert!(edm::validate(&model).is_empty());

    let customer = structured(&model, "NS.Customer");
    let key: Vec<_> = customer
        .declared_key()
        .expect("declared key")
        .iter()
        .map(|p| p.name())
        .collect();
    assert_eq!(key, ["Id"]);

    let name = customer.find_property("Name").expect("Name");
    assert_eq!(name.type_ref().max_length(), Some(MaxLength::Bounded(50)));
}

#[test]
fn test_undeclared_type_becomes_a_named_placeholder() {
    let body = r#"
<EntityType Name="Customer">
  <Key><PropertyRef Name="Id"/></Key>
  <Property Name="Id" Type="Edm.Int32" Nullable="false"/>
  <Property Name="Pet" Type="NS.Ghost"/>
</EntityType>"#;
    let model = model_from_xml(&edmx(&schema("NS", body)));

    let errors = edm::validate(&model);
    assert_eq!(codes(&errors), [ErrorCode::UnresolvedType]);
    assert!(errors[0].message.contains("NS.Ghost"));

    let pet = structured(&model, "NS.Customer").find_property("Pet").expect("Pet");
    let placeholder = pet.type_ref().unresolved().expect("placeholder");
    assert_eq!(&*model.placeholder(placeholder).full_name, "NS.Ghost");
}

#[test]
fn test_duplicate_types_stay_walkable() {
    let model = model_from_xml(&edmx(&schema("NS", &format!("{CUSTOMER}{CUSTOMER}"))));

    let customers: Vec<_> = model
        .elements()
        .filter_map(|e| e.as_structured())
        .collect();
    assert_eq!(customers.len(), 2);
    for customer in &customers {
        assert_eq!(customer.properties().len(), 2);
        assert!(customer.key().is_some());
    }

    let errors = edm::validate(&model);
    assert_eq!(codes(&errors), [ErrorCode::DuplicateName]);
    assert_eq!(errors[0].related.len(), 1);
}

#[test]
fn test_errors_point_at_the_declaring_tag() {
    let text = edmx(&schema(
        "NS",
        r#"
<EntityType Name="Keyless">
  <Property Name="Id" Type="Edm.Int32"/>
</EntityType>"#,
    ));
    let model = model_from_xml(&text);
    let errors = edm::validate(&model);
    assert_eq!(codes(&errors), [ErrorCode::MissingKeyOnEntityType]);

    let location = errors[0].location.expect("location");
    let line = text.lines().nth(location.position.line).expect("line");
    assert!(line[location.position.column..].starts_with("<EntityType"));
}
