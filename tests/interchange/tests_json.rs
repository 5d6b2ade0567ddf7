//! CSDL JSON read end to end.

use crate::helpers::model_helpers::*;
use edm::hir::{MaxLength, NavigationTarget};
use edm::interchange::CsdlReader;
use edm::{EdmVersion, EdmxVersion, ErrorCode};

const STORE: &str = r#"{
  "$Version": "4.01",
  "$EntityContainer": "Store.Default",
  "Store": {
    "Status": { "$Kind": "EnumType", "Open": 0, "Closed": 1 },
    "Product": {
      "$Kind": "EntityType",
      "$Key": ["Id"],
      "Id": { "$Type": "Edm.Int32" },
      "Name": { "$MaxLength": 40 },
      "Tags": { "$Collection": true, "$Nullable": true },
      "Status": { "$Type": "Store.Status" },
      "Supplier": { "$Kind": "NavigationProperty", "$Type": "Store.Supplier", "$Nullable": true }
    },
    "Supplier": {
      "$Kind": "EntityType",
      "$Key": ["Id"],
      "Id": { "$Type": "Edm.Int32" }
    },
    "Default": {
      "$Kind": "EntityContainer",
      "Products": {
        "$Collection": true,
        "$Type": "Store.Product",
        "$NavigationPropertyBinding": { "Supplier": "Suppliers" }
      },
      "Suppliers": { "$Collection": true, "$Type": "Store.Supplier" }
    },
    "$Annotations": {
      "Store.Product/Name": { "@Store.Caption": "Product name" }
    },
    "Caption": { "$Kind": "Term" }
  }
}"#;

#[test]
fn test_reads_a_valid_model() {
    let model = CsdlReader::new().parse_json(STORE).expect("readable");
    assert!(edm::validate(&model).is_empty(), "{:?}", edm::validate(&model));
    assert_eq!(model.edmx_version(), Some(EdmxVersion::V4_01));
    assert_eq!(model.edm_version(), EdmVersion::V4_01);
}

#[test]
fn test_property_defaults() {
    let model = CsdlReader::new().parse_json(STORE).expect("readable");
    let product = structured(&model, "Store.Product");

    let id = product.find_property("Id").expect("Id");
    assert!(!id.type_ref().nullable);

    let name = product.find_property("Name").expect("Name");
    assert_eq!(model.type_name(name.type_ref()), "Edm.String");
    assert_eq!(name.type_ref().max_length(), Some(MaxLength::Bounded(40)));

    let tags = product.find_property("Tags").expect("Tags");
    assert_eq!(model.type_name(tags.type_ref()), "Collection(Edm.String)");
    assert!(tags.type_ref().element_type().nullable);
}

#[test]
fn test_container_and_annotations() {
    let model = CsdlReader::new().parse_json(STORE).expect("readable");
    let container = model.entity_container().expect("container");
    let products = container.find_entity_set("Products").expect("Products");
    match products.find_navigation_target_by_path("Supplier") {
        NavigationTarget::Source(source) => assert_eq!(source.name(), "Suppliers"),
        other => panic!("expected Suppliers, got {:?}", other),
    }

    let annotations = model.find_vocabulary_annotations("Store.Product/Name");
    assert_eq!(annotations.len(), 1);
    assert_eq!(annotations[0].term_name(), "Store.Caption");
}

#[test]
fn test_json_references_resolve_xml_mains() {
    let main = r#"<Schema Namespace="App" xmlns="http://docs.oasis-open.org/odata/ns/edm">
  <ComplexType Name="Line"><Property Name="Product" Type="Store.Status"/></ComplexType>
</Schema>"#;
    let model = CsdlReader::new().reference_json(STORE).parse_xml(main).expect("readable");
    assert!(edm::validate(&model).is_empty());
    assert_eq!(model.schemas().len(), 1);
}

#[test]
fn test_missing_version_is_a_json_error() {
    let (model, errors) = CsdlReader::new().try_parse_json(r#"{ "Store": {} }"#);
    assert!(model.is_none());
    assert_eq!(codes(&errors), [ErrorCode::JsonError]);
}
