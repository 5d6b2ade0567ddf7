//! Tests for the AST builder

use super::*;
use crate::base::{EdmVersion, EdmxVersion};
use crate::errors::ErrorCode;

const EDMX_V4: &str = "http://docs.oasis-open.org/odata/ns/edmx";
const EDM_V4: &str = "http://docs.oasis-open.org/odata/ns/edm";

fn envelope(version: &str, schemas: Vec<CsdlNode>) -> CsdlNode {
    CsdlNode::qualified("edmx:Edmx")
        .with_attr("xmlns:edmx", EDMX_V4)
        .with_attr("Version", version)
        .with_child(CsdlNode::qualified("edmx:DataServices").with_children(schemas))
}

fn schema(namespace: &str) -> CsdlNode {
    CsdlNode::new("Schema")
        .with_attr("xmlns", EDM_V4)
        .with_attr("Namespace", namespace)
}

fn property(name: &str, ty: &str) -> CsdlNode {
    CsdlNode::new("Property")
        .with_attr("Name", name)
        .with_attr("Type", ty)
}

#[test]
fn test_builds_entity_type_with_key_and_properties() {
    let root = envelope(
        "4.0",
        vec![schema("NS").with_child(
            CsdlNode::new("EntityType")
                .with_attr("Name", "Customer")
                .with_child(
                    CsdlNode::new("Key")
                        .with_child(CsdlNode::new("PropertyRef").with_attr("Name", "ID")),
                )
                .with_child(property("ID", "Edm.Int32").with_attr("Nullable", "false"))
                .with_child(
                    property("Name", "Edm.String")
                        .with_attr("MaxLength", "200")
                        .with_attr("Unicode", "true"),
                ),
        )],
    );

    let result = build_document(&root);
    assert!(!result.has_errors(), "unexpected errors: {:?}", result.errors);
    assert_eq!(result.document.edmx_version, Some(EdmxVersion::V4));
    assert_eq!(result.document.edm_version, Some(EdmVersion::V4));

    let schema = &result.document.schemas[0];
    assert_eq!(schema.namespace, "NS");
    let CsdlSchemaElement::EntityType(customer) = &schema.elements[0] else {
        panic!("expected an entity type, got {:?}", schema.elements[0]);
    };
    assert_eq!(customer.name, "Customer");
    let key = customer.key.as_ref().expect("key");
    assert_eq!(key.property_refs[0].name, "ID");
    assert_eq!(customer.properties.len(), 2);

    let CsdlPropertyItem::Structural(name) = &customer.properties[1] else {
        panic!("expected a structural property");
    };
    assert_eq!(name.facets.max_length.as_deref(), Some("200"));
    assert_eq!(name.facets.unicode.as_deref(), Some("true"));
}

#[test]
fn test_version_4_01_comes_from_envelope() {
    let result = build_document(&envelope("4.01", vec![schema("NS")]));
    assert_eq!(result.document.edmx_version, Some(EdmxVersion::V4_01));
    assert_eq!(result.document.edm_version, Some(EdmVersion::V4_01));
}

#[test]
fn test_unknown_edmx_version_is_reported() {
    let root = CsdlNode::qualified("edmx:Edmx")
        .with_attr("xmlns:edmx", "urn:not-edmx")
        .with_attr("Version", "9.9")
        .with_child(CsdlNode::qualified("edmx:DataServices").with_child(schema("NS")));

    let result = build_document(&root);
    assert_eq!(result.document.edmx_version, None);
    assert!(
        result.errors.iter().any(|e| e.code == ErrorCode::UnknownEdmxVersion),
        "expected UnknownEdmxVersion, got {:?}",
        result.errors
    );
}

#[test]
fn test_no_schemas_is_reported() {
    let result = build_document(&envelope("4.0", vec![]));
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].code, ErrorCode::NoSchemasProduced);
}

#[test]
fn test_unexpected_root() {
    let result = build_document(&CsdlNode::new("Invoice"));
    assert!(result.errors.iter().any(|e| e.code == ErrorCode::UnexpectedElement));
}

#[test]
fn test_missing_required_attribute_keeps_building() {
    let root = schema("NS")
        .with_child(CsdlNode::new("ComplexType").with_attr("Name", "Address").with_child(
            CsdlNode::new("Property").with_attr("Name", "Street"),
        ))
        .with_child(CsdlNode::new("EnumType").with_attr("Name", "Color"));

    let result = build_document(&root);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].code, ErrorCode::MissingAttribute);
    assert_eq!(result.document.schemas[0].elements.len(), 2);
}

#[test]
fn test_bad_boolean_is_reported() {
    let root = schema("NS").with_child(
        CsdlNode::new("EntityType")
            .with_attr("Name", "T")
            .with_attr("Abstract", "yes"),
    );
    let result = build_document(&root);
    assert_eq!(result.errors[0].code, ErrorCode::InvalidAttributeValue);
}

#[test]
fn test_unknown_elements_are_ignored() {
    let root = schema("NS")
        .with_child(CsdlNode::new("Documentation"))
        .with_child(CsdlNode::new("ComplexType").with_attr("Name", "A"));
    let result = build_document(&root);
    assert!(!result.has_errors());
    assert_eq!(result.document.schemas[0].elements.len(), 1);
}

#[test]
fn test_references_and_includes() {
    let root = envelope("4.0", vec![schema("NS")]).with_child(
        CsdlNode::qualified("edmx:Reference")
            .with_attr("Uri", "https://example.com/Core.xml")
            .with_child(
                CsdlNode::qualified("edmx:Include")
                    .with_attr("Namespace", "Org.OData.Core.V1")
                    .with_attr("Alias", "Core"),
            ),
    );
    let result = build_document(&root);
    let reference = &result.document.references[0];
    assert_eq!(reference.uri, "https://example.com/Core.xml");
    assert_eq!(reference.includes[0].namespace, "Org.OData.Core.V1");
    assert_eq!(reference.includes[0].alias.as_deref(), Some("Core"));
}

#[test]
fn test_entity_container_children() {
    let root = schema("NS").with_child(
        CsdlNode::new("EntityContainer")
            .with_attr("Name", "Default")
            .with_child(
                CsdlNode::new("EntitySet")
                    .with_attr("Name", "Customers")
                    .with_attr("EntityType", "NS.Customer")
                    .with_child(
                        CsdlNode::new("NavigationPropertyBinding")
                            .with_attr("Path", "Orders")
                            .with_attr("Target", "Orders"),
                    ),
            )
            .with_child(
                CsdlNode::new("Singleton")
                    .with_attr("Name", "Me")
                    .with_attr("Type", "NS.Customer"),
            )
            .with_child(
                CsdlNode::new("FunctionImport")
                    .with_attr("Name", "Top")
                    .with_attr("Function", "NS.Top")
                    .with_attr("IncludeInServiceDocument", "true"),
            ),
    );

    let result = build_document(&root);
    assert!(!result.has_errors(), "{:?}", result.errors);
    let CsdlSchemaElement::EntityContainer(container) = &result.document.schemas[0].elements[0]
    else {
        panic!("expected a container");
    };
    assert_eq!(container.entity_sets[0].bindings[0].target, "Orders");
    assert!(container.entity_sets[0].include_in_service_document);
    assert_eq!(container.singletons[0].type_name, "NS.Customer");
    assert_eq!(container.operation_imports[0].operation, "NS.Top");
    assert!(container.operation_imports[0].include_in_service_document);
}

#[test]
fn test_annotation_expressions() {
    let root = schema("NS")
        .with_child(
            CsdlNode::new("Annotations").with_attr("Target", "NS.Customer").with_child(
                CsdlNode::new("Annotation")
                    .with_attr("Term", "Core.Description")
                    .with_attr("String", "A customer"),
            ),
        )
        .with_child(
            CsdlNode::new("Annotations").with_attr("Target", "NS.Customer/Name").with_child(
                CsdlNode::new("Annotation").with_attr("Term", "NS.Rule").with_child(
                    CsdlNode::new("If")
                        .with_child(CsdlNode::new("Path").with_text("IsActive"))
                        .with_child(CsdlNode::new("String").with_text("yes"))
                        .with_child(CsdlNode::new("Null")),
                ),
            ),
        );

    let result = build_document(&root);
    assert!(!result.has_errors(), "{:?}", result.errors);
    let blocks = &result.document.schemas[0].out_of_line_annotations;
    assert_eq!(
        blocks[0].annotations[0].expression,
        Some(CsdlExpression::Constant {
            kind: ConstantKind::String,
            value: "A customer".into(),
        })
    );
    let Some(CsdlExpression::If { test, otherwise, .. }) = &blocks[1].annotations[0].expression
    else {
        panic!("expected an If expression");
    };
    assert_eq!(
        **test,
        CsdlExpression::Path {
            kind: PathExpressionKind::Path,
            path: "IsActive".into(),
        }
    );
    assert_eq!(otherwise.as_deref(), Some(&CsdlExpression::Null));
}

#[test]
fn test_record_expression() {
    let record = CsdlNode::new("Record").with_attr("Type", "NS.Info").with_child(
        CsdlNode::new("PropertyValue")
            .with_attr("Property", "Label")
            .with_attr("String", "x"),
    );
    let root = schema("NS").with_child(
        CsdlNode::new("Term")
            .with_attr("Name", "Info")
            .with_attr("Type", "NS.Info")
            .with_attr("AppliesTo", "EntityType Property")
            .with_child(
                CsdlNode::new("Annotation")
                    .with_attr("Term", "NS.Meta")
                    .with_child(record),
            ),
    );

    let result = build_document(&root);
    let CsdlSchemaElement::Term(term) = &result.document.schemas[0].elements[0] else {
        panic!("expected a term");
    };
    assert_eq!(term.applies_to, vec!["EntityType", "Property"]);
    let Some(CsdlExpression::Record { type_name, properties }) = &term.annotations[0].expression
    else {
        panic!("expected a record");
    };
    assert_eq!(type_name.as_deref(), Some("NS.Info"));
    assert_eq!(properties[0].property, "Label");
}

#[test]
fn test_navigation_property_details() {
    let root = schema("NS").with_child(
        CsdlNode::new("EntityType").with_attr("Name", "Order").with_child(
            CsdlNode::new("NavigationProperty")
                .with_attr("Name", "Customer")
                .with_attr("Type", "NS.Customer")
                .with_attr("Nullable", "false")
                .with_attr("Partner", "Orders")
                .with_child(CsdlNode::new("OnDelete").with_attr("Action", "Cascade"))
                .with_child(
                    CsdlNode::new("ReferentialConstraint")
                        .with_attr("Property", "CustomerID")
                        .with_attr("ReferencedProperty", "ID"),
                ),
        ),
    );

    let result = build_document(&root);
    let CsdlSchemaElement::EntityType(order) = &result.document.schemas[0].elements[0] else {
        panic!("expected an entity type");
    };
    let CsdlPropertyItem::Navigation(nav) = &order.properties[0] else {
        panic!("expected a navigation property");
    };
    assert_eq!(nav.partner.as_deref(), Some("Orders"));
    assert_eq!(nav.on_delete, Some(OnDeleteAction::Cascade));
    assert_eq!(nav.referential_constraints[0].referenced_property, "ID");
}
