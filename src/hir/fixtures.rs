//! Node-tree builders shared by the semantic layer's unit tests.

use super::Model;
use crate::errors::{EdmError, ErrorCode};
use crate::syntax::{CsdlNode, build_document};

pub(crate) const EDM_V4: &str = "http://docs.oasis-open.org/odata/ns/edm";
pub(crate) const EDM_V2: &str = "http://schemas.microsoft.com/ado/2008/09/edm";

pub(crate) fn schema(namespace: &str) -> CsdlNode {
    CsdlNode::new("Schema")
        .with_attr("xmlns", EDM_V4)
        .with_attr("Namespace", namespace)
}

/// An entity type keyed on the given property names.
pub(crate) fn entity(name: &str, key: &[&str]) -> CsdlNode {
    let node = CsdlNode::new("EntityType").with_attr("Name", name);
    if key.is_empty() {
        return node;
    }
    node.with_child(CsdlNode::new("Key").with_children(
        key.iter()
            .map(|k| CsdlNode::new("PropertyRef").with_attr("Name", *k)),
    ))
}

pub(crate) fn complex(name: &str) -> CsdlNode {
    CsdlNode::new("ComplexType").with_attr("Name", name)
}

pub(crate) fn property(name: &str, ty: &str) -> CsdlNode {
    CsdlNode::new("Property")
        .with_attr("Name", name)
        .with_attr("Type", ty)
}

/// A non-nullable `Edm.Int32` key property.
pub(crate) fn id_property(name: &str) -> CsdlNode {
    property(name, "Edm.Int32").with_attr("Nullable", "false")
}

pub(crate) fn nav(name: &str, ty: &str) -> CsdlNode {
    CsdlNode::new("NavigationProperty")
        .with_attr("Name", name)
        .with_attr("Type", ty)
}

pub(crate) fn container(name: &str) -> CsdlNode {
    CsdlNode::new("EntityContainer").with_attr("Name", name)
}

pub(crate) fn entity_set(name: &str, ty: &str) -> CsdlNode {
    CsdlNode::new("EntitySet")
        .with_attr("Name", name)
        .with_attr("EntityType", ty)
}

pub(crate) fn binding(path: &str, target: &str) -> CsdlNode {
    CsdlNode::new("NavigationPropertyBinding")
        .with_attr("Path", path)
        .with_attr("Target", target)
}

pub(crate) fn annotation(term: &str) -> CsdlNode {
    CsdlNode::new("Annotation").with_attr("Term", term)
}

/// Build a model from one bare `Schema` root; the tree must build cleanly.
pub(crate) fn model(schema: CsdlNode) -> Model {
    let result = build_document(&schema);
    assert!(result.errors.is_empty(), "build errors: {:?}", result.errors);
    Model::new(result.document)
}

pub(crate) fn codes(errors: &[EdmError]) -> Vec<ErrorCode> {
    errors.iter().map(|e| e.code).collect()
}
