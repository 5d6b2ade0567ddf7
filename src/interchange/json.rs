//! CSDL JSON → node tree.
//!
//! Maps the CSDL JSON 4.01 document shape onto the same XML-shaped
//! [`CsdlNode`] tree the XML reader produces, so the builder sees one input
//! form. JSON carries no positions; every node is located at the start of
//! its document.
//!
//! ## Mapping
//!
//! | JSON                                  | Node                                   |
//! |---------------------------------------|----------------------------------------|
//! | document object                       | `edmx:Edmx` + `edmx:DataServices`      |
//! | `$Reference`                          | `edmx:Reference` / `edmx:Include`      |
//! | namespace member                      | `Schema`                               |
//! | member with `$Kind`                   | element named by the kind              |
//! | `$Type` + `$Collection`               | `Type="Collection(...)"`               |
//! | `"@Term#Qualifier": value`            | `Annotation` with an expression child  |
//! | `$Annotations` entry                  | out-of-line `Annotations` block        |

use serde_json::{Map, Value};

use super::ReadError;
use crate::base::{DocumentId, EdmVersion, EdmxVersion, Location};
use crate::syntax::CsdlNode;

const DEFAULT_TYPE: &str = "Edm.String";

/// Facet members copied verbatim onto the matching attribute.
const FACETS: [(&str, &str); 6] = [
    ("$MaxLength", "MaxLength"),
    ("$Unicode", "Unicode"),
    ("$Precision", "Precision"),
    ("$Scale", "Scale"),
    ("$SRID", "SRID"),
    ("$DefaultValue", "DefaultValue"),
];

/// Read a CSDL JSON document into an `edmx:Edmx`-rooted node tree.
pub fn read_nodes(text: &str, document: DocumentId) -> Result<CsdlNode, ReadError> {
    let value: Value = serde_json::from_str(text).map_err(|e| ReadError::json(e.to_string()))?;
    let Value::Object(members) = value else {
        return Err(ReadError::json("a CSDL JSON document must be an object"));
    };
    let reader = JsonReader {
        location: Location::new(document, Default::default()),
    };
    let root = reader.document(&members)?;
    tracing::trace!(document = %document, "read JSON node tree");
    Ok(root)
}

struct JsonReader {
    location: Location,
}

impl JsonReader {
    fn node(&self, name: &str) -> CsdlNode {
        CsdlNode::qualified(name).at(self.location)
    }

    // ========================================================================
    // DOCUMENT
    // ========================================================================

    fn document(&self, members: &Map<String, Value>) -> Result<CsdlNode, ReadError> {
        let version = members
            .get("$Version")
            .and_then(Value::as_str)
            .ok_or_else(|| ReadError::json("document has no '$Version' string"))?;
        let mut root = self
            .node("edmx:Edmx")
            .with_attr("xmlns:edmx", EdmxVersion::V4.namespace())
            .with_attr("Version", version);

        if let Some(Value::Object(references)) = members.get("$Reference") {
            for (uri, reference) in references {
                root.children.push(self.reference(uri, reference));
            }
        }

        let mut data_services = self.node("edmx:DataServices");
        for (namespace, schema) in members.iter().filter(|(k, _)| !k.starts_with('$')) {
            let Value::Object(schema) = schema else {
                return Err(ReadError::json(format!("schema '{}' must be an object", namespace)));
            };
            data_services.children.push(self.schema(namespace, schema));
        }
        Ok(root.with_child(data_services))
    }

    fn reference(&self, uri: &str, reference: &Value) -> CsdlNode {
        let mut node = self.node("edmx:Reference").with_attr("Uri", uri);
        let entries = |key: &str| {
            reference
                .get(key)
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or_default()
        };
        for include in entries("$Include").iter().filter_map(Value::as_object) {
            let mut child = self.node("edmx:Include");
            copy_attrs(include, &mut child, &[("$Namespace", "Namespace"), ("$Alias", "Alias")]);
            node.children.push(child);
        }
        for include in entries("$IncludeAnnotations").iter().filter_map(Value::as_object) {
            let mut child = self.node("edmx:IncludeAnnotations");
            copy_attrs(
                include,
                &mut child,
                &[
                    ("$TermNamespace", "TermNamespace"),
                    ("$Qualifier", "Qualifier"),
                    ("$TargetNamespace", "TargetNamespace"),
                ],
            );
            node.children.push(child);
        }
        node
    }

    fn schema(&self, namespace: &str, members: &Map<String, Value>) -> CsdlNode {
        let mut schema = self
            .node("Schema")
            .with_attr("xmlns", EdmVersion::V4.csdl_namespace())
            .with_attr("Namespace", namespace);
        if let Some(alias) = members.get("$Alias").and_then(Value::as_str) {
            schema = schema.with_attr("Alias", alias);
        }

        for (name, value) in members {
            if name.starts_with('$') || name.starts_with('@') {
                continue;
            }
            match value {
                Value::Array(overloads) => {
                    for overload in overloads {
                        if let Some(node) = self.schema_element(name, overload) {
                            schema.children.push(node);
                        }
                    }
                }
                _ => {
                    if let Some(node) = self.schema_element(name, value) {
                        schema.children.push(node);
                    }
                }
            }
        }

        if let Some(Value::Object(blocks)) = members.get("$Annotations") {
            for (target, block) in blocks {
                let mut node = self.node("Annotations").with_attr("Target", target.as_str());
                if let Value::Object(block) = block {
                    node.children.extend(self.annotations(block, ""));
                }
                schema.children.push(node);
            }
        }
        schema.children.extend(self.annotations(members, ""));
        schema
    }

    // ========================================================================
    // SCHEMA ELEMENTS
    // ========================================================================

    fn schema_element(&self, name: &str, value: &Value) -> Option<CsdlNode> {
        let members = value.as_object()?;
        let Some(kind) = members.get("$Kind").and_then(Value::as_str) else {
            tracing::debug!("skipping schema member '{}' without $Kind", name);
            return None;
        };
        let node = self.node(kind).with_attr("Name", name);
        let node = match kind {
            "EntityType" | "ComplexType" => self.structured_type(node, members),
            "EnumType" => self.enum_type(node, members),
            "TypeDefinition" => {
                let mut node = node;
                copy_attrs(members, &mut node, &[("$UnderlyingType", "UnderlyingType")]);
                copy_attrs(members, &mut node, &FACETS);
                node
            }
            "Term" => {
                let mut node = self.typed(node, members, true);
                copy_attrs(members, &mut node, &[("$BaseTerm", "BaseTerm")]);
                if let Some(Value::Array(applies_to)) = members.get("$AppliesTo") {
                    let joined: Vec<&str> = applies_to.iter().filter_map(Value::as_str).collect();
                    node = node.with_attr("AppliesTo", joined.join(" "));
                }
                node
            }
            "Action" | "Function" => self.operation(node, members),
            "EntityContainer" => self.container(node, members),
            other => {
                tracing::debug!("skipping schema member '{}' of kind '{}'", name, other);
                return None;
            }
        };
        Some(node.with_children(self.annotations(members, "")))
    }

    fn structured_type(&self, mut node: CsdlNode, members: &Map<String, Value>) -> CsdlNode {
        copy_attrs(
            members,
            &mut node,
            &[
                ("$BaseType", "BaseType"),
                ("$Abstract", "Abstract"),
                ("$OpenType", "OpenType"),
                ("$HasStream", "HasStream"),
            ],
        );

        if let Some(Value::Array(key)) = members.get("$Key") {
            let mut key_node = self.node("Key");
            for part in key {
                match part {
                    Value::String(name) => {
                        key_node.children.push(self.node("PropertyRef").with_attr("Name", name.as_str()));
                    }
                    Value::Object(aliased) => {
                        for (alias, path) in aliased {
                            let path = path.as_str().unwrap_or_default();
                            key_node.children.push(
                                self.node("PropertyRef")
                                    .with_attr("Name", path)
                                    .with_attr("Alias", alias.as_str()),
                            );
                        }
                    }
                    _ => {}
                }
            }
            node.children.push(key_node);
        }

        for (name, property) in members.iter().filter(|(k, _)| is_member_name(k)) {
            let Value::Object(property) = property else { continue };
            let kind = property.get("$Kind").and_then(Value::as_str).unwrap_or("Property");
            let child = match kind {
                "NavigationProperty" => self.navigation_property(name, property),
                _ => {
                    let mut child = self.typed(self.node("Property").with_attr("Name", name.as_str()), property, true);
                    copy_attrs(property, &mut child, &[("$ConcurrencyMode", "ConcurrencyMode")]);
                    child
                }
            };
            node.children.push(child.with_children(self.annotations(property, "")));
        }
        node
    }

    fn navigation_property(&self, name: &str, members: &Map<String, Value>) -> CsdlNode {
        let mut node = self.typed(
            self.node("NavigationProperty").with_attr("Name", name),
            members,
            false,
        );
        copy_attrs(
            members,
            &mut node,
            &[("$Partner", "Partner"), ("$ContainsTarget", "ContainsTarget")],
        );
        if let Some(action) = members.get("$OnDelete").and_then(Value::as_str) {
            node.children.push(self.node("OnDelete").with_attr("Action", action));
        }
        if let Some(Value::Object(constraints)) = members.get("$ReferentialConstraint") {
            for (property, referenced) in constraints.iter().filter(|(k, _)| is_member_name(k)) {
                node.children.push(
                    self.node("ReferentialConstraint")
                        .with_attr("Property", property.as_str())
                        .with_attr("ReferencedProperty", referenced.as_str().unwrap_or_default()),
                );
            }
        }
        node
    }

    fn enum_type(&self, mut node: CsdlNode, members: &Map<String, Value>) -> CsdlNode {
        copy_attrs(
            members,
            &mut node,
            &[("$UnderlyingType", "UnderlyingType"), ("$IsFlags", "IsFlags")],
        );
        for (name, member_value) in members.iter().filter(|(k, _)| is_member_name(k)) {
            let mut member = self.node("Member").with_attr("Name", name.as_str());
            if let Some(raw) = scalar(member_value) {
                member = member.with_attr("Value", raw);
            }
            member.children.extend(self.annotations(members, name));
            node.children.push(member);
        }
        node
    }

    fn operation(&self, mut node: CsdlNode, members: &Map<String, Value>) -> CsdlNode {
        copy_attrs(
            members,
            &mut node,
            &[
                ("$IsBound", "IsBound"),
                ("$IsComposable", "IsComposable"),
                ("$EntitySetPath", "EntitySetPath"),
            ],
        );
        if let Some(Value::Array(parameters)) = members.get("$Parameter") {
            for parameter in parameters.iter().filter_map(Value::as_object) {
                let name = parameter.get("$Name").and_then(Value::as_str).unwrap_or_default();
                let child = self.typed(self.node("Parameter").with_attr("Name", name), parameter, true);
                node.children.push(child.with_children(self.annotations(parameter, "")));
            }
        }
        if let Some(Value::Object(returns)) = members.get("$ReturnType") {
            let child = self.typed(self.node("ReturnType"), returns, true);
            node.children.push(child.with_children(self.annotations(returns, "")));
        }
        node
    }

    fn container(&self, mut node: CsdlNode, members: &Map<String, Value>) -> CsdlNode {
        copy_attrs(members, &mut node, &[("$Extends", "Extends")]);
        for (name, child) in members.iter().filter(|(k, _)| is_member_name(k)) {
            let Value::Object(child) = child else { continue };
            let named = |kind: &str| self.node(kind).with_attr("Name", name.as_str());
            let mut element = if child.contains_key("$Action") {
                let mut n = named("ActionImport");
                copy_attrs(child, &mut n, &[("$Action", "Action"), ("$EntitySet", "EntitySet")]);
                n
            } else if child.contains_key("$Function") {
                let mut n = named("FunctionImport");
                copy_attrs(
                    child,
                    &mut n,
                    &[
                        ("$Function", "Function"),
                        ("$EntitySet", "EntitySet"),
                        ("$IncludeInServiceDocument", "IncludeInServiceDocument"),
                    ],
                );
                n
            } else if child.get("$Collection").and_then(Value::as_bool) == Some(true) {
                let mut n = named("EntitySet");
                copy_attrs(
                    child,
                    &mut n,
                    &[("$Type", "EntityType"), ("$IncludeInServiceDocument", "IncludeInServiceDocument")],
                );
                n
            } else {
                let mut n = named("Singleton");
                copy_attrs(child, &mut n, &[("$Type", "Type")]);
                n
            };
            if let Some(Value::Object(bindings)) = child.get("$NavigationPropertyBinding") {
                for (path, target) in bindings {
                    element.children.push(
                        self.node("NavigationPropertyBinding")
                            .with_attr("Path", path.as_str())
                            .with_attr("Target", target.as_str().unwrap_or_default()),
                    );
                }
            }
            element.children.extend(self.annotations(child, ""));
            node.children.push(element);
        }
        node
    }

    /// `$Type`/`$Collection`/`$Nullable` plus facets. JSON omits `$Nullable`
    /// when it is false.
    fn typed(&self, mut node: CsdlNode, members: &Map<String, Value>, facets: bool) -> CsdlNode {
        let element = members.get("$Type").and_then(Value::as_str).unwrap_or(DEFAULT_TYPE);
        let is_collection = members.get("$Collection").and_then(Value::as_bool) == Some(true);
        let type_name = if is_collection {
            format!("Collection({})", element)
        } else {
            element.to_string()
        };
        node = node.with_attr("Type", type_name);
        let nullable = members.get("$Nullable").and_then(Value::as_bool).unwrap_or(false);
        node = node.with_attr("Nullable", if nullable { "true" } else { "false" });
        if facets {
            copy_attrs(members, &mut node, &FACETS);
        }
        node
    }

    // ========================================================================
    // ANNOTATIONS
    // ========================================================================

    /// `Annotation` nodes for members named `<prefix>@Term#Qualifier`.
    ///
    /// `@A@B` members annotate the annotation `@A`.
    fn annotations(&self, members: &Map<String, Value>, prefix: &str) -> Vec<CsdlNode> {
        let mut annotations: Vec<(String, CsdlNode)> = Vec::new();
        for (key, value) in members {
            let Some(rest) = key.strip_prefix(prefix).and_then(|r| r.strip_prefix('@')) else {
                continue;
            };
            match rest.split_once('@') {
                None => {
                    let node = self.annotation(rest, value);
                    annotations.push((rest.to_string(), node));
                }
                Some((outer, nested)) => {
                    let node = self.annotation(nested, value);
                    if let Some((_, parent)) = annotations.iter_mut().find(|(k, _)| k == outer) {
                        parent.children.push(node);
                    }
                }
            }
        }
        annotations.into_iter().map(|(_, node)| node).collect()
    }

    fn annotation(&self, term: &str, value: &Value) -> CsdlNode {
        let mut node = self.node("Annotation");
        match term.split_once('#') {
            Some((term, qualifier)) => {
                node = node.with_attr("Term", term).with_attr("Qualifier", qualifier);
            }
            None => node = node.with_attr("Term", term),
        }
        if let Some(expression) = self.expression(value) {
            node.children.push(expression);
        }
        node
    }

    fn expression(&self, value: &Value) -> Option<CsdlNode> {
        let node = match value {
            Value::Null => self.node("Null"),
            Value::Bool(b) => self.node("Bool").with_text(b.to_string()),
            Value::Number(n) if n.is_i64() || n.is_u64() => self.node("Int").with_text(n.to_string()),
            Value::Number(n) => self.node("Decimal").with_text(n.to_string()),
            Value::String(s) => self.node("String").with_text(s.as_str()),
            Value::Array(items) => self
                .node("Collection")
                .with_children(items.iter().filter_map(|item| self.expression(item))),
            Value::Object(members) => return self.object_expression(members),
        };
        Some(node)
    }

    fn object_expression(&self, members: &Map<String, Value>) -> Option<CsdlNode> {
        const PATHS: [&str; 5] = [
            "Path",
            "PropertyPath",
            "NavigationPropertyPath",
            "AnnotationPath",
            "ModelElementPath",
        ];
        for kind in PATHS {
            if let Some(path) = members.get(&format!("${}", kind)).and_then(Value::as_str) {
                return Some(self.node(kind).with_text(path));
            }
        }
        for kind in ["Binary", "Date", "DateTimeOffset", "Duration", "Guid", "TimeOfDay", "EnumMember"] {
            if let Some(raw) = members.get(&format!("${}", kind)).and_then(scalar) {
                return Some(self.node(kind).with_text(raw));
            }
        }
        if let Some(Value::Array(operands)) = members.get("$If") {
            return Some(
                self.node("If")
                    .with_children(operands.iter().filter_map(|o| self.expression(o))),
            );
        }
        for (key, name) in [("$Cast", "Cast"), ("$IsOf", "IsOf")] {
            if let Some(operand) = members.get(key) {
                let mut node = self.node(name);
                copy_attrs(members, &mut node, &[("$Type", "Type")]);
                copy_attrs(members, &mut node, &FACETS);
                node.children.extend(self.expression(operand));
                return Some(node);
            }
        }
        if let Some(Value::Array(arguments)) = members.get("$Apply") {
            let function = members.get("$Function").and_then(Value::as_str).unwrap_or_default();
            return Some(
                self.node("Apply")
                    .with_attr("Function", function)
                    .with_children(arguments.iter().filter_map(|a| self.expression(a))),
            );
        }
        if let Some(name) = members.get("$Name").and_then(Value::as_str)
            && let Some(value) = members.get("$LabeledElement")
        {
            let node = self.node("LabeledElement").with_attr("Name", name);
            return Some(node.with_children(self.expression(value)));
        }
        if let Some(reference) = members.get("$LabeledElementReference").and_then(Value::as_str) {
            return Some(self.node("LabeledElementReference").with_text(reference));
        }

        let mut record = self.node("Record");
        if let Some(ty) = members.get("@type").and_then(Value::as_str) {
            record = record.with_attr("Type", ty.trim_start_matches('#'));
        }
        for (property, value) in members.iter().filter(|(k, _)| is_member_name(k)) {
            let mut pv = self.node("PropertyValue").with_attr("Property", property.as_str());
            pv.children.extend(self.expression(value));
            pv.children.extend(self.annotations(members, property));
            record.children.push(pv);
        }
        record.children.extend(self.annotations(members, ""));
        Some(record)
    }
}

/// A member that names a property, member or child rather than a `$` keyword
/// or an annotation.
fn is_member_name(key: &str) -> bool {
    !key.starts_with('$') && !key.starts_with('@') && !key.contains('@')
}

/// String form of a scalar JSON value.
fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn copy_attrs(source: &Map<String, Value>, node: &mut CsdlNode, pairs: &[(&str, &str)]) {
    for (member, attr) in pairs {
        if let Some(raw) = source.get(*member).and_then(scalar) {
            node.attributes.insert((*attr).into(), raw);
        }
    }
}
