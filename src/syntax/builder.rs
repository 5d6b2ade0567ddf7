//! Builds the CSDL syntax tree from a node tree.
//!
//! The builder is lenient: a missing required attribute is reported and
//! replaced by an empty value, unknown elements are skipped, and the rest of
//! the document is still built. Nothing is resolved here.

use std::sync::Arc;

use smol_str::SmolStr;

use super::ast::*;
use super::node::CsdlNode;
use crate::base::{EdmVersion, EdmxVersion};
use crate::errors::{DiagnosticCollector, EdmError, ErrorCode};

/// A built document plus every problem found while building it.
#[derive(Debug, Clone, Default)]
pub struct BuildResult {
    pub document: CsdlDocument,
    pub errors: Vec<EdmError>,
}

impl BuildResult {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Build a document from the root node of an EDMX envelope or a bare `Schema`.
pub fn build_document(root: &CsdlNode) -> BuildResult {
    let mut builder = DocumentBuilder::default();
    let document = builder.document(root);
    if document.schemas.is_empty() {
        builder.errors.report(
            ErrorCode::NoSchemasProduced,
            Some(root.location),
            "document does not declare any schema",
        );
    }
    tracing::debug!(
        schemas = document.schemas.len(),
        errors = builder.errors.len(),
        "built CSDL document"
    );
    BuildResult {
        document,
        errors: builder.errors.into_errors(),
    }
}

#[derive(Default)]
struct DocumentBuilder {
    errors: DiagnosticCollector,
}

impl DocumentBuilder {
    // ========================================================================
    // ENVELOPE
    // ========================================================================

    fn document(&mut self, root: &CsdlNode) -> CsdlDocument {
        let mut document = CsdlDocument {
            location: root.location,
            ..Default::default()
        };
        match root.name.as_str() {
            "Edmx" => self.edmx(root, &mut document),
            "Schema" => {
                let schema = self.schema(root);
                document.edm_version = schema_version(root);
                document.schemas.push(Arc::new(schema));
            }
            _ => self.errors.report(
                ErrorCode::UnexpectedElement,
                Some(root.location),
                format!(
                    "expected 'edmx:Edmx' or 'Schema' as the root element, found '{}'",
                    root.qualified_name()
                ),
            ),
        }
        document
    }

    fn edmx(&mut self, root: &CsdlNode, document: &mut CsdlDocument) {
        let namespace_attr = match &root.prefix {
            Some(prefix) => format!("xmlns:{}", prefix),
            None => "xmlns".to_string(),
        };
        let namespace = root.attr(&namespace_attr);
        let version = root.attr("Version");
        document.edmx_version_literal = version.map(str::to_string);
        document.edmx_version =
            namespace.and_then(|uri| EdmxVersion::from_namespace(uri, version));
        if document.edmx_version.is_none() {
            self.errors.report(
                ErrorCode::UnknownEdmxVersion,
                Some(root.location),
                format!(
                    "unknown EDMX version (namespace '{}', version '{}')",
                    namespace.unwrap_or(""),
                    version.unwrap_or("")
                ),
            );
        }

        for child in &root.children {
            match child.name.as_str() {
                "Reference" => {
                    let reference = self.reference(child);
                    document.references.push(reference);
                }
                "DataServices" => {
                    for schema_node in child.children_named("Schema") {
                        if document.edm_version.is_none() {
                            document.edm_version = schema_version(schema_node);
                        }
                        let schema = self.schema(schema_node);
                        document.schemas.push(Arc::new(schema));
                    }
                }
                other => tracing::debug!("skipping '{}' in edmx:Edmx", other),
            }
        }

        // 4.0 and 4.01 share the CSDL namespace; the envelope decides.
        document.edm_version = match (document.edmx_version, document.edm_version) {
            (Some(EdmxVersion::V4_01), Some(EdmVersion::V4) | None) => Some(EdmVersion::V4_01),
            (Some(edmx), None) => Some(edmx.edm_version()),
            (_, version) => version,
        };
    }

    fn reference(&mut self, node: &CsdlNode) -> CsdlReference {
        let mut reference = CsdlReference {
            uri: self.required(node, "Uri"),
            location: node.location,
            ..Default::default()
        };
        for child in &node.children {
            match child.name.as_str() {
                "Include" => reference.includes.push(CsdlInclude {
                    namespace: self.required(child, "Namespace").into(),
                    alias: child.attr("Alias").map(SmolStr::from),
                }),
                "IncludeAnnotations" => {
                    reference.include_annotations.push(CsdlIncludeAnnotations {
                        term_namespace: self.required(child, "TermNamespace").into(),
                        qualifier: child.attr("Qualifier").map(SmolStr::from),
                        target_namespace: child.attr("TargetNamespace").map(SmolStr::from),
                    })
                }
                _ => {}
            }
        }
        reference
    }

    // ========================================================================
    // SCHEMA
    // ========================================================================

    fn schema(&mut self, node: &CsdlNode) -> CsdlSchema {
        let mut schema = CsdlSchema {
            namespace: self.required(node, "Namespace").into(),
            alias: node.attr("Alias").map(SmolStr::from),
            location: node.location,
            ..Default::default()
        };

        for child in &node.children {
            let element = match child.name.as_str() {
                "EntityType" => CsdlSchemaElement::EntityType(Arc::new(self.structured_type(child, true))),
                "ComplexType" => {
                    CsdlSchemaElement::ComplexType(Arc::new(self.structured_type(child, false)))
                }
                "EnumType" => CsdlSchemaElement::EnumType(Arc::new(self.enum_type(child))),
                "TypeDefinition" => {
                    CsdlSchemaElement::TypeDefinition(Arc::new(self.type_definition(child)))
                }
                "Term" => CsdlSchemaElement::Term(Arc::new(self.term(child))),
                "Action" => CsdlSchemaElement::Action(Arc::new(self.operation(child, false))),
                "Function" => CsdlSchemaElement::Function(Arc::new(self.operation(child, true))),
                "EntityContainer" => {
                    CsdlSchemaElement::EntityContainer(Arc::new(self.entity_container(child)))
                }
                "Annotations" => {
                    let block = self.out_of_line_annotations(child);
                    schema.out_of_line_annotations.push(Arc::new(block));
                    continue;
                }
                "Annotation" => {
                    let annotation = self.annotation(child);
                    schema.annotations.push(annotation);
                    continue;
                }
                other => {
                    tracing::debug!("skipping '{}' in schema '{}'", other, schema.namespace);
                    continue;
                }
            };
            schema.elements.push(element);
        }
        schema
    }

    fn structured_type(&mut self, node: &CsdlNode, is_entity: bool) -> CsdlStructuredType {
        let mut ty = CsdlStructuredType {
            name: self.name(node),
            base_type: node.attr("BaseType").map(str::to_string),
            is_abstract: self.flag(node, "Abstract", false),
            is_open: self.flag(node, "OpenType", false),
            has_stream: is_entity && self.flag(node, "HasStream", false),
            location: node.location,
            ..Default::default()
        };

        for child in &node.children {
            match child.name.as_str() {
                "Key" if is_entity => ty.key = Some(self.key(child)),
                "Property" => ty
                    .properties
                    .push(CsdlPropertyItem::Structural(Arc::new(self.property(child)))),
                "NavigationProperty" => ty.properties.push(CsdlPropertyItem::Navigation(
                    Arc::new(self.navigation_property(child)),
                )),
                "Annotation" => ty.annotations.push(self.annotation(child)),
                other => tracing::debug!("skipping '{}' in type '{}'", other, ty.name),
            }
        }
        ty
    }

    fn key(&mut self, node: &CsdlNode) -> CsdlKey {
        let property_refs = node
            .children_named("PropertyRef")
            .map(|r| CsdlPropertyRef {
                name: self.required(r, "Name"),
                alias: r.attr("Alias").map(SmolStr::from),
                location: r.location,
            })
            .collect();
        CsdlKey {
            property_refs,
            location: node.location,
        }
    }

    fn property(&mut self, node: &CsdlNode) -> CsdlProperty {
        let concurrency_mode = match node.attr("ConcurrencyMode") {
            None | Some("None") => ConcurrencyMode::None,
            Some("Fixed") => ConcurrencyMode::Fixed,
            Some(other) => {
                self.invalid_value(node, "ConcurrencyMode", other);
                ConcurrencyMode::None
            }
        };
        CsdlProperty {
            name: self.name(node),
            type_name: self.required(node, "Type"),
            facets: facets(node),
            default_value: node.attr("DefaultValue").map(str::to_string),
            concurrency_mode,
            annotations: self.annotations(node),
            location: node.location,
        }
    }

    fn navigation_property(&mut self, node: &CsdlNode) -> CsdlNavigationProperty {
        let mut nav = CsdlNavigationProperty {
            name: self.name(node),
            type_name: self.required(node, "Type"),
            nullable: node.attr("Nullable").map(str::to_string),
            partner: node.attr("Partner").map(str::to_string),
            contains_target: self.flag(node, "ContainsTarget", false),
            location: node.location,
            ..Default::default()
        };
        for child in &node.children {
            match child.name.as_str() {
                "OnDelete" => {
                    let action = self.required(child, "Action");
                    nav.on_delete = OnDeleteAction::parse(&action);
                    if nav.on_delete.is_none() {
                        self.invalid_value(child, "Action", &action);
                    }
                }
                "ReferentialConstraint" => {
                    nav.referential_constraints.push(CsdlReferentialConstraint {
                        property: self.required(child, "Property"),
                        referenced_property: self.required(child, "ReferencedProperty"),
                        location: child.location,
                    })
                }
                "Annotation" => nav.annotations.push(self.annotation(child)),
                _ => {}
            }
        }
        nav
    }

    fn enum_type(&mut self, node: &CsdlNode) -> CsdlEnumType {
        let members = node
            .children_named("Member")
            .map(|m| CsdlEnumMember {
                name: self.name(m),
                value: m.attr("Value").map(str::to_string),
                annotations: self.annotations(m),
                location: m.location,
            })
            .collect();
        CsdlEnumType {
            name: self.name(node),
            underlying_type: node.attr("UnderlyingType").map(str::to_string),
            is_flags: self.flag(node, "IsFlags", false),
            members,
            annotations: self.annotations(node),
            location: node.location,
        }
    }

    fn type_definition(&mut self, node: &CsdlNode) -> CsdlTypeDefinition {
        CsdlTypeDefinition {
            name: self.name(node),
            underlying_type: self.required(node, "UnderlyingType"),
            facets: facets(node),
            annotations: self.annotations(node),
            location: node.location,
        }
    }

    fn term(&mut self, node: &CsdlNode) -> CsdlTerm {
        CsdlTerm {
            name: self.name(node),
            type_name: self.required(node, "Type"),
            facets: facets(node),
            default_value: node.attr("DefaultValue").map(str::to_string),
            base_term: node.attr("BaseTerm").map(str::to_string),
            applies_to: node
                .attr("AppliesTo")
                .map(|s| s.split_whitespace().map(SmolStr::from).collect())
                .unwrap_or_default(),
            annotations: self.annotations(node),
            location: node.location,
        }
    }

    fn operation(&mut self, node: &CsdlNode, is_function: bool) -> CsdlOperation {
        let mut op = CsdlOperation {
            name: self.name(node),
            is_bound: self.flag(node, "IsBound", false),
            is_composable: is_function && self.flag(node, "IsComposable", false),
            entity_set_path: node.attr("EntitySetPath").map(str::to_string),
            location: node.location,
            ..Default::default()
        };
        for child in &node.children {
            match child.name.as_str() {
                "Parameter" => op.parameters.push(CsdlParameter {
                    name: self.name(child),
                    type_name: self.required(child, "Type"),
                    facets: facets(child),
                    annotations: self.annotations(child),
                    location: child.location,
                }),
                "ReturnType" => {
                    op.return_type = Some(CsdlReturnType {
                        type_name: self.required(child, "Type"),
                        facets: facets(child),
                        annotations: self.annotations(child),
                        location: child.location,
                    })
                }
                "Annotation" => op.annotations.push(self.annotation(child)),
                _ => {}
            }
        }
        op
    }

    // ========================================================================
    // ENTITY CONTAINER
    // ========================================================================

    fn entity_container(&mut self, node: &CsdlNode) -> CsdlEntityContainer {
        let mut container = CsdlEntityContainer {
            name: self.name(node),
            extends: node.attr("Extends").map(str::to_string),
            location: node.location,
            ..Default::default()
        };
        for child in &node.children {
            match child.name.as_str() {
                "EntitySet" => container.entity_sets.push(Arc::new(self.navigation_source(
                    child,
                    NavigationSourceKind::EntitySet,
                ))),
                "Singleton" => container.singletons.push(Arc::new(self.navigation_source(
                    child,
                    NavigationSourceKind::Singleton,
                ))),
                "ActionImport" => container.operation_imports.push(Arc::new(
                    self.operation_import(child, OperationImportKind::ActionImport),
                )),
                "FunctionImport" => container.operation_imports.push(Arc::new(
                    self.operation_import(child, OperationImportKind::FunctionImport),
                )),
                "Annotation" => container.annotations.push(self.annotation(child)),
                other => tracing::debug!("skipping '{}' in container '{}'", other, container.name),
            }
        }
        container
    }

    fn navigation_source(&mut self, node: &CsdlNode, kind: NavigationSourceKind) -> CsdlNavigationSource {
        let type_attr = match kind {
            NavigationSourceKind::EntitySet => "EntityType",
            NavigationSourceKind::Singleton => "Type",
        };
        let bindings = node
            .children_named("NavigationPropertyBinding")
            .map(|b| CsdlNavigationPropertyBinding {
                path: self.required(b, "Path"),
                target: self.required(b, "Target"),
                location: b.location,
            })
            .collect();
        CsdlNavigationSource {
            kind,
            name: self.name(node),
            type_name: self.required(node, type_attr),
            include_in_service_document: kind == NavigationSourceKind::Singleton
                || self.flag(node, "IncludeInServiceDocument", true),
            bindings,
            annotations: self.annotations(node),
            location: node.location,
        }
    }

    fn operation_import(&mut self, node: &CsdlNode, kind: OperationImportKind) -> CsdlOperationImport {
        CsdlOperationImport {
            kind,
            name: self.name(node),
            operation: self.required(node, kind.operation_attribute()),
            entity_set: node.attr("EntitySet").map(str::to_string),
            include_in_service_document: kind == OperationImportKind::FunctionImport
                && self.flag(node, "IncludeInServiceDocument", false),
            annotations: self.annotations(node),
            location: node.location,
        }
    }

    // ========================================================================
    // ANNOTATIONS AND EXPRESSIONS
    // ========================================================================

    fn out_of_line_annotations(&mut self, node: &CsdlNode) -> CsdlAnnotations {
        CsdlAnnotations {
            target: self.required(node, "Target"),
            qualifier: node.attr("Qualifier").map(SmolStr::from),
            annotations: self.annotations(node),
            location: node.location,
        }
    }

    /// All `Annotation` children of a node.
    fn annotations(&mut self, node: &CsdlNode) -> Vec<Arc<CsdlAnnotation>> {
        node.children_named("Annotation")
            .map(|child| self.annotation(child))
            .collect()
    }

    fn annotation(&mut self, node: &CsdlNode) -> Arc<CsdlAnnotation> {
        let expression = self
            .inline_expression(node)
            .or_else(|| self.child_expressions(node).into_iter().next());
        Arc::new(CsdlAnnotation {
            term: self.required(node, "Term"),
            qualifier: node.attr("Qualifier").map(SmolStr::from),
            expression,
            annotations: self.annotations(node),
            location: node.location,
        })
    }

    /// Attribute notation: `<Annotation Term="..." String="text"/>`.
    fn inline_expression(&mut self, node: &CsdlNode) -> Option<CsdlExpression> {
        for kind in ConstantKind::ALL {
            if let Some(value) = node.attr(kind.name()) {
                return Some(CsdlExpression::Constant {
                    kind,
                    value: value.to_string(),
                });
            }
        }
        for kind in PathExpressionKind::ALL {
            if let Some(path) = node.attr(kind.name()) {
                return Some(CsdlExpression::Path {
                    kind,
                    path: path.to_string(),
                });
            }
        }
        None
    }

    fn child_expressions(&mut self, node: &CsdlNode) -> Vec<CsdlExpression> {
        node.children
            .iter()
            .filter(|c| c.name != "Annotation")
            .filter_map(|c| self.expression(c))
            .collect()
    }

    /// Element notation.
    fn expression(&mut self, node: &CsdlNode) -> Option<CsdlExpression> {
        let text = || node.text.clone().unwrap_or_default();

        if let Some(kind) = ConstantKind::from_name(&node.name) {
            return Some(CsdlExpression::Constant { kind, value: text() });
        }
        if let Some(kind) = PathExpressionKind::from_name(&node.name) {
            return Some(CsdlExpression::Path { kind, path: text() });
        }

        match node.name.as_str() {
            "Null" => Some(CsdlExpression::Null),
            "If" => {
                let mut operands = self.child_expressions(node).into_iter();
                match (operands.next(), operands.next()) {
                    (Some(test), Some(then)) => Some(CsdlExpression::If {
                        test: Box::new(test),
                        then: Box::new(then),
                        otherwise: operands.next().map(Box::new),
                    }),
                    _ => {
                        self.errors.report(
                            ErrorCode::UnexpectedElement,
                            Some(node.location),
                            "'If' expects a test and at least one branch",
                        );
                        None
                    }
                }
            }
            "Cast" | "IsOf" | "IsType" => {
                let operand = self.child_expressions(node).into_iter().next();
                let Some(operand) = operand else {
                    self.errors.report(
                        ErrorCode::UnexpectedElement,
                        Some(node.location),
                        format!("'{}' expects an operand", node.name),
                    );
                    return None;
                };
                let type_name = self.required(node, "Type");
                let facets = facets(node);
                let operand = Box::new(operand);
                Some(if node.name == "Cast" {
                    CsdlExpression::Cast {
                        type_name,
                        facets,
                        operand,
                    }
                } else {
                    CsdlExpression::IsType {
                        type_name,
                        facets,
                        operand,
                    }
                })
            }
            "Record" => {
                let mut properties = Vec::new();
                for pv in node.children_named("PropertyValue") {
                    let property: SmolStr = self.required(pv, "Property").into();
                    let value = self
                        .inline_expression(pv)
                        .or_else(|| self.child_expressions(pv).into_iter().next());
                    match value {
                        Some(value) => properties.push(CsdlPropertyValue { property, value }),
                        None => self.errors.report(
                            ErrorCode::UnexpectedElement,
                            Some(pv.location),
                            format!("property value '{}' has no expression", property),
                        ),
                    }
                }
                Some(CsdlExpression::Record {
                    type_name: node.attr("Type").map(str::to_string),
                    properties,
                })
            }
            "Collection" => Some(CsdlExpression::Collection(self.child_expressions(node))),
            "Apply" => Some(CsdlExpression::Apply {
                function: self.required(node, "Function"),
                arguments: self.child_expressions(node),
            }),
            "LabeledElement" => {
                let name: SmolStr = self.name(node);
                let value = self
                    .inline_expression(node)
                    .or_else(|| self.child_expressions(node).into_iter().next())
                    .unwrap_or(CsdlExpression::Null);
                Some(CsdlExpression::LabeledElement {
                    name,
                    value: Box::new(value),
                })
            }
            "LabeledElementReference" => Some(CsdlExpression::LabeledElementReference(text())),
            other => {
                tracing::debug!("skipping unsupported expression '{}'", other);
                None
            }
        }
    }

    // ========================================================================
    // ATTRIBUTE HELPERS
    // ========================================================================

    fn required(&mut self, node: &CsdlNode, attr: &str) -> String {
        match node.attr(attr) {
            Some(value) => value.to_string(),
            None => {
                self.errors.report(
                    ErrorCode::MissingAttribute,
                    Some(node.location),
                    format!("'{}' is missing required attribute '{}'", node.name, attr),
                );
                String::new()
            }
        }
    }

    fn name(&mut self, node: &CsdlNode) -> SmolStr {
        self.required(node, "Name").into()
    }

    fn flag(&mut self, node: &CsdlNode, attr: &str, default: bool) -> bool {
        match node.attr(attr) {
            None => default,
            Some("true") => true,
            Some("false") => false,
            Some(other) => {
                self.invalid_value(node, attr, other);
                default
            }
        }
    }

    fn invalid_value(&mut self, node: &CsdlNode, attr: &str, value: &str) {
        self.errors.report(
            ErrorCode::InvalidAttributeValue,
            Some(node.location),
            format!("'{}' is not a valid value for '{}' on '{}'", value, attr, node.name),
        );
    }
}

fn facets(node: &CsdlNode) -> CsdlFacets {
    let attr = |name: &str| node.attr(name).map(str::to_string);
    CsdlFacets {
        nullable: attr("Nullable"),
        max_length: attr("MaxLength"),
        unicode: attr("Unicode"),
        precision: attr("Precision"),
        scale: attr("Scale"),
        srid: attr("SRID"),
    }
}

/// CSDL version declared by a `Schema` element's default namespace.
fn schema_version(node: &CsdlNode) -> Option<EdmVersion> {
    node.attr("xmlns").and_then(EdmVersion::from_csdl_namespace)
}
