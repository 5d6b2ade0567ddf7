//! Model → CSDL XML, through sink callbacks.
//!
//! The writer walks the resolved model and emits structural calls
//! (`start_element`, `attribute`, `text`, `end_element`) into a [`CsdlSink`].
//! Type names are written fully qualified and facets as resolved, so a model
//! read from aliased input is written without alias-dependent names.
//! Referenced documents are never written.
//!
//! Element order is fixed:
//!
//! ```text
//! Schema          elements in declaration order, Annotation*, Annotations*
//! EntityType      Key, Property*, NavigationProperty*, Annotation*
//! EntityContainer EntitySet*, Singleton*, ActionImport/FunctionImport*, Annotation*
//! ```

use std::io::Write;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use super::WriteError;
use crate::base::EdmxVersion;
use crate::errors::{EdmError, ErrorCode};
use crate::hir::{
    EntityContainer, EnumType, MaxLength, Model, NavigationProperty, NavigationSource,
    OperationImport, Operation, PrimitiveFacets, Property, Scale, Schema, SchemaElement,
    SchemaElementKind, Srid, StructuredType, Term, TypeDefinition, TypeReference,
    TypeReferenceKind,
};
use crate::syntax::{
    ConcurrencyMode, CsdlAnnotation, CsdlExpression, CsdlFacets, CsdlReference,
    OperationImportKind,
};

/// Receives the structural calls of one output document.
pub trait CsdlSink {
    fn start_element(&mut self, name: &str) -> Result<(), WriteError>;

    /// An attribute of the element most recently started.
    fn attribute(&mut self, name: &str, value: &str) -> Result<(), WriteError>;

    /// Character content of the current element.
    fn text(&mut self, text: &str) -> Result<(), WriteError>;

    fn end_element(&mut self) -> Result<(), WriteError>;

    /// Called once after the document's last element.
    fn finish(&mut self) -> Result<(), WriteError> {
        Ok(())
    }
}

impl<S: CsdlSink + ?Sized> CsdlSink for &mut S {
    fn start_element(&mut self, name: &str) -> Result<(), WriteError> {
        (**self).start_element(name)
    }

    fn attribute(&mut self, name: &str, value: &str) -> Result<(), WriteError> {
        (**self).attribute(name, value)
    }

    fn text(&mut self, text: &str) -> Result<(), WriteError> {
        (**self).text(text)
    }

    fn end_element(&mut self) -> Result<(), WriteError> {
        (**self).end_element()
    }

    fn finish(&mut self) -> Result<(), WriteError> {
        (**self).finish()
    }
}

// ============================================================================
// XML SINK
// ============================================================================

/// A [`CsdlSink`] writing indented XML to any [`Write`].
pub struct XmlSink<W: Write> {
    writer: Writer<W>,
    /// Start tag still collecting attributes.
    pending: Option<BytesStart<'static>>,
    open: Vec<String>,
    started: bool,
}

impl<W: Write> XmlSink<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: Writer::new_with_indent(inner, b' ', 2),
            pending: None,
            open: Vec::new(),
            started: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    fn write(&mut self, event: Event<'_>) -> Result<(), WriteError> {
        self.writer
            .write_event(event)
            .map_err(|e| WriteError::xml(e.to_string()))
    }

    fn flush_pending(&mut self) -> Result<(), WriteError> {
        match self.pending.take() {
            Some(start) => self.write(Event::Start(start)),
            None => Ok(()),
        }
    }
}

impl<W: Write> CsdlSink for XmlSink<W> {
    fn start_element(&mut self, name: &str) -> Result<(), WriteError> {
        self.flush_pending()?;
        if !self.started {
            self.started = true;
            self.write(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        }
        self.pending = Some(BytesStart::new(name.to_string()));
        self.open.push(name.to_string());
        Ok(())
    }

    fn attribute(&mut self, name: &str, value: &str) -> Result<(), WriteError> {
        let start = self
            .pending
            .as_mut()
            .ok_or_else(|| WriteError::sink(format!("attribute '{}' written after element content", name)))?;
        start.push_attribute((name, value));
        Ok(())
    }

    fn text(&mut self, text: &str) -> Result<(), WriteError> {
        self.flush_pending()?;
        self.write(Event::Text(BytesText::new(text)))
    }

    fn end_element(&mut self) -> Result<(), WriteError> {
        let name = self
            .open
            .pop()
            .ok_or_else(|| WriteError::sink("end_element without an open element"))?;
        match self.pending.take() {
            Some(start) => self.write(Event::Empty(start)),
            None => self.write(Event::End(BytesEnd::new(name))),
        }
    }

    fn finish(&mut self) -> Result<(), WriteError> {
        if let Some(open) = self.open.last() {
            return Err(WriteError::sink(format!("element '{}' is still open", open)));
        }
        self.writer.get_mut().write_all(b"\n")?;
        self.writer.get_mut().flush()?;
        Ok(())
    }
}

// ============================================================================
// ENTRY POINTS
// ============================================================================

/// Write one CSDL document per schema, asking `provider` for each namespace's sink.
pub fn try_write_csdl<S, F>(model: &Model, mut provider: F) -> Result<(), Vec<EdmError>>
where
    S: CsdlSink,
    F: FnMut(&str) -> Result<S, WriteError>,
{
    let schemas = writable_schemas(model)?;
    for schema in schemas {
        let mut sink = provider(schema.namespace()).map_err(into_errors)?;
        let mut writer = CsdlWriter::new(model, &mut sink);
        writer.schema(schema).map_err(into_errors)?;
        sink.finish().map_err(into_errors)?;
    }
    Ok(())
}

/// Write the model's only schema as a bare `Schema` document.
pub fn try_write_csdl_single<S: CsdlSink>(model: &Model, mut sink: S) -> Result<(), Vec<EdmError>> {
    let schemas = writable_schemas(model)?;
    if schemas.len() > 1 {
        return Err(vec![EdmError::new(
            ErrorCode::SingleFileExpected,
            None,
            format!(
                "single-file output requested, but the model has {} schemas",
                schemas.len()
            ),
        )]);
    }
    let mut writer = CsdlWriter::new(model, &mut sink);
    for schema in schemas {
        writer.schema(schema).map_err(into_errors)?;
    }
    sink.finish().map_err(into_errors)
}

/// Write every schema inside one `edmx:Edmx` envelope.
pub fn try_write_edmx<S: CsdlSink>(model: &Model, mut sink: S) -> Result<(), Vec<EdmError>> {
    let schemas = writable_schemas(model)?;
    let mut writer = CsdlWriter::new(model, &mut sink);
    writer.edmx(&schemas).map_err(into_errors)?;
    sink.finish().map_err(into_errors)
}

fn writable_schemas(model: &Model) -> Result<Vec<Schema<'_>>, Vec<EdmError>> {
    let schemas = model.schemas();
    if schemas.is_empty() {
        return Err(vec![EdmError::from_code(ErrorCode::NoSchemasProduced, None)]);
    }
    tracing::debug!(schemas = schemas.len(), "writing model");
    Ok(schemas)
}

fn into_errors(error: WriteError) -> Vec<EdmError> {
    vec![error.into()]
}

// ============================================================================
// WRITER
// ============================================================================

struct CsdlWriter<'m, 's, S: CsdlSink + ?Sized> {
    model: &'m Model,
    sink: &'s mut S,
}

type WriteResult = Result<(), WriteError>;

impl<'m, 's, S: CsdlSink + ?Sized> CsdlWriter<'m, 's, S> {
    fn new(model: &'m Model, sink: &'s mut S) -> Self {
        Self { model, sink }
    }

    fn start(&mut self, name: &str) -> WriteResult {
        self.sink.start_element(name)
    }

    fn attr(&mut self, name: &str, value: &str) -> WriteResult {
        self.sink.attribute(name, value)
    }

    fn flag(&mut self, name: &str, value: bool) -> WriteResult {
        if value {
            self.attr(name, "true")?;
        }
        Ok(())
    }

    fn opt_attr(&mut self, name: &str, value: Option<&str>) -> WriteResult {
        match value {
            Some(value) => self.attr(name, value),
            None => Ok(()),
        }
    }

    fn end(&mut self) -> WriteResult {
        self.sink.end_element()
    }

    // ========================================================================
    // ENVELOPE
    // ========================================================================

    fn edmx(&mut self, schemas: &[Schema<'m>]) -> WriteResult {
        let version = self
            .model
            .edmx_version()
            .or_else(|| EdmxVersion::for_edm_version(self.model.edm_version()))
            .unwrap_or(EdmxVersion::V4);
        self.start("edmx:Edmx")?;
        self.attr("Version", version.as_str())?;
        self.attr("xmlns:edmx", version.namespace())?;
        for reference in self.model.references() {
            self.reference(reference)?;
        }
        self.start("edmx:DataServices")?;
        for schema in schemas {
            self.schema(*schema)?;
        }
        self.end()?;
        self.end()
    }

    fn reference(&mut self, reference: &CsdlReference) -> WriteResult {
        self.start("edmx:Reference")?;
        self.attr("Uri", &reference.uri)?;
        for include in &reference.includes {
            self.start("edmx:Include")?;
            self.attr("Namespace", &include.namespace)?;
            self.opt_attr("Alias", include.alias.as_deref())?;
            self.end()?;
        }
        for include in &reference.include_annotations {
            self.start("edmx:IncludeAnnotations")?;
            self.attr("TermNamespace", &include.term_namespace)?;
            self.opt_attr("Qualifier", include.qualifier.as_deref())?;
            self.opt_attr("TargetNamespace", include.target_namespace.as_deref())?;
            self.end()?;
        }
        self.end()
    }

    // ========================================================================
    // SCHEMA
    // ========================================================================

    fn schema(&mut self, schema: Schema<'m>) -> WriteResult {
        self.start("Schema")?;
        self.attr("xmlns", schema.version().csdl_namespace())?;
        self.attr("Namespace", schema.namespace())?;
        self.opt_attr("Alias", schema.alias())?;
        for element in schema.elements() {
            self.element(element)?;
        }
        self.annotations(&schema.ast().annotations)?;
        for (block, _) in schema.annotation_blocks() {
            self.start("Annotations")?;
            self.attr("Target", &block.target)?;
            self.opt_attr("Qualifier", block.qualifier.as_deref())?;
            self.annotations(&block.annotations)?;
            self.end()?;
        }
        self.end()
    }

    fn element(&mut self, element: SchemaElement<'m>) -> WriteResult {
        match element.kind() {
            SchemaElementKind::EntityType | SchemaElementKind::ComplexType => {
                if let Some(ty) = element.as_structured() {
                    self.structured_type(ty)?;
                }
            }
            SchemaElementKind::EnumType => {
                if let Some(e) = element.as_enum() {
                    self.enum_type(e)?;
                }
            }
            SchemaElementKind::TypeDefinition => {
                if let Some(td) = element.as_type_definition() {
                    self.type_definition(td)?;
                }
            }
            SchemaElementKind::Term => {
                if let Some(term) = element.as_term() {
                    self.term(term)?;
                }
            }
            SchemaElementKind::Action | SchemaElementKind::Function => {
                if let Some(op) = element.as_operation() {
                    self.operation(op)?;
                }
            }
            SchemaElementKind::EntityContainer => {
                if let Some(container) = element.as_entity_container() {
                    self.container(container)?;
                }
            }
        }
        Ok(())
    }

    fn structured_type(&mut self, ty: StructuredType<'m>) -> WriteResult {
        let element = ty.element();
        self.start(element.kind().as_str())?;
        self.attr("Name", ty.name())?;
        if ty.base_type_name().is_some()
            && let Some(base) = ty.base_type()
        {
            let base = self.model.element_ref_name(base);
            self.attr("BaseType", &base)?;
        }
        self.flag("Abstract", ty.is_abstract())?;
        self.flag("OpenType", ty.is_open())?;
        self.flag("HasStream", ty.has_stream())?;

        if let Some(key) = &ty.ast().key {
            self.start("Key")?;
            for property_ref in &key.property_refs {
                self.start("PropertyRef")?;
                self.attr("Name", &property_ref.name)?;
                self.opt_attr("Alias", property_ref.alias.as_deref())?;
                self.end()?;
            }
            self.end()?;
        }

        let properties = ty.declared_properties();
        for property in properties.iter().filter(|p| !p.is_navigation()) {
            self.property(*property)?;
        }
        for nav in properties.iter().filter_map(|p| p.as_navigation()) {
            self.navigation_property(nav)?;
        }
        self.annotations(element.annotations())?;
        self.end()
    }

    fn property(&mut self, property: Property<'m>) -> WriteResult {
        self.start("Property")?;
        self.attr("Name", property.name())?;
        self.typed(property.type_ref())?;
        self.opt_attr("DefaultValue", property.default_value())?;
        if property.concurrency_mode() == ConcurrencyMode::Fixed {
            self.attr("ConcurrencyMode", "Fixed")?;
        }
        self.annotations(property.annotations())?;
        self.end()
    }

    fn navigation_property(&mut self, nav: NavigationProperty<'m>) -> WriteResult {
        let type_ref = nav.type_ref();
        self.start("NavigationProperty")?;
        self.attr("Name", nav.name())?;
        self.attr("Type", &self.model.type_name(type_ref))?;
        if !type_ref.is_collection() && !type_ref.nullable {
            self.attr("Nullable", "false")?;
        }
        self.opt_attr("Partner", nav.partner_name())?;
        self.flag("ContainsTarget", nav.contains_target())?;
        if let Some(action) = nav.on_delete() {
            self.start("OnDelete")?;
            self.attr("Action", action.as_str())?;
            self.end()?;
        }
        for constraint in nav.referential_constraints() {
            self.start("ReferentialConstraint")?;
            self.attr("Property", &constraint.property)?;
            self.attr("ReferencedProperty", &constraint.referenced_property)?;
            self.end()?;
        }
        self.annotations(&nav.ast().annotations)?;
        self.end()
    }

    fn enum_type(&mut self, e: EnumType<'m>) -> WriteResult {
        self.start("EnumType")?;
        self.attr("Name", e.name())?;
        if e.ast().underlying_type.is_some()
            && let Some(kind) = e.underlying_type()
        {
            self.attr("UnderlyingType", &kind.full_name())?;
        }
        self.flag("IsFlags", e.is_flags())?;
        for member in e.members() {
            self.start("Member")?;
            self.attr("Name", member.name())?;
            self.attr("Value", &member.value().to_string())?;
            self.annotations(member.annotations())?;
            self.end()?;
        }
        self.annotations(e.element().annotations())?;
        self.end()
    }

    fn type_definition(&mut self, td: TypeDefinition<'m>) -> WriteResult {
        let underlying = td.underlying_type();
        self.start("TypeDefinition")?;
        self.attr("Name", td.name())?;
        self.attr("UnderlyingType", &self.model.type_name(underlying))?;
        self.facets(underlying)?;
        self.annotations(td.element().annotations())?;
        self.end()
    }

    fn term(&mut self, term: Term<'m>) -> WriteResult {
        self.start("Term")?;
        self.attr("Name", term.name())?;
        self.typed(term.type_ref())?;
        self.opt_attr("DefaultValue", term.default_value())?;
        if let Some(base) = term.base_term() {
            let base = self.model.element_ref_name(base);
            self.attr("BaseTerm", &base)?;
        }
        if !term.applies_to().is_empty() {
            let applies_to: Vec<&str> = term.applies_to().iter().map(|s| s.as_str()).collect();
            self.attr("AppliesTo", &applies_to.join(" "))?;
        }
        self.annotations(term.element().annotations())?;
        self.end()
    }

    fn operation(&mut self, op: Operation<'m>) -> WriteResult {
        self.start(op.element().kind().as_str())?;
        self.attr("Name", op.name())?;
        self.flag("IsBound", op.is_bound())?;
        self.flag("IsComposable", op.is_composable())?;
        self.opt_attr("EntitySetPath", op.entity_set_path())?;
        for parameter in op.parameters() {
            self.start("Parameter")?;
            self.attr("Name", parameter.name())?;
            self.typed(parameter.type_ref())?;
            self.annotations(&parameter.ast().annotations)?;
            self.end()?;
        }
        if let (Some(type_ref), Some(ast)) = (op.return_type(), &op.ast().return_type) {
            self.start("ReturnType")?;
            self.typed(type_ref)?;
            self.annotations(&ast.annotations)?;
            self.end()?;
        }
        self.annotations(op.element().annotations())?;
        self.end()
    }

    // ========================================================================
    // CONTAINER
    // ========================================================================

    fn container(&mut self, container: EntityContainer<'m>) -> WriteResult {
        self.start("EntityContainer")?;
        self.attr("Name", container.name())?;
        if let Some(extends) = container.extends() {
            let extends = self.model.element_ref_name(extends);
            self.attr("Extends", &extends)?;
        }
        for source in container.entity_sets() {
            self.navigation_source(source, "EntityType")?;
        }
        for source in container.singletons() {
            self.navigation_source(source, "Type")?;
        }
        for import in container.operation_imports() {
            self.operation_import(import)?;
        }
        self.annotations(container.element().annotations())?;
        self.end()
    }

    fn navigation_source(&mut self, source: NavigationSource<'m>, type_attr: &str) -> WriteResult {
        self.start(source.kind().element_name())?;
        self.attr("Name", source.name())?;
        self.attr(type_attr, &self.model.type_name(source.type_ref()))?;
        if !source.include_in_service_document() {
            self.attr("IncludeInServiceDocument", "false")?;
        }
        for binding in &source.ast().bindings {
            self.start("NavigationPropertyBinding")?;
            self.attr("Path", &binding.path)?;
            self.attr("Target", &binding.target)?;
            self.end()?;
        }
        self.annotations(source.annotations())?;
        self.end()
    }

    fn operation_import(&mut self, import: OperationImport<'m>) -> WriteResult {
        let kind = import.kind();
        self.start(kind.element_name())?;
        self.attr("Name", import.name())?;
        let operation = import
            .resolved_operations()
            .first()
            .map(|op| op.full_name().to_string())
            .unwrap_or_else(|| import.operation_name().to_string());
        self.attr(kind.operation_attribute(), &operation)?;
        self.opt_attr("EntitySet", import.entity_set_name())?;
        if kind == OperationImportKind::FunctionImport && import.ast().include_in_service_document {
            self.attr("IncludeInServiceDocument", "true")?;
        }
        self.annotations(import.annotations())?;
        self.end()
    }

    // ========================================================================
    // TYPES
    // ========================================================================

    /// `Type`, `Nullable` and facets. Collections carry the element's facets.
    fn typed(&mut self, type_ref: &TypeReference) -> WriteResult {
        self.attr("Type", &self.model.type_name(type_ref))?;
        if !type_ref.element_type().nullable {
            self.attr("Nullable", "false")?;
        }
        self.facets(type_ref)
    }

    fn facets(&mut self, type_ref: &TypeReference) -> WriteResult {
        let facets = match &type_ref.element_type().kind {
            TypeReferenceKind::Primitive(p) => p.facets,
            TypeReferenceKind::TypeDefinition { facets, .. } => *facets,
            _ => return Ok(()),
        };
        for (name, value) in facet_attributes(&facets) {
            self.attr(name, &value)?;
        }
        Ok(())
    }

    // ========================================================================
    // ANNOTATIONS
    // ========================================================================

    fn annotations(&mut self, annotations: &[std::sync::Arc<CsdlAnnotation>]) -> WriteResult {
        for annotation in annotations {
            self.annotation(annotation)?;
        }
        Ok(())
    }

    fn annotation(&mut self, annotation: &CsdlAnnotation) -> WriteResult {
        self.start("Annotation")?;
        self.attr("Term", &annotation.term)?;
        self.opt_attr("Qualifier", annotation.qualifier.as_deref())?;
        if let Some(expression) = &annotation.expression {
            self.value(expression)?;
        }
        self.annotations(&annotation.annotations)?;
        self.end()
    }

    /// Constants and paths in attribute notation, everything else as a child.
    fn value(&mut self, expression: &CsdlExpression) -> WriteResult {
        match expression {
            CsdlExpression::Constant { kind, value } => self.attr(kind.name(), value),
            CsdlExpression::Path { kind, path } => self.attr(kind.name(), path),
            other => self.expression(other),
        }
    }

    fn expression(&mut self, expression: &CsdlExpression) -> WriteResult {
        match expression {
            CsdlExpression::Constant { kind, value } => self.leaf(kind.name(), value),
            CsdlExpression::Path { kind, path } => self.leaf(kind.name(), path),
            CsdlExpression::LabeledElementReference(name) => self.leaf("LabeledElementReference", name),
            CsdlExpression::Null => {
                self.start("Null")?;
                self.end()
            }
            CsdlExpression::If {
                test,
                then,
                otherwise,
            } => {
                self.start("If")?;
                self.expression(test)?;
                self.expression(then)?;
                if let Some(otherwise) = otherwise {
                    self.expression(otherwise)?;
                }
                self.end()
            }
            CsdlExpression::Cast {
                type_name,
                facets,
                operand,
            } => self.type_test("Cast", type_name, facets, operand),
            CsdlExpression::IsType {
                type_name,
                facets,
                operand,
            } => self.type_test("IsOf", type_name, facets, operand),
            CsdlExpression::Record { type_name, properties } => {
                self.start("Record")?;
                self.opt_attr("Type", type_name.as_deref())?;
                for property in properties {
                    self.start("PropertyValue")?;
                    self.attr("Property", &property.property)?;
                    self.value(&property.value)?;
                    self.end()?;
                }
                self.end()
            }
            CsdlExpression::Collection(items) => {
                self.start("Collection")?;
                for item in items {
                    self.expression(item)?;
                }
                self.end()
            }
            CsdlExpression::Apply { function, arguments } => {
                self.start("Apply")?;
                self.attr("Function", function)?;
                for argument in arguments {
                    self.expression(argument)?;
                }
                self.end()
            }
            CsdlExpression::LabeledElement { name, value } => {
                self.start("LabeledElement")?;
                self.attr("Name", name)?;
                self.value(value)?;
                self.end()
            }
        }
    }

    fn leaf(&mut self, name: &str, text: &str) -> WriteResult {
        self.start(name)?;
        self.sink.text(text)?;
        self.end()
    }

    fn type_test(
        &mut self,
        name: &str,
        type_name: &str,
        facets: &CsdlFacets,
        operand: &CsdlExpression,
    ) -> WriteResult {
        self.start(name)?;
        self.attr("Type", type_name)?;
        let written = [
            ("MaxLength", &facets.max_length),
            ("Precision", &facets.precision),
            ("Scale", &facets.scale),
            ("SRID", &facets.srid),
        ];
        for (attr, value) in written {
            self.opt_attr(attr, value.as_deref())?;
        }
        self.expression(operand)?;
        self.end()
    }
}

/// Attribute form of resolved facets; unspecified facets are omitted.
fn facet_attributes(facets: &PrimitiveFacets) -> Vec<(&'static str, String)> {
    let mut attrs = Vec::new();
    let max_length = |attrs: &mut Vec<(&'static str, String)>, max_length: MaxLength| match max_length {
        MaxLength::Unspecified => {}
        MaxLength::Unbounded => attrs.push(("MaxLength", "max".to_string())),
        MaxLength::Bounded(n) => attrs.push(("MaxLength", n.to_string())),
    };
    match *facets {
        PrimitiveFacets::None => {}
        PrimitiveFacets::String {
            max_length: length,
            unicode,
        } => {
            max_length(&mut attrs, length);
            if let Some(unicode) = unicode {
                attrs.push(("Unicode", unicode.to_string()));
            }
        }
        PrimitiveFacets::Binary { max_length: length } => max_length(&mut attrs, length),
        PrimitiveFacets::Decimal { precision, scale } => {
            if let Some(precision) = precision {
                attrs.push(("Precision", precision.to_string()));
            }
            match scale {
                Some(Scale::Value(n)) => attrs.push(("Scale", n.to_string())),
                Some(Scale::Variable) => attrs.push(("Scale", "variable".to_string())),
                Some(Scale::Floating) => attrs.push(("Scale", "floating".to_string())),
                None => {}
            }
        }
        PrimitiveFacets::Temporal { precision } => {
            if let Some(precision) = precision {
                attrs.push(("Precision", precision.to_string()));
            }
        }
        PrimitiveFacets::Spatial { srid } => match srid {
            Some(Srid::Value(n)) => attrs.push(("SRID", n.to_string())),
            Some(Srid::Variable) => attrs.push(("SRID", "variable".to_string())),
            None => {}
        },
    }
    attrs
}
