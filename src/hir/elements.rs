//! Schema elements and their handles.
//!
//! Each record wraps exactly one syntax node plus the lazy slots for the
//! facts derived from it. Handles are `Copy` views of `(&Model, id)`; every
//! derived fact is computed on first access and cached in the record.

use std::sync::Arc;

use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use super::annotations::VocabularyAnnotation;
use super::container::{ContainerData, EntityContainer};
use super::ids::{AnnotationId, ElementId, ElementRef, PropertyId};
use super::lazy::{DelayLoaded, Memo};
use super::lookup::PlaceholderKind;
use super::model::Model;
use super::properties::{Property, PropertyData};
use super::type_resolver::primitive_kind;
use super::types::{PrimitiveKind, TypeReference, TypeReferenceKind};
use crate::base::constants::MAX_CHAIN_DEPTH;
use crate::base::{DocumentId, EdmVersion, Location};
use crate::syntax::{
    CsdlAnnotation, CsdlEnumMember, CsdlEnumType, CsdlOperation, CsdlSchemaElement,
    CsdlStructuredType, CsdlTerm, CsdlTypeDefinition,
};

/// What kind of schema element a record is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaElementKind {
    EntityType,
    ComplexType,
    EnumType,
    TypeDefinition,
    Term,
    Action,
    Function,
    EntityContainer,
}

impl SchemaElementKind {
    pub fn is_type(self) -> bool {
        matches!(
            self,
            SchemaElementKind::EntityType
                | SchemaElementKind::ComplexType
                | SchemaElementKind::EnumType
                | SchemaElementKind::TypeDefinition
        )
    }

    pub fn is_structured(self) -> bool {
        matches!(self, SchemaElementKind::EntityType | SchemaElementKind::ComplexType)
    }

    pub fn is_operation(self) -> bool {
        matches!(self, SchemaElementKind::Action | SchemaElementKind::Function)
    }

    /// CSDL element name.
    pub fn as_str(self) -> &'static str {
        match self {
            SchemaElementKind::EntityType => "EntityType",
            SchemaElementKind::ComplexType => "ComplexType",
            SchemaElementKind::EnumType => "EnumType",
            SchemaElementKind::TypeDefinition => "TypeDefinition",
            SchemaElementKind::Term => "Term",
            SchemaElementKind::Action => "Action",
            SchemaElementKind::Function => "Function",
            SchemaElementKind::EntityContainer => "EntityContainer",
        }
    }
}

// ============================================================================
// RECORDS
// ============================================================================

pub(crate) struct ElementData {
    pub document: DocumentId,
    pub namespace: SmolStr,
    pub name: SmolStr,
    pub full_name: Arc<str>,
    pub location: Location,
    pub body: ElementBody,
    pub annotations: Memo<Vec<AnnotationId>>,
}

pub(crate) enum ElementBody {
    Structured(StructuredData),
    Enum(EnumData),
    TypeDefinition(TypeDefinitionData),
    Term(TermData),
    Operation(OperationData),
    Container(ContainerData),
}

impl ElementData {
    pub fn new(
        document: DocumentId,
        namespace: SmolStr,
        full_name: Arc<str>,
        element: &CsdlSchemaElement,
    ) -> Self {
        let body = match element {
            CsdlSchemaElement::EntityType(t) => ElementBody::Structured(StructuredData::new(t, true)),
            CsdlSchemaElement::ComplexType(t) => ElementBody::Structured(StructuredData::new(t, false)),
            CsdlSchemaElement::EnumType(e) => ElementBody::Enum(EnumData::new(e)),
            CsdlSchemaElement::TypeDefinition(t) => ElementBody::TypeDefinition(TypeDefinitionData {
                ast: Arc::clone(t),
                underlying_kind: primitive_kind(&t.underlying_type),
                underlying: Memo::new(),
            }),
            CsdlSchemaElement::Term(t) => ElementBody::Term(TermData {
                ast: Arc::clone(t),
                type_ref: Memo::new(),
                base_term: Memo::new(),
            }),
            CsdlSchemaElement::Action(o) => ElementBody::Operation(OperationData::new(o, true)),
            CsdlSchemaElement::Function(o) => ElementBody::Operation(OperationData::new(o, false)),
            CsdlSchemaElement::EntityContainer(c) => ElementBody::Container(ContainerData::new(c)),
        };
        Self {
            document,
            namespace,
            name: element.name().clone(),
            full_name,
            location: element.location(),
            body,
            annotations: Memo::new(),
        }
    }

    pub fn kind(&self) -> SchemaElementKind {
        match &self.body {
            ElementBody::Structured(s) if s.is_entity => SchemaElementKind::EntityType,
            ElementBody::Structured(_) => SchemaElementKind::ComplexType,
            ElementBody::Enum(_) => SchemaElementKind::EnumType,
            ElementBody::TypeDefinition(_) => SchemaElementKind::TypeDefinition,
            ElementBody::Term(_) => SchemaElementKind::Term,
            ElementBody::Operation(o) if o.is_action => SchemaElementKind::Action,
            ElementBody::Operation(_) => SchemaElementKind::Function,
            ElementBody::Container(_) => SchemaElementKind::EntityContainer,
        }
    }
}

pub(crate) struct StructuredData {
    pub ast: Arc<CsdlStructuredType>,
    pub is_entity: bool,
    pub properties: DelayLoaded<Vec<PropertyData>>,
    pub base_type: Memo<Option<ElementRef>>,
    pub key: Memo<Option<Vec<PropertyId>>>,
}

impl StructuredData {
    fn new(ast: &Arc<CsdlStructuredType>, is_entity: bool) -> Self {
        let source = Arc::clone(ast);
        Self {
            ast: Arc::clone(ast),
            is_entity,
            properties: DelayLoaded::new(move || {
                source.properties.iter().cloned().map(PropertyData::new).collect()
            }),
            base_type: Memo::new(),
            key: Memo::new(),
        }
    }
}

pub(crate) struct EnumData {
    pub ast: Arc<CsdlEnumType>,
    /// `None` when the declared underlying type is not a primitive.
    pub underlying_kind: Option<PrimitiveKind>,
    pub members: DelayLoaded<Vec<EnumMemberData>>,
}

pub(crate) struct EnumMemberData {
    pub ast: CsdlEnumMember,
    pub value: i64,
    /// False when a declared value did not parse; `value` is then auto-assigned.
    pub value_is_valid: bool,
}

impl EnumData {
    fn new(ast: &Arc<CsdlEnumType>) -> Self {
        let source = Arc::clone(ast);
        Self {
            ast: Arc::clone(ast),
            underlying_kind: match &ast.underlying_type {
                None => Some(PrimitiveKind::Int32),
                Some(raw) => primitive_kind(raw),
            },
            members: DelayLoaded::new(move || {
                let mut next = 0i64;
                source
                    .members
                    .iter()
                    .map(|member| {
                        let (value, value_is_valid) = match member.value.as_deref() {
                            None => (next, true),
                            Some(raw) => match raw.trim().parse::<i64>() {
                                Ok(value) => (value, true),
                                Err(_) => (next, false),
                            },
                        };
                        next = value.saturating_add(1);
                        EnumMemberData {
                            ast: member.clone(),
                            value,
                            value_is_valid,
                        }
                    })
                    .collect()
            }),
        }
    }
}

pub(crate) struct TypeDefinitionData {
    pub ast: Arc<CsdlTypeDefinition>,
    pub underlying_kind: Option<PrimitiveKind>,
    pub underlying: Memo<TypeReference>,
}

pub(crate) struct TermData {
    pub ast: Arc<CsdlTerm>,
    pub type_ref: Memo<TypeReference>,
    pub base_term: Memo<Option<ElementRef>>,
}

pub(crate) struct OperationData {
    pub ast: Arc<CsdlOperation>,
    pub is_action: bool,
    pub parameter_types: Vec<Memo<TypeReference>>,
    pub return_type: Memo<Option<TypeReference>>,
}

impl OperationData {
    fn new(ast: &Arc<CsdlOperation>, is_action: bool) -> Self {
        Self {
            ast: Arc::clone(ast),
            is_action,
            parameter_types: ast.parameters.iter().map(|_| Memo::new()).collect(),
            return_type: Memo::new(),
        }
    }
}

/// Base type of a structured type by raw lookup, ignoring the memo.
pub(crate) fn declared_base(model: &Model, id: ElementId) -> Option<ElementId> {
    let data = model.element_data(id);
    let ElementBody::Structured(s) = &data.body else {
        return None;
    };
    let raw = s.ast.base_type.as_deref()?;
    model.lookup_in(data.document, raw, SchemaElementKind::is_structured)
}

// ============================================================================
// SCHEMA ELEMENT
// ============================================================================

/// Any declared schema element.
#[derive(Clone, Copy)]
pub struct SchemaElement<'m> {
    model: &'m Model,
    id: ElementId,
}

handle_impls!(SchemaElement, id);

impl<'m> SchemaElement<'m> {
    pub(crate) fn new(model: &'m Model, id: ElementId) -> Self {
        Self { model, id }
    }

    pub(crate) fn data(&self) -> &'m ElementData {
        self.model.element_data(self.id)
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn model(&self) -> &'m Model {
        self.model
    }

    pub fn kind(&self) -> SchemaElementKind {
        self.data().kind()
    }

    pub fn name(&self) -> &'m str {
        &self.data().name
    }

    pub fn namespace(&self) -> &'m str {
        &self.data().namespace
    }

    pub fn full_name(&self) -> &'m str {
        &self.data().full_name
    }

    pub fn document(&self) -> DocumentId {
        self.data().document
    }

    pub fn is_reference(&self) -> bool {
        self.model.is_reference_document(self.document())
    }

    /// CSDL version of the declaring document.
    pub fn version(&self) -> EdmVersion {
        self.model.document_version(self.document())
    }

    pub fn location(&self) -> Location {
        self.data().location
    }

    /// Inline annotations as written.
    pub fn annotations(&self) -> &'m [Arc<CsdlAnnotation>] {
        match &self.data().body {
            ElementBody::Structured(s) => &s.ast.annotations,
            ElementBody::Enum(e) => &e.ast.annotations,
            ElementBody::TypeDefinition(t) => &t.ast.annotations,
            ElementBody::Term(t) => &t.ast.annotations,
            ElementBody::Operation(o) => &o.ast.annotations,
            ElementBody::Container(c) => &c.ast.annotations,
        }
    }

    /// Every annotation targeting this element, inline and out-of-line.
    pub fn vocabulary_annotations(&self) -> Vec<VocabularyAnnotation<'m>> {
        let data = self.data();
        data.annotations
            .get_or_compute(|| self.model.annotations_for(&data.full_name).to_vec())
            .iter()
            .map(|id| VocabularyAnnotation::new(self.model, *id))
            .collect()
    }

    pub fn as_structured(&self) -> Option<StructuredType<'m>> {
        matches!(self.data().body, ElementBody::Structured(_)).then_some(StructuredType {
            model: self.model,
            id: self.id,
        })
    }

    /// Entity types only.
    pub fn as_entity_type(&self) -> Option<StructuredType<'m>> {
        self.as_structured().filter(|s| s.is_entity())
    }

    pub fn as_enum(&self) -> Option<EnumType<'m>> {
        matches!(self.data().body, ElementBody::Enum(_)).then_some(EnumType {
            model: self.model,
            id: self.id,
        })
    }

    pub fn as_type_definition(&self) -> Option<TypeDefinition<'m>> {
        matches!(self.data().body, ElementBody::TypeDefinition(_)).then_some(TypeDefinition {
            model: self.model,
            id: self.id,
        })
    }

    pub fn as_term(&self) -> Option<Term<'m>> {
        matches!(self.data().body, ElementBody::Term(_)).then_some(Term {
            model: self.model,
            id: self.id,
        })
    }

    pub fn as_operation(&self) -> Option<Operation<'m>> {
        matches!(self.data().body, ElementBody::Operation(_)).then_some(Operation {
            model: self.model,
            id: self.id,
        })
    }

    pub fn as_entity_container(&self) -> Option<EntityContainer<'m>> {
        matches!(self.data().body, ElementBody::Container(_))
            .then(|| EntityContainer::new(self.model, self.id))
    }

    /// Compute every lazy fact of this element and its members.
    pub(crate) fn force(&self) {
        self.vocabulary_annotations();
        if let Some(ty) = self.as_structured() {
            ty.base_type();
            ty.key();
            for property in ty.declared_properties() {
                property.force();
            }
        } else if let Some(e) = self.as_enum() {
            e.members();
        } else if let Some(t) = self.as_type_definition() {
            t.underlying_type();
        } else if let Some(t) = self.as_term() {
            t.type_ref();
            t.base_term();
        } else if let Some(op) = self.as_operation() {
            op.return_type();
            for parameter in op.parameters() {
                parameter.type_ref();
            }
        } else if let Some(c) = self.as_entity_container() {
            c.force();
        }
    }
}

// ============================================================================
// STRUCTURED TYPES
// ============================================================================

/// An entity type or complex type.
#[derive(Clone, Copy)]
pub struct StructuredType<'m> {
    model: &'m Model,
    id: ElementId,
}

handle_impls!(StructuredType, id);

impl<'m> StructuredType<'m> {
    pub(crate) fn new(model: &'m Model, id: ElementId) -> Self {
        Self { model, id }
    }

    pub(crate) fn data(&self) -> &'m StructuredData {
        match &self.model.element_data(self.id).body {
            ElementBody::Structured(s) => s,
            _ => unreachable!("structured handle over a non-structured element"),
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn element(&self) -> SchemaElement<'m> {
        SchemaElement::new(self.model, self.id)
    }

    pub fn name(&self) -> &'m str {
        self.element().name()
    }

    pub fn full_name(&self) -> &'m str {
        self.element().full_name()
    }

    pub fn ast(&self) -> &'m CsdlStructuredType {
        &self.data().ast
    }

    pub fn is_entity(&self) -> bool {
        self.data().is_entity
    }

    pub fn is_abstract(&self) -> bool {
        self.ast().is_abstract
    }

    pub fn is_open(&self) -> bool {
        self.ast().is_open
    }

    pub fn has_stream(&self) -> bool {
        self.ast().has_stream
    }

    pub fn base_type_name(&self) -> Option<&'m str> {
        self.ast().base_type.as_deref()
    }

    /// The resolved base type.
    ///
    /// An unknown name yields its type placeholder. A base type that leads
    /// back to this type yields a cyclic placeholder instead.
    pub fn base_type(&self) -> Option<ElementRef> {
        *self.data().base_type.get_or_compute(|| self.compute_base_type())
    }

    fn compute_base_type(&self) -> Option<ElementRef> {
        let raw = self.base_type_name()?;
        let model = self.model;
        let document = self.element().document();
        let qualified = model.qualify(document, raw.trim());
        let placeholders = model.placeholders();
        Some(match model.lookup_in(document, raw, SchemaElementKind::is_structured) {
            None => ElementRef::Unresolved(placeholders.get_or_create(PlaceholderKind::Type, &qualified)),
            Some(base) if model.chain_returns_to(self.id, base, |id| declared_base(model, id)) => {
                tracing::debug!("base type of '{}' is cyclic", self.full_name());
                ElementRef::Unresolved(placeholders.get_or_create(PlaceholderKind::CyclicBaseType, &qualified))
            }
            Some(base) => ElementRef::Declared(base),
        })
    }

    /// True if the base type is part of an inheritance cycle.
    pub fn has_cyclic_base(&self) -> bool {
        match self.base_type() {
            Some(ElementRef::Unresolved(id)) => {
                self.model.placeholder(id).kind == PlaceholderKind::CyclicBaseType
            }
            _ => false,
        }
    }

    /// The declared base type, when it resolved.
    pub fn base_structured(&self) -> Option<StructuredType<'m>> {
        let id = self.base_type()?.declared()?;
        Some(StructuredType::new(self.model, id))
    }

    /// This type followed by its base types, most derived first.
    pub fn base_chain(&self) -> Vec<StructuredType<'m>> {
        let mut chain = vec![*self];
        let mut seen = FxHashSet::default();
        seen.insert(self.id);
        let mut current = *self;
        while let Some(base) = current.base_structured() {
            if !seen.insert(base.id) || chain.len() > MAX_CHAIN_DEPTH {
                break;
            }
            chain.push(base);
            current = base;
        }
        chain
    }

    /// Walks base types with a visited set; false on a cycle.
    pub fn is_or_inherits_from(&self, candidate: ElementId) -> bool {
        self.base_chain().iter().any(|t| t.id == candidate)
    }

    /// Properties declared on this type, in declaration order.
    pub fn declared_properties(&self) -> Vec<Property<'m>> {
        (0..self.data().properties.get().len())
            .map(|index| {
                Property::new(
                    self.model,
                    PropertyId {
                        owner: self.id,
                        index: index as u32,
                    },
                )
            })
            .collect()
    }

    /// Inherited properties first, then declared ones.
    pub fn properties(&self) -> Vec<Property<'m>> {
        self.base_chain()
            .into_iter()
            .rev()
            .flat_map(|t| t.declared_properties())
            .collect()
    }

    pub fn find_declared_property(&self, name: &str) -> Option<Property<'m>> {
        self.declared_properties().into_iter().find(|p| p.name() == name)
    }

    /// Find a property on this type or any base type.
    pub fn find_property(&self, name: &str) -> Option<Property<'m>> {
        self.base_chain()
            .into_iter()
            .find_map(|t| t.find_declared_property(name))
    }

    pub fn navigation_properties(&self) -> Vec<Property<'m>> {
        self.properties()
            .into_iter()
            .filter(|p| p.is_navigation())
            .collect()
    }

    pub fn structural_properties(&self) -> Vec<Property<'m>> {
        self.properties()
            .into_iter()
            .filter(|p| !p.is_navigation())
            .collect()
    }

    /// Resolve `Address/Street` through complex-typed properties.
    pub fn resolve_property_path(&self, path: &str) -> Option<Property<'m>> {
        let mut current = *self;
        let mut segments = path.split('/').peekable();
        while let Some(segment) = segments.next() {
            let property = current.find_property(segment.trim())?;
            if segments.peek().is_none() {
                return Some(property);
            }
            let next = property.type_ref().element_type().definition_id()?;
            current = self.model.element(next).as_structured()?;
        }
        None
    }

    /// Key properties declared on this type itself, as resolved.
    pub fn declared_key(&self) -> Option<Vec<Property<'m>>> {
        let key = self.ast().key.as_ref()?;
        Some(
            key.property_refs
                .iter()
                .filter_map(|r| self.resolve_property_path(&r.name))
                .collect(),
        )
    }

    /// The key in effect: declared here or on the nearest base type.
    pub fn key(&self) -> Option<Vec<Property<'m>>> {
        let ids = self.data().key.get_or_compute(|| {
            self.base_chain()
                .into_iter()
                .find_map(|t| t.declared_key())
                .map(|props| props.iter().map(|p| p.id()).collect())
        });
        ids.as_ref()
            .map(|ids| ids.iter().map(|id| Property::new(self.model, *id)).collect())
    }

    /// Types whose resolved base type is this one.
    pub fn derived_types(&self) -> Vec<StructuredType<'m>> {
        self.model
            .elements()
            .filter_map(|e| e.as_structured())
            .filter(|t| t.base_type() == Some(ElementRef::Declared(self.id)))
            .collect()
    }
}

// ============================================================================
// ENUMS AND TYPE DEFINITIONS
// ============================================================================

#[derive(Clone, Copy)]
pub struct EnumType<'m> {
    model: &'m Model,
    id: ElementId,
}

handle_impls!(EnumType, id);

impl<'m> EnumType<'m> {
    fn data(&self) -> &'m EnumData {
        match &self.model.element_data(self.id).body {
            ElementBody::Enum(e) => e,
            _ => unreachable!("enum handle over a non-enum element"),
        }
    }

    pub fn element(&self) -> SchemaElement<'m> {
        SchemaElement::new(self.model, self.id)
    }

    pub fn name(&self) -> &'m str {
        self.element().name()
    }

    pub fn ast(&self) -> &'m CsdlEnumType {
        &self.data().ast
    }

    /// Underlying type; defaults to `Edm.Int32`, `None` if not a primitive.
    pub fn underlying_type(&self) -> Option<PrimitiveKind> {
        self.data().underlying_kind
    }

    pub fn is_flags(&self) -> bool {
        self.ast().is_flags
    }

    /// Members in declaration order (delay-loaded).
    pub fn members(&self) -> Vec<EnumMember<'m>> {
        (0..self.data().members.get().len())
            .map(|index| EnumMember {
                owner: *self,
                index,
            })
            .collect()
    }

    pub fn find_member(&self, name: &str) -> Option<EnumMember<'m>> {
        self.members().into_iter().find(|m| m.name() == name)
    }
}

#[derive(Clone, Copy)]
pub struct EnumMember<'m> {
    owner: EnumType<'m>,
    index: usize,
}

impl<'m> EnumMember<'m> {
    fn data(&self) -> &'m EnumMemberData {
        &self.owner.data().members.get()[self.index]
    }

    pub fn owner(&self) -> EnumType<'m> {
        self.owner
    }

    pub fn name(&self) -> &'m str {
        &self.data().ast.name
    }

    /// Declared or auto-assigned value.
    pub fn value(&self) -> i64 {
        self.data().value
    }

    pub fn declared_value(&self) -> Option<&'m str> {
        self.data().ast.value.as_deref()
    }

    pub fn has_valid_value(&self) -> bool {
        self.data().value_is_valid
    }

    pub fn location(&self) -> Location {
        self.data().ast.location
    }

    pub fn annotations(&self) -> &'m [Arc<CsdlAnnotation>] {
        &self.data().ast.annotations
    }
}

impl std::fmt::Debug for EnumMember<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnumMember")
            .field("name", &self.name())
            .field("value", &self.value())
            .finish()
    }
}

#[derive(Clone, Copy)]
pub struct TypeDefinition<'m> {
    model: &'m Model,
    id: ElementId,
}

handle_impls!(TypeDefinition, id);

impl<'m> TypeDefinition<'m> {
    fn data(&self) -> &'m TypeDefinitionData {
        match &self.model.element_data(self.id).body {
            ElementBody::TypeDefinition(t) => t,
            _ => unreachable!("type definition handle over another element"),
        }
    }

    pub fn element(&self) -> SchemaElement<'m> {
        SchemaElement::new(self.model, self.id)
    }

    pub fn name(&self) -> &'m str {
        self.element().name()
    }

    pub fn ast(&self) -> &'m CsdlTypeDefinition {
        &self.data().ast
    }

    pub fn underlying_kind(&self) -> Option<PrimitiveKind> {
        self.data().underlying_kind
    }

    /// The underlying primitive with this definition's facets.
    pub fn underlying_type(&self) -> &'m TypeReference {
        let data = self.data();
        data.underlying.get_or_compute(|| {
            self.model.resolve_type_in(
                self.element().document(),
                &data.ast.underlying_type,
                &data.ast.facets,
            )
        })
    }
}

// ============================================================================
// TERMS
// ============================================================================

#[derive(Clone, Copy)]
pub struct Term<'m> {
    model: &'m Model,
    id: ElementId,
}

handle_impls!(Term, id);

impl<'m> Term<'m> {
    pub(crate) fn new(model: &'m Model, id: ElementId) -> Self {
        Self { model, id }
    }

    fn data(&self) -> &'m TermData {
        match &self.model.element_data(self.id).body {
            ElementBody::Term(t) => t,
            _ => unreachable!("term handle over a non-term element"),
        }
    }

    pub fn element(&self) -> SchemaElement<'m> {
        SchemaElement::new(self.model, self.id)
    }

    pub fn name(&self) -> &'m str {
        self.element().name()
    }

    pub fn full_name(&self) -> &'m str {
        self.element().full_name()
    }

    pub fn ast(&self) -> &'m CsdlTerm {
        &self.data().ast
    }

    pub fn type_ref(&self) -> &'m TypeReference {
        let data = self.data();
        data.type_ref.get_or_compute(|| {
            self.model
                .resolve_type_in(self.element().document(), &data.ast.type_name, &data.ast.facets)
        })
    }

    pub fn default_value(&self) -> Option<&'m str> {
        self.ast().default_value.as_deref()
    }

    pub fn base_term(&self) -> Option<ElementRef> {
        let data = self.data();
        *data.base_term.get_or_compute(|| {
            let raw = data.ast.base_term.as_deref()?;
            Some(self.model.resolve_in(
                self.element().document(),
                raw,
                PlaceholderKind::Term,
                |kind| kind == SchemaElementKind::Term,
            ))
        })
    }

    pub fn applies_to(&self) -> &'m [SmolStr] {
        &self.ast().applies_to
    }
}

// ============================================================================
// OPERATIONS
// ============================================================================

/// An action or function.
#[derive(Clone, Copy)]
pub struct Operation<'m> {
    model: &'m Model,
    id: ElementId,
}

handle_impls!(Operation, id);

impl<'m> Operation<'m> {
    pub(crate) fn new(model: &'m Model, id: ElementId) -> Self {
        Self { model, id }
    }

    fn data(&self) -> &'m OperationData {
        match &self.model.element_data(self.id).body {
            ElementBody::Operation(o) => o,
            _ => unreachable!("operation handle over a non-operation element"),
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn element(&self) -> SchemaElement<'m> {
        SchemaElement::new(self.model, self.id)
    }

    pub fn name(&self) -> &'m str {
        self.element().name()
    }

    pub fn full_name(&self) -> &'m str {
        self.element().full_name()
    }

    pub fn ast(&self) -> &'m CsdlOperation {
        &self.data().ast
    }

    pub fn is_action(&self) -> bool {
        self.data().is_action
    }

    pub fn is_function(&self) -> bool {
        !self.data().is_action
    }

    pub fn is_bound(&self) -> bool {
        self.ast().is_bound
    }

    pub fn is_composable(&self) -> bool {
        self.ast().is_composable
    }

    pub fn entity_set_path(&self) -> Option<&'m str> {
        self.ast().entity_set_path.as_deref()
    }

    pub fn parameters(&self) -> Vec<Parameter<'m>> {
        (0..self.ast().parameters.len())
            .map(|index| Parameter {
                operation: *self,
                index,
            })
            .collect()
    }

    pub fn find_parameter(&self, name: &str) -> Option<Parameter<'m>> {
        self.parameters().into_iter().find(|p| p.name() == name)
    }

    /// The first parameter of a bound operation.
    pub fn binding_parameter(&self) -> Option<Parameter<'m>> {
        if !self.is_bound() {
            return None;
        }
        self.parameters().into_iter().next()
    }

    pub fn return_type(&self) -> Option<&'m TypeReference> {
        let data = self.data();
        data.return_type
            .get_or_compute(|| {
                let ret = data.ast.return_type.as_ref()?;
                Some(self.model.resolve_type_in(
                    self.element().document(),
                    &ret.type_name,
                    &ret.facets,
                ))
            })
            .as_ref()
    }

    /// True if the return type is an entity or a collection of entities.
    pub fn returns_entities(&self) -> bool {
        self.return_type().is_some_and(|t| {
            matches!(t.element_type().kind, TypeReferenceKind::Entity(_))
        })
    }
}

#[derive(Clone, Copy)]
pub struct Parameter<'m> {
    operation: Operation<'m>,
    index: usize,
}

impl<'m> Parameter<'m> {
    pub fn ast(&self) -> &'m crate::syntax::CsdlParameter {
        &self.operation.ast().parameters[self.index]
    }

    pub fn operation(&self) -> Operation<'m> {
        self.operation
    }

    pub fn name(&self) -> &'m str {
        &self.ast().name
    }

    pub fn location(&self) -> Location {
        self.ast().location
    }

    pub fn type_ref(&self) -> &'m TypeReference {
        let op = self.operation;
        let ast = self.ast();
        op.data().parameter_types[self.index].get_or_compute(|| {
            op.model
                .resolve_type_in(op.element().document(), &ast.type_name, &ast.facets)
        })
    }
}

impl std::fmt::Debug for Parameter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parameter")
            .field("operation", &self.operation.full_name())
            .field("name", &self.name())
            .finish()
    }
}
