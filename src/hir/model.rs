//! The semantic model.
//!
//! A [`Model`] owns every schema element of its documents in one arena.
//! Construction is a single cheap wrapping pass: elements are indexed by
//! name, annotations by target, and nothing is resolved. Derived facts are
//! computed on first access through the handle types and cached in the
//! element records, so forward and cyclic references resolve lazily.

use std::borrow::Cow;
use std::sync::Arc;

use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;

use super::annotations::{self, AnnotationData, TargetRef, VocabularyAnnotation};
use super::container::EntityContainer;
use super::elements::{ElementBody, ElementData, Operation, SchemaElement, SchemaElementKind};
use super::ids::{AnnotationId, ElementId, ElementRef, PlaceholderId};
use super::lookup::{LookupTable, Placeholder, PlaceholderKind, PlaceholderTable, ResolverPolicy, StrictPolicy};
use super::type_resolver::{self, TypeClass, TypeLookup};
use super::types::{TypeReference, TypeReferenceKind};
use crate::base::constants::{EDM_PREFIX, MAX_CHAIN_DEPTH};
use crate::base::{DocumentId, EdmVersion, EdmxVersion};
use crate::syntax::{CsdlAnnotations, CsdlDocument, CsdlFacets, CsdlReference, CsdlSchema, CsdlSchemaElement};

// ============================================================================
// MODEL BUILDER
// ============================================================================

/// Collects documents and options for a [`Model`].
///
/// Documents receive ids in the order they are added: main documents first,
/// then references. Readers that stamp locations must number them the same way.
#[derive(Default)]
pub struct ModelBuilder {
    policy: Option<Arc<dyn ResolverPolicy>>,
    documents: Vec<CsdlDocument>,
    references: Vec<CsdlDocument>,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn policy(self, policy: impl ResolverPolicy + 'static) -> Self {
        self.shared_policy(Arc::new(policy))
    }

    pub fn shared_policy(mut self, policy: Arc<dyn ResolverPolicy>) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Add a document whose schemas belong to the model.
    pub fn document(mut self, document: CsdlDocument) -> Self {
        self.documents.push(document);
        self
    }

    /// Add a referenced document: visible to lookup, never written.
    pub fn reference(mut self, document: CsdlDocument) -> Self {
        self.references.push(document);
        self
    }

    pub fn build(self) -> Model {
        let mut model = Model {
            documents: Vec::new(),
            elements: Vec::new(),
            annotations: Vec::new(),
            annotations_by_target: FxHashMap::default(),
            lookup: LookupTable::default(),
            placeholders: PlaceholderTable::default(),
            referenced: FxHashSet::default(),
            policy: self.policy.unwrap_or_else(|| Arc::new(StrictPolicy)),
        };

        let documents = self
            .documents
            .into_iter()
            .map(|d| (d, false))
            .chain(self.references.into_iter().map(|d| (d, true)));
        for (index, (document, is_reference)) in documents.enumerate() {
            model.add_document(DocumentId::new(index as u32), document, is_reference);
        }
        model.index_annotations();
        model.collect_references();

        tracing::debug!(
            documents = model.documents.len(),
            elements = model.elements.len(),
            annotations = model.annotations.len(),
            policy = model.policy.name(),
            "built model"
        );
        model
    }
}

// ============================================================================
// MODEL
// ============================================================================

pub(crate) struct DocumentData {
    pub is_reference: bool,
    pub edm_version: Option<EdmVersion>,
    pub edmx_version: Option<EdmxVersion>,
    pub references: Vec<CsdlReference>,
    /// Schema and `edmx:Include` aliases → namespace.
    pub aliases: FxHashMap<SmolStr, SmolStr>,
    pub schemas: Vec<SchemaData>,
}

pub(crate) struct SchemaData {
    pub ast: Arc<CsdlSchema>,
    pub elements: Vec<ElementId>,
    /// Out-of-line blocks with the annotations each one declared.
    pub blocks: Vec<(Arc<CsdlAnnotations>, Vec<AnnotationId>)>,
}

/// A resolved, lazily evaluated EDM model.
///
/// Immutable to callers. Internal caches fill on first access and are safe to
/// force from many threads at once.
pub struct Model {
    documents: Vec<DocumentData>,
    elements: Vec<ElementData>,
    annotations: Vec<AnnotationData>,
    annotations_by_target: FxHashMap<Arc<str>, Vec<AnnotationId>>,
    lookup: LookupTable,
    placeholders: PlaceholderTable,
    /// Qualified names referenced anywhere in the model, by expected kind.
    referenced: FxHashSet<(PlaceholderKind, Arc<str>)>,
    policy: Arc<dyn ResolverPolicy>,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("documents", &self.documents.len())
            .field("elements", &self.elements.len())
            .field("annotations", &self.annotations.len())
            .field("placeholders", &self.placeholders.len())
            .field("policy", &self.policy)
            .finish()
    }
}

impl Model {
    pub fn builder() -> ModelBuilder {
        ModelBuilder::new()
    }

    /// A model over a single document with the default policy.
    pub fn new(document: CsdlDocument) -> Self {
        ModelBuilder::new().document(document).build()
    }

    pub fn policy(&self) -> &dyn ResolverPolicy {
        &*self.policy
    }

    // ------------------------------------------------------------------------
    // Documents and schemas
    // ------------------------------------------------------------------------

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    pub fn is_reference_document(&self, document: DocumentId) -> bool {
        self.document_data(document).is_reference
    }

    /// CSDL version of a document, falling back to the newest version.
    pub fn document_version(&self, document: DocumentId) -> EdmVersion {
        self.document_data(document)
            .edm_version
            .unwrap_or(EdmVersion::LATEST)
    }

    /// CSDL version of the model (its first main document).
    pub fn edm_version(&self) -> EdmVersion {
        self.documents
            .iter()
            .find(|d| !d.is_reference)
            .and_then(|d| d.edm_version)
            .unwrap_or(EdmVersion::LATEST)
    }

    pub fn edmx_version(&self) -> Option<EdmxVersion> {
        self.documents
            .iter()
            .find(|d| !d.is_reference)
            .and_then(|d| d.edmx_version)
    }

    /// `edmx:Reference`s declared by the main documents.
    pub fn references(&self) -> impl Iterator<Item = &CsdlReference> + '_ {
        self.documents
            .iter()
            .filter(|d| !d.is_reference)
            .flat_map(|d| d.references.iter())
    }

    /// Schemas of the main documents, in declaration order.
    pub fn schemas(&self) -> Vec<Schema<'_>> {
        self.all_schemas()
            .into_iter()
            .filter(|s| !s.is_reference())
            .collect()
    }

    /// Schemas of every document, references included.
    pub fn all_schemas(&self) -> Vec<Schema<'_>> {
        self.documents
            .iter()
            .enumerate()
            .flat_map(|(d, doc)| {
                (0..doc.schemas.len()).map(move |s| Schema {
                    model: self,
                    document: DocumentId::new(d as u32),
                    index: s,
                })
            })
            .collect()
    }

    // ------------------------------------------------------------------------
    // Elements
    // ------------------------------------------------------------------------

    /// Every declared element, in document and declaration order.
    pub fn elements(&self) -> impl Iterator<Item = SchemaElement<'_>> + '_ {
        (0..self.elements.len()).map(|i| SchemaElement::new(self, ElementId::new(i)))
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Panics if `id` belongs to another model.
    pub fn element(&self, id: ElementId) -> SchemaElement<'_> {
        assert!(
            id.index() < self.elements.len(),
            "element {:?} does not belong to this model",
            id
        );
        SchemaElement::new(self, id)
    }

    pub fn placeholder(&self, id: PlaceholderId) -> Arc<Placeholder> {
        self.placeholders.get(id)
    }

    pub fn placeholder_count(&self) -> usize {
        self.placeholders.len()
    }

    /// Full name of a declared element or placeholder.
    pub fn element_ref_name(&self, element: ElementRef) -> Arc<str> {
        match element {
            ElementRef::Declared(id) => Arc::clone(&self.element_data(id).full_name),
            ElementRef::Unresolved(id) => Arc::clone(&self.placeholders.get(id).full_name),
        }
    }

    // ------------------------------------------------------------------------
    // Model-wide lookup
    // ------------------------------------------------------------------------

    /// Find a schema type (entity, complex, enum or type definition).
    ///
    /// A name that no declaration matches returns its stable placeholder if
    /// something in the model references it, and `None` otherwise.
    pub fn find_type(&self, name: &str) -> Option<ElementRef> {
        self.find_type_with(name, &*self.policy)
    }

    /// [`find_type`](Self::find_type) with a one-off policy.
    pub fn find_type_with(&self, name: &str, policy: &dyn ResolverPolicy) -> Option<ElementRef> {
        self.find_kind(name, policy, PlaceholderKind::Type, |kind| kind.is_type())
    }

    pub fn find_entity_container(&self, name: &str) -> Option<ElementRef> {
        self.find_kind(name, &*self.policy, PlaceholderKind::EntityContainer, |kind| {
            kind == SchemaElementKind::EntityContainer
        })
    }

    pub fn find_term(&self, name: &str) -> Option<ElementRef> {
        self.find_kind(name, &*self.policy, PlaceholderKind::Term, |kind| {
            kind == SchemaElementKind::Term
        })
    }

    /// All overloads of an action or function.
    pub fn find_operations(&self, name: &str) -> Vec<Operation<'_>> {
        let name = self.qualify(DocumentId::MAIN, name);
        self.lookup
            .find_all(&name, &*self.policy, |id| self.kind_of(id).is_operation())
            .into_iter()
            .filter_map(|id| self.element(id).as_operation())
            .collect()
    }

    /// Bound operations whose binding parameter accepts `binding_type`.
    ///
    /// A derived entity type matches operations bound to its base types;
    /// collection-ness must agree.
    pub fn find_bound_operations(&self, binding_type: &TypeReference) -> Vec<Operation<'_>> {
        let Some(binding_id) = binding_type.definition_id() else {
            return Vec::new();
        };
        let binding = self.element(binding_id);
        self.elements()
            .filter_map(|e| e.as_operation())
            .filter(|op| op.is_bound())
            .filter(|op| {
                let Some(parameter) = op.parameters().into_iter().next() else {
                    return false;
                };
                let parameter_type = parameter.type_ref();
                if parameter_type.is_collection() != binding_type.is_collection() {
                    return false;
                }
                match parameter_type.definition_id() {
                    Some(target) if target == binding_id => true,
                    Some(target) => binding
                        .as_structured()
                        .is_some_and(|s| s.is_or_inherits_from(target)),
                    None => false,
                }
            })
            .collect()
    }

    /// The first entity container declared in the main documents.
    pub fn entity_container(&self) -> Option<EntityContainer<'_>> {
        self.elements()
            .filter(|e| !e.is_reference())
            .find_map(|e| e.as_entity_container())
    }

    /// Resolve a raw type name in the scope of the first main document.
    pub fn resolve_type(&self, raw: &str) -> TypeReference {
        self.resolve_type_in(DocumentId::MAIN, raw, &CsdlFacets::default())
    }

    /// All vocabulary annotations, in indexing order.
    pub fn vocabulary_annotations(&self) -> impl Iterator<Item = VocabularyAnnotation<'_>> + '_ {
        (0..self.annotations.len()).map(|i| VocabularyAnnotation::new(self, AnnotationId(i as u32)))
    }

    /// Annotations applying to a target such as `NS.Customer/Name`.
    pub fn find_vocabulary_annotations(&self, target: &str) -> Vec<VocabularyAnnotation<'_>> {
        let key = annotations::normalize_target(self, DocumentId::MAIN, target);
        self.annotations_for(&key)
            .iter()
            .map(|id| VocabularyAnnotation::new(self, *id))
            .collect()
    }

    /// Printable name of a resolved type (`Collection(NS.Order)`).
    pub fn type_name(&self, type_ref: &TypeReference) -> String {
        match &type_ref.kind {
            TypeReferenceKind::Primitive(p) => p.kind.full_name(),
            TypeReferenceKind::Entity(id)
            | TypeReferenceKind::Complex(id)
            | TypeReferenceKind::Enum(id)
            | TypeReferenceKind::TypeDefinition { id, .. } => {
                self.element_data(*id).full_name.to_string()
            }
            TypeReferenceKind::EntityReference(id) => {
                format!("Ref({})", self.element_data(*id).full_name)
            }
            TypeReferenceKind::Collection(element) => {
                format!("Collection({})", self.type_name(element))
            }
            TypeReferenceKind::Path(path) => format!("{}{}", EDM_PREFIX, path.name()),
            TypeReferenceKind::Untyped => format!("{}Untyped", EDM_PREFIX),
            TypeReferenceKind::Unresolved(id) => self.placeholders.get(*id).full_name.to_string(),
        }
    }

    /// Force every lazy slot, in parallel.
    pub fn force_all(&self) {
        (0..self.elements.len())
            .into_par_iter()
            .for_each(|i| SchemaElement::new(self, ElementId::new(i)).force());
        (0..self.annotations.len()).into_par_iter().for_each(|i| {
            let annotation = VocabularyAnnotation::new(self, AnnotationId(i as u32));
            annotation.term();
            annotation.target();
        });
        tracing::debug!(placeholders = self.placeholders.len(), "forced model");
    }

    // ------------------------------------------------------------------------
    // Crate-internal access
    // ------------------------------------------------------------------------

    pub(crate) fn element_data(&self, id: ElementId) -> &ElementData {
        &self.elements[id.index()]
    }

    pub(crate) fn annotation_data(&self, id: AnnotationId) -> &AnnotationData {
        &self.annotations[id.index()]
    }

    pub(crate) fn document_data(&self, document: DocumentId) -> &DocumentData {
        &self.documents[document.index()]
    }

    pub(crate) fn annotations_for(&self, key: &str) -> &[AnnotationId] {
        self.annotations_by_target
            .get(key)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub(crate) fn placeholders(&self) -> &PlaceholderTable {
        &self.placeholders
    }

    pub(crate) fn lookup_table(&self) -> &LookupTable {
        &self.lookup
    }

    pub(crate) fn kind_of(&self, id: ElementId) -> SchemaElementKind {
        self.element_data(id).kind()
    }

    /// Expand `Alias.Name` to `Namespace.Name` using a document's aliases.
    pub(crate) fn qualify<'a>(&self, document: DocumentId, name: &'a str) -> Cow<'a, str> {
        let Some(doc) = self.documents.get(document.index()) else {
            return Cow::Borrowed(name);
        };
        if let Some((qualifier, simple)) = name.rsplit_once('.')
            && let Some(namespace) = doc.aliases.get(qualifier)
        {
            return Cow::Owned(format!("{}.{}", namespace, simple));
        }
        Cow::Borrowed(name)
    }

    pub(crate) fn scope(&self, document: DocumentId) -> Scope<'_> {
        Scope {
            model: self,
            document,
        }
    }

    pub(crate) fn resolve_type_in(
        &self,
        document: DocumentId,
        raw: &str,
        facets: &CsdlFacets,
    ) -> TypeReference {
        type_resolver::resolve_type_reference(raw, facets, &self.scope(document))
    }

    /// Resolve a name of a given kind in a document's scope, falling back to
    /// the placeholder for that kind.
    pub(crate) fn resolve_in(
        &self,
        document: DocumentId,
        raw: &str,
        placeholder: PlaceholderKind,
        accept: impl Fn(SchemaElementKind) -> bool,
    ) -> ElementRef {
        let qualified = self.qualify(document, raw.trim());
        match self
            .lookup
            .find(&qualified, &*self.policy, |id| accept(self.kind_of(id)))
        {
            Some(id) => ElementRef::Declared(id),
            None => {
                tracing::trace!(?placeholder, "'{}' did not resolve", qualified);
                ElementRef::Unresolved(self.placeholders.get_or_create(placeholder, &qualified))
            }
        }
    }

    /// The element a raw name resolves to, without creating placeholders.
    pub(crate) fn lookup_in(
        &self,
        document: DocumentId,
        raw: &str,
        accept: impl Fn(SchemaElementKind) -> bool,
    ) -> Option<ElementId> {
        let qualified = self.qualify(document, raw.trim());
        self.lookup
            .find(&qualified, &*self.policy, |id| accept(self.kind_of(id)))
    }

    /// Follow raw `next` links from `start`; true if the chain returns to
    /// `origin`. Visited elements stop the walk.
    pub(crate) fn chain_returns_to(
        &self,
        origin: ElementId,
        start: ElementId,
        next: impl Fn(ElementId) -> Option<ElementId>,
    ) -> bool {
        let mut visited = FxHashSet::default();
        let mut current = start;
        for _ in 0..MAX_CHAIN_DEPTH {
            if current == origin {
                return true;
            }
            if !visited.insert(current) {
                return false;
            }
            match next(current) {
                Some(following) => current = following,
                None => return false,
            }
        }
        tracing::warn!("chain walk from {:?} hit the depth cap", origin);
        false
    }

    /// Members of the cycle through `origin`, sorted.
    pub(crate) fn cycle_members(
        &self,
        origin: ElementId,
        next: impl Fn(ElementId) -> Option<ElementId>,
    ) -> Vec<ElementId> {
        let mut members = vec![origin];
        let mut current = origin;
        while let Some(following) = next(current) {
            if following == origin || members.contains(&following) || members.len() > MAX_CHAIN_DEPTH {
                break;
            }
            members.push(following);
            current = following;
        }
        members.sort();
        members
    }

    pub(crate) fn resolve_target(&self, key: &str) -> Option<TargetRef> {
        annotations::resolve_target(self, key)
    }

    fn find_kind(
        &self,
        name: &str,
        policy: &dyn ResolverPolicy,
        placeholder: PlaceholderKind,
        accept: impl Fn(SchemaElementKind) -> bool,
    ) -> Option<ElementRef> {
        let qualified = self.qualify(DocumentId::MAIN, name.trim());
        if let Some(id) = self
            .lookup
            .find(&qualified, policy, |id| accept(self.kind_of(id)))
        {
            return Some(ElementRef::Declared(id));
        }
        let key = (placeholder, Arc::<str>::from(qualified.as_ref()));
        if self.referenced.contains(&key) {
            return Some(ElementRef::Unresolved(
                self.placeholders.get_or_create(placeholder, &qualified),
            ));
        }
        self.placeholders
            .existing(placeholder, &qualified)
            .map(ElementRef::Unresolved)
    }

    // ------------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------------

    fn add_document(&mut self, document: DocumentId, ast: CsdlDocument, is_reference: bool) {
        let mut aliases = FxHashMap::default();
        for reference in &ast.references {
            for include in &reference.includes {
                if let Some(alias) = &include.alias {
                    aliases.insert(alias.clone(), include.namespace.clone());
                }
            }
        }
        for schema in &ast.schemas {
            if let Some(alias) = &schema.alias {
                aliases.insert(alias.clone(), schema.namespace.clone());
            }
        }

        let mut schemas = Vec::with_capacity(ast.schemas.len());
        for schema in &ast.schemas {
            let mut ids = Vec::with_capacity(schema.elements.len());
            for element in &schema.elements {
                let id = ElementId::new(self.elements.len());
                let full_name: Arc<str> = format!("{}.{}", schema.namespace, element.name()).into();
                self.lookup
                    .insert(Arc::clone(&full_name), element.name().clone(), id);
                self.elements.push(ElementData::new(
                    document,
                    schema.namespace.clone(),
                    full_name,
                    element,
                ));
                ids.push(id);
            }
            schemas.push(SchemaData {
                ast: Arc::clone(schema),
                elements: ids,
                blocks: Vec::new(),
            });
        }

        self.documents.push(DocumentData {
            is_reference,
            edm_version: ast.edm_version,
            edmx_version: ast.edmx_version,
            references: ast.references,
            aliases,
            schemas,
        });
    }

    fn add_annotation(&mut self, data: AnnotationData) -> AnnotationId {
        let id = AnnotationId(self.annotations.len() as u32);
        self.annotations_by_target
            .entry(Arc::clone(&data.target))
            .or_default()
            .push(id);
        self.annotations.push(data);
        id
    }

    fn index_annotations(&mut self) {
        for d in 0..self.documents.len() {
            let document = DocumentId::new(d as u32);
            for s in 0..self.documents[d].schemas.len() {
                let schema = Arc::clone(&self.documents[d].schemas[s].ast);
                for annotation in &schema.annotations {
                    let target: Arc<str> = schema.namespace.as_str().into();
                    self.add_annotation(AnnotationData::inline(document, target, annotation));
                }

                let ids = self.documents[d].schemas[s].elements.clone();
                for id in ids {
                    let inline = annotations::inline_annotations(&self.elements[id.index()]);
                    for (target, annotation) in inline {
                        self.add_annotation(AnnotationData::inline(document, target, &annotation));
                    }
                }

                let mut blocks = Vec::with_capacity(schema.out_of_line_annotations.len());
                for block in &schema.out_of_line_annotations {
                    let target = annotations::normalize_target(self, document, &block.target);
                    let ids = block
                        .annotations
                        .iter()
                        .map(|annotation| {
                            self.add_annotation(AnnotationData::out_of_line(
                                document,
                                Arc::clone(&target),
                                block,
                                annotation,
                            ))
                        })
                        .collect();
                    blocks.push((Arc::clone(block), ids));
                }
                self.documents[d].schemas[s].blocks = blocks;
            }
        }
    }

    fn collect_references(&mut self) {
        let mut referenced = FxHashSet::default();
        for (d, doc) in self.documents.iter().enumerate() {
            let document = DocumentId::new(d as u32);
            for schema in &doc.schemas {
                let mut names = Vec::new();
                for element in &schema.ast.elements {
                    referenced_names(element, &mut names);
                }
                for block in &schema.ast.out_of_line_annotations {
                    for annotation in &block.annotations {
                        annotations::annotation_references(annotation, &mut names);
                    }
                }
                for annotation in &schema.ast.annotations {
                    annotations::annotation_references(annotation, &mut names);
                }
                for (kind, raw) in names {
                    if kind == PlaceholderKind::Type {
                        let raw = type_resolver::named_type(raw);
                        if type_resolver::is_builtin_type(raw) {
                            continue;
                        }
                        referenced.insert((kind, Arc::from(self.qualify(document, raw).as_ref())));
                    } else {
                        referenced.insert((kind, Arc::from(self.qualify(document, raw.trim()).as_ref())));
                    }
                }
            }
        }
        self.referenced = referenced;
    }
}

/// Names an element refers to, by the kind they are expected to resolve to.
fn referenced_names<'a>(element: &'a CsdlSchemaElement, out: &mut Vec<(PlaceholderKind, &'a str)>) {
    use crate::syntax::CsdlPropertyItem;

    for annotation in element.annotations() {
        annotations::annotation_references(annotation, out);
    }
    match element {
        CsdlSchemaElement::EntityType(ty) | CsdlSchemaElement::ComplexType(ty) => {
            if let Some(base) = &ty.base_type {
                out.push((PlaceholderKind::Type, base.as_str()));
            }
            for item in &ty.properties {
                match item {
                    CsdlPropertyItem::Structural(p) => out.push((PlaceholderKind::Type, p.type_name.as_str())),
                    CsdlPropertyItem::Navigation(n) => out.push((PlaceholderKind::Type, n.type_name.as_str())),
                }
                for annotation in item.annotations() {
                    annotations::annotation_references(annotation, out);
                }
            }
        }
        CsdlSchemaElement::EnumType(e) => {
            for member in &e.members {
                for annotation in &member.annotations {
                    annotations::annotation_references(annotation, out);
                }
            }
        }
        CsdlSchemaElement::TypeDefinition(_) => {}
        CsdlSchemaElement::Term(term) => {
            out.push((PlaceholderKind::Type, term.type_name.as_str()));
            if let Some(base) = &term.base_term {
                out.push((PlaceholderKind::Term, base.as_str()));
            }
        }
        CsdlSchemaElement::Action(op) | CsdlSchemaElement::Function(op) => {
            for parameter in &op.parameters {
                out.push((PlaceholderKind::Type, parameter.type_name.as_str()));
                for annotation in &parameter.annotations {
                    annotations::annotation_references(annotation, out);
                }
            }
            if let Some(ret) = &op.return_type {
                out.push((PlaceholderKind::Type, ret.type_name.as_str()));
                for annotation in &ret.annotations {
                    annotations::annotation_references(annotation, out);
                }
            }
        }
        CsdlSchemaElement::EntityContainer(container) => {
            if let Some(extends) = &container.extends {
                out.push((PlaceholderKind::EntityContainer, extends.as_str()));
            }
            for source in container.entity_sets.iter().chain(&container.singletons) {
                out.push((PlaceholderKind::Type, source.type_name.as_str()));
                for binding in &source.bindings {
                    if let Some((container_name, _)) = binding.target.split_once('/') {
                        out.push((PlaceholderKind::EntityContainer, container_name));
                    }
                }
                for annotation in &source.annotations {
                    annotations::annotation_references(annotation, out);
                }
            }
            for import in &container.operation_imports {
                out.push((PlaceholderKind::Operation, import.operation.as_str()));
                for annotation in &import.annotations {
                    annotations::annotation_references(annotation, out);
                }
            }
        }
    }
}

// ============================================================================
// SCOPED LOOKUP
// ============================================================================

/// Type lookup in the scope of one document (its aliases, the model policy).
pub(crate) struct Scope<'m> {
    model: &'m Model,
    document: DocumentId,
}

impl TypeLookup for Scope<'_> {
    fn qualify<'a>(&self, name: &'a str) -> Cow<'a, str> {
        self.model.qualify(self.document, name)
    }

    fn lookup_type(&self, qualified_name: &str) -> Option<(ElementId, TypeClass)> {
        let model = self.model;
        let id = model
            .lookup
            .find(qualified_name, &*model.policy, |id| model.kind_of(id).is_type())?;
        let class = match &model.element_data(id).body {
            ElementBody::Structured(s) if s.is_entity => TypeClass::Entity,
            ElementBody::Structured(_) => TypeClass::Complex,
            ElementBody::Enum(_) => TypeClass::Enum,
            ElementBody::TypeDefinition(t) => TypeClass::TypeDefinition(t.underlying_kind),
            _ => return None,
        };
        Some((id, class))
    }

    fn unresolved_type(&self, qualified_name: &str) -> PlaceholderId {
        self.model
            .placeholders
            .get_or_create(PlaceholderKind::Type, qualified_name)
    }
}

// ============================================================================
// SCHEMA HANDLE
// ============================================================================

/// A schema of one document.
#[derive(Clone, Copy)]
pub struct Schema<'m> {
    model: &'m Model,
    document: DocumentId,
    index: usize,
}

impl<'m> Schema<'m> {
    fn data(&self) -> &'m SchemaData {
        &self.model.document_data(self.document).schemas[self.index]
    }

    pub fn namespace(&self) -> &'m str {
        &self.data().ast.namespace
    }

    pub fn alias(&self) -> Option<&'m str> {
        self.data().ast.alias.as_deref()
    }

    pub fn document(&self) -> DocumentId {
        self.document
    }

    pub fn is_reference(&self) -> bool {
        self.model.is_reference_document(self.document)
    }

    pub fn version(&self) -> EdmVersion {
        self.model.document_version(self.document)
    }

    pub fn ast(&self) -> &'m CsdlSchema {
        &self.data().ast
    }

    pub fn elements(&self) -> Vec<SchemaElement<'m>> {
        self.data()
            .elements
            .iter()
            .map(|id| SchemaElement::new(self.model, *id))
            .collect()
    }

    /// Annotations on the schema itself.
    pub fn vocabulary_annotations(&self) -> Vec<VocabularyAnnotation<'m>> {
        self.model
            .annotations_for(self.namespace())
            .iter()
            .map(|id| VocabularyAnnotation::new(self.model, *id))
            .filter(|a| a.document() == self.document && a.is_inline())
            .collect()
    }

    /// Out-of-line `Annotations` blocks with their annotations.
    pub fn annotation_blocks(&self) -> Vec<(&'m CsdlAnnotations, Vec<VocabularyAnnotation<'m>>)> {
        self.data()
            .blocks
            .iter()
            .map(|(block, ids)| {
                (
                    &**block,
                    ids.iter()
                        .map(|id| VocabularyAnnotation::new(self.model, *id))
                        .collect(),
                )
            })
            .collect()
    }
}

impl std::fmt::Debug for Schema<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Schema")
            .field("namespace", &self.namespace())
            .field("document", &self.document)
            .finish()
    }
}
