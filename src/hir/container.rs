//! Entity containers and their children.
//!
//! Entity sets and singletons are navigation sources. Their navigation
//! property bindings resolve lazily into [`NavigationTarget`]s: another
//! source, a contained entity set, or nothing.

use std::sync::Arc;

use rustc_hash::FxHashSet;

use super::annotations::VocabularyAnnotation;
use super::elements::{ElementBody, Operation, SchemaElement, SchemaElementKind, StructuredType};
use super::ids::{AnnotationId, ElementId, ElementRef, NavigationSourceId, PropertyId};
use super::lazy::Memo;
use super::lookup::PlaceholderKind;
use super::model::Model;
use super::properties::NavigationProperty;
use super::types::TypeReference;
use crate::base::Location;
use crate::base::constants::MAX_CHAIN_DEPTH;
use crate::syntax::{
    CsdlAnnotation, CsdlEntityContainer, CsdlFacets, CsdlNavigationSource, CsdlOperationImport,
    NavigationSourceKind, OperationImportKind,
};

// ============================================================================
// RECORDS
// ============================================================================

pub(crate) struct ContainerData {
    pub ast: Arc<CsdlEntityContainer>,
    pub extends: Memo<Option<ElementRef>>,
    /// Entity sets first, then singletons.
    pub sources: Vec<SourceData>,
    pub imports: Vec<ImportData>,
}

pub(crate) struct SourceData {
    pub ast: Arc<CsdlNavigationSource>,
    pub type_ref: Memo<TypeReference>,
    /// Per binding: the navigation property its path names and the source it targets.
    pub bindings: Memo<Vec<(Option<PropertyId>, Option<NavigationSourceId>)>>,
    pub annotations: Memo<Vec<AnnotationId>>,
}

pub(crate) struct ImportData {
    pub ast: Arc<CsdlOperationImport>,
    pub operations: Memo<Vec<ElementRef>>,
    pub entity_set: Memo<Option<NavigationSourceId>>,
}

impl ContainerData {
    pub fn new(ast: &Arc<CsdlEntityContainer>) -> Self {
        let sources = ast
            .entity_sets
            .iter()
            .chain(&ast.singletons)
            .map(|source| SourceData {
                ast: Arc::clone(source),
                type_ref: Memo::new(),
                bindings: Memo::new(),
                annotations: Memo::new(),
            })
            .collect();
        let imports = ast
            .operation_imports
            .iter()
            .map(|import| ImportData {
                ast: Arc::clone(import),
                operations: Memo::new(),
                entity_set: Memo::new(),
            })
            .collect();
        Self {
            ast: Arc::clone(ast),
            extends: Memo::new(),
            sources,
            imports,
        }
    }
}

/// `Extends` of a container by raw lookup, ignoring the memo.
pub(crate) fn declared_extends(model: &Model, id: ElementId) -> Option<ElementId> {
    let data = model.element_data(id);
    let ElementBody::Container(c) = &data.body else {
        return None;
    };
    let raw = c.ast.extends.as_deref()?;
    model.lookup_in(data.document, raw, |kind| kind == SchemaElementKind::EntityContainer)
}

// ============================================================================
// ENTITY CONTAINER
// ============================================================================

#[derive(Clone, Copy)]
pub struct EntityContainer<'m> {
    model: &'m Model,
    id: ElementId,
}

handle_impls!(EntityContainer, id);

impl<'m> EntityContainer<'m> {
    pub(crate) fn new(model: &'m Model, id: ElementId) -> Self {
        Self { model, id }
    }

    fn data(&self) -> &'m ContainerData {
        match &self.model.element_data(self.id).body {
            ElementBody::Container(c) => c,
            _ => unreachable!("container handle over a non-container element"),
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

    pub fn ast(&self) -> &'m CsdlEntityContainer {
        &self.data().ast
    }

    pub fn extends_name(&self) -> Option<&'m str> {
        self.ast().extends.as_deref()
    }

    /// The resolved `Extends` container; cyclic chains yield a placeholder.
    pub fn extends(&self) -> Option<ElementRef> {
        *self.data().extends.get_or_compute(|| {
            let raw = self.extends_name()?;
            let model = self.model;
            let document = self.element().document();
            let qualified = model.qualify(document, raw.trim());
            let placeholders = model.placeholders();
            Some(
                match model.lookup_in(document, raw, |k| k == SchemaElementKind::EntityContainer) {
                    None => ElementRef::Unresolved(
                        placeholders.get_or_create(PlaceholderKind::EntityContainer, &qualified),
                    ),
                    Some(base) if model.chain_returns_to(self.id, base, |id| declared_extends(model, id)) => {
                        ElementRef::Unresolved(placeholders.get_or_create(
                            PlaceholderKind::CyclicEntityContainer,
                            &qualified,
                        ))
                    }
                    Some(base) => ElementRef::Declared(base),
                },
            )
        })
    }

    pub fn has_cyclic_extends(&self) -> bool {
        match self.extends() {
            Some(ElementRef::Unresolved(id)) => {
                self.model.placeholder(id).kind == PlaceholderKind::CyclicEntityContainer
            }
            _ => false,
        }
    }

    pub fn extends_container(&self) -> Option<EntityContainer<'m>> {
        let id = self.extends()?.declared()?;
        Some(EntityContainer::new(self.model, id))
    }

    /// This container followed by the containers it extends.
    pub fn extends_chain(&self) -> Vec<EntityContainer<'m>> {
        let mut chain = vec![*self];
        let mut seen = FxHashSet::default();
        seen.insert(self.id);
        let mut current = *self;
        while let Some(next) = current.extends_container() {
            if !seen.insert(next.id) || chain.len() > MAX_CHAIN_DEPTH {
                break;
            }
            chain.push(next);
            current = next;
        }
        chain
    }

    /// Declared entity sets and singletons.
    pub fn navigation_sources(&self) -> Vec<NavigationSource<'m>> {
        (0..self.data().sources.len())
            .map(|index| {
                NavigationSource::new(
                    self.model,
                    NavigationSourceId {
                        container: self.id,
                        index: index as u32,
                    },
                )
            })
            .collect()
    }

    pub fn entity_sets(&self) -> Vec<NavigationSource<'m>> {
        self.navigation_sources()
            .into_iter()
            .filter(|s| s.kind() == NavigationSourceKind::EntitySet)
            .collect()
    }

    pub fn singletons(&self) -> Vec<NavigationSource<'m>> {
        self.navigation_sources()
            .into_iter()
            .filter(|s| s.kind() == NavigationSourceKind::Singleton)
            .collect()
    }

    /// Sources declared here and in every extended container.
    pub fn all_navigation_sources(&self) -> Vec<NavigationSource<'m>> {
        self.extends_chain()
            .into_iter()
            .flat_map(|c| c.navigation_sources())
            .collect()
    }

    /// Find an entity set or singleton here or in an extended container.
    pub fn find_navigation_source(&self, name: &str) -> Option<NavigationSource<'m>> {
        self.extends_chain()
            .into_iter()
            .find_map(|c| c.navigation_sources().into_iter().find(|s| s.name() == name))
    }

    pub fn find_entity_set(&self, name: &str) -> Option<NavigationSource<'m>> {
        self.find_navigation_source(name)
            .filter(|s| s.kind() == NavigationSourceKind::EntitySet)
    }

    pub fn find_singleton(&self, name: &str) -> Option<NavigationSource<'m>> {
        self.find_navigation_source(name)
            .filter(|s| s.kind() == NavigationSourceKind::Singleton)
    }

    pub fn operation_imports(&self) -> Vec<OperationImport<'m>> {
        (0..self.data().imports.len())
            .map(|index| OperationImport {
                container: *self,
                index,
            })
            .collect()
    }

    pub fn find_operation_import(&self, name: &str) -> Option<OperationImport<'m>> {
        self.extends_chain()
            .into_iter()
            .find_map(|c| c.operation_imports().into_iter().find(|i| i.name() == name))
    }

    /// Resolve `Set` (this container) or `NS.Container/Set` (any container).
    pub fn resolve_source_reference(&self, raw: &str) -> Option<NavigationSource<'m>> {
        match raw.split_once('/') {
            Some((container_name, source_name)) => {
                let id = self.model.lookup_in(
                    self.element().document(),
                    container_name,
                    |kind| kind == SchemaElementKind::EntityContainer,
                )?;
                EntityContainer::new(self.model, id).find_navigation_source(source_name)
            }
            None => self.find_navigation_source(raw.trim()),
        }
    }

    pub(crate) fn force(&self) {
        self.extends();
        for source in self.navigation_sources() {
            source.type_ref();
            source.bindings();
            source.vocabulary_annotations();
        }
        for import in self.operation_imports() {
            import.operations();
            import.entity_set();
        }
    }
}

// ============================================================================
// NAVIGATION SOURCES
// ============================================================================

/// An entity set or singleton.
#[derive(Clone, Copy)]
pub struct NavigationSource<'m> {
    model: &'m Model,
    id: NavigationSourceId,
}

handle_impls!(NavigationSource, id);

impl<'m> NavigationSource<'m> {
    pub(crate) fn new(model: &'m Model, id: NavigationSourceId) -> Self {
        Self { model, id }
    }

    fn data(&self) -> &'m SourceData {
        &self.container().data().sources[self.id.index as usize]
    }

    pub fn id(&self) -> NavigationSourceId {
        self.id
    }

    pub fn container(&self) -> EntityContainer<'m> {
        EntityContainer::new(self.model, self.id.container)
    }

    pub fn ast(&self) -> &'m CsdlNavigationSource {
        &self.data().ast
    }

    pub fn kind(&self) -> NavigationSourceKind {
        self.ast().kind
    }

    pub fn name(&self) -> &'m str {
        &self.ast().name
    }

    pub fn location(&self) -> Location {
        self.ast().location
    }

    pub fn include_in_service_document(&self) -> bool {
        self.ast().include_in_service_document
    }

    /// The declared entity type, resolved.
    pub fn type_ref(&self) -> &'m TypeReference {
        let data = self.data();
        data.type_ref.get_or_compute(|| {
            let facets = CsdlFacets {
                nullable: Some("false".into()),
                ..Default::default()
            };
            self.model.resolve_type_in(
                self.container().element().document(),
                &data.ast.type_name,
                &facets,
            )
        })
    }

    pub fn entity_type(&self) -> Option<StructuredType<'m>> {
        let id = self.type_ref().definition_id()?;
        self.model.element(id).as_entity_type()
    }

    /// Annotation target key, `NS.Container/Source`.
    pub fn target_key(&self) -> String {
        format!("{}/{}", self.container().full_name(), self.name())
    }

    pub fn annotations(&self) -> &'m [Arc<CsdlAnnotation>] {
        &self.ast().annotations
    }

    pub fn vocabulary_annotations(&self) -> Vec<VocabularyAnnotation<'m>> {
        self.data()
            .annotations
            .get_or_compute(|| self.model.annotations_for(&self.target_key()).to_vec())
            .iter()
            .map(|id| VocabularyAnnotation::new(self.model, *id))
            .collect()
    }

    fn resolved_bindings(&self) -> &'m [(Option<PropertyId>, Option<NavigationSourceId>)] {
        let data = self.data();
        data.bindings.get_or_compute(|| {
            let container = self.container();
            data.ast
                .bindings
                .iter()
                .map(|binding| {
                    (
                        self.resolve_binding_path(&binding.path).map(|nav| nav.id()),
                        container
                            .resolve_source_reference(&binding.target)
                            .map(|source| source.id),
                    )
                })
                .collect()
        })
    }

    /// Navigation property bindings with their resolved ends.
    pub fn bindings(&self) -> Vec<NavigationPropertyBinding<'m>> {
        self.ast()
            .bindings
            .iter()
            .zip(self.resolved_bindings())
            .map(|(ast, (navigation, target))| NavigationPropertyBinding {
                path: &ast.path,
                target_name: &ast.target,
                location: ast.location,
                navigation: navigation.and_then(|id| {
                    super::properties::Property::new(self.model, id).as_navigation()
                }),
                target: target.map(|id| NavigationSource::new(self.model, id)),
            })
            .collect()
    }

    /// Resolve a binding path such as `Orders` or `NS.VipCustomer/Address/Country`.
    ///
    /// Segments containing a dot are type casts; the last segment must name
    /// a navigation property.
    pub fn resolve_binding_path(&self, path: &str) -> Option<NavigationProperty<'m>> {
        let model = self.model;
        let document = self.container().element().document();
        let mut current = self.entity_type()?;
        let segments: Vec<&str> = path.split('/').map(str::trim).collect();
        for (i, segment) in segments.iter().enumerate() {
            let last = i + 1 == segments.len();
            if segment.contains('.') {
                let id = model.lookup_in(document, segment, SchemaElementKind::is_structured)?;
                if last {
                    return None;
                }
                current = model.element(id).as_structured()?;
                continue;
            }
            let property = current.find_property(segment)?;
            if last {
                return property.as_navigation();
            }
            let next = property.type_ref().definition_id()?;
            current = model.element(next).as_structured()?;
        }
        None
    }

    /// Where following `navigation` from this source leads.
    pub fn find_navigation_target(&self, navigation: NavigationProperty<'m>) -> NavigationTarget<'m> {
        for binding in self.bindings() {
            if binding.navigation == Some(navigation) {
                return match binding.target {
                    Some(source) => NavigationTarget::Source(source),
                    None => NavigationTarget::Unresolved {
                        target: binding.target_name,
                    },
                };
            }
        }
        if navigation.contains_target() {
            return NavigationTarget::Contained(ContainedEntitySet {
                parent: *self,
                navigation,
            });
        }
        NavigationTarget::Unbound
    }

    /// [`find_navigation_target`](Self::find_navigation_target) by binding path.
    pub fn find_navigation_target_by_path(&self, path: &str) -> NavigationTarget<'m> {
        match self.resolve_binding_path(path) {
            Some(navigation) => self.find_navigation_target(navigation),
            None => NavigationTarget::Unbound,
        }
    }
}

/// A `NavigationPropertyBinding` with both ends resolved where possible.
#[derive(Debug, Clone, Copy)]
pub struct NavigationPropertyBinding<'m> {
    pub path: &'m str,
    pub target_name: &'m str,
    pub location: Location,
    pub navigation: Option<NavigationProperty<'m>>,
    pub target: Option<NavigationSource<'m>>,
}

/// The entity set implied by a containment navigation property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainedEntitySet<'m> {
    parent: NavigationSource<'m>,
    navigation: NavigationProperty<'m>,
}

impl<'m> ContainedEntitySet<'m> {
    pub fn parent(&self) -> NavigationSource<'m> {
        self.parent
    }

    pub fn navigation(&self) -> NavigationProperty<'m> {
        self.navigation
    }

    pub fn name(&self) -> &'m str {
        self.navigation.name()
    }

    pub fn entity_type(&self) -> Option<StructuredType<'m>> {
        self.navigation.target_type()
    }
}

/// Result of following a navigation property from a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationTarget<'m> {
    Source(NavigationSource<'m>),
    Contained(ContainedEntitySet<'m>),
    /// A binding names a target that does not exist.
    Unresolved { target: &'m str },
    /// No binding and no containment.
    Unbound,
}

impl<'m> NavigationTarget<'m> {
    pub fn entity_type(&self) -> Option<StructuredType<'m>> {
        match self {
            NavigationTarget::Source(source) => source.entity_type(),
            NavigationTarget::Contained(contained) => contained.entity_type(),
            _ => None,
        }
    }
}

// ============================================================================
// OPERATION IMPORTS
// ============================================================================

/// An action import or function import.
#[derive(Clone, Copy)]
pub struct OperationImport<'m> {
    container: EntityContainer<'m>,
    index: usize,
}

impl<'m> OperationImport<'m> {
    fn data(&self) -> &'m ImportData {
        &self.container.data().imports[self.index]
    }

    pub fn container(&self) -> EntityContainer<'m> {
        self.container
    }

    pub fn ast(&self) -> &'m CsdlOperationImport {
        &self.data().ast
    }

    pub fn kind(&self) -> OperationImportKind {
        self.ast().kind
    }

    pub fn name(&self) -> &'m str {
        &self.ast().name
    }

    pub fn operation_name(&self) -> &'m str {
        &self.ast().operation
    }

    pub fn location(&self) -> Location {
        self.ast().location
    }

    /// Imported overloads, or the operation placeholder if none matched.
    pub fn operations(&self) -> &'m [ElementRef] {
        let data = self.data();
        data.operations.get_or_compute(|| {
            let model = self.container.model;
            let wanted = match self.kind() {
                OperationImportKind::ActionImport => SchemaElementKind::Action,
                OperationImportKind::FunctionImport => SchemaElementKind::Function,
            };
            let document = self.container.element().document();
            let qualified = model.qualify(document, data.ast.operation.trim());
            let found: Vec<_> = model
                .lookup_table()
                .find_all(&qualified, model.policy(), |id| model.kind_of(id) == wanted)
                .into_iter()
                .filter(|id| !Operation::new(model, *id).is_bound())
                .map(ElementRef::Declared)
                .collect();
            if found.is_empty() {
                vec![ElementRef::Unresolved(
                    model
                        .placeholders()
                        .get_or_create(PlaceholderKind::Operation, &qualified),
                )]
            } else {
                found
            }
        })
    }

    pub fn resolved_operations(&self) -> Vec<Operation<'m>> {
        self.operations()
            .iter()
            .filter_map(|r| r.declared())
            .map(|id| Operation::new(self.container.model, id))
            .collect()
    }

    pub fn is_resolved(&self) -> bool {
        !self.operations().iter().any(|r| r.is_unresolved())
    }

    pub fn entity_set_name(&self) -> Option<&'m str> {
        self.ast().entity_set.as_deref()
    }

    pub fn entity_set(&self) -> Option<NavigationSource<'m>> {
        let model = self.container.model;
        let id = self.data().entity_set.get_or_compute(|| {
            let raw = self.entity_set_name()?;
            self.container.resolve_source_reference(raw).map(|s| s.id)
        });
        (*id).map(|id| NavigationSource::new(model, id))
    }

    pub fn target_key(&self) -> String {
        format!("{}/{}", self.container.full_name(), self.name())
    }

    pub fn annotations(&self) -> &'m [Arc<CsdlAnnotation>] {
        &self.ast().annotations
    }
}

impl std::fmt::Debug for OperationImport<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationImport")
            .field("container", &self.container.full_name())
            .field("name", &self.name())
            .finish()
    }
}
